// Chunked JSON streaming utilities
use crate::domain::dashboard::DashboardEvent;
use crate::infrastructure::http_response::brotli_compress;
use crate::infrastructure::json_mapper::{StreamMessage, event_to_message};
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use tokio::sync::mpsc;

pub const FRAME_CONTENT_TYPE: &str = "application/x-crm-frames+json";

/// Create a chunked streaming response of length-prefixed JSON frames
pub fn chunked_json_stream<S>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = StreamMessage> + Send + 'static,
{
    let byte_stream = stream.then(move |msg| async move { serialize_chunk(&msg, compress).await });

    // Frames are compressed individually, so no Content-Encoding header here:
    // a client that decoded the whole body would break the framing.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, FRAME_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from_stream(byte_stream))
        .map_err(|e| {
            tracing::error!("Stream response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Serialize one message to a frame: 4-byte big-endian length, then the JSON
/// document (Brotli-compressed when `compress` is set).
pub async fn serialize_chunk(msg: &StreamMessage, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(msg)?;

    let payload = if compress {
        brotli_compress(json).await?
    } else {
        json
    };

    let length = u32::try_from(payload.len())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidData, "frame too large"))?;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Helper to create a streaming response from a receiver.
///
/// The receiver is owned by the response body; when the client disconnects
/// the body is dropped and the producer sees its channel close.
pub fn stream_from_receiver(
    mut rx: mpsc::Receiver<DashboardEvent>,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            yield event_to_message(event);
        }
    };

    match chunked_json_stream(stream, compress) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Split a buffered stream body back into frame payloads.
#[cfg(test)]
pub(crate) fn split_frames(mut body: &[u8]) -> Vec<Vec<u8>> {
    use bytes::Buf;

    let mut frames = Vec::new();
    while body.has_remaining() {
        let length = body.get_u32() as usize;
        frames.push(body[..length].to_vec());
        body.advance(length);
    }
    frames
}
