// Null-tolerant field decoding for CRM records
use serde::{Deserialize, Deserializer};

/// Decode a field whose `null` means the same as an absent key.
///
/// Pair with `#[serde(default)]` so both cases land on `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `isActive` defaults to true when absent or null.
pub fn active_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}
