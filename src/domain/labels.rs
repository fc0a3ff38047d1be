// Enumerated record fields that tolerate values outside the known set

/// Declares a string-backed enum for a CRM field such as a deal status.
///
/// Unrecognised or missing values decode into `Unknown(raw)` rather than
/// failing the whole page, so every record still lands in some bucket.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "Option<String>", into = "String")]
        pub enum $name {
            $($variant,)+
            Unknown(String),
        }

        impl $name {
            /// Wire label, or the raw value for unknown variants.
            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unknown(raw) => raw,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::Unknown(String::new())
            }
        }

        impl From<Option<String>> for $name {
            fn from(raw: Option<String>) -> Self {
                match raw.as_deref().map(str::trim) {
                    $(Some($label) => Self::$variant,)+
                    _ => Self::Unknown(raw.unwrap_or_default()),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(Some(raw.to_string()))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

pub(crate) use label_enum;
