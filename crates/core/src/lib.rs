//! Core types, constants, and pure logic for the city events backend.
//!
//! This crate has zero internal dependencies and performs no I/O. It is
//! shared by the repository layer, the notification dispatcher, the importer,
//! the worker, and the HTTP API.

/// Define a string-backed enum whose variants map one-to-one onto the
/// `TEXT` values stored in the database.
///
/// Generates `as_str`, `ALL`, `Display`, and a `FromStr` impl that rejects
/// unknown values with [`error::CoreError::Validation`].
macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// The value stored in the database column.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

pub mod catalog;
pub mod error;
pub mod notification;
pub mod pagination;
pub mod scheduling;
pub mod slug;
pub mod types;
pub mod validation;
