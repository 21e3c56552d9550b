//! Macro for implementing Display and FromStr for wire-level status enums
//!
//! Status strings reported by external services (for example the flag
//! source's fetcher status) arrive in inconsistent casing. This macro gives a
//! status enum a canonical lowercase rendering and case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use accountstack_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum SyncState {
//!     Idle,
//!     Running,
//! }
//!
//! impl_domain_status_conversions!(SyncState {
//!     Idle => "idle",
//!     Running => "running",
//! });
//!
//! assert_eq!("RUNNING".parse::<SyncState>().unwrap(), SyncState::Running);
//! ```

/// Implements Display and FromStr traits for status enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
///
/// Parsing is case-insensitive; unknown input yields a descriptive `String`
/// error naming the enum.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
