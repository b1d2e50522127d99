pub mod event;
pub mod path;
pub mod provider;
pub mod request;
pub mod response;
pub mod schedule;
pub mod session;

/// Implements `Display`, `FromStr` and `as_str` for a fieldless enum whose
/// variants are persisted as plain strings.
#[macro_export]
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!("unknown {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}
