//! Enumerated values of the device command language.
//!
//! Each variant carries the integer the device uses on the wire.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DeviceError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code,)+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The integer used on the wire.
            pub fn code(self) -> i64 {
                self as i64
            }

            /// Lowercase name, as accepted by [`FromStr`].
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl TryFrom<i64> for $name {
            type Error = DeviceError;

            fn try_from(code: i64) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(DeviceError::UnknownMode {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl FromStr for $name {
            type Err = DeviceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| DeviceError::UnknownMode {
                        kind: $kind,
                        value: wanted.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

wire_enum! {
    /// Cleaning intensity.
    WorkMode, "work mode" {
        Standard = 1 => "standard",
        Intensive = 7 => "intensive",
        Silent = 9 => "silent",
    }
}

wire_enum! {
    /// What the vacuum is currently doing.
    WorkState, "work state" {
        Cleaning = 1 => "cleaning",
        Paused = 2 => "paused",
        Charging = 5 => "charging",
        /// The device reports a fault and needs attention.
        Problem = 9 => "problem",
    }
}

wire_enum! {
    /// Mop water flow.
    MopMode, "mop mode" {
        High = 20 => "high",
        Medium = 40 => "medium",
        Low = 60 => "low",
    }
}
