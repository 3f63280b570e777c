use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Stored verbatim in test_orders.status (CHECK constraint in 001_initial.sql).
str_enum!(OrderStatus {
    Pending => "Pending",
    Completed => "Completed",
});

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn order_status_matches_stored_text() {
        for (variant, s) in [
            (OrderStatus::Pending, "Pending"),
            (OrderStatus::Completed, "Completed"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(variant.to_string(), s);
            assert_eq!(OrderStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn order_status_defaults_to_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = OrderStatus::from_str("pending").unwrap_err();
        match err {
            DatabaseError::InvalidEnum { field, value } => {
                assert_eq!(field, "OrderStatus");
                assert_eq!(value, "pending");
            }
            other => panic!("Expected InvalidEnum, got: {other}"),
        }
    }
}
