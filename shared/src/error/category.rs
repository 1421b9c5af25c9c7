//! Error categories

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storefront area an [`ErrorCode`] belongs to, taken from its thousands digit
///
/// | range | category |
/// |---|---|
/// | 0xxx | `general` (request shape, generic lookups) |
/// | 1xxx | `auth` (login, JWT) |
/// | 2xxx | `permission` (admin-only routes, foreign records) |
/// | 4xxx | `order` (checkout, status changes) |
/// | 6xxx | `product` (catalogue) |
/// | 8xxx | `user` (accounts, signup) |
/// | 9xxx | `system` (database, order number sequence) |
///
/// 3xxx, 5xxx and 7xxx carry no codes and fall back to `general`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Order,
    Product,
    User,
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            1 => Self::Auth,
            2 => Self::Permission,
            4 => Self::Order,
            6 => Self::Product,
            8 => Self::User,
            9.. => Self::System,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Order => "order",
            Self::Product => "product",
            Self::User => "user",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
