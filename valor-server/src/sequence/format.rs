//! Order code rendering
//!
//! `PREFIX-BLOCK-NNN`, where `NNN` is the sequence value zero-padded to a
//! minimum width. Values wider than the minimum are printed in full.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIX: &str = "SV";
pub const DEFAULT_BLOCK: &str = "1000";
pub const DEFAULT_MIN_WIDTH: usize = 3;

/// Order code layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCodeFormat {
    pub prefix: String,
    pub block: String,
    pub min_width: usize,
}

impl OrderCodeFormat {
    /// Load from `ORDER_CODE_PREFIX` / `ORDER_CODE_BLOCK`, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            prefix: std::env::var("ORDER_CODE_PREFIX")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.prefix),
            block: std::env::var("ORDER_CODE_BLOCK")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.block),
            min_width: defaults.min_width,
        }
    }

    pub fn render(&self, value: u64) -> String {
        format!(
            "{}-{}-{:0width$}",
            self.prefix,
            self.block,
            value,
            width = self.min_width
        )
    }
}

impl Default for OrderCodeFormat {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            block: DEFAULT_BLOCK.to_string(),
            min_width: DEFAULT_MIN_WIDTH,
        }
    }
}

/// Render with the default `SV-1000-NNN` layout
pub fn format_order_code(value: u64) -> String {
    OrderCodeFormat::default().render(value)
}

/// A minted order code together with the sequence value it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCode {
    pub sequence: u64,
    pub code: String,
}

impl OrderCode {
    pub fn as_str(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for OrderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_padding() {
        assert_eq!(format_order_code(1), "SV-1000-001");
        assert_eq!(format_order_code(42), "SV-1000-042");
        assert_eq!(format_order_code(999), "SV-1000-999");
    }

    #[test]
    fn test_grows_past_min_width() {
        assert_eq!(format_order_code(1000), "SV-1000-1000");
        assert_eq!(format_order_code(123_456_789), "SV-1000-123456789");
    }

    #[test]
    fn test_custom_format() {
        let fmt = OrderCodeFormat {
            prefix: "VX".to_string(),
            block: "2026".to_string(),
            min_width: 5,
        };
        assert_eq!(fmt.render(7), "VX-2026-00007");
    }

    #[test]
    fn test_order_code_display() {
        let code = OrderCode {
            sequence: 3,
            code: format_order_code(3),
        };
        assert_eq!(code.to_string(), "SV-1000-003");
        assert_eq!(code.as_str(), "SV-1000-003");
    }
}
