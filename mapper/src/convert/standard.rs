//! Converters for plain text, numeric and boolean fields

use super::Converter;

/// Passes text through unchanged; the empty string converts to nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConverter;

impl Converter<String> for TextConverter {
    fn convert(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// Lowercases text, for columns stored in lower case
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseConverter;

impl Converter<String> for LowercaseConverter {
    fn convert(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value.to_lowercase())
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl Converter<i64> for IntegerConverter {
    fn convert(&self, value: &str) -> Option<i64> {
        value.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatConverter;

impl Converter<f64> for FloatConverter {
    fn convert(&self, value: &str) -> Option<f64> {
        value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

/// Accepts true/false, yes/no and 1/0 in any case
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl Converter<bool> for BooleanConverter {
    fn convert(&self, value: &str) -> Option<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}
