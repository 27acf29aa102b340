//! Arithmetic tools.
//!
//! - `add`: sum of two numbers
//! - `calculate`: add, subtract, multiply or divide two numbers

pub mod add;
pub mod calculate;

pub use add::{AddParams, AddTool};
pub use calculate::{CalculateParams, CalculateTool, Operation};

/// Render a number the way MCP clients expect to read it back.
///
/// Integral values print without a fractional part, negative zero prints as
/// `0`, and non-finite values use the `Infinity` / `NaN` spelling. Magnitudes
/// of `1e21` and above or below `1e-6` use exponent form (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(EXPONENT_BELOW..EXPONENT_FROM).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }

    value.to_string()
}

const EXPONENT_BELOW: f64 = 1e-6;
const EXPONENT_FROM: f64 = 1e21;
