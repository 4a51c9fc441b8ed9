//! Result formatting for display

use gauge_plugin::prelude::*;

/// Magnitudes from here on are shown in exponent form (`1e+21`)
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Render `value` with `decimals` fixed places, then drop trailing zeros
/// and a dangling decimal point: `500.000000` → `500`, `2.500000` → `2.5`.
///
/// Exact ties round away from zero (`0.0078125` → `0.007813`). Values of
/// magnitude 1e21 and above use exponent form.
pub fn format_result(value: f64, decimals: usize) -> String {
    if value.is_finite() && value.abs() >= EXPONENT_THRESHOLD {
        return exponent_form(value);
    }

    let fixed = to_fixed(value, decimals);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    // Tiny negatives round to "-0"
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Fixed-point rendering with exact ties rounded away from zero
fn to_fixed(value: f64, decimals: usize) -> String {
    if is_decimal_tie(value, decimals) {
        // One ulp away from zero stays below the next rounding boundary
        let nudged = f64::from_bits(value.to_bits() + 1);
        return format!("{:.*}", decimals, nudged);
    }
    format!("{:.*}", decimals, value)
}

/// Whether `value` lies exactly halfway between two `decimals`-place numbers.
///
/// A tie has exactly `decimals + 1` fractional digits, which a binary
/// fraction only has when `value * 2^(decimals + 1)` is an integer. In that
/// case the `decimals + 1` rendering is exact.
fn is_decimal_tie(value: f64, decimals: usize) -> bool {
    let Ok(exp) = i32::try_from(decimals + 1) else {
        return false;
    };
    let scaled = value * 2f64.powi(exp);
    if !scaled.is_finite() || scaled.fract() != 0.0 {
        return false;
    }
    format!("{:.*}", decimals + 1, value).ends_with('5')
}

/// Shortest round-trip digits with a signed exponent: `1e+22`, `-1.5e+21`
fn exponent_form(value: f64) -> String {
    format!("{:e}", value).replacen('e', "e+", 1)
}

// ============ FormatResult ============

pub struct FormatResult;

static FORMAT_RESULT_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("value", "Number", "Converted value"),
    ArgMeta::optional("decimals", "Number", "Fixed decimal places before trimming", "6"),
];

static FORMAT_RESULT_EXAMPLES: [&str; 3] = [
    "format_result(500) → \"500\"",
    "format_result(2.5) → \"2.5\"",
    "format_result(0.1234567) → \"0.123457\"",
];

static FORMAT_RESULT_RELATED: [&str; 2] = ["convert", "validate_input"];

impl FunctionPlugin for FormatResult {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "format_result",
            description: "Format a converted value for display without trailing zeros",
            usage: "format_result(value, [decimals])",
            args: &FORMAT_RESULT_ARGS,
            returns: "Text",
            examples: &FORMAT_RESULT_EXAMPLES,
            category: "text/format",
            related: &FORMAT_RESULT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(GaugeError::arg_count("format_result", 1, 0));
        }

        let value = match &args[0] {
            Value::Number(n) => *n,
            Value::Error(e) => return Value::Error(e.clone()),
            other => return Value::Error(GaugeError::arg_type("format_result", "value", "Number", other.type_name())),
        };

        let decimals = match args.get(1) {
            None | Some(Value::Null) => ctx.decimals,
            Some(Value::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => *n as usize,
            Some(other) => {
                return Value::Error(GaugeError::arg_type(
                    "format_result", "decimals", "non-negative integer", other.type_name(),
                ))
            }
        };

        Value::Text(format_result(value, decimals))
    }
}
