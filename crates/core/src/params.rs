//! Total helpers for extracting typed parameters from a `serde_json::Value`.
//!
//! Missing keys or mismatched types fall back to the supplied default; these
//! never fail, matching the simulator's degrade-to-default error policy.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or
/// wrong type. JSON integers are accepted and widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}
