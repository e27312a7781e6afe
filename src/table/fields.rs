// src/table/fields.rs

use crate::dsv::Value;

/// Columns rendered as on/off flags.
pub static BOOLEAN_FIELDS: &[&str] = &[
    "analytics",
    "explorer",
    "cmbs",
    "status",
    "disabled",
    "restricted",
    "restricted_apps",
    "show_all",
];

pub fn is_boolean_field(name: &str) -> bool {
    BOOLEAN_FIELDS.contains(&name)
}

/// `true`, `1` and `"1"` are on; anything else (including absent) is off.
pub fn to_boolean(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => *n == 1.0,
        Some(Value::Text(s)) => s == "1",
        None => false,
    }
}
