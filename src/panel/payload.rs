// src/panel/payload.rs

use crate::dsv::{Record, Value};
use crate::table::to_boolean;

/// Flags sent to the backend as `1` / `0`.
pub static ACCOUNT_FLAGS: &[&str] = &["analytics", "explorer", "cmbs"];

pub const TOKEN_STEP: f64 = 100.0;

/// A blank account as the create form starts it.
pub fn account_defaults() -> Record {
    Record::new()
        .with("company", "")
        .with("status", true)
        .with("analytics", true)
        .with("explorer", true)
        .with("cmbs", true)
        .with("unpermissioned", "block")
        .with("tokens", 0)
}

/// Add one step of tokens; absent or non-numeric counts start from zero.
pub fn increment_tokens(account: &mut Record) {
    let current = account.get("tokens").and_then(Value::as_f64).unwrap_or(0.0);
    account.insert("tokens", Some(Value::Number(current + TOKEN_STEP)));
}

/// Shape an edited account for saving: `disabled` is the inverse of
/// `status`, flags become `1`/`0`.
pub fn format_account(mut account: Record) -> Record {
    let active = to_boolean(account.get("status"));
    account.insert("disabled", Some(Value::Bool(!active)));
    for flag in ACCOUNT_FLAGS {
        let on = to_boolean(account.get(flag));
        account.insert(*flag, Some(Value::Number(if on { 1.0 } else { 0.0 })));
    }
    account
}

/// A blank user, attached to `account` when one is selected.
pub fn user_defaults(account: Option<&Value>) -> Record {
    let mut user = Record::new()
        .with("email", "")
        .with("first_name", "")
        .with("last_name", "")
        .with("status", true)
        .with("profile", "");
    user.insert("account", account.cloned());
    user
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_format_as_enabled() {
        let formatted = format_account(account_defaults());
        assert_eq!(formatted.get("disabled"), Some(&Value::Bool(false)));
        assert_eq!(formatted.get("analytics"), Some(&Value::Number(1.0)));
        assert_eq!(formatted.get("explorer"), Some(&Value::Number(1.0)));
        assert_eq!(formatted.get("cmbs"), Some(&Value::Number(1.0)));
        assert_eq!(formatted.get("unpermissioned"), Some(&Value::from("block")));
    }

    #[test]
    fn test_format_inactive_account() {
        let account = Record::new()
            .with("id", "123")
            .with("company", "Test Inc.")
            .with("status", false)
            .with("analytics", 0)
            .with("cmbs", "1");
        let formatted = format_account(account);
        assert_eq!(formatted.get("disabled"), Some(&Value::Bool(true)));
        assert_eq!(formatted.get("analytics"), Some(&Value::Number(0.0)));
        assert_eq!(formatted.get("explorer"), Some(&Value::Number(0.0)));
        assert_eq!(formatted.get("cmbs"), Some(&Value::Number(1.0)));
        assert_eq!(formatted.get("id"), Some(&Value::from("123")));
    }

    #[test]
    fn test_increment_tokens() {
        let mut account = Record::new().with("tokens", 200);
        increment_tokens(&mut account);
        assert_eq!(account.get("tokens"), Some(&Value::Number(300.0)));

        let mut blank = Record::new();
        increment_tokens(&mut blank);
        assert_eq!(blank.get("tokens"), Some(&Value::Number(100.0)));
    }

    #[test]
    fn test_user_defaults() {
        let user = user_defaults(Some(&Value::Number(1.0)));
        assert_eq!(user.get("account"), Some(&Value::Number(1.0)));
        assert_eq!(user.get("status"), Some(&Value::Bool(true)));
        assert_eq!(user.get("profile"), Some(&Value::from("")));

        let orphan = user_defaults(None);
        assert!(orphan.contains_key("account"));
        assert_eq!(orphan.get("account"), None);
    }
}
