/// Set after bootstrapping the default admin; cleared by a password change.
pub const FORCE_PASSWORD_CHANGE: &str = "force_password_change";

/// Flags are stored as `"1"` / `"0"`.
pub fn flag_value(enabled: bool) -> &'static str {
    if enabled { "1" } else { "0" }
}

pub fn parse_flag(value: &str) -> bool {
    value.trim() == "1"
}
