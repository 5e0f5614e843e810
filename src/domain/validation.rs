use super::plan::parse_iso_date;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const DATE_FORMAT_ERROR: &str = "Start/end dates must be valid ISO dates (YYYY-MM-DD).";
pub const DATE_RANGE_ERROR: &str = "Plan dates must end no later than 9999-12-31.";

/// Check a member form before anything is written. Returns every problem
/// found as a user-facing message; an empty list means the input is valid.
pub fn validate_member_inputs(
    full_name: &str,
    phone: &str,
    plan_price: &str,
    start_date: &str,
    end_date: &str,
) -> Vec<String> {
    let mut errors = Vec::new();

    if full_name.trim().is_empty() {
        errors.push("Full name is required.".to_string());
    }
    if phone.trim().is_empty() {
        errors.push("Phone is required.".to_string());
    }
    if parse_price(plan_price).is_none() {
        errors.push("Plan price must be a non-negative number.".to_string());
    }

    match (parse_iso_date(start_date), parse_iso_date(end_date)) {
        (Ok(start), Ok(end)) => {
            if end <= start {
                errors.push("End date must be after start date.".to_string());
            }
        }
        _ => errors.push(DATE_FORMAT_ERROR.to_string()),
    }

    errors
}

/// Parse a price entered as text. Accepts finite, non-negative numbers only.
pub fn parse_price(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
}

pub fn validate_payment_amount(amount: f64) -> Vec<String> {
    if amount.is_finite() && amount > 0.0 {
        Vec::new()
    } else {
        vec!["Amount must be > 0.".to_string()]
    }
}

pub fn validate_new_password(new_password: &str, confirm: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LENGTH
        ));
    }
    if new_password != confirm {
        errors.push("Passwords do not match.".to_string());
    }
    errors
}
