use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Member, MemberStatus, PaymentMethod};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewalRequest {
    pub plan_type: String,
    pub plan_price: String,
    /// Defaults to the day after the current end date for a running
    /// membership, or today for an expired one.
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default = "default_record_payment")]
    pub record_payment: bool,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_notes: Option<String>,
}

fn default_record_payment() -> bool {
    true
}

/// Values a renewal form is prefilled with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenewalPreview {
    pub member_id: i64,
    pub current_plan_type: String,
    pub current_plan_price: f64,
    pub current_end_date: NaiveDate,
    pub status: MemberStatus,
    pub plan_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenewalOutcome {
    pub member: Member,
    pub payment_recorded: bool,
}
