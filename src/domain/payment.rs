use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub member_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "transfer" => Some(PaymentMethod::Transfer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub member_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: f64,
    /// Defaults to today.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payment joined with the paying member's name, as exported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentWithMember {
    pub id: i64,
    pub member_id: i64,
    pub full_name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: f64,
}

/// Blank notes are stored as NULL.
pub fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
