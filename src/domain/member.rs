use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub national_id: Option<String>,
    pub join_date: NaiveDate,
    pub plan_type: String,
    pub plan_price: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: MemberStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Expired,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Expired => "expired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(MemberStatus::Active),
            "expired" => Some(MemberStatus::Expired),
            _ => None,
        }
    }
}

/// Fully validated member fields, ready to be written.
#[derive(Debug, Clone)]
pub struct MemberRecord {
    pub full_name: String,
    pub phone: String,
    pub national_id: Option<String>,
    pub join_date: NaiveDate,
    pub plan_type: String,
    pub plan_price: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: MemberStatus,
}

/// Member form as entered by the owner. Dates and price arrive as text and
/// are only trusted after validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberForm {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub national_id: Option<String>,
    /// Defaults to today.
    #[serde(default)]
    pub join_date: Option<String>,
    pub plan_type: String,
    pub plan_price: String,
    pub start_date: String,
    /// Computed from the plan when omitted.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Manual override; inferred from the end date when omitted.
    #[serde(default)]
    pub status: Option<MemberStatus>,
}

/// New plan terms applied by a renewal.
#[derive(Debug, Clone)]
pub struct PlanChange {
    pub plan_type: String,
    pub plan_price: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: MemberStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Expired,
}

impl StatusFilter {
    pub fn status(&self) -> Option<MemberStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(MemberStatus::Active),
            StatusFilter::Expired => Some(MemberStatus::Expired),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberSort {
    /// Soonest end date first.
    #[default]
    EndDate,
    /// Most recently added first.
    Newest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub sort: MemberSort,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiringMember {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub end_date: NaiveDate,
}
