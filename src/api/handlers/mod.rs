pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod members;
pub mod payments;
pub mod renewals;
pub mod reports;
pub mod root;
