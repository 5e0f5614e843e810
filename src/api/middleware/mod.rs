pub mod auth;
pub mod refresh;
