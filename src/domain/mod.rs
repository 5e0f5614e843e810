pub mod admin;
pub mod member;
pub mod payment;
pub mod plan;
pub mod renewal;
pub mod settings;
pub mod validation;

pub use admin::*;
pub use member::*;
pub use payment::*;
pub use renewal::*;
pub use settings::*;
