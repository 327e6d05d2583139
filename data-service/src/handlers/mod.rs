pub mod health;
pub mod records;

pub use health::{health_check, metrics_endpoint, readiness_check, root};
pub use records::get_all_data;
