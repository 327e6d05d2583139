pub mod metrics;
pub mod tracing;

pub use self::metrics::{metrics_middleware, route_label};
pub use self::tracing::{REQUEST_ID_HEADER, request_id_middleware};
