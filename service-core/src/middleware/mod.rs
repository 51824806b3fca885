pub mod metrics;
pub mod tracing;

pub use metrics::{metrics_middleware, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};
pub use tracing::{request_id_middleware, REQUEST_ID_HEADER};
