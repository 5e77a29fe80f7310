mod envelope;

pub use envelope::{ApiResponse, Status, payload_from_json};
