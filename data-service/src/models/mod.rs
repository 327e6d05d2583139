pub mod record;

pub use record::{normalize_records, DataEnvelope, Record};
