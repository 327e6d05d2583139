pub mod database;
pub mod importer;
pub mod metrics;
pub mod source;

pub use database::{MongoDb, DATA_COLLECTION};
pub use importer::{import_records, load_records};
pub use self::metrics::{
    get_metrics, init_metrics, record_records_served, RECORDS_SERVED_TOTAL,
};
pub use source::{resolve_source, FileSource, MongoSource, RecordSource, SourceMode};
