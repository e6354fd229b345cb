mod auth;
mod dataset;

pub use auth::TokenManager;
pub use auth::is_expired_at;
pub use dataset::CsvDatasetManager;
pub use dataset::DatasetSink;
pub use dataset::DatasetTable;
