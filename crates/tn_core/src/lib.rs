pub mod dates;
pub mod error;
pub mod storage;
pub mod types;

pub use error::Error;
pub use storage::NewsStore;
pub use types::{ArticleDraft, IngestReport, NewRecord, NewsFilter, NewsRecord, SourceError};

pub type Result<T> = std::result::Result<T, Error>;
