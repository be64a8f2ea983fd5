pub mod ingest_use_case;
pub mod ports;
pub mod state;

pub use ingest_use_case::IngestSession;
pub use ports::{FileSource, MemorySource, SourcePort};
pub use state::{AppState, SessionState, View};
