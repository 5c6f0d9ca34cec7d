//! Streaming indicator engine: price window, snapshot and ingestion loop

pub mod ingestion;
pub mod shutdown;
pub mod snapshot;
pub mod window;

pub use ingestion::{IngestionService, TickOutcome};
pub use shutdown::{ShutdownListener, ShutdownSignal};
pub use snapshot::SnapshotHandle;
pub use window::PriceWindow;
