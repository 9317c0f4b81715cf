pub mod config;
pub mod templates;
pub mod selection;
pub mod context;
pub mod gate;
pub mod error;
pub mod orchestrator;
pub mod ingestion;
pub mod analytics;

pub use config::RagConfig;
pub use selection::{parse_selection, Selection};
pub use gate::{SessionGate, SessionPermit};
pub use error::{RagError, Result};
pub use orchestrator::{new_session_id, QueryOrchestrator, QueryOrchestratorBuilder, QueryOutcome};
pub use ingestion::{decode_articles, IngestReport, MockIngestor};
pub use analytics::{Analytics, AnalyticsReport, CategoryCount, LatencyPoint};
