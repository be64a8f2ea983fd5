pub mod app;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod types;

pub use app::{AppState, IngestSession, SourcePort, View};
pub use domain::{Finding, FindingSet, FindingStatus};
pub use error::{ConfigError, IngestError};
pub use pipeline::{ingest, IngestOptions};
pub use report::{
    compute_dashboard_stats, compute_leaderboard, compute_listing, DashboardStats, FindingRow,
    TeamLeaderboardEntry,
};
