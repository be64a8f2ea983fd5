//! Read-only views derived from a `FindingSet`. Everything here is a pure function.

pub mod dashboard;
pub mod leaderboard;
pub mod listing;

pub use dashboard::{compute_dashboard_stats, DashboardStats};
pub use leaderboard::{compute_leaderboard, render_leaderboard, TeamLeaderboardEntry};
pub use listing::{compute_listing, render_listing, FindingRow, PointTone};
