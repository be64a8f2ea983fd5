use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::FindingSet;

/// Lifecycle of the single ingestion slot
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AppState {
    #[default]
    Idle,
    Loading {
        file_name: String,
    },
    Ready {
        file_name: String,
        findings: FindingSet,
    },
    Failed {
        file_name: String,
        message: String,
    },
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AppState::Loading { .. })
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            AppState::Idle => None,
            AppState::Loading { file_name }
            | AppState::Ready { file_name, .. }
            | AppState::Failed { file_name, .. } => Some(file_name),
        }
    }

    /// Findings of the last successful ingestion; empty in every other state
    pub fn findings(&self) -> FindingSet {
        match self {
            AppState::Ready { findings, .. } => findings.clone(),
            _ => FindingSet::default(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AppState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Which derived view the presentation side is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Findings,
    Leaderboard,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Findings, View::Leaderboard];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Findings => "Audit Findings",
            View::Leaderboard => "Leaderboard",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// What subscribers observe: the ingestion state plus the selected view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub app: AppState,
    pub view: View,
}
