use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ChatMessage, CommentaryEntry, MatchSnapshot, MatchStatistics};

/// The four independently refreshed slices of match data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Match,
    Commentary,
    Statistics,
    Chat,
}

impl DataKind {
    pub const ALL: [DataKind; 4] = [
        DataKind::Match,
        DataKind::Commentary,
        DataKind::Statistics,
        DataKind::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Match => "match",
            DataKind::Commentary => "commentary",
            DataKind::Statistics => "statistics",
            DataKind::Chat => "chat",
        }
    }

    /// User-facing message reported when a fetch of this kind fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            DataKind::Match => "Failed to fetch live match data",
            DataKind::Commentary => "Failed to fetch commentary",
            DataKind::Statistics => "Failed to fetch match stats",
            DataKind::Chat => "Failed to fetch live chat",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed fetch of one data kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: DataKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: DataKind, message: impl Into<String>) -> Self {
        FetchError {
            kind,
            message: message.into(),
        }
    }

    /// Failure carrying the canonical message for `kind`.
    pub fn for_kind(kind: DataKind) -> Self {
        Self::new(kind, kind.failure_message())
    }
}

/// Trait that every cricket data source must implement.
///
/// Match, commentary and statistics failures propagate to the caller. Chat is
/// the least critical feed, so its failures are absorbed by the provider and
/// surface only as an empty list.
#[async_trait]
pub trait CricketProvider: Send + Sync {
    /// Current snapshot of the live match.
    async fn fetch_match(&self) -> Result<MatchSnapshot, FetchError>;

    /// Commentary feed, most recent delivery first.
    async fn fetch_commentary(&self) -> Result<Vec<CommentaryEntry>, FetchError>;

    /// Aggregate match statistics.
    async fn fetch_statistics(&self) -> Result<MatchStatistics, FetchError>;

    /// Live chat feed. Never fails; an unavailable feed yields an empty list.
    async fn fetch_chat(&self) -> Vec<ChatMessage>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
