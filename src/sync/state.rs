//! Per-kind view state shared between the pollers and the presentation layer.
//!
//! Each data kind owns one slice of the state. A successful fetch replaces its
//! slice; a failed fetch keeps whatever was there and records the error. Once
//! closed, the state ignores every further registration and completion.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::live_data::{DataKind, FetchError};
use crate::models::{ChatMessage, CommentaryEntry, MatchSnapshot, MatchStatistics};

/// A successfully fetched slice of match data.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Match(MatchSnapshot),
    Commentary(Vec<CommentaryEntry>),
    Statistics(MatchStatistics),
    Chat(Vec<ChatMessage>),
}

impl Update {
    pub fn kind(&self) -> DataKind {
        match self {
            Update::Match(_) => DataKind::Match,
            Update::Commentary(_) => DataKind::Commentary,
            Update::Statistics(_) => DataKind::Statistics,
            Update::Chat(_) => DataKind::Chat,
        }
    }
}

/// Where the controller stands with respect to the live match snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// Nothing fetched, nothing in flight
    Uninitialized,
    /// First fetch in flight, no snapshot yet
    Loading,
    /// Snapshot available, no outstanding errors
    Ready,
    /// Snapshot available but a recent fetch failed
    Degraded,
    /// Fetches failed before any snapshot was obtained
    Unavailable,
}

/// What the presentation layer should render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewMode {
    /// Full-page spinner
    Loading,
    /// Full-page error with a retry action
    BlockingError { message: String },
    NoData,
    /// Dashboard; `degraded` shows the cached-data banner, `updating` the
    /// in-flight indicator
    Live { degraded: bool, updating: bool },
}

/// Health of one data feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedStatus {
    pub kind: DataKind,
    pub in_flight: usize,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub match_data: Option<MatchSnapshot>,
    pub commentary: Vec<CommentaryEntry>,
    pub statistics: Option<MatchStatistics>,
    pub chat: Vec<ChatMessage>,
    /// True while any fetch is in flight
    pub loading: bool,
    /// Most recent failure among feeds whose latest attempt failed
    pub error: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub phase: SyncPhase,
    pub mode: ViewMode,
    pub feeds: Vec<FeedStatus>,
}

#[derive(Debug)]
struct RecordedError {
    seq: u64,
    message: String,
}

#[derive(Debug, Default)]
struct FeedState {
    in_flight: usize,
    last_success: Option<DateTime<Utc>>,
    error: Option<RecordedError>,
}

#[derive(Debug, Default)]
pub struct SyncState {
    closed: bool,
    match_data: Option<MatchSnapshot>,
    commentary: Vec<CommentaryEntry>,
    statistics: Option<MatchStatistics>,
    chat: Vec<ChatMessage>,
    feeds: HashMap<DataKind, FeedState>,
    error_seq: u64,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Register a fetch of `kind` as in flight. Returns false once closed, in
    /// which case the fetch must not be issued.
    pub fn begin(&mut self, kind: DataKind) -> bool {
        if self.closed {
            return false;
        }
        self.feeds.entry(kind).or_default().in_flight += 1;
        true
    }

    /// Apply the outcome of a fetch. Returns false if it was dropped because
    /// the state is closed.
    pub fn finish(&mut self, outcome: Result<Update, FetchError>) -> bool {
        if self.closed {
            return false;
        }
        let kind = match &outcome {
            Ok(update) => update.kind(),
            Err(e) => e.kind,
        };

        match outcome {
            Ok(update) => {
                match update {
                    Update::Match(snapshot) => self.match_data = Some(snapshot),
                    Update::Commentary(entries) => self.commentary = entries,
                    Update::Statistics(stats) => self.statistics = Some(stats),
                    Update::Chat(messages) => self.chat = messages,
                }
                let feed = self.feeds.entry(kind).or_default();
                feed.in_flight = feed.in_flight.saturating_sub(1);
                feed.error = None;
                feed.last_success = Some(Utc::now());
                debug!("Applied {} update", kind);
            }
            Err(e) => {
                self.error_seq += 1;
                let seq = self.error_seq;
                let feed = self.feeds.entry(kind).or_default();
                feed.in_flight = feed.in_flight.saturating_sub(1);
                feed.error = Some(RecordedError {
                    seq,
                    message: e.message,
                });
                warn!(
                    "{} refresh failed (have snapshot: {})",
                    kind,
                    self.match_data.is_some()
                );
            }
        }
        true
    }

    /// Freeze the state. Pending fetches are forgotten and later completions
    /// are ignored.
    pub fn close(&mut self) {
        for feed in self.feeds.values_mut() {
            feed.in_flight = 0;
        }
        self.closed = true;
    }

    pub fn loading(&self) -> bool {
        self.feeds.values().any(|f| f.in_flight > 0)
    }

    pub fn error(&self) -> Option<&str> {
        self.feeds
            .values()
            .filter_map(|f| f.error.as_ref())
            .max_by_key(|e| e.seq)
            .map(|e| e.message.as_str())
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.feeds.values().filter_map(|f| f.last_success).max()
    }

    pub fn phase(&self) -> SyncPhase {
        match (self.match_data.is_some(), self.error().is_some()) {
            (true, false) => SyncPhase::Ready,
            (true, true) => SyncPhase::Degraded,
            (false, _) if self.loading() => SyncPhase::Loading,
            (false, true) => SyncPhase::Unavailable,
            (false, false) => SyncPhase::Uninitialized,
        }
    }

    pub fn mode(&self) -> ViewMode {
        let loading = self.loading();
        let error = self.error();
        if self.match_data.is_none() {
            return match error {
                _ if loading => ViewMode::Loading,
                Some(message) => ViewMode::BlockingError {
                    message: message.to_string(),
                },
                None => ViewMode::NoData,
            };
        }
        ViewMode::Live {
            degraded: error.is_some(),
            updating: loading,
        }
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            match_data: self.match_data.clone(),
            commentary: self.commentary.clone(),
            statistics: self.statistics.clone(),
            chat: self.chat.clone(),
            loading: self.loading(),
            error: self.error().map(str::to_string),
            last_update: self.last_update(),
            phase: self.phase(),
            mode: self.mode(),
            feeds: DataKind::ALL
                .iter()
                .map(|kind| {
                    let feed = self.feeds.get(kind);
                    FeedStatus {
                        kind: *kind,
                        in_flight: feed.map_or(0, |f| f.in_flight),
                        last_success: feed.and_then(|f| f.last_success),
                        last_error: feed
                            .and_then(|f| f.error.as_ref())
                            .map(|e| e.message.clone()),
                    }
                })
                .collect(),
        }
    }
}
