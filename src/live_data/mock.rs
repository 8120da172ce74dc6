//! In-memory cricket provider serving fixture data.
//!
//! Every call sleeps for a per-kind simulated latency. The live match is owned
//! by the provider instance and nudged forward at random on each read, so a
//! dashboard polling it sees the score tick along. Individual feeds can be
//! switched into a failing mode to exercise the degraded paths downstream.

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use super::fixtures;
use super::provider::{CricketProvider, DataKind, FetchError};
use crate::models::{ChatMessage, CommentaryEntry, MatchSnapshot, MatchStatistics, Score};

/// Probability that a match read advances the score. Arbitrary: equivalent to
/// a uniform draw exceeding 0.7.
pub const DEFAULT_LIVE_UPDATE_CHANCE: f64 = 0.3;

/// Simulated network latency per data kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub match_data: Duration,
    pub commentary: Duration,
    pub statistics: Duration,
    pub chat: Duration,
}

impl Default for MockLatency {
    fn default() -> Self {
        MockLatency {
            match_data: Duration::from_millis(500),
            commentary: Duration::from_millis(300),
            statistics: Duration::from_millis(200),
            chat: Duration::from_millis(100),
        }
    }
}

impl MockLatency {
    pub fn for_kind(&self, kind: DataKind) -> Duration {
        match kind {
            DataKind::Match => self.match_data,
            DataKind::Commentary => self.commentary,
            DataKind::Statistics => self.statistics,
            DataKind::Chat => self.chat,
        }
    }
}

/// Per-kind failure switches, togglable while the provider is in use.
#[derive(Debug, Default)]
pub struct FaultPlan {
    match_data: AtomicBool,
    commentary: AtomicBool,
    statistics: AtomicBool,
    chat: AtomicBool,
}

impl FaultPlan {
    pub fn new(failing: &[DataKind]) -> Self {
        let plan = FaultPlan::default();
        for kind in failing {
            plan.set(*kind, true);
        }
        plan
    }

    pub fn set(&self, kind: DataKind, failing: bool) {
        self.flag(kind).store(failing, Ordering::SeqCst);
    }

    pub fn is_failing(&self, kind: DataKind) -> bool {
        self.flag(kind).load(Ordering::SeqCst)
    }

    fn flag(&self, kind: DataKind) -> &AtomicBool {
        match kind {
            DataKind::Match => &self.match_data,
            DataKind::Commentary => &self.commentary,
            DataKind::Statistics => &self.statistics,
            DataKind::Chat => &self.chat,
        }
    }
}

struct MockState {
    snapshot: MatchSnapshot,
    rng: StdRng,
}

pub struct MockCricketProvider {
    state: Mutex<MockState>,
    /// Oldest delivery first
    commentary: Vec<CommentaryEntry>,
    statistics: MatchStatistics,
    chat: Vec<ChatMessage>,
    latency: MockLatency,
    live_update_chance: f64,
    faults: FaultPlan,
}

impl MockCricketProvider {
    /// Build a provider over fresh fixtures. A fixed `seed` makes the score
    /// progression reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let now = Utc::now();
        MockCricketProvider {
            state: Mutex::new(MockState {
                snapshot: fixtures::live_match(),
                rng,
            }),
            commentary: fixtures::commentary(now),
            statistics: fixtures::statistics(),
            chat: fixtures::chat(now),
            latency: MockLatency::default(),
            live_update_chance: DEFAULT_LIVE_UPDATE_CHANCE,
            faults: FaultPlan::default(),
        }
    }

    pub fn with_live_update_chance(mut self, chance: f64) -> Self {
        self.live_update_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn with_faults(mut self, failing: &[DataKind]) -> Self {
        self.faults = FaultPlan::new(failing);
        self
    }

    /// Runtime switches for the simulated failures.
    #[allow(dead_code)]
    pub fn faults(&self) -> &FaultPlan {
        &self.faults
    }

    /// Wait out the simulated latency, then fail if the kind is switched off.
    async fn simulate(&self, kind: DataKind) -> Result<(), FetchError> {
        tokio::time::sleep(self.latency.for_kind(kind)).await;
        if self.faults.is_failing(kind) {
            return Err(FetchError::new(kind, format!("{} feed unavailable", kind)));
        }
        Ok(())
    }

    async fn load_chat(&self) -> Result<Vec<ChatMessage>, FetchError> {
        self.simulate(DataKind::Chat).await?;
        Ok(self.chat.clone())
    }
}

/// Map an internal failure to the canonical message for its kind.
fn surface(err: FetchError) -> FetchError {
    error!("Error fetching {}: {}", err.kind, err);
    FetchError::for_kind(err.kind)
}

#[async_trait]
impl CricketProvider for MockCricketProvider {
    fn name(&self) -> &str {
        "MockCricketAPI"
    }

    async fn fetch_match(&self) -> Result<MatchSnapshot, FetchError> {
        self.simulate(DataKind::Match).await.map_err(surface)?;

        let mut state = self.state.lock().await;
        let MockState { snapshot, rng } = &mut *state;
        let innings = snapshot.current_innings;
        if apply_live_update(
            snapshot.score.batting_mut(innings),
            self.live_update_chance,
            rng,
        ) {
            let score = snapshot.score.batting(innings);
            debug!(
                "Simulated delivery: {}/{} ({}.{} ov)",
                score.runs, score.wickets, score.overs, score.balls
            );
        }
        Ok(snapshot.clone())
    }

    async fn fetch_commentary(&self) -> Result<Vec<CommentaryEntry>, FetchError> {
        self.simulate(DataKind::Commentary).await.map_err(surface)?;
        Ok(self.commentary.iter().rev().cloned().collect())
    }

    async fn fetch_statistics(&self) -> Result<MatchStatistics, FetchError> {
        self.simulate(DataKind::Statistics).await.map_err(surface)?;
        Ok(self.statistics.clone())
    }

    async fn fetch_chat(&self) -> Vec<ChatMessage> {
        match self.load_chat().await {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Error fetching live chat: {}", e);
                Vec::new()
            }
        }
    }
}

/// With probability `chance`, score one delivery on `score`: add 1–6 runs,
/// advance the ball counter (rolling into the next over at six legal balls)
/// and recompute the run rate. Returns whether the score changed.
pub fn apply_live_update<R: Rng + ?Sized>(score: &mut Score, chance: f64, rng: &mut R) -> bool {
    if !rng.gen_bool(chance.clamp(0.0, 1.0)) {
        return false;
    }

    score.runs += rng.gen_range(1..=6);
    score.balls += 1;
    if score.balls >= 6 {
        score.overs += 1;
        score.balls = 0;
    }
    score.run_rate = run_rate(score.runs, score.overs, score.balls);
    true
}

/// Runs per over, counting partial overs as balls / 6. Zero before the first ball.
pub fn run_rate(runs: u32, overs: u32, balls: u32) -> f64 {
    let overs = overs as f64 + balls as f64 / 6.0;
    if overs == 0.0 {
        0.0
    } else {
        runs as f64 / overs
    }
}
