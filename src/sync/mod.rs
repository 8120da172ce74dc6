pub mod state;

pub use state::{DashboardView, SyncState, Update};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::live_data::{CricketProvider, DataKind};

/// Refresh period per data kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub match_data: Duration,
    pub commentary: Duration,
    pub statistics: Duration,
    pub chat: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence {
            match_data: Duration::from_secs(30),
            commentary: Duration::from_secs(15),
            statistics: Duration::from_secs(30),
            chat: Duration::from_secs(30),
        }
    }
}

impl Cadence {
    pub fn for_kind(&self, kind: DataKind) -> Duration {
        match kind {
            DataKind::Match => self.match_data,
            DataKind::Commentary => self.commentary,
            DataKind::Statistics => self.statistics,
            DataKind::Chat => self.chat,
        }
    }
}

/// Keeps a `SyncState` in step with a `CricketProvider`.
///
/// One poller per data kind runs on its own interval, starting with an
/// immediate fetch. `refetch` re-issues all four fetches out of band.
/// `shutdown` freezes the state and stops every task; fetches that resolve
/// afterwards are discarded. Dropping the controller aborts its tasks too.
pub struct SyncController {
    provider: Arc<dyn CricketProvider>,
    state: Arc<RwLock<SyncState>>,
    tasks: Mutex<JoinSet<()>>,
    cadence: Cadence,
}

impl SyncController {
    /// Spawn the pollers. Must be called from within a Tokio runtime.
    pub fn start(provider: Arc<dyn CricketProvider>, cadence: Cadence) -> Self {
        info!(
            "Sync controller started (provider: {}, cadence: {:?})",
            provider.name(),
            cadence
        );

        let state = Arc::new(RwLock::new(SyncState::new()));
        let mut tasks = JoinSet::new();
        for kind in DataKind::ALL {
            tasks.spawn(poll_loop(
                kind,
                cadence.for_kind(kind),
                Arc::clone(&provider),
                Arc::clone(&state),
            ));
        }

        SyncController {
            provider,
            state,
            tasks: Mutex::new(tasks),
            cadence,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Current state for rendering.
    pub async fn view(&self) -> DashboardView {
        self.state.read().await.view()
    }

    /// Fetch every kind now, independent of the poll timers.
    pub async fn refetch(&self) {
        if self.state.read().await.is_closed() {
            debug!("Refetch ignored after shutdown");
            return;
        }
        info!("Manual refetch of all feeds");

        let provider = Arc::clone(&self.provider);
        let state = Arc::clone(&self.state);
        let mut tasks = self.tasks.lock().await;
        // reap finished refetches
        while tasks.try_join_next().is_some() {}
        tasks.spawn(async move {
            let fetches = DataKind::ALL
                .iter()
                .map(|kind| sync_once(*kind, provider.as_ref(), &state));
            futures_util::future::join_all(fetches).await;
        });
    }

    /// Stop all polling. No state change is observable after this returns.
    pub async fn shutdown(&self) {
        self.state.write().await.close();
        self.tasks.lock().await.shutdown().await;
        info!("Sync controller stopped");
    }
}

async fn poll_loop(
    kind: DataKind,
    period: Duration,
    provider: Arc<dyn CricketProvider>,
    state: Arc<RwLock<SyncState>>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if !sync_once(kind, provider.as_ref(), &state).await {
            debug!("{} poller stopped", kind);
            return;
        }
    }
}

/// Run one fetch of `kind` and apply its outcome. Returns false if the state
/// was closed before the fetch started or before it completed.
async fn sync_once(
    kind: DataKind,
    provider: &dyn CricketProvider,
    state: &RwLock<SyncState>,
) -> bool {
    if !state.write().await.begin(kind) {
        return false;
    }

    let outcome = match kind {
        DataKind::Match => provider.fetch_match().await.map(Update::Match),
        DataKind::Commentary => provider.fetch_commentary().await.map(Update::Commentary),
        DataKind::Statistics => provider.fetch_statistics().await.map(Update::Statistics),
        DataKind::Chat => Ok(Update::Chat(provider.fetch_chat().await)),
    };

    state.write().await.finish(outcome)
}

#[cfg(test)]
mod tests {
    use super::state::{SyncPhase, ViewMode};
    use super::*;
    use crate::live_data::{FetchError, MockCricketProvider};
    use crate::models::{ChatMessage, CommentaryEntry, MatchSnapshot, MatchStatistics};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    /// Past the slowest simulated latency.
    const SETTLE: Duration = Duration::from_millis(600);

    /// Counts calls per kind before delegating to the mock.
    struct CountingProvider {
        inner: MockCricketProvider,
        calls: [AtomicUsize; 4],
    }

    impl CountingProvider {
        fn new() -> Self {
            CountingProvider {
                inner: MockCricketProvider::new(Some(3)),
                calls: Default::default(),
            }
        }

        fn record(&self, kind: DataKind) {
            let idx = DataKind::ALL.iter().position(|k| *k == kind).unwrap();
            self.calls[idx].fetch_add(1, Ordering::SeqCst);
        }

        fn calls(&self) -> [usize; 4] {
            [0, 1, 2, 3].map(|i| self.calls[i].load(Ordering::SeqCst))
        }
    }

    #[async_trait]
    impl CricketProvider for CountingProvider {
        fn name(&self) -> &str {
            "Counting"
        }

        async fn fetch_match(&self) -> Result<MatchSnapshot, FetchError> {
            self.record(DataKind::Match);
            self.inner.fetch_match().await
        }

        async fn fetch_commentary(&self) -> Result<Vec<CommentaryEntry>, FetchError> {
            self.record(DataKind::Commentary);
            self.inner.fetch_commentary().await
        }

        async fn fetch_statistics(&self) -> Result<MatchStatistics, FetchError> {
            self.record(DataKind::Statistics);
            self.inner.fetch_statistics().await
        }

        async fn fetch_chat(&self) -> Vec<ChatMessage> {
            self.record(DataKind::Chat);
            self.inner.fetch_chat().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_cycle_populates_every_feed() {
        let provider = Arc::new(MockCricketProvider::new(Some(11)));
        let controller = SyncController::start(provider, Cadence::default());

        let view = controller.view().await;
        assert!(view.match_data.is_none());
        assert!(view.statistics.is_none());
        assert!(view.commentary.is_empty() && view.chat.is_empty());

        sleep(Duration::from_millis(1)).await;
        let view = controller.view().await;
        assert!(view.loading);
        assert_eq!(view.phase, SyncPhase::Loading);
        assert_eq!(view.mode, ViewMode::Loading);

        sleep(SETTLE).await;
        let view = controller.view().await;
        let snapshot = view.match_data.expect("match snapshot");
        assert!((68..=74).contains(&snapshot.score.team1.runs));
        assert_eq!(view.commentary[0].id, "1");
        let stats = view.statistics.expect("statistics");
        assert_eq!(stats.partnerships.len(), 1);
        assert!(stats.partnerships[0].is_active);
        let chat_ids: Vec<&str> = view.chat.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(chat_ids, ["1", "2", "3"]);
        assert!(!view.loading);
        assert!(view.error.is_none());
        assert!(view.last_update.is_some());
        assert_eq!(view.phase, SyncPhase::Ready);

        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_chat_is_empty_without_error() {
        let provider = Arc::new(MockCricketProvider::new(Some(2)).with_faults(&[DataKind::Chat]));
        let controller = SyncController::start(provider, Cadence::default());

        sleep(SETTLE).await;
        let view = controller.view().await;
        assert!(view.chat.is_empty());
        assert!(view.error.is_none());
        assert_eq!(view.phase, SyncPhase::Ready);

        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_failure_after_full_cycle_degrades() {
        let provider = Arc::new(MockCricketProvider::new(Some(4)));
        let controller = SyncController::start(provider.clone(), Cadence::default());

        sleep(SETTLE).await;
        let before = controller.view().await;
        assert_eq!(before.phase, SyncPhase::Ready);

        provider.faults().set(DataKind::Match, true);
        controller.refetch().await;
        sleep(SETTLE).await;

        let after = controller.view().await;
        assert_eq!(after.phase, SyncPhase::Degraded);
        assert_eq!(after.match_data, before.match_data);
        assert_eq!(after.error.as_deref(), Some("Failed to fetch live match data"));
        assert_eq!(
            after.mode,
            ViewMode::Live {
                degraded: true,
                updating: false
            }
        );

        provider.faults().set(DataKind::Match, false);
        controller.refetch().await;
        sleep(SETTLE).await;
        let recovered = controller.view().await;
        assert_eq!(recovered.phase, SyncPhase::Ready);
        assert!(recovered.error.is_none());

        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_before_any_data_blocks_until_retry() {
        let provider = Arc::new(MockCricketProvider::new(Some(6)).with_faults(&[DataKind::Match]));
        let controller = SyncController::start(provider.clone(), Cadence::default());

        sleep(SETTLE).await;
        let view = controller.view().await;
        assert!(view.match_data.is_none());
        assert_eq!(view.phase, SyncPhase::Unavailable);
        assert_eq!(
            view.mode,
            ViewMode::BlockingError {
                message: "Failed to fetch live match data".into()
            }
        );
        // the other feeds still landed
        assert_eq!(view.commentary.len(), 3);

        provider.faults().set(DataKind::Match, false);
        controller.refetch().await;
        sleep(SETTLE).await;
        let view = controller.view().await;
        assert!(view.match_data.is_some());
        assert_eq!(view.phase, SyncPhase::Ready);

        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pollers_follow_cadence() {
        let provider = Arc::new(CountingProvider::new());
        let controller = SyncController::start(provider.clone(), Cadence::default());

        // [match, commentary, statistics, chat]
        sleep(Duration::from_secs(16)).await;
        assert_eq!(provider.calls(), [1, 2, 1, 1]);

        sleep(Duration::from_secs(15)).await;
        assert_eq!(provider.calls(), [2, 3, 2, 2]);

        controller.refetch().await;
        sleep(SETTLE).await;
        assert_eq!(provider.calls(), [3, 4, 3, 3]);

        controller.shutdown().await;
        sleep(Duration::from_secs(120)).await;
        assert_eq!(provider.calls(), [3, 4, 3, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_freezes_state_with_fetches_in_flight() {
        let provider = Arc::new(MockCricketProvider::new(Some(8)));
        let controller = SyncController::start(provider, Cadence::default());

        sleep(Duration::from_millis(50)).await;
        assert!(controller.view().await.loading);

        controller.shutdown().await;
        let frozen = controller.view().await;
        assert!(frozen.match_data.is_none());
        assert!(!frozen.loading);

        sleep(Duration::from_secs(60)).await;
        controller.refetch().await;
        sleep(SETTLE).await;
        assert_eq!(controller.view().await, frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_resolving_after_shutdown_is_discarded() {
        let provider = Arc::new(MockCricketProvider::new(Some(9)));
        let controller = SyncController::start(provider.clone(), Cadence::default());

        // a fetch the controller does not own, so shutdown cannot abort it
        let state = Arc::clone(&controller.state);
        let late = tokio::spawn(async move {
            sync_once(DataKind::Match, &*provider, &state).await
        });

        sleep(Duration::from_millis(1)).await;
        controller.shutdown().await;
        let frozen = controller.view().await;

        let applied = late.await.unwrap();
        assert!(!applied);
        assert_eq!(controller.view().await, frozen);
        assert!(frozen.match_data.is_none());
    }

    #[test]
    fn test_default_cadence() {
        let cadence = Cadence::default();
        assert_eq!(cadence.for_kind(DataKind::Match), Duration::from_secs(30));
        assert_eq!(cadence.for_kind(DataKind::Commentary), Duration::from_secs(15));
        assert_eq!(cadence.for_kind(DataKind::Statistics), Duration::from_secs(30));
        assert_eq!(cadence.for_kind(DataKind::Chat), Duration::from_secs(30));
    }
}
