pub mod fixtures;
pub mod mock;
pub mod provider;

pub use mock::MockCricketProvider;
pub use provider::{CricketProvider, DataKind, FetchError};
