use clap::Parser;
use std::time::Duration;

use crate::live_data::mock::DEFAULT_LIVE_UPDATE_CHANCE;
use crate::live_data::DataKind;
use crate::sync::Cadence;

/// Live cricket match dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "cricket-live", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Live match snapshot refresh interval in seconds
    #[arg(long, env = "MATCH_POLL_SECS", default_value = "30")]
    pub match_poll_secs: u64,

    /// Commentary refresh interval in seconds
    #[arg(long, env = "COMMENTARY_POLL_SECS", default_value = "15")]
    pub commentary_poll_secs: u64,

    /// Match statistics refresh interval in seconds
    #[arg(long, env = "STATISTICS_POLL_SECS", default_value = "30")]
    pub statistics_poll_secs: u64,

    /// Live chat refresh interval in seconds
    #[arg(long, env = "CHAT_POLL_SECS", default_value = "30")]
    pub chat_poll_secs: u64,

    /// Seed for the simulated score progression (random when unset)
    #[arg(long, env = "MOCK_SEED")]
    pub seed: Option<u64>,

    /// Probability that a match read scores a simulated delivery (0.0–1.0)
    #[arg(long, env = "LIVE_UPDATE_CHANCE", default_value_t = DEFAULT_LIVE_UPDATE_CHANCE)]
    pub live_update_chance: f64,

    /// Feeds the mock provider should fail (e.g. --fail match,chat)
    #[arg(long, env = "MOCK_FAIL", value_enum, value_delimiter = ',')]
    pub fail: Vec<DataKind>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, secs) in [
            ("match_poll_secs", self.match_poll_secs),
            ("commentary_poll_secs", self.commentary_poll_secs),
            ("statistics_poll_secs", self.statistics_poll_secs),
            ("chat_poll_secs", self.chat_poll_secs),
        ] {
            if secs == 0 {
                anyhow::bail!("{} must be at least 1", name);
            }
        }
        if !(0.0..=1.0).contains(&self.live_update_chance) {
            anyhow::bail!("live_update_chance must be between 0.0 and 1.0");
        }
        Ok(())
    }

    pub fn cadence(&self) -> Cadence {
        Cadence {
            match_data: Duration::from_secs(self.match_poll_secs),
            commentary: Duration::from_secs(self.commentary_poll_secs),
            statistics: Duration::from_secs(self.statistics_poll_secs),
            chat: Duration::from_secs(self.chat_poll_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["cricket-live"]).unwrap();
        config.validate().unwrap();
        assert_eq!(config.cadence(), Cadence::default());
        assert_eq!(config.live_update_chance, 0.3);
        assert!(config.seed.is_none());
        assert!(config.fail.is_empty());
    }

    #[test]
    fn test_fail_list() {
        let config =
            Config::try_parse_from(["cricket-live", "--fail", "match,chat", "--seed", "7"]).unwrap();
        assert_eq!(config.fail, vec![DataKind::Match, DataKind::Chat]);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config =
            Config::try_parse_from(["cricket-live", "--commentary-poll-secs", "0"]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("commentary_poll_secs"));
    }

    #[test]
    fn test_rejects_out_of_range_chance() {
        let config =
            Config::try_parse_from(["cricket-live", "--live-update-chance", "1.5"]).unwrap();
        assert!(config.validate().is_err());
    }
}
