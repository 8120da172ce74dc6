use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a match as reported by the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Batsman,
    Bowler,
    Allrounder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

/// A value held once per side of the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sides<T> {
    pub team1: T,
    pub team2: T,
}

impl<T> Sides<T> {
    /// The side batting in the given innings (1 → team1, 2 → team2).
    pub fn batting(&self, innings: u8) -> &T {
        if innings % 2 == 0 {
            &self.team2
        } else {
            &self.team1
        }
    }

    pub fn batting_mut(&mut self, innings: u8) -> &mut T {
        if innings % 2 == 0 {
            &mut self.team2
        } else {
            &mut self.team1
        }
    }
}

/// Full state of a live match at one point in observation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub id: String,
    pub status: MatchStatus,
    pub teams: Sides<Team>,
    pub score: Sides<Score>,
    /// 1-based innings currently in progress
    pub current_innings: u8,
    pub toss: Toss,
    pub venue: String,
    /// e.g. "T20I", "ODI"
    pub match_type: String,
    pub start_time: DateTime<Utc>,
    pub weather: Option<Weather>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_name: String,
    /// Emblem / flag image URL
    pub flag: String,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub role: PlayerRole,
    pub is_on_field: bool,
    pub batting: Option<BattingStats>,
    pub bowling: Option<BowlingStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingStats {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub is_not_out: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingStats {
    /// Overs in cricket notation (3.2 = three overs and two balls)
    pub overs: f64,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy: f64,
    /// Legal balls bowled
    pub balls: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub runs: u32,
    pub wickets: u32,
    /// Completed overs
    pub overs: u32,
    /// Legal balls into the current over (0–5)
    pub balls: u32,
    pub run_rate: f64,
    pub required_run_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toss {
    /// Display name of the team that won the toss
    pub winner: String,
    pub decision: TossDecision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub condition: String,
    /// Degrees Celsius
    pub temperature: i32,
    /// Percent
    pub humidity: u32,
    /// km/h
    pub wind_speed: u32,
}

/// One delivery's commentary line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryEntry {
    pub id: String,
    pub over: u32,
    pub ball: u32,
    pub runs: u32,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_wicket: bool,
    pub is_boundary: bool,
    pub player: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub partnerships: Vec<Partnership>,
    pub fall_of_wickets: Vec<FallOfWicket>,
    pub phase_scores: Vec<PhaseScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partnership {
    pub runs: u32,
    pub balls: u32,
    pub player1: String,
    pub player2: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallOfWicket {
    /// Wicket number (1st, 2nd, ...)
    pub wicket: u32,
    /// Team total when the wicket fell
    pub runs: u32,
    pub over: u32,
    pub ball: u32,
    pub player: String,
}

/// Score accumulated over a phase of the innings (powerplay, middle overs, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseScore {
    pub phase: String,
    /// Over range label, e.g. "1-6"
    pub overs: String,
    pub runs: u32,
    pub wickets: u32,
    pub run_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Origin-country tag ("in", "pk", "other", ...)
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batting_side_follows_innings() {
        let mut sides = Sides { team1: 1, team2: 2 };
        assert_eq!(*sides.batting(1), 1);
        assert_eq!(*sides.batting(2), 2);
        *sides.batting_mut(2) += 10;
        assert_eq!(sides.team2, 12);
        assert_eq!(sides.team1, 1);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&MatchStatus::Live).unwrap();
        assert_eq!(json, "\"live\"");
        let role: PlayerRole = serde_json::from_str("\"allrounder\"").unwrap();
        assert_eq!(role, PlayerRole::Allrounder);
    }
}
