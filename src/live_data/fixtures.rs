//! Hardcoded match records standing in for a real cricket-data service.

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    BattingStats, BowlingStats, ChatMessage, CommentaryEntry, MatchSnapshot, MatchStatistics,
    MatchStatus, Partnership, PhaseScore, Player, PlayerRole, Score, Sides, Team, Toss,
    TossDecision, Weather,
};

const INDIA_FLAG: &str = "https://storage.googleapis.com/workspace-0f70711f-8b4e-4d94-86f1-2a93ccde5887/image/4027463d-9cda-444f-be43-48b8ddf707d6.png";
const PAKISTAN_FLAG: &str = "https://storage.googleapis.com/workspace-0f70711f-8b4e-4d94-86f1-2a93ccde5887/image/1d992f2b-d1b3-4675-b220-42ed10d460c5.png";

/// 2024-01-15T14:30:00Z
const START_TIMESTAMP: i64 = 1_705_329_000;

fn batter(id: &str, name: &str, on_field: bool, stats: BattingStats) -> Player {
    Player {
        id: id.into(),
        name: name.into(),
        role: PlayerRole::Batsman,
        is_on_field: on_field,
        batting: Some(stats),
        bowling: None,
    }
}

fn bowler(id: &str, name: &str, on_field: bool, stats: BowlingStats) -> Player {
    Player {
        id: id.into(),
        name: name.into(),
        role: PlayerRole::Bowler,
        is_on_field: on_field,
        batting: None,
        bowling: Some(stats),
    }
}

fn batting(runs: u32, balls: u32, fours: u32, sixes: u32, strike_rate: f64) -> BattingStats {
    BattingStats {
        runs,
        balls,
        fours,
        sixes,
        strike_rate,
        is_not_out: true,
    }
}

/// India vs Pakistan, first innings in progress: IND 68/0 after 8.2 overs.
pub fn live_match() -> MatchSnapshot {
    let india = Team {
        id: "ind".into(),
        name: "India".into(),
        short_name: "IND".into(),
        flag: INDIA_FLAG.into(),
        players: vec![
            batter("kohli", "Virat Kohli", true, batting(45, 32, 4, 1, 140.6)),
            batter("rohit", "Rohit Sharma", true, batting(23, 18, 3, 0, 127.8)),
            bowler(
                "bumrah",
                "Jasprit Bumrah",
                false,
                BowlingStats {
                    overs: 0.0,
                    maidens: 0,
                    runs: 0,
                    wickets: 0,
                    economy: 0.0,
                    balls: 0,
                },
            ),
        ],
    };
    let pakistan = Team {
        id: "pak".into(),
        name: "Pakistan".into(),
        short_name: "PAK".into(),
        flag: PAKISTAN_FLAG.into(),
        players: vec![
            batter("babar", "Babar Azam", false, batting(0, 0, 0, 0, 0.0)),
            bowler(
                "shaheen",
                "Shaheen Afridi",
                true,
                BowlingStats {
                    overs: 3.2,
                    maidens: 0,
                    runs: 28,
                    wickets: 0,
                    economy: 8.24,
                    balls: 20,
                },
            ),
        ],
    };

    MatchSnapshot {
        id: "ind-vs-pak-2024".into(),
        status: MatchStatus::Live,
        teams: Sides {
            team1: india,
            team2: pakistan,
        },
        score: Sides {
            team1: Score {
                runs: 68,
                wickets: 0,
                overs: 8,
                balls: 2,
                run_rate: 8.5,
                required_run_rate: Some(0.0),
            },
            team2: Score {
                runs: 0,
                wickets: 0,
                overs: 0,
                balls: 0,
                run_rate: 0.0,
                required_run_rate: None,
            },
        },
        current_innings: 1,
        toss: Toss {
            winner: "India".into(),
            decision: TossDecision::Bat,
        },
        venue: "Dubai International Cricket Stadium".into(),
        match_type: "T20I".into(),
        start_time: DateTime::from_timestamp(START_TIMESTAMP, 0).unwrap_or_default(),
        weather: Some(Weather {
            condition: "Clear".into(),
            temperature: 28,
            humidity: 45,
            wind_speed: 12,
        }),
    }
}

/// Commentary in delivery order, oldest first.
pub fn commentary(now: DateTime<Utc>) -> Vec<CommentaryEntry> {
    vec![
        CommentaryEntry {
            id: "3".into(),
            over: 7,
            ball: 6,
            runs: 6,
            text: "SIX! What a shot! Rohit pulls it over deep mid-wicket for maximum!".into(),
            timestamp: now - Duration::seconds(60),
            is_wicket: false,
            is_boundary: true,
            player: "Rohit Sharma".into(),
        },
        CommentaryEntry {
            id: "2".into(),
            over: 8,
            ball: 1,
            runs: 1,
            text: "Single taken to deep square leg, good running between the wickets".into(),
            timestamp: now - Duration::seconds(30),
            is_wicket: false,
            is_boundary: false,
            player: "Rohit Sharma".into(),
        },
        CommentaryEntry {
            id: "1".into(),
            over: 8,
            ball: 2,
            runs: 4,
            text: "FOUR! Kohli drives beautifully through covers for his 4th boundary".into(),
            timestamp: now,
            is_wicket: false,
            is_boundary: true,
            player: "Virat Kohli".into(),
        },
    ]
}

pub fn statistics() -> MatchStatistics {
    MatchStatistics {
        partnerships: vec![Partnership {
            runs: 68,
            balls: 50,
            player1: "Rohit Sharma".into(),
            player2: "Virat Kohli".into(),
            is_active: true,
        }],
        fall_of_wickets: vec![],
        phase_scores: vec![PhaseScore {
            phase: "Powerplay (1-6)".into(),
            overs: "1-6".into(),
            runs: 52,
            wickets: 0,
            run_rate: 8.67,
        }],
    }
}

pub fn chat(now: DateTime<Utc>) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            id: "1".into(),
            user: "CricketFan_IND".into(),
            message: "What a partnership! IND looking strong! 🇮🇳".into(),
            timestamp: now,
            country: "in".into(),
        },
        ChatMessage {
            id: "2".into(),
            user: "PakCricketLover".into(),
            message: "Need early wickets here! Come on Pakistan! 🇵🇰".into(),
            timestamp: now - Duration::seconds(15),
            country: "pk".into(),
        },
        ChatMessage {
            id: "3".into(),
            user: "CricketExpert".into(),
            message: "This partnership is building nicely, 68/0 after 8 overs".into(),
            timestamp: now - Duration::seconds(30),
            country: "other".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_live_match_fixture() {
        let m = live_match();
        assert_eq!(m.id, "ind-vs-pak-2024");
        assert_eq!(m.status, MatchStatus::Live);
        assert_eq!(m.score.team1.runs, 68);
        assert_eq!(m.score.team1.overs, 8);
        assert_eq!(m.score.team1.balls, 2);
        assert_eq!(m.start_time.to_rfc3339(), "2024-01-15T14:30:00+00:00");
        assert_eq!(m.teams.team2.short_name, "PAK");
    }

    #[test]
    fn test_fixture_ids_are_unique() {
        let now = Utc::now();
        let m = live_match();
        let players: Vec<&str> = m
            .teams
            .team1
            .players
            .iter()
            .chain(&m.teams.team2.players)
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(players.iter().collect::<HashSet<_>>().len(), players.len());

        let commentary = commentary(now);
        assert_eq!(
            commentary.iter().map(|c| &c.id).collect::<HashSet<_>>().len(),
            commentary.len()
        );
        let chat = chat(now);
        assert_eq!(chat.iter().map(|c| &c.id).collect::<HashSet<_>>().len(), chat.len());
    }

    #[test]
    fn test_commentary_is_chronological() {
        let entries = commentary(Utc::now());
        assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(entries.last().map(|c| c.id.as_str()), Some("1"));
    }
}
