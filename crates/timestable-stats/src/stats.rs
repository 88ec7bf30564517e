//! The persisted stats record.

use serde::{Deserialize, Serialize};

/// Best score and number of games played.
///
/// Missing fields read as zero, so a partial or older record still loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    #[serde(default)]
    pub best_score: u32,
    #[serde(default)]
    pub games_played: u32,
}

impl GameStats {
    /// Fold one finished game into the record.
    pub fn with_game(self, score: u32) -> Self {
        Self {
            best_score: self.best_score.max(score),
            games_played: self.games_played.saturating_add(1),
        }
    }

    /// Whether `score` beats the stored best.
    pub fn is_new_best(&self, score: u32) -> bool {
        score > self.best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_game_keeps_best_and_counts() {
        let stats = GameStats::default().with_game(40).with_game(25).with_game(60);
        assert_eq!(stats.best_score, 60);
        assert_eq!(stats.games_played, 3);
    }

    #[test]
    fn test_is_new_best() {
        let stats = GameStats { best_score: 50, games_played: 2 };
        assert!(stats.is_new_best(55));
        assert!(!stats.is_new_best(50));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let stats: GameStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats, GameStats::default());

        let stats: GameStats = serde_json::from_str(r#"{"gamesPlayed":4}"#).unwrap();
        assert_eq!(stats.games_played, 4);
        assert_eq!(stats.best_score, 0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&GameStats { best_score: 90, games_played: 7 }).unwrap();
        assert_eq!(json, r#"{"bestScore":90,"gamesPlayed":7}"#);
    }
}
