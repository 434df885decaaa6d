use anyhow::{Context, Result};
use crate::core::Game;

/// Parse a game, including variations, from its JSON form
pub fn parse_json(data: &[u8]) -> Result<Game> {
    serde_json::from_slice(data).context("Failed to parse game JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game_with_variation() {
        let data = r#"{
            "id": "abc123",
            "white": "alice",
            "played_at": "2024-03-01T12:00:00Z",
            "mainline": {
                "moves": [
                    { "san": "e4", "move_time": 12 },
                    { "san": "e5", "variations": [
                        { "start_ply": 1, "moves": [{ "san": "c5" }] }
                    ] }
                ]
            }
        }"#;
        let game = parse_json(data.as_bytes()).unwrap();

        assert_eq!(game.id, "abc123");
        assert_eq!(game.white.as_deref(), Some("alice"));
        assert!(game.black.is_none());
        assert!(game.played_at.is_some());
        assert_eq!(game.len(), 2);
        assert_eq!(game.move_time(0), Some(12));
        assert_eq!(game.mainline.moves[1].variations[0].moves[0].san, "c5");
    }

    #[test]
    fn test_rejects_missing_mainline() {
        assert!(parse_json(br#"{"id": "x"}"#).is_err());
    }
}
