use anyhow::{Context, Result};
use std::io::Read;
use crate::core::{Game, Move};
use crate::error::ReviewError;

/// Parse a mainline from CSV rows
///
/// Supports flexible column names:
/// - ply,san,move_time
/// - move,time
/// - san (no timing data)
///
/// Move times are in tenths of a second. Empty or unparsable times are
/// treated as missing.
pub fn parse_csv<R: Read>(reader: R, id: String) -> Result<Game> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let ply_idx = find_column(&headers, &["ply", "halfmove", "n"]).ok();
    let san_idx = find_column(&headers, &["san", "move", "notation"])?;
    let time_idx = find_column(&headers, &["move_time", "time", "tenths"]).ok();

    let mut moves = Vec::new();

    for result in rdr.records() {
        let record = result.context("Failed to read CSV row")?;

        // Plies, when present, must count up from 1 without gaps
        if let Some(idx) = ply_idx {
            let expected = moves.len() + 1;
            let ply = record
                .get(idx)
                .and_then(|s| s.trim().parse::<usize>().ok())
                .context("Failed to parse ply")?;
            if ply != expected {
                return Err(ReviewError::Input(format!(
                    "expected ply {} but found {}",
                    expected, ply
                ))
                .into());
            }
        }

        let san = record
            .get(san_idx)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .context("Missing move column")?;

        let move_time = time_idx
            .and_then(|idx| record.get(idx))
            .and_then(|s| s.trim().parse::<u32>().ok());

        moves.push(Move::new(san, move_time));
    }

    Ok(Game::from_mainline(id, moves))
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    for (idx, header) in headers.iter().enumerate() {
        let header_lower = header.trim().to_lowercase();
        if names.iter().any(|&name| header_lower == name) {
            return Ok(idx);
        }
    }

    anyhow::bail!("Could not find column with names: {:?}", names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_columns() {
        let data = "ply,san,move_time\n1,e4,12\n2,e5,\n3,Nf3,40\n";
        let game = parse_csv(data.as_bytes(), "g".to_string()).unwrap();

        assert_eq!(game.id, "g");
        assert_eq!(game.len(), 3);
        assert_eq!(game.mainline.moves[0].san, "e4");
        assert_eq!(game.move_time(0), Some(12));
        assert_eq!(game.move_time(1), None);
        assert_eq!(game.move_time(2), Some(40));
    }

    #[test]
    fn test_parse_alternate_headers() {
        let data = "Move,Time\nd4,3\nd5,7\n";
        let game = parse_csv(data.as_bytes(), String::new()).unwrap();
        assert_eq!(game.len(), 2);
        assert_eq!(game.move_time(1), Some(7));
    }

    #[test]
    fn test_rejects_out_of_order_ply() {
        let data = "ply,san\n1,e4\n3,e5\n";
        let err = parse_csv(data.as_bytes(), String::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ReviewError>(),
            Some(&ReviewError::Input("expected ply 2 but found 3".to_string()))
        );
    }

    #[test]
    fn test_rejects_missing_move_column() {
        let data = "ply,time\n1,12\n";
        assert!(parse_csv(data.as_bytes(), String::new()).is_err());
    }
}
