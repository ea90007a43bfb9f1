//! Textual board coordinates.
//!
//! Columns are lettered left-to-right with `I` skipped (the usual Go
//! convention, avoiding confusion with `J`); rows are numbered so that row 1
//! is the bottom of the board. The mapping is a pure bijection over
//! in-bounds vertices; anything else yields `None`.

use crate::board::Vertex;

/// Column letters in order, with `I` skipped.
const ALPHA: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Convert a vertex to its coordinate string, e.g. `(3, 15)` on a 19x19
/// board to `"D4"`. Returns `None` for out-of-bounds vertices.
pub fn str_coord(vertex: Vertex, width: usize, height: usize) -> Option<String> {
    let (x, y) = vertex;
    if x >= width || y >= height || x >= ALPHA.len() {
        return None;
    }
    Some(format!("{}{}", ALPHA[x] as char, height - y))
}

/// Parse a coordinate string back into a vertex. Accepts lowercase column
/// letters; returns `None` for unknown columns or out-of-range rows.
pub fn parse_coord(s: &str, width: usize, height: usize) -> Option<Vertex> {
    let mut chars = s.chars();
    let col = chars.next()?.to_ascii_uppercase();
    let x = ALPHA.iter().position(|&c| c as char == col)?;
    let row: usize = chars.as_str().parse().ok()?;
    if x >= width || row == 0 || row > height {
        return None;
    }
    Some((x, height - row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_19x19() {
        assert_eq!(str_coord((0, 18), 19, 19).as_deref(), Some("A1"));
        assert_eq!(str_coord((0, 0), 19, 19).as_deref(), Some("A19"));
        assert_eq!(str_coord((18, 18), 19, 19).as_deref(), Some("T1"));
        assert_eq!(parse_coord("A1", 19, 19), Some((0, 18)));
        assert_eq!(parse_coord("T19", 19, 19), Some((18, 0)));
    }

    #[test]
    fn test_skips_letter_i() {
        // Column 8 is "J"; no vertex maps to "I".
        assert_eq!(str_coord((8, 0), 19, 19).as_deref(), Some("J19"));
        assert_eq!(parse_coord("J19", 19, 19), Some((8, 0)));
        assert_eq!(parse_coord("I5", 19, 19), None);
    }

    #[test]
    fn test_lowercase_accepted() {
        assert_eq!(parse_coord("d4", 19, 19), Some((3, 15)));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(str_coord((9, 0), 9, 9), None);
        assert_eq!(str_coord((0, 9), 9, 9), None);
        assert_eq!(parse_coord("K1", 9, 9), None);
        assert_eq!(parse_coord("A0", 9, 9), None);
        assert_eq!(parse_coord("A10", 9, 9), None);
        assert_eq!(parse_coord("", 9, 9), None);
        assert_eq!(parse_coord("A", 9, 9), None);
        assert_eq!(parse_coord("5A", 9, 9), None);
    }

    #[test]
    fn test_roundtrip_9x9() {
        for y in 0..9 {
            for x in 0..9 {
                let s = str_coord((x, y), 9, 9).unwrap();
                assert_eq!(parse_coord(&s, 9, 9), Some((x, y)), "roundtrip {s}");
            }
        }
    }
}
