//! Tile naming helpers.
//!
//! Canonical wormhole names are `<col><row>_<side>` (`e4_T`) or
//! `<col><row>_<loop>_<side>` (`d4_1_B`). Normal boards drop the side (`e4`).
//! Position documents may use the compact forms `e4T` and `d41B`.

use crate::board::directions::Side;
use crate::board::topology::Variant;
use crate::chess_errors::{ConfigResult, ConfigurationError};

/// Build a canonical name from its parts.
pub fn tile_name(col: u8, row: u8, loop_index: Option<u8>, side: Option<Side>) -> String {
    let mut name = String::with_capacity(8);
    name.push(char::from(b'a' + col));
    name.push_str(&row.to_string());
    if let Some(idx) = loop_index {
        name.push('_');
        name.push_str(&idx.to_string());
    }
    if let Some(side) = side {
        name.push('_');
        name.push(side.suffix());
    }
    name
}

/// Split a name into zero-based column, one-based row and the remainder.
pub fn split_tile_name(name: &str) -> Option<(u8, u8, &str)> {
    let mut chars = name.char_indices();
    let (_, col) = chars.next()?;
    if !col.is_ascii_lowercase() {
        return None;
    }
    let digits_end = name[1..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(name.len(), |i| i + 1);
    if digits_end == 1 {
        return None;
    }
    let row: u8 = name[1..digits_end].parse().ok()?;
    Some((col as u8 - b'a', row, &name[digits_end..]))
}

/// Shift column and row of a canonical name by `delta`, keeping the suffix.
///
/// The fixed wiring tables are written for 8x8 and shifted by -1 for 6x6.
pub fn shift_tile_name(name: &str, delta: i8) -> Option<String> {
    let (col, row, rest) = split_tile_name(name)?;
    let col = col as i16 + delta as i16;
    let row = row as i16 + delta as i16;
    if col < 0 || row < 1 {
        return None;
    }
    Some(format!("{}{}{}", char::from(b'a' + col as u8), row, rest))
}

/// Translate a name as written in a position document into its canonical form.
pub fn canonical_tile_name(raw: &str, variant: Variant) -> ConfigResult<String> {
    let malformed = || ConfigurationError::MalformedTileName(raw.to_owned());
    if !raw.is_ascii() {
        return Err(malformed());
    }
    let bytes = raw.as_bytes();
    match variant {
        Variant::Normal => {
            if bytes.len() == 2 && bytes[0].is_ascii_lowercase() && bytes[1].is_ascii_digit() {
                Ok(raw.to_owned())
            } else {
                Err(malformed())
            }
        }
        Variant::Wormhole => {
            if raw.contains('_') {
                return match split_tile_name(raw) {
                    Some((_, _, rest)) if is_side_suffix(rest) => Ok(raw.to_owned()),
                    _ => Err(malformed()),
                };
            }
            let side = bytes
                .last()
                .and_then(|c| Side::from_suffix(*c as char))
                .ok_or_else(malformed)?;
            if !bytes[0].is_ascii_lowercase() || !bytes[1..bytes.len() - 1].iter().all(u8::is_ascii_digit) {
                return Err(malformed());
            }
            match bytes.len() {
                3 => Ok(format!("{}_{}", &raw[..2], side.suffix())),
                4 => Ok(format!("{}_{}_{}", &raw[..2], &raw[2..3], side.suffix())),
                _ => Err(malformed()),
            }
        }
    }
}

fn is_side_suffix(rest: &str) -> bool {
    let b = rest.as_bytes();
    match b.len() {
        2 => b[0] == b'_' && Side::from_suffix(b[1] as char).is_some(),
        4 => {
            b[0] == b'_'
                && matches!(b[1], b'1' | b'2')
                && b[2] == b'_'
                && Side::from_suffix(b[3] as char).is_some()
        }
        _ => false,
    }
}
