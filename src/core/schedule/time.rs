//! `HH:MM:SS[.fff]` <-> milliseconds.

use crate::core::types::Timestamp;

/// Parse `HH:MM:SS` (optionally with fractional seconds) into a timestamp.
///
/// Hours are unbounded; minutes and seconds must be below 60. Fractions
/// beyond millisecond precision are truncated.
pub fn parse_hms(s: &str) -> Option<Timestamp> {
    let mut parts = s.trim().split(':');
    let h = parse_digits(parts.next()?)?;
    let m = parse_digits(parts.next()?)?;
    let sec_part = parts.next()?;
    if parts.next().is_some() || m >= 60 {
        return None;
    }

    let (whole, frac) = match sec_part.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (sec_part, None),
    };
    let sec = parse_digits(whole)?;
    if sec >= 60 {
        return None;
    }

    let ms = match frac {
        None => 0,
        Some(f) => {
            if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            // "5" -> 500, "05" -> 50, "0123" -> 12
            let padded: String = f.chars().chain("000".chars()).take(3).collect();
            padded.parse::<u64>().ok()?
        }
    };

    let total = h
        .checked_mul(3600)?
        .checked_add(m * 60 + sec)?
        .checked_mul(1000)?
        .checked_add(ms)?;
    Some(Timestamp::from_millis(total))
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
