//! Equatorial coordinates: the value type, text parsers, and display formatting.
//!
//! Right ascension is carried in decimal hours and declination in decimal
//! degrees. Range validation is deliberately left to the atlas operations,
//! which disagree on whether `ra = 24` is acceptable.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An (RA, Dec) pair. RA in hours, Dec in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub ra_hours: f64,
    pub dec_degrees: f64,
}

impl Coordinate {
    pub fn new(ra_hours: f64, dec_degrees: f64) -> Self {
        Self { ra_hours, dec_degrees }
    }

    /// Build from RA in degrees (as name resolvers report it).
    pub fn from_degrees(ra_degrees: f64, dec_degrees: f64) -> Self {
        Self {
            ra_hours: ra_degrees / 15.0,
            dec_degrees,
        }
    }

    /// Parse an RA/Dec text pair, e.g. `("00:42:44", "+41:16:08")`.
    pub fn parse(ra: &str, dec: &str) -> Result<Self, CoordParseError> {
        Ok(Self {
            ra_hours: parse_ra(ra)?,
            dec_degrees: parse_dec(dec)?,
        })
    }

    pub fn ra_string(&self) -> String {
        format_ra(self.ra_hours)
    }

    pub fn dec_string(&self) -> String {
        format_dec(self.dec_degrees)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RA {} Dec {}", self.ra_string(), self.dec_string())
    }
}

/// Errors from parsing RA/Dec text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordParseError {
    #[error("empty {0} value")]
    Empty(&'static str),
    #[error("cannot parse {axis} value '{text}'")]
    Malformed { axis: &'static str, text: String },
    #[error("{axis} value '{text}': minutes and seconds must be in [0, 60)")]
    FieldOutOfRange { axis: &'static str, text: String },
}

const RA_MARKERS: &[char] = &[':', 'h', 'H', 'ʰ', 'm', 'M', 'ᵐ', 's', 'S', 'ˢ'];
const DEC_MARKERS: &[char] = &[':', 'd', 'D', '°', 'm', 'M', '′', '\'', 's', 'S', '″', '"'];

/// Parse right ascension in hours.
///
/// Accepts `10.5`, `10:30:00`, `10 30 00`, `10h30m00s` and `10ʰ30ᵐ00ˢ`.
pub fn parse_ra(text: &str) -> Result<f64, CoordParseError> {
    parse_sexagesimal(text, "RA", RA_MARKERS)
}

/// Parse declination in degrees.
///
/// Accepts `-41.27`, `-41:16:08`, `-41 16 08`, `-41d16m08s` and `-41°16′08″`.
/// The sign covers the whole value, so `-00:30:00` is half a degree south.
pub fn parse_dec(text: &str) -> Result<f64, CoordParseError> {
    parse_sexagesimal(text, "Dec", DEC_MARKERS)
}

fn parse_sexagesimal(
    text: &str,
    axis: &'static str,
    markers: &[char],
) -> Result<f64, CoordParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoordParseError::Empty(axis));
    }

    let malformed = || CoordParseError::Malformed {
        axis,
        text: text.to_string(),
    };

    let (negative, body) = if let Some(rest) = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('\u{2212}'))
    {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let spaced: String = body
        .chars()
        .map(|c| if markers.contains(&c) { ' ' } else { c })
        .collect();
    let fields: Vec<&str> = spaced.split_whitespace().collect();
    if fields.is_empty() || fields.len() > 3 {
        return Err(malformed());
    }

    let mut values = Vec::with_capacity(fields.len());
    for field in &fields {
        let v: f64 = field.parse().map_err(|_| malformed())?;
        if !v.is_finite() || v < 0.0 {
            return Err(malformed());
        }
        values.push(v);
    }

    // Only the last field may carry a fraction.
    if values[..values.len() - 1].iter().any(|v| v.fract() != 0.0) {
        return Err(malformed());
    }
    if values[1..].iter().any(|v| *v >= 60.0) {
        return Err(CoordParseError::FieldOutOfRange {
            axis,
            text: text.to_string(),
        });
    }

    let magnitude = values
        .iter()
        .zip([1.0, 60.0, 3600.0])
        .map(|(v, div)| v / div)
        .sum::<f64>();

    Ok(if negative { -magnitude } else { magnitude })
}

/// Split a non-negative value into whole units, minutes and rounded seconds.
fn split_rounded(value: f64) -> (u64, u64, u64) {
    let total = (value * 3600.0).round() as u64;
    (total / 3600, (total / 60) % 60, total % 60)
}

/// Format RA hours as `0ʰ42ᵐ44ˢ`, rounded to the nearest second.
pub fn format_ra(hours: f64) -> String {
    let (h, m, s) = split_rounded(hours.max(0.0));
    format!("{}ʰ{:02}ᵐ{:02}ˢ", h % 24, m, s)
}

/// Format Dec degrees as `+41°16′08″`, rounded to the nearest arcsecond.
pub fn format_dec(degrees: f64) -> String {
    let (d, m, s) = split_rounded(degrees.abs());
    // Keep the sign of tiny southern values: they still map to the southern volume.
    let sign = if degrees < 0.0 { '-' } else { '+' };
    format!("{}{}°{:02}′{:02}″", sign, d, m, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_ra_decimal() {
        assert_abs_diff_eq!(parse_ra("10.5").unwrap(), 10.5);
        assert_abs_diff_eq!(parse_ra(" 0 ").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_ra_sexagesimal_forms() {
        let expected = 0.0 + 42.0 / 60.0 + 44.0 / 3600.0;
        for text in ["00:42:44", "00 42 44", "0h42m44s", "0ʰ42ᵐ44ˢ", "00h42m44"] {
            assert_abs_diff_eq!(parse_ra(text).unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_parse_ra_fractional_seconds() {
        let ra = parse_ra("05:35:17.3").unwrap();
        assert_abs_diff_eq!(ra, 5.0 + 35.0 / 60.0 + 17.3 / 3600.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_dec_forms() {
        let expected = 41.0 + 16.0 / 60.0 + 8.0 / 3600.0;
        for text in ["+41:16:08", "41 16 08", "+41d16m08s", "+41°16′08″", "41°16'08\""] {
            assert_abs_diff_eq!(parse_dec(text).unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_parse_dec_negative_sign_covers_all_fields() {
        assert_abs_diff_eq!(parse_dec("-00:30:00").unwrap(), -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(parse_dec("-05:23:28").unwrap(), -(5.0 + 23.0 / 60.0 + 28.0 / 3600.0), epsilon = 1e-12);
        assert_abs_diff_eq!(parse_dec("\u{2212}12.5").unwrap(), -12.5, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_ra(""), Err(CoordParseError::Empty("RA")));
        assert!(matches!(parse_ra("abc"), Err(CoordParseError::Malformed { .. })));
        assert!(matches!(parse_dec("--5"), Err(CoordParseError::Malformed { .. })));
        assert!(matches!(parse_ra("1:2:3:4"), Err(CoordParseError::Malformed { .. })));
        assert!(matches!(parse_ra("1.5:30"), Err(CoordParseError::Malformed { .. })));
        assert!(matches!(parse_ra("inf"), Err(CoordParseError::Malformed { .. })));
    }

    #[test]
    fn test_parse_rejects_minutes_out_of_range() {
        assert!(matches!(parse_ra("10:60:00"), Err(CoordParseError::FieldOutOfRange { .. })));
        assert!(matches!(parse_dec("+10:00:75"), Err(CoordParseError::FieldOutOfRange { .. })));
    }

    #[test]
    fn test_parse_leaves_range_checks_to_atlas() {
        assert_abs_diff_eq!(parse_ra("24:00:00").unwrap(), 24.0);
        assert_abs_diff_eq!(parse_dec("+95").unwrap(), 95.0);
    }

    #[test]
    fn test_format_ra() {
        assert_eq!(format_ra(0.0), "0ʰ00ᵐ00ˢ");
        assert_eq!(format_ra(0.712_222_222), "0ʰ42ᵐ44ˢ");
        assert_eq!(format_ra(13.5), "13ʰ30ᵐ00ˢ");
    }

    #[test]
    fn test_format_rounds_with_carry() {
        // 10h 29m 59.6s rounds up into the next minute
        assert_eq!(format_ra(10.0 + 29.0 / 60.0 + 59.6 / 3600.0), "10ʰ30ᵐ00ˢ");
        assert_eq!(format_ra(23.9999999), "0ʰ00ᵐ00ˢ");
        assert_eq!(format_dec(-(1.0 - 0.1 / 3600.0)), "-1°00′00″");
    }

    #[test]
    fn test_format_dec() {
        assert_eq!(format_dec(41.268_89), "+41°16′08″");
        assert_eq!(format_dec(-5.391_111), "-5°23′28″");
        assert_eq!(format_dec(0.0), "+0°00′00″");
        assert_eq!(format_dec(-0.0), "+0°00′00″");
    }

    #[test]
    fn test_format_dec_keeps_south_sign_when_rounding_to_zero() {
        assert_eq!(format_dec(-0.00001), "-0°00′00″");
        assert_eq!(format_dec(-0.5 / 3600.0 + 1e-9), "-0°00′00″");
    }

    #[test]
    fn test_coordinate_parse_and_display() {
        let c = Coordinate::parse("00:42:44", "+41:16:08").unwrap();
        assert_eq!(c.to_string(), "RA 0ʰ42ᵐ44ˢ Dec +41°16′08″");
    }

    #[test]
    fn test_from_degrees() {
        let c = Coordinate::from_degrees(10.684_708, 41.268_75);
        assert_abs_diff_eq!(c.ra_hours, 0.712_313_866, epsilon = 1e-6);
    }
}
