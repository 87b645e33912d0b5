//! Uranometria 2000.0 chart lookup and sky quadrants.
//!
//! The atlas splits each hemisphere into nine declination bands, each cut into
//! a fixed number of RA panels. Volume 1 holds the north, volume 2 mirrors the
//! same layout in the south with pages counted backwards from 222.
//!
//! Both lookups are pure: no I/O, no logging, no shared state.

use crate::coord::Coordinate;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Observer latitude used for the circumpolar (`NP`) cutoff.
pub const DEFAULT_CIRCUMPOLAR_LATITUDE: f64 = 39.5;

/// Southern pages are numbered `SOUTH_PAGE_BASE - first_north_page - panels + offset`.
const SOUTH_PAGE_BASE: u32 = 222;

/// A declination band of the atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBand {
    /// |Dec| at or below which the scan moves on to the next band.
    pub low_dec_bound: f64,
    /// Number of RA panels covering the band. Zero marks the end of the table.
    pub panel_count: u32,
}

const fn band(low_dec_bound: f64, panel_count: u32) -> ZoneBand {
    ZoneBand { low_dec_bound, panel_count }
}

/// Plate layout of Uranometria 2000.0, pole first, sentinel last.
pub const U2K_ZONES: &[ZoneBand] = &[
    band(84.5, 1),
    band(73.5, 6),
    band(62.0, 10),
    band(51.0, 12),
    band(40.0, 15),
    band(29.0, 18),
    band(17.0, 18),
    band(5.5, 20),
    band(0.0, 20),
    band(0.0, 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AtlasError {
    #[error("invalid coordinate: RA {ra} h, Dec {dec}\u{b0} is out of range")]
    InvalidCoordinate { ra: f64, dec: f64 },
}

/// A volume/page pair in Uranometria 2000.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartReference {
    pub volume: u8,
    pub page: u32,
}

impl fmt::Display for ChartReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vol. {}, p. {}", self.volume, self.page)
    }
}

/// Coarse sky region: north circumpolar, or one of four 6-hour RA slices per hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthPolar,
    North(u8),
    South(u8),
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NorthPolar => write!(f, "NP"),
            Self::North(q) => write!(f, "NQ{}", q),
            Self::South(q) => write!(f, "SQ{}", q),
        }
    }
}

impl Serialize for Quadrant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Find the band holding `abs_dec`, returning its first (northern) page number.
fn locate_band(abs_dec: f64) -> (u32, &'static ZoneBand) {
    let mut panel = 1;
    let mut idx = 0;

    while U2K_ZONES[idx].panel_count != 0 && abs_dec <= U2K_ZONES[idx].low_dec_bound {
        panel += U2K_ZONES[idx].panel_count;
        idx += 1;
    }

    // Only |Dec| == 0 runs onto the sentinel; it belongs to the equatorial band.
    if U2K_ZONES[idx].panel_count == 0 {
        idx -= 1;
        panel -= U2K_ZONES[idx].panel_count;
    }

    (panel, &U2K_ZONES[idx])
}

/// Uranometria 2000.0 volume and page for a coordinate.
///
/// Requires `0 <= ra < 24` and `-90 <= dec <= 90`. Within a band, pages run
/// east to west: page number decreases as RA increases, with panel edges
/// offset by half a panel from RA 0.
pub fn chart_for(coord: Coordinate) -> Result<ChartReference, AtlasError> {
    let Coordinate { ra_hours: ra, dec_degrees: dec } = coord;
    if !(0.0..24.0).contains(&ra) || !(-90.0..=90.0).contains(&dec) {
        return Err(AtlasError::InvalidCoordinate { ra, dec });
    }

    let south = dec < 0.0;
    let (mut panel, zone) = locate_band(dec.abs());
    let n = zone.panel_count;
    let panels = n as f64;

    let mut ra_shift = ra - 12.0 / panels;
    if ra_shift >= 24.0 {
        ra_shift -= 24.0;
    }
    if ra_shift <= 0.0 {
        ra_shift += 24.0;
    }

    if south {
        panel = SOUTH_PAGE_BASE - panel - n;
    }

    // RA just past a panel edge can leave `ra_shift` near zero, which rounds to a full band.
    let offset = ((panels * (24.0 - ra_shift) / 24.0).floor() as u32).min(n - 1);

    Ok(ChartReference {
        volume: if south { 2 } else { 1 },
        page: panel + offset,
    })
}

/// Sky quadrant label for a coordinate.
///
/// Anything north of `90 - circumpolar_latitude` is `NP`. Unlike
/// [`chart_for`], `ra = 24` is accepted here and falls in quadrant 4.
pub fn quadrant_for(coord: Coordinate, circumpolar_latitude: f64) -> Result<Quadrant, AtlasError> {
    let Coordinate { ra_hours: ra, dec_degrees: dec } = coord;
    if !(0.0..=24.0).contains(&ra) || !(-90.0..=90.0).contains(&dec) {
        return Err(AtlasError::InvalidCoordinate { ra, dec });
    }

    if dec > 90.0 - circumpolar_latitude {
        return Ok(Quadrant::NorthPolar);
    }

    let q = ((ra / 6.0).ceil() as u8).clamp(1, 4);
    Ok(if dec >= 0.0 { Quadrant::North(q) } else { Quadrant::South(q) })
}
