//! Name providers: CDS Sesame and the built-in fallback catalog.

use super::types::{ResolveError, ResolvedTarget, TargetSource};
use crate::coord::Coordinate;
use serde::Serialize;
use std::time::Duration;

// ─── Built-in catalog ───────────────────────────────────────────

struct BuiltinObject {
    names: &'static [&'static str], // designation first, then aliases
    ra_hours: f64,
    dec_degrees: f64,
    kind: &'static str,
}

const fn obj(
    names: &'static [&'static str],
    ra_hours: f64,
    dec_degrees: f64,
    kind: &'static str,
) -> BuiltinObject {
    BuiltinObject { names, ra_hours, dec_degrees, kind }
}

// J2000 positions, rounded to a few arcseconds.
const BUILTIN_OBJECTS: &[BuiltinObject] = &[
    obj(&["M1", "NGC 1952", "crab nebula", "crab"], 5.5755, 22.0145, "supernova remnant"),
    obj(&["M3", "NGC 5272"], 13.7032, 28.3773, "globular cluster"),
    obj(&["M8", "NGC 6523", "lagoon nebula", "lagoon"], 18.0603, -24.3867, "emission nebula"),
    obj(&["M11", "NGC 6705", "wild duck cluster"], 18.8514, -6.2700, "open cluster"),
    obj(&["M13", "NGC 6205", "hercules cluster"], 16.6948, 36.4603, "globular cluster"),
    obj(&["M16", "NGC 6611", "eagle nebula"], 18.3133, -13.8167, "emission nebula"),
    obj(&["M20", "NGC 6514", "trifid nebula", "trifid"], 18.0397, -23.0300, "emission nebula"),
    obj(&["M22", "NGC 6656"], 18.6067, -23.9033, "globular cluster"),
    obj(&["M27", "NGC 6853", "dumbbell nebula", "dumbbell"], 19.9934, 22.7211, "planetary nebula"),
    obj(&["M31", "NGC 224", "andromeda galaxy", "andromeda"], 0.7123, 41.2688, "galaxy"),
    obj(&["M32", "NGC 221"], 0.7116, 40.8653, "galaxy"),
    obj(&["M33", "NGC 598", "triangulum galaxy", "triangulum"], 1.5641, 30.6602, "galaxy"),
    obj(&["M42", "NGC 1976", "orion nebula"], 5.5881, -5.3911, "emission nebula"),
    obj(&["M44", "NGC 2632", "beehive cluster", "praesepe"], 8.6733, 19.6667, "open cluster"),
    obj(&["M45", "pleiades", "seven sisters"], 3.7900, 24.1167, "open cluster"),
    obj(&["M51", "NGC 5194", "whirlpool galaxy", "whirlpool"], 13.4980, 47.1953, "galaxy"),
    obj(&["M57", "NGC 6720", "ring nebula"], 18.8931, 33.0292, "planetary nebula"),
    obj(&["M64", "NGC 4826", "black eye galaxy"], 12.9455, 21.6828, "galaxy"),
    obj(&["M81", "NGC 3031", "bode's galaxy", "bodes galaxy"], 9.9259, 69.0653, "galaxy"),
    obj(&["M82", "NGC 3034", "cigar galaxy"], 9.9312, 69.6797, "galaxy"),
    obj(&["M87", "NGC 4486", "virgo a"], 12.5137, 12.3911, "galaxy"),
    obj(&["M92", "NGC 6341"], 17.2854, 43.1358, "globular cluster"),
    obj(&["M97", "NGC 3587", "owl nebula"], 11.2466, 55.0192, "planetary nebula"),
    obj(&["M101", "NGC 5457", "pinwheel galaxy"], 14.0535, 54.3492, "galaxy"),
    obj(&["M104", "NGC 4594", "sombrero galaxy", "sombrero"], 12.6665, -11.6231, "galaxy"),
    obj(&["NGC 104", "47 tucanae", "47 tuc"], 0.4016, -72.0814, "globular cluster"),
    obj(&["NGC 253", "sculptor galaxy"], 0.7925, -25.2883, "galaxy"),
    obj(&["NGC 869", "double cluster", "h persei"], 2.3167, 57.1283, "open cluster"),
    obj(&["NGC 5128", "centaurus a", "cen a"], 13.4243, -43.0192, "galaxy"),
    obj(&["NGC 5139", "omega centauri", "omega cen"], 13.4465, -47.4794, "globular cluster"),
    obj(&["NGC 7000", "north america nebula"], 20.9881, 44.5289, "emission nebula"),
    obj(&["LMC", "large magellanic cloud"], 5.3929, -69.7561, "galaxy"),
    obj(&["SMC", "NGC 292", "small magellanic cloud"], 0.8791, -72.8286, "galaxy"),
    obj(&["Polaris", "alpha ursae minoris", "north star"], 2.5303, 89.2641, "star"),
    obj(&["Sigma Octantis", "polaris australis"], 21.1464, -88.9564, "star"),
    obj(&["Sirius", "alpha canis majoris"], 6.7525, -16.7161, "star"),
    obj(&["Canopus", "alpha carinae"], 6.3992, -52.6958, "star"),
    obj(&["Arcturus", "alpha bootis"], 14.2610, 19.1825, "star"),
    obj(&["Vega", "alpha lyrae"], 18.6156, 38.7837, "star"),
    obj(&["Capella", "alpha aurigae"], 5.2782, 45.9980, "star"),
    obj(&["Rigel", "beta orionis"], 5.2423, -8.2016, "star"),
    obj(&["Betelgeuse", "alpha orionis"], 5.9195, 7.4070, "star"),
    obj(&["Aldebaran", "alpha tauri"], 4.5987, 16.5093, "star"),
    obj(&["Antares", "alpha scorpii"], 16.4901, -26.4320, "star"),
    obj(&["Spica", "alpha virginis"], 13.4199, -11.1613, "star"),
    obj(&["Altair", "alpha aquilae"], 19.8464, 8.8683, "star"),
    obj(&["Deneb", "alpha cygni"], 20.6905, 45.2803, "star"),
    obj(&["Fomalhaut", "alpha piscis austrini"], 22.9608, -29.6222, "star"),
];

/// Compact lookup form: lowercase, no whitespace, hyphens or dots ("NGC 224" → "ngc224").
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compute edit distance between two strings (Levenshtein).
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Search the built-in catalog.
///
/// Catalog designations must match exactly (M31 and M32 are one edit apart).
/// Common names also match on substring and on edit distance <= 2.
pub fn builtin_lookup(query: &str) -> Option<ResolvedTarget> {
    let q = normalize_name(query);
    if q.is_empty() {
        return None;
    }

    // Exact match first
    for object in BUILTIN_OBJECTS {
        if object.names.iter().any(|name| normalize_name(name) == q) {
            return Some(builtin_to_resolved(object));
        }
    }

    if q.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    // Substring match on common names
    if q.len() >= 4 {
        for object in BUILTIN_OBJECTS {
            if object.names.iter().any(|name| normalize_name(name).starts_with(&q)) {
                return Some(builtin_to_resolved(object));
            }
        }
    }

    // Fuzzy match (edit distance <= 2)
    let mut best: Option<(&BuiltinObject, usize)> = None;
    for object in BUILTIN_OBJECTS {
        for name in object.names {
            let dist = edit_distance(&q, &normalize_name(name));
            if dist <= 2 && best.map_or(true, |(_, d)| dist < d) {
                best = Some((object, dist));
            }
        }
    }

    best.map(|(object, _)| builtin_to_resolved(object))
}

fn builtin_to_resolved(object: &BuiltinObject) -> ResolvedTarget {
    ResolvedTarget {
        name: object.names[0].to_string(),
        coord: Coordinate::new(object.ra_hours, object.dec_degrees),
        source: TargetSource::Builtin,
        display_name: None,
        object_type: Some(object.kind.to_string()),
    }
}

/// A catalog entry for the public object list API.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    pub name: String,
    pub kind: String,
    pub ra_hours: f64,
    pub dec_degrees: f64,
}

/// Return the full built-in object list.
pub fn builtin_object_list() -> Vec<ObjectInfo> {
    BUILTIN_OBJECTS
        .iter()
        .map(|o| ObjectInfo {
            name: o.names[0].to_string(),
            kind: o.kind.to_string(),
            ra_hours: o.ra_hours,
            dec_degrees: o.dec_degrees,
        })
        .collect()
}

// ─── Sesame provider ────────────────────────────────────────────

/// Plain-text output, all identifiers, SIMBAD then NED then VizieR.
const SESAME_URL: &str = "https://cds.unistra.fr/cgi-bin/nph-sesame/-oI/SNV";
const USER_AGENT: &str = "skytools/0.3 (uranometria-lookup)";
const SESAME_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolve an object name via the CDS Sesame service.
pub fn sesame_resolve(query: &str) -> Result<ResolvedTarget, ResolveError> {
    let url = format!("{}?{}", SESAME_URL, url_encode(query));

    let body = ureq::get(&url)
        .set("User-Agent", USER_AGENT)
        .timeout(SESAME_TIMEOUT)
        .call()
        .map_err(|e| ResolveError::Network(e.to_string()))?
        .into_string()
        .map_err(|e| ResolveError::InvalidResponse(e.to_string()))?;

    parse_sesame(query, &body)
}

/// Parse Sesame's plain-text answer.
///
/// The interesting lines are `%J <ra_deg> <dec_deg> = ...`, `%I.0 <main id>`
/// and `%C.0 <object type>`. Each resolver block opens with a `#=` header;
/// identifier and type are taken from the first block that has a `%J` line.
pub(crate) fn parse_sesame(query: &str, body: &str) -> Result<ResolvedTarget, ResolveError> {
    let mut position = None;
    let mut main_id = None;
    let mut object_type = None;

    for line in body.lines().map(str::trim) {
        if line.starts_with("#=") {
            if position.is_some() {
                break;
            }
            main_id = None;
            object_type = None;
        } else if let Some(rest) = line.strip_prefix("%J ") {
            if position.is_none() {
                position = Some(parse_j2000_line(rest)?);
            }
        } else if let Some(rest) = line.strip_prefix("%I.0 ") {
            main_id.get_or_insert_with(|| collapse_spaces(rest));
        } else if let Some(rest) = line.strip_prefix("%C.0 ") {
            object_type.get_or_insert_with(|| rest.trim().to_string());
        }
    }

    let coord = position.ok_or_else(|| ResolveError::NotFound(query.to_string()))?;

    Ok(ResolvedTarget {
        name: main_id.clone().unwrap_or_else(|| query.trim().to_string()),
        coord,
        source: TargetSource::Sesame,
        display_name: main_id,
        object_type,
    })
}

fn parse_j2000_line(rest: &str) -> Result<Coordinate, ResolveError> {
    let mut fields = rest.split_whitespace();
    let mut next_deg = |what: &str| -> Result<f64, ResolveError> {
        fields
            .next()
            .and_then(|f| f.parse::<f64>().ok())
            .ok_or_else(|| ResolveError::InvalidResponse(format!("bad {} in %J line '{}'", what, rest)))
    };
    let ra_deg = next_deg("RA")?;
    let dec_deg = next_deg("Dec")?;

    if !(0.0..360.0).contains(&ra_deg) || !(-90.0..=90.0).contains(&dec_deg) {
        return Err(ResolveError::InvalidResponse(format!(
            "position out of range in %J line '{}'",
            rest
        )));
    }

    Ok(Coordinate::from_degrees(ra_deg, dec_deg))
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ─── URL encoding (minimal, no extra dep) ───────────────────────

fn url_encode(s: &str) -> String {
    s.trim()
        .bytes()
        .map(|b| match b {
            b' ' => "%20".to_string(),
            _ if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.' || b == b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}
