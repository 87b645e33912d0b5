//! Atlas report: everything the front ends print for one target.

use crate::atlas::{self, AtlasError, ChartReference, Quadrant};
use crate::resolve::{ResolvedTarget, TargetSource};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AtlasReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    pub source: TargetSource,
    pub ra_hours: f64,
    pub dec_degrees: f64,
    /// RA formatted as `0ʰ42ᵐ44ˢ`
    pub ra: String,
    /// Dec formatted as `+41°16′08″`
    pub dec: String,
    pub quadrant: Quadrant,
    pub circumpolar_latitude: f64,
    pub uranometria: ChartReference,
}

impl AtlasReport {
    /// Run both atlas lookups for a target.
    pub fn build(target: &ResolvedTarget, circumpolar_latitude: f64) -> Result<Self, AtlasError> {
        let coord = target.coord;
        let uranometria = atlas::chart_for(coord)?;
        let quadrant = atlas::quadrant_for(coord, circumpolar_latitude)?;

        let name = match target.source {
            TargetSource::Manual => None,
            _ => Some(target.name.clone()),
        };

        Ok(Self {
            name,
            object_type: target.object_type.clone(),
            source: target.source,
            ra_hours: coord.ra_hours,
            dec_degrees: coord.dec_degrees,
            ra: coord.ra_string(),
            dec: coord.dec_string(),
            quadrant,
            circumpolar_latitude,
            uranometria,
        })
    }

    /// Plain-text rendering for the terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if let Some(name) = &self.name {
            out.push_str(name);
            if let Some(kind) = &self.object_type {
                out.push_str(&format!(" ({})", kind));
            }
            out.push_str(&format!(" [{}]\n", self.source));
        }
        out.push_str(&format!("RA:{} Dec:{} Quad:{}\n", self.ra, self.dec, self.quadrant));
        out.push_str(&format!("Uranometria 2000.0: {}\n", self.uranometria));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::DEFAULT_CIRCUMPOLAR_LATITUDE;
    use crate::coord::Coordinate;
    use crate::resolve::TargetResolver;

    #[test]
    fn test_manual_report_text() {
        let coord = Coordinate::parse("00:42:44", "+41:16:08").unwrap();
        let target = TargetResolver::from_manual(coord);
        let report = AtlasReport::build(&target, DEFAULT_CIRCUMPOLAR_LATITUDE).unwrap();

        assert!(report.name.is_none());
        assert_eq!(
            report.render_text(),
            "RA:0ʰ42ᵐ44ˢ Dec:+41°16′08″ Quad:NQ1\nUranometria 2000.0: Vol. 1, p. 30\n"
        );
    }

    #[test]
    fn test_named_report_text() {
        let target = ResolvedTarget {
            name: "Sirius".into(),
            coord: Coordinate::new(6.7525, -16.7161),
            source: TargetSource::Builtin,
            display_name: None,
            object_type: Some("star".into()),
        };
        let report = AtlasReport::build(&target, DEFAULT_CIRCUMPOLAR_LATITUDE).unwrap();

        let text = report.render_text();
        assert!(text.starts_with("Sirius (star) [Built-in]\n"));
        assert!(text.contains("Quad:SQ2"));
        assert!(text.ends_with("Uranometria 2000.0: Vol. 2, p. 135\n"));
    }

    #[test]
    fn test_report_json() {
        let target = TargetResolver::from_manual(Coordinate::new(2.53, 89.26));
        let report = AtlasReport::build(&target, DEFAULT_CIRCUMPOLAR_LATITUDE).unwrap();
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["quadrant"], "NP");
        assert_eq!(json["uranometria"]["volume"], 1);
        assert_eq!(json["uranometria"]["page"], 1);
        assert_eq!(json["source"], "Manual");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_report_rejects_invalid_coordinate() {
        let target = TargetResolver::from_manual(Coordinate::new(24.0, 0.0));
        assert!(AtlasReport::build(&target, DEFAULT_CIRCUMPOLAR_LATITUDE).is_err());
    }
}
