//! Core types for the name resolution subsystem.

use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How a target was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSource {
    Cache,
    Sesame,
    Builtin,
    Manual,
}

impl fmt::Display for TargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "Cache"),
            Self::Sesame => write!(f, "Sesame"),
            Self::Builtin => write!(f, "Built-in"),
            Self::Manual => write!(f, "Manual"),
        }
    }
}

/// A sky position together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub name: String,
    pub coord: Coordinate,
    pub source: TargetSource,
    /// Main identifier reported by the resolver (e.g. "M  31" from SIMBAD)
    #[serde(default)]
    pub display_name: Option<String>,
    /// Object class, e.g. "galaxy" or SIMBAD's short code "G"
    #[serde(default)]
    pub object_type: Option<String>,
}

impl ResolvedTarget {
    pub fn display_line(&self) -> String {
        let kind = match &self.object_type {
            Some(t) => format!(" ({})", t),
            None => String::new(),
        };
        format!("{}{} [{}]", self.name, kind, self.source)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Object not found: '{0}'")]
    NotFound(String),
    #[error("Invalid resolver response: {0}")]
    InvalidResponse(String),
    #[error("No object name given")]
    NoInput,
}
