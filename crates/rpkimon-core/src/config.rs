//! Analysis configuration.
//!
//! Loaded from TOML or built programmatically:
//!
//! ```toml
//! trust_anchor_uri = "rsync://rpki.example.net/ta/ta.cer"
//! tracked_sias = ["rsync://rpki\\.example\\.net/.*"]
//! keyroll_publication_point_grace_period = "3h"
//!
//! [[ignored_overlaps]]
//! regex = "rsync://rpki\\.example\\.net/repository/legacy/.*"
//! description = "legacy publication point"
//!
//! [limits]
//! max_pairs_per_certificate = 32
//! max_total_pairs = 65536
//! ```

use std::path::Path;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::errors::{AnalysisError, Result};
use crate::overlap::OverlapLimits;

/// Regular expression that must match the whole input
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// # Errors
    ///
    /// `InvalidPattern` if the expression does not compile.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            AnalysisError::InvalidPattern {
                pattern: source.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Overlaps involving a matching URI are never reported
#[derive(Debug, Clone, PartialEq)]
pub struct IgnoredOverlap {
    pub pattern: Pattern,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub trust_anchor_uri: String,
    pub ignored_overlaps: Vec<IgnoredOverlap>,

    /// Empty means every SIA is tracked
    pub tracked_sias: Vec<Pattern>,

    /// Overlaps are expected while a publication point rolls its key
    pub keyroll_grace_period: Option<Duration>,

    pub limits: OverlapLimits,
}

impl AnalysisConfig {
    pub fn new(trust_anchor_uri: impl Into<String>) -> Self {
        Self {
            trust_anchor_uri: trust_anchor_uri.into(),
            ignored_overlaps: Vec::new(),
            tracked_sias: Vec::new(),
            keyroll_grace_period: None,
            limits: OverlapLimits::default(),
        }
    }

    /// # Errors
    ///
    /// `InvalidPattern` if `regex` does not compile.
    pub fn with_ignored_overlap(
        mut self,
        regex: &str,
        description: impl Into<String>,
    ) -> Result<Self> {
        self.ignored_overlaps.push(IgnoredOverlap {
            pattern: Pattern::new(regex)?,
            description: description.into(),
        });
        Ok(self)
    }

    /// # Errors
    ///
    /// `InvalidPattern` if `regex` does not compile.
    pub fn with_tracked_sia(mut self, regex: &str) -> Result<Self> {
        self.tracked_sias.push(Pattern::new(regex)?);
        Ok(self)
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.keyroll_grace_period = Some(grace_period);
        self
    }

    pub fn with_limits(mut self, limits: OverlapLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Description of the first ignore rule matching `uri`
    pub fn ignored_by(&self, uri: &str) -> Option<&str> {
        self.ignored_overlaps
            .iter()
            .find(|rule| rule.pattern.matches(uri))
            .map(|rule| rule.description.as_str())
    }

    /// # Errors
    ///
    /// `InvalidConfig` for malformed TOML or a missing trust anchor,
    /// `InvalidPattern` for a regex that does not compile.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text).map_err(|e| AnalysisError::InvalidConfig {
            reason: e.to_string(),
        })?;
        raw.try_into()
    }

    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    trust_anchor_uri: String,
    #[serde(default)]
    tracked_sias: Vec<String>,
    #[serde(default, deserialize_with = "humantime_serde::deserialize")]
    keyroll_publication_point_grace_period: Option<Duration>,
    #[serde(default)]
    ignored_overlaps: Vec<RawIgnoredOverlap>,
    #[serde(default)]
    limits: OverlapLimits,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIgnoredOverlap {
    regex: String,
    #[serde(default)]
    description: String,
}

impl TryFrom<RawConfig> for AnalysisConfig {
    type Error = AnalysisError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        if raw.trust_anchor_uri.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig {
                reason: "trust_anchor_uri is empty".to_string(),
            });
        }
        let ignored_overlaps = raw
            .ignored_overlaps
            .into_iter()
            .map(|rule| -> Result<IgnoredOverlap> {
                Ok(IgnoredOverlap {
                    pattern: Pattern::new(rule.regex)?,
                    description: rule.description,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let tracked_sias = raw
            .tracked_sias
            .into_iter()
            .map(Pattern::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            trust_anchor_uri: raw.trust_anchor_uri,
            ignored_overlaps,
            tracked_sias,
            keyroll_grace_period: raw.keyroll_publication_point_grace_period,
            limits: raw.limits,
        })
    }
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
