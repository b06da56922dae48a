//! Cluster policy trait and implementations
//!
//! A raw overlap is reported only if every configured policy admits it.
//! Policies are pure predicates over a cluster and the evaluation time, so
//! the order in which they run does not change the outcome.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::{AnalysisConfig, IgnoredOverlap, Pattern};
use crate::overlap::OverlapCluster;

/// Decides whether a detected overlap is worth reporting
pub trait ClusterPolicy: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// `true` to keep the cluster
    fn admits(&self, cluster: &OverlapCluster, now: DateTime<Utc>) -> bool;
}

/// Drops clusters where any member's URI matches an ignore rule
#[derive(Debug, Clone, Default)]
pub struct IgnoredOverlaps {
    rules: Vec<IgnoredOverlap>,
}

impl IgnoredOverlaps {
    pub fn new(rules: Vec<IgnoredOverlap>) -> Self {
        Self { rules }
    }
}

impl ClusterPolicy for IgnoredOverlaps {
    fn name(&self) -> &'static str {
        "ignored_overlaps"
    }

    fn admits(&self, cluster: &OverlapCluster, _now: DateTime<Utc>) -> bool {
        !cluster.members().iter().any(|member| {
            self.rules
                .iter()
                .any(|rule| rule.pattern.matches(&member.uri))
        })
    }
}

/// Keeps clusters whose members all publish under a tracked SIA
///
/// With no patterns configured every SIA is tracked. A member without a
/// manifest SIA never matches.
#[derive(Debug, Clone, Default)]
pub struct TrackedSias {
    patterns: Vec<Pattern>,
}

impl TrackedSias {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }
}

impl ClusterPolicy for TrackedSias {
    fn name(&self) -> &'static str {
        "tracked_sias"
    }

    fn admits(&self, cluster: &OverlapCluster, _now: DateTime<Utc>) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        cluster.members().iter().all(|member| {
            member
                .sia()
                .is_some_and(|sia| self.patterns.iter().any(|p| p.matches(sia)))
        })
    }
}

/// Keeps a cluster only if some member was issued after `now - grace_period`
///
/// Without a grace period every cluster is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyrollGracePeriod {
    grace_period: Option<Duration>,
}

impl KeyrollGracePeriod {
    pub fn new(grace_period: Option<Duration>) -> Self {
        Self { grace_period }
    }
}

impl ClusterPolicy for KeyrollGracePeriod {
    fn name(&self) -> &'static str {
        "keyroll_grace_period"
    }

    fn admits(&self, cluster: &OverlapCluster, now: DateTime<Utc>) -> bool {
        let Some(grace_period) = self.grace_period else {
            return true;
        };
        // A window reaching past the representable range covers every member
        let window_start = chrono::Duration::from_std(grace_period)
            .ok()
            .and_then(|d| now.checked_sub_signed(d));
        cluster
            .members()
            .iter()
            .filter_map(|member| member.not_before())
            .any(|not_before| window_start.map_or(true, |start| not_before > start))
    }
}

/// All configured policies, applied together
pub struct OverlapPolicy {
    policies: Vec<Box<dyn ClusterPolicy>>,
}

impl OverlapPolicy {
    pub fn new(policies: Vec<Box<dyn ClusterPolicy>>) -> Self {
        Self { policies }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(vec![
            Box::new(IgnoredOverlaps::new(config.ignored_overlaps.clone())),
            Box::new(TrackedSias::new(config.tracked_sias.clone())),
            Box::new(KeyrollGracePeriod::new(config.keyroll_grace_period)),
        ])
    }

    pub fn admits(&self, cluster: &OverlapCluster, now: DateTime<Utc>) -> bool {
        self.policies.iter().all(|policy| {
            let admitted = policy.admits(cluster, now);
            if !admitted {
                debug!(
                    policy = policy.name(),
                    first = cluster.first().uri.as_str(),
                    second = cluster.second().uri.as_str(),
                    "overlap filtered"
                );
            }
            admitted
        })
    }

    /// Clusters admitted by every policy, order preserved
    pub fn filter(&self, clusters: Vec<OverlapCluster>, now: DateTime<Utc>) -> Vec<OverlapCluster> {
        clusters
            .into_iter()
            .filter(|cluster| self.admits(cluster, now))
            .collect()
    }
}

impl std::fmt::Debug for OverlapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.policies.iter().map(|p| p.name()))
            .finish()
    }
}
