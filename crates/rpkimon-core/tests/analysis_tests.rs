#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::time::Duration;

use chrono::Duration as ChronoDuration;
use common::{cert, now, snapshot, ta_uri};
use rpkimon_core::{analyze, AnalysisConfig, AnalysisError, JsonObjectDecoder, OverlapLimits};

#[test]
fn test_four_node_tree_reports_sibling_overlap_only() {
    let root = cert("root", "0.0.0.0/0")
        .child(cert("childA", "192.0.2.0/24"))
        .child(cert("childB", "198.51.100.0/24"))
        .child(cert("childC", "192.0.2.0/24"));
    let config = AnalysisConfig::new(ta_uri(&root));

    let outcome = analyze(&snapshot(&root), &JsonObjectDecoder, &config, now()).unwrap();
    let report = outcome.report;

    assert_eq!(report.total_certificates, 4);
    assert_eq!(report.clusters.len(), 1);
    let cluster = &report.clusters[0];
    assert_eq!(cluster.first().path.as_str(), "/0/");
    assert_eq!(cluster.second().path.as_str(), "/2/");
    assert_eq!(cluster.first().subject(), Some("CN=childA"));
    assert_eq!(cluster.second().subject(), Some("CN=childC"));
    assert!(report.clusters.iter().all(|c| c.first().path.as_str() != "/"));

    assert_eq!(report.overlapping_certificates, 2);
    assert_eq!(report.overlapping_resources, 1);
    assert_eq!(report.overlapping_resource_set.to_string(), "192.0.2.0/24");
}

#[test]
fn test_nested_overlap_across_branches() {
    // b0 sits under b but overlaps a, which is not its ancestor
    let root = cert("ta", "0.0.0.0/0, AS0-AS4294967295")
        .child(cert("a", "10.0.0.0/8, AS64496"))
        .child(cert("b", "11.0.0.0/8").child(cert("b0", "10.1.0.0/16")));
    let config = AnalysisConfig::new(ta_uri(&root));

    let report = analyze(&snapshot(&root), &JsonObjectDecoder, &config, now())
        .unwrap()
        .report;
    assert_eq!(report.clusters.len(), 1);
    assert_eq!(report.clusters[0].first().path.as_str(), "/0/");
    assert_eq!(report.clusters[0].second().path.as_str(), "/1/0/");
    assert_eq!(report.overlapping_resource_set.to_string(), "10.1.0.0/16");
}

#[test]
fn test_policy_filter_applies_after_detection() {
    let root = cert("ta", "0.0.0.0/0")
        .child(cert("old", "192.0.2.0/24").issued_at(now() - ChronoDuration::days(10)))
        .child(cert("new", "192.0.2.0/24").issued_at(now() - ChronoDuration::days(9)));

    // Both issued before the window: suppressed
    let config = AnalysisConfig::new(ta_uri(&root)).with_grace_period(Duration::from_secs(3600));
    let outcome = analyze(&snapshot(&root), &JsonObjectDecoder, &config, now()).unwrap();
    assert_eq!(outcome.unfiltered_clusters, 1);
    assert!(outcome.report.clusters.is_empty());
    assert_eq!(outcome.report.overlapping_certificates, 0);

    // A fresh key inside the window keeps the overlap visible
    let root = cert("ta", "0.0.0.0/0")
        .child(cert("old", "192.0.2.0/24").issued_at(now() - ChronoDuration::days(10)))
        .child(cert("new", "192.0.2.0/24").issued_at(now() - ChronoDuration::minutes(5)));
    let outcome = analyze(&snapshot(&root), &JsonObjectDecoder, &config, now()).unwrap();
    assert_eq!(outcome.report.clusters.len(), 1);
}

#[test]
fn test_global_ceiling_propagates() {
    let root = (0..6).fold(cert("ta", "0.0.0.0/0"), |root, i| {
        root.child(cert(&format!("c{}", i), "192.0.2.0/24"))
    });
    let config = AnalysisConfig::new(ta_uri(&root)).with_limits(OverlapLimits {
        max_pairs_per_certificate: 32,
        max_total_pairs: 10,
    });

    let err = analyze(&snapshot(&root), &JsonObjectDecoder, &config, now()).unwrap_err();
    match err {
        AnalysisError::OverlapBudgetExceeded { total, limit } => {
            assert_eq!(limit, 10);
            assert!(total > 10 && total <= 15);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_per_certificate_budget_is_reported_as_discarded() {
    let root = (1..=33).fold(
        cert("ta", "0.0.0.0/0").child(cert("hub", "10.0.0.0/16")),
        |root, i| root.child(cert(&format!("spoke{}", i), &format!("10.0.{}.0/24", i))),
    );
    let config = AnalysisConfig::new(ta_uri(&root));

    let outcome = analyze(&snapshot(&root), &JsonObjectDecoder, &config, now()).unwrap();
    assert!(outcome.report.clusters.is_empty());
    assert_eq!(outcome.discarded_certificates.len(), 1);
    assert_eq!(outcome.discarded_certificates[0].subject(), Some("CN=hub"));
    assert_eq!(outcome.report.total_certificates, 35);
}

#[test]
fn test_unknown_trust_anchor_is_an_empty_report() {
    let root = cert("ta", "0.0.0.0/0");
    let config = AnalysisConfig::new("rsync://elsewhere.example.net/ta.cer");
    let outcome = analyze(&snapshot(&root), &JsonObjectDecoder, &config, now()).unwrap();
    assert_eq!(outcome.report.total_certificates, 0);
    assert!(!outcome.report.has_overlaps());
}
