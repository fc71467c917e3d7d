use std::path::Path;

use super::*;

fn row(handle: &str, name: &str) -> SeedInfluencer {
    SeedInfluencer {
        handle: handle.to_string(),
        display_name: name.to_string(),
        niche: "Beauty".to_string(),
        location: "Miami".to_string(),
        photo_url: None,
    }
}

#[test]
fn bio_lowercases_niche() {
    let r = row("glowwithni", "Glow with Ni");
    assert_eq!(
        r.bio(),
        "Glow with Ni creates premium beauty content with measurable campaign outcomes."
    );
}

#[test]
fn platform_handles_prefix_at_sign() {
    let r = row("fitjay", "Fit Jay");
    let handles = r.platform_handles();
    assert_eq!(handles[0], ("instagram", "@fitjay".to_string()));
    assert_eq!(handles[1], ("tiktok", "@fitjay".to_string()));
}

#[test]
fn metrics_follow_index_formula() {
    let first = SeedInfluencer::metrics(0);
    assert_eq!(first.followers_count, 25_000);
    assert_eq!(first.engagement_rate.to_string(), "2.40");
    assert_eq!(first.rate_min, 250);
    assert_eq!(first.rate_max, 900);
    assert!(first.verified);
    assert_eq!(first.plan_tier, "pro");

    let third = SeedInfluencer::metrics(2);
    assert_eq!(third.followers_count, 33_400);
    assert_eq!(third.engagement_rate.to_string(), "2.74");
    assert_eq!(third.avg_views, 14_600);
    assert_eq!(third.rate_min, 330);
    assert_eq!(third.rate_max, 1_080);
    assert!(!third.verified);
    assert_eq!(third.plan_tier, "starter");
}

#[test]
fn validate_rejects_duplicate_handles_case_insensitively() {
    let file = SeedFile {
        influencers: vec![row("maya-bites", "Maya"), row("Maya-Bites", "Maya 2")],
    };
    let err = validate_seed(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate influencer handle"));
}

#[test]
fn validate_rejects_empty_handle() {
    let file = SeedFile {
        influencers: vec![row("  ", "Nobody")],
    };
    let err = validate_seed(&file).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn load_seed_from_repo_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("influencers.yaml");
    let result = load_seed_influencers(&path);
    assert!(result.is_ok(), "failed to load influencers.yaml: {result:?}");
    let seed = result.unwrap();
    assert_eq!(seed.influencers.len(), 7);
    assert!(seed.influencers.iter().any(|r| r.niche == "Beauty"));
}

#[test]
fn load_seed_reports_missing_file() {
    let err = load_seed_influencers(Path::new("/nonexistent/influencers.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::SeedFileIo { .. }));
}
