use std::sync::Arc;

use revguard_core::{
    FallbackConfig, FallbackOrchestrator, FallbackRequest, ReviewContext, RevguardError,
    Strategy, UpstreamError,
};
use tempfile::tempdir;

#[test]
fn load_reads_fallbacks_table_from_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("revguard.toml");
    std::fs::write(
        &path,
        r#"
[review]
model = "ignored-by-the-engine"

[fallbacks]
enabled = true
max_attempts = 4
strategies = ["simplified", "degraded", "manual"]
"#,
    )
    .expect("write config");

    let config = FallbackConfig::load(&path).expect("load config");
    assert_eq!(config.max_attempts, 4);
    assert_eq!(
        config.strategies,
        vec![Strategy::Simplified, Strategy::Degraded, Strategy::Manual]
    );

    let o = FallbackOrchestrator::new(Arc::new(config));
    let decision = o.handle(&FallbackRequest::new(
        UpstreamError::from_message("rate limit"),
        ReviewContext::default(),
        1,
    ));
    assert_eq!(decision.strategy(), Strategy::Simplified);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = FallbackConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, RevguardError::Io(_)));
}

#[test]
fn load_invalid_toml_is_parse_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[fallbacks\nenabled = ").expect("write config");

    let err = FallbackConfig::load(&path).unwrap_err();
    assert!(matches!(err, RevguardError::Toml(_)));
}
