use pdf_bridge_host::*;
use std::path::PathBuf;

#[test]
fn test_default_options_are_valid() {
    let options = ViewerOptions::default();
    assert!(options.validate().is_ok());
    assert_eq!(options.platform, Platform::current());
    assert!(options.origin_whitelist.iter().any(|o| o == "data:*"));
}

#[test]
fn test_validation_empty_whitelist() {
    let options = ViewerOptions {
        origin_whitelist: Vec::new(),
        ..Default::default()
    };
    match options.validate() {
        Err(HostError::Config(msg)) => assert!(msg.contains("whitelist")),
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_validation_zero_width() {
    let options = ViewerOptions {
        viewport_width: Some(0),
        ..Default::default()
    };
    assert!(options.validate().is_err());
}

#[test]
fn test_shell_rejects_invalid_options() {
    let options = ViewerOptions {
        viewport_width: Some(0),
        ..Default::default()
    };
    let result = HostShell::new(
        pdf_bridge_payload::SourceDescriptor::from_uri("https://x/doc.pdf"),
        pdf_bridge_payload::DefaultTransport::new(),
        options,
    );
    assert!(matches!(result, Err(HostError::Config(_))));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = ViewerOptions {
        platform: Platform::Android,
        origin_whitelist: vec!["https://*".to_string()],
        bundle: Some(PathBuf::from("reader.bundle.js")),
        viewport_width: Some(412),
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    options.save(path).await.unwrap();
    let loaded = ViewerOptions::load(path).await.unwrap();

    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_config_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{ "platform": "Ios" }"#)
        .await
        .unwrap();

    let loaded = ViewerOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.platform, Platform::Ios);
    assert_eq!(loaded.origin_whitelist.len(), DEFAULT_ORIGIN_WHITELIST.len());
    assert_eq!(loaded.bundle, None);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_malformed_config_is_config_error() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), "{ nope").await.unwrap();

    assert!(matches!(
        ViewerOptions::load(temp_file.path()).await,
        Err(HostError::Config(_))
    ));
}
