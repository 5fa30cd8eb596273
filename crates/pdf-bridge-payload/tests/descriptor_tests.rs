use pdf_bridge_payload::*;

#[test]
fn test_direct_schemes_are_recognized() {
    for uri in [
        "http://example.com/doc.pdf",
        "https://x/doc.pdf",
        "file:///tmp/doc.pdf",
        "content://media/external/file/42",
        "HTTPS://EXAMPLE.COM/DOC.PDF",
    ] {
        let source = SourceDescriptor::from_uri(uri);
        assert_eq!(source.route().unwrap(), SourceRoute::DirectUri(uri), "{}", uri);
    }
}

#[test]
fn test_unknown_scheme_is_rejected() {
    let source = SourceDescriptor::from_uri("ftp://example.com/doc.pdf");
    assert!(matches!(source.route(), Err(BridgeError::InvalidSource(_))));
}

#[test]
fn test_inline_payload_is_recognized() {
    let data = "data:application/pdf;base64,JVBERi0=";
    let source = SourceDescriptor::from_base64(data);
    let route = source.route().unwrap();
    assert_eq!(route, SourceRoute::Inline(data));
    assert_eq!(route.kind(), PayloadKind::Html);
}

#[test]
fn test_raw_base64_without_data_prefix_is_rejected() {
    let source = SourceDescriptor::from_base64("JVBERi0=");
    assert!(source.route().unwrap_err().is_invalid_source());
}

#[test]
fn test_empty_descriptor_is_rejected() {
    let source = SourceDescriptor::default();
    assert!(source.route().unwrap_err().is_invalid_source());
}

#[test]
fn test_both_forms_recognized_is_ambiguous() {
    let source = SourceDescriptor {
        uri: Some("https://x/doc.pdf".to_string()),
        base64: Some("data:application/pdf;base64,JVBERi0=".to_string()),
        ..Default::default()
    };
    match source.route() {
        Err(BridgeError::InvalidSource(msg)) => assert!(msg.contains("exactly one")),
        other => panic!("Expected InvalidSource, got {:?}", other),
    }
}

#[test]
fn test_unrecognized_uri_falls_through_to_inline() {
    let source = SourceDescriptor {
        uri: Some("doc.pdf".to_string()),
        base64: Some("data:application/pdf;base64,JVBERi0=".to_string()),
        ..Default::default()
    };
    assert!(matches!(source.route(), Ok(SourceRoute::Inline(_))));
}

#[cfg(feature = "serde")]
#[test]
fn test_descriptor_from_json() {
    let source = SourceDescriptor::from_json(
        r#"{ "uri": "https://x/doc.pdf", "headers": { "Authorization": "Bearer t" } }"#,
    )
    .unwrap();
    assert_eq!(source.uri.as_deref(), Some("https://x/doc.pdf"));
    assert_eq!(source.base64, None);
    assert_eq!(source.headers.get("Authorization").unwrap(), "Bearer t");

    let empty = SourceDescriptor::from_json("{}").unwrap();
    assert_eq!(empty, SourceDescriptor::default());

    assert!(SourceDescriptor::from_json("not json").is_err());
}
