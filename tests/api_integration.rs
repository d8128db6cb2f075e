//! Integration tests for the client against a mock Stirling PDF server.
//!
//! These tests drive the full request cycle through the public API:
//! status bootstrap on connect, multipart uploads, version gating, and
//! streaming binary results to disk.

use stirling_pdf_client::api::FileInput;
use stirling_pdf_client::api::convert::WordFormat;
use stirling_pdf_client::api::misc::{CompressOptions, StampOptions, StampPosition};
use stirling_pdf_client::client::StirlingClient;
use stirling_pdf_client::error::Error;
use stirling_pdf_client::transport::STATUS_ENDPOINT;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

/// Mounts the status endpoint every connect bootstraps from.
async fn mount_status(mock_server: &MockServer, version: &str) {
    Mock::given(method("GET"))
        .and(path(STATUS_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": version,
            "status": "UP",
        })))
        .mount(mock_server)
        .await;
}

/// Returns the body of the first request that hit `endpoint`, as text.
///
/// Multipart bodies are inspected as lossy UTF-8, which keeps field names
/// and text values intact.
async fn request_body(mock_server: &MockServer, endpoint: &str) -> String {
    let requests = mock_server.received_requests().await.unwrap();
    let request = requests
        .iter()
        .find(|request| request.url.path() == endpoint)
        .unwrap_or_else(|| panic!("no request hit {endpoint}"));
    String::from_utf8_lossy(&request.body).into_owned()
}

#[tokio::test]
async fn test_connect_bootstraps_status_and_exposes_version() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.4.1").await;

    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();

    assert_eq!(client.server_version(), "1.4.1");
    let status = client.server_status().expect("status cached on connect");
    assert_eq!(status.status, "UP");
}

#[tokio::test]
async fn test_connect_fails_when_server_is_not_ready() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(STATUS_ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_string("starting up"))
        .mount(&mock_server)
        .await;

    let error = StirlingClient::connect(&mock_server.uri())
        .await
        .unwrap_err();

    match error {
        Error::Status {
            status,
            reason,
            body,
            ..
        } => {
            assert_eq!(status, 503);
            assert_eq!(reason, "Service unavailable");
            assert!(body.contains("starting up"), "got body: {body}");
        }
        other => panic!("expected status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_pdf_to_word_uploads_multipart_and_saves_named_result() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.4.1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/convert/pdf/word"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", r#"attachment; filename="report.docx""#)
                .set_body_bytes(b"DOCX OUTPUT BYTES"),
        )
        .mount(&mock_server)
        .await;

    let input_dir = TempDir::new().unwrap();
    let input_path = input_dir.path().join("source.pdf");
    std::fs::write(&input_path, b"%PDF-1.7 source bytes").unwrap();
    let output_dir = TempDir::new().unwrap();

    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    let saved = client
        .convert()
        .pdf_to_word(
            &FileInput::path(&input_path),
            WordFormat::Docx,
            output_dir.path(),
        )
        .await
        .unwrap();

    assert_eq!(saved, output_dir.path().join("report.docx"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"DOCX OUTPUT BYTES");

    let body = request_body(&mock_server, "/api/v1/convert/pdf/word").await;
    assert!(
        body.contains(r#"name="fileInput"; filename="source.pdf""#),
        "upload part missing in: {body}"
    );
    assert!(body.contains("%PDF-1.7 source bytes"), "file bytes missing");
    assert!(
        body.contains(r#"name="outputFormat""#) && body.contains("docx"),
        "output format field missing in: {body}"
    );
}

#[tokio::test]
async fn test_url_to_pdf_posts_urlencoded_form() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.4.1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/convert/url/pdf"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", r#"attachment; filename="page.pdf""#)
                .set_body_bytes(b"%PDF page"),
        )
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    let saved = client
        .convert()
        .url_to_pdf("https://example.com/news", output_dir.path())
        .await
        .unwrap();

    assert_eq!(saved, output_dir.path().join("page.pdf"));

    let body = request_body(&mock_server, "/api/v1/convert/url/pdf").await;
    assert_eq!(body, "urlInput=https%3A%2F%2Fexample.com%2Fnews");
}

#[tokio::test]
async fn test_load_below_minimum_version_is_refused_without_a_request() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.2.0").await;

    Mock::given(method("GET"))
        .and(path("/api/v1/info/load"))
        .respond_with(ResponseTemplate::new(200).set_body_json(7))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    let error = client.info().load(None).await.unwrap_err();

    match error {
        Error::UnsupportedVersion { required, actual } => {
            assert_eq!(required, "1.3.2");
            assert_eq!(actual, "1.2.0");
        }
        other => panic!("expected version error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_load_forwards_endpoint_query() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.4.1").await;

    Mock::given(method("GET"))
        .and(path("/api/v1/info/load"))
        .and(query_param("endpoint", "/api/v1/misc/compress-pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(42))
        .mount(&mock_server)
        .await;

    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    let count = client
        .info()
        .load(Some("/api/v1/misc/compress-pdf"))
        .await
        .unwrap();

    assert_eq!(count, 42);
}

#[tokio::test]
async fn test_status_refresh_unlocks_gated_operations() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    // The server answers the bootstrap as 1.2.0, later fetches as 1.4.1
    Mock::given(method("GET"))
        .and(path(STATUS_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": "1.2.0",
            "status": "UP",
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_status(&mock_server, "1.4.1").await;

    Mock::given(method("GET"))
        .and(path("/api/v1/info/load"))
        .respond_with(ResponseTemplate::new(200).set_body_json(12))
        .mount(&mock_server)
        .await;

    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    assert_eq!(client.server_version(), "1.2.0");

    let refused = client.info().load(None).await;
    assert!(
        matches!(refused, Err(Error::UnsupportedVersion { .. })),
        "got: {refused:?}"
    );

    let refreshed = client.info().status().await.unwrap();
    assert_eq!(refreshed.version, "1.4.1");

    let count = client.info().load(None).await.unwrap();
    assert_eq!(count, 12);
}

#[tokio::test]
async fn test_server_error_surfaces_reason_and_body() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.4.1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/misc/repair"))
        .respond_with(ResponseTemplate::new(500).set_body_string("GhostScript exited with code 1"))
        .mount(&mock_server)
        .await;

    let input_dir = TempDir::new().unwrap();
    let input_path = input_dir.path().join("broken.pdf");
    std::fs::write(&input_path, b"%PDF").unwrap();
    let output_dir = TempDir::new().unwrap();

    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    let error = client
        .misc()
        .repair(&FileInput::path(&input_path), output_dir.path())
        .await
        .unwrap_err();

    match error {
        Error::Status {
            status,
            reason,
            body,
            ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(reason, "Internal server error");
            assert!(body.contains("GhostScript"), "got body: {body}");
        }
        other => panic!("expected status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_compress_sends_target_size_in_kilobytes() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.4.1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/misc/compress-pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", r#"attachment; filename="smaller.pdf""#)
                .set_body_bytes(b"%PDF smaller"),
        )
        .mount(&mock_server)
        .await;

    let input_dir = TempDir::new().unwrap();
    let input_path = input_dir.path().join("large.pdf");
    std::fs::write(&input_path, b"%PDF large").unwrap();
    let output_dir = TempDir::new().unwrap();

    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    client
        .misc()
        .compress(
            &FileInput::path(&input_path),
            &CompressOptions::default(),
            output_dir.path(),
        )
        .await
        .unwrap();

    let body = request_body(&mock_server, "/api/v1/misc/compress-pdf").await;
    assert!(
        body.contains(r#"name="expectedOutputSize""#),
        "size field missing in: {body}"
    );
    assert!(body.contains("25kb"), "kilobyte suffix missing in: {body}");
}

#[tokio::test]
async fn test_add_stamp_sends_numpad_position_code() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.4.1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/misc/add-stamp"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", r#"attachment; filename="stamped.pdf""#)
                .set_body_bytes(b"%PDF stamped"),
        )
        .mount(&mock_server)
        .await;

    let input_dir = TempDir::new().unwrap();
    let input_path = input_dir.path().join("plain.pdf");
    std::fs::write(&input_path, b"%PDF plain").unwrap();
    let output_dir = TempDir::new().unwrap();

    let options = StampOptions {
        stamp_text: Some("DRAFT".to_string()),
        position: StampPosition::TopRight,
        ..StampOptions::default()
    };

    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    client
        .misc()
        .add_stamp(&FileInput::path(&input_path), &options, output_dir.path())
        .await
        .unwrap();

    let body = request_body(&mock_server, "/api/v1/misc/add-stamp").await;
    assert!(
        body.contains(r#"name="position""#) && body.contains("\r\n\r\n9\r\n"),
        "top-right must be sent as code 9, body: {body}"
    );
    assert!(
        body.contains(r#"name="stampText""#) && body.contains("DRAFT"),
        "stamp text missing in: {body}"
    );
}

#[tokio::test]
async fn test_validate_signature_decodes_typed_report() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.4.1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/security/validate-signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "valid": true,
            "signerName": "Alice Example",
            "chainValid": false,
            "issuerDN": "CN=Example CA",
            "keySize": 2048,
            "keyUsages": ["digitalSignature"],
        })))
        .mount(&mock_server)
        .await;

    let input_dir = TempDir::new().unwrap();
    let input_path = input_dir.path().join("signed.pdf");
    std::fs::write(&input_path, b"%PDF signed").unwrap();

    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    let report = client
        .security()
        .validate_signature(&FileInput::path(&input_path), None)
        .await
        .unwrap();

    assert!(report.valid);
    assert_eq!(report.signer_name, "Alice Example");
    assert!(!report.chain_valid);
    assert_eq!(report.issuer_dn, "CN=Example CA");
    assert_eq!(report.key_size, 2048);
    assert_eq!(report.key_usages, vec!["digitalSignature".to_string()]);
    // Fields the server omitted fall back to defaults
    assert!(!report.not_expired);
    assert_eq!(report.error_message, "");
}

#[tokio::test]
async fn test_operation_without_input_sends_no_request() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_status(&mock_server, "1.4.1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/misc/compress-pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let client = StirlingClient::connect(&mock_server.uri()).await.unwrap();
    let error = client
        .misc()
        .compress(
            &FileInput::default(),
            &CompressOptions::default(),
            output_dir.path(),
        )
        .await
        .unwrap_err();

    match error {
        Error::MissingInput { operation } => assert_eq!(operation, "compress-pdf"),
        other => panic!("expected missing input error, got: {other:?}"),
    }
}
