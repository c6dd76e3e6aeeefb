/*!
 * Tests for error types and conversions
 */

use yomidict::errors::{AppError, FetchError, InitError};

#[test]
fn test_fetchError_releaseQuery_shouldDisplayRepoAndStatus() {
    let error = FetchError::ReleaseQuery {
        repo: "MarvNC/jmdict-yomitan".to_string(),
        status: 403,
    };
    let display = format!("{}", error);
    assert!(display.contains("MarvNC/jmdict-yomitan"));
    assert!(display.contains("403"));
}

#[test]
fn test_fetchError_download_shouldDisplayUrlAndStatus() {
    let error = FetchError::Download {
        url: "https://example.com/a.zip".to_string(),
        status: 500,
    };
    let display = format!("{}", error);
    assert!(display.contains("Failed to download file"));
    assert!(display.contains("https://example.com/a.zip"));
    assert!(display.contains("500"));
}

#[test]
fn test_fetchError_fromIoError_shouldBecomeIo() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: FetchError = io_error.into();
    assert!(matches!(error, FetchError::Io(ref msg) if msg.contains("read-only")));
}

#[test]
fn test_initError_config_shouldDisplayPath() {
    let error = InitError::Config {
        path: "/tmp/config.json".to_string(),
        message: "expected value".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("/tmp/config.json"));
    assert!(display.contains("expected value"));
}

#[test]
fn test_appError_fromFetchError_shouldWrapCorrectly() {
    let error: AppError = FetchError::Request("connection refused".to_string()).into();
    match error {
        AppError::Fetch(FetchError::Request(msg)) => assert_eq!(msg, "connection refused"),
        other => panic!("Expected AppError::Fetch, got {:?}", other),
    }
}

#[test]
fn test_appError_fromInitError_shouldWrapCorrectly() {
    let error: AppError = InitError::DataDir("/missing".to_string()).into();
    assert!(matches!(error, AppError::Initialization(InitError::DataDir(_))));
    assert!(format!("{}", error).contains("/missing"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(ref msg) if msg == "something odd"));
}

#[test]
fn test_appError_argument_shouldDisplayCorrectly() {
    let error = AppError::Argument("missing DB_OUTPUT_PATH".to_string());
    assert_eq!(format!("{}", error), "Argument error: missing DB_OUTPUT_PATH");
}
