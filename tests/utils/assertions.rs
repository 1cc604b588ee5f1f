use axum::http::StatusCode;
use serde_json::Value;

use cobm::GameOutcome;

// ============================================================================
// Response Assertions
// ============================================================================

/// Assert a successful command and decode its outcome
pub fn assert_ok(response: (StatusCode, Value)) -> GameOutcome {
    let (status, body) = response;
    assert_eq!(status, StatusCode::OK, "unexpected failure: {}", body);
    serde_json::from_value(body).unwrap()
}

/// Assert a rejected command with the given status and error message
pub fn assert_error(response: (StatusCode, Value), expected_status: StatusCode, message: &str) {
    let (status, body) = response;
    assert_eq!(status, expected_status, "unexpected body: {}", body);
    let error = body["error"].as_str().unwrap_or_default();
    assert!(
        error.contains(message),
        "expected error containing {:?}, got {:?}",
        message,
        error
    );
}
