use super::*;

#[test]
fn test_app_error_status_codes() {
    assert_eq!(AppError::NotFound("test".into()).status_code(), 404);
    assert_eq!(AppError::Validation("test".into()).status_code(), 400);
    assert_eq!(AppError::Database("test".into()).status_code(), 500);
    assert_eq!(AppError::StoreUnavailable("test".into()).status_code(), 503);
    assert_eq!(AppError::Internal("test".into()).status_code(), 500);
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(AppError::NotFound("test".into()).error_code(), "NOT_FOUND");
    assert_eq!(
        AppError::Validation("test".into()).error_code(),
        "VALIDATION_ERROR"
    );
    assert_eq!(
        AppError::Database("test".into()).error_code(),
        "DATABASE_ERROR"
    );
    assert_eq!(
        AppError::StoreUnavailable("test".into()).error_code(),
        "STORE_UNAVAILABLE"
    );
    assert_eq!(
        AppError::Internal("test".into()).error_code(),
        "INTERNAL_ERROR"
    );
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        AppError::Validation("start after end".into()).to_string(),
        "Validation error: start after end"
    );
    assert_eq!(
        AppError::StoreUnavailable("timeout".into()).to_string(),
        "Ledger store unavailable: timeout"
    );
}

#[test]
fn test_body_keeps_validation_message() {
    let body = AppError::Validation("months must be at least 1".into()).body();
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "months must be at least 1");
}

#[test]
fn test_body_hides_database_details() {
    let body = AppError::Database("relation \"ledger_entries\" does not exist".into()).body();
    assert_eq!(body["error"], "DATABASE_ERROR");
    assert_eq!(body["message"], "An error occurred");
}
