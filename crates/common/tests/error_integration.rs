//! Integration tests for `sellerlink_common::error`.
//!
//! These suites validate the classification table, precedence between
//! overlapping signals, the raw-error routes of the mapper, and the shape of
//! the records handed to callers.

use sellerlink_common::error::{
    create_error, map_http_error, map_to_error_kind, ErrorClassification, ErrorKind, ErrorRecord,
    ErrorSeverity, ErrorSignals, RawError, VendorErrorEntry,
};
use serde_json::json;

/// Validates the documented classification table end to end.
///
/// Assertions:
/// - `{code: "ThrottlingException"}` maps to `RateLimitExceeded`.
/// - `{status: 404, message: "ASIN not found"}` maps to `AsinNotFound`.
/// - `{status: 401}` maps to `Unauthorized`.
/// - `{status: 503}` maps to `ServiceUnavailable`.
/// - `{code: "InvalidInput", message: "bad sku"}` maps to `InvalidInput`.
#[test]
fn classification_table_matches_contract() {
    let cases = [
        (ErrorSignals::new().code("ThrottlingException"), ErrorKind::RateLimitExceeded),
        (ErrorSignals::new().status(404).message("ASIN not found"), ErrorKind::AsinNotFound),
        (ErrorSignals::new().status(401), ErrorKind::Unauthorized),
        (ErrorSignals::new().status(503), ErrorKind::ServiceUnavailable),
        (ErrorSignals::new().code("InvalidInput").message("bad sku"), ErrorKind::InvalidInput),
    ];

    for (signals, expected) in cases {
        assert_eq!(map_to_error_kind(&signals), expected, "signals: {signals:?}");
    }
}

/// Validates that mapping is case-insensitive on both code and message.
#[test]
fn classification_ignores_case() {
    let upper = ErrorSignals::new().code("QUOTAEXCEEDED").message("DAILY QUOTA");
    assert_eq!(map_to_error_kind(&upper), ErrorKind::QuotaExceeded);

    let mixed = ErrorSignals::new().message("Rate Limit reached");
    assert_eq!(map_to_error_kind(&mixed), ErrorKind::RateLimitExceeded);
}

/// Validates the three raw routes through `map_http_error`.
///
/// Assertions:
/// - A structured body wins over its status code.
/// - A bare 400 becomes `InvalidRequest`.
/// - An API error with code `Unauthorized` becomes `Unauthorized`.
/// - Every record carries the caller's context and the raw error as details.
#[test]
fn mapper_routes_raw_shapes() {
    let structured = RawError::from_response(
        422,
        &json!({"errors": [{"code": "InvalidInput", "message": "SKU missing"}]}),
    );
    let record = map_http_error(&structured, "listings.put_item");
    assert_eq!(record.kind(), ErrorKind::InvalidInput);
    assert_eq!(record.http_status(), Some(422));
    assert_eq!(record.vendor_code(), Some("InvalidInput"));

    let bare = map_http_error(&RawError::http_status(400, None), "listings.put_item");
    assert_eq!(bare.kind(), ErrorKind::InvalidRequest);

    let api = map_http_error(
        &RawError::api(Some("Unauthorized"), "Access to requested resource is denied", Some(403)),
        "vendors.get_purchase_orders",
    );
    assert_eq!(api.kind(), ErrorKind::Unauthorized);

    for record in [record, bare, api] {
        assert!(!record.context().is_empty());
        assert!(record.details().is_some(), "raw error kept as details: {record}");
    }
}

/// Validates the first structured entry decides the kind even when the
/// status alone would match an earlier rule.
///
/// Assertions:
/// - 429 carrying `QuotaExceeded` stays `QuotaExceeded`.
/// - 404 carrying `InvalidInput` stays `InvalidInput`.
/// - The record still reports the HTTP status and vendor code.
#[test]
fn structured_entry_outranks_status() {
    let quota = RawError::structured(
        Some(429),
        vec![VendorErrorEntry::new(
            "QuotaExceeded",
            "You exceeded your quota for the requested resource.",
        )],
    );
    let record = map_http_error(&quota, "vendors.get_purchase_orders");
    assert_eq!(record.kind(), ErrorKind::QuotaExceeded);
    assert_eq!(record.http_status(), Some(429));
    assert_eq!(record.vendor_code(), Some("QuotaExceeded"));

    let invalid = RawError::structured(
        Some(404),
        vec![VendorErrorEntry::new("InvalidInput", "bad marketplaceId")],
    );
    let record = map_http_error(&invalid, "easyShip.get_scheduled_package");
    assert_eq!(record.kind(), ErrorKind::InvalidInput);
    assert_eq!(record.http_status(), Some(404));
}

/// Validates structured entries fall back to the status when the list is
/// empty and to `Unknown` when there is no status either.
#[test]
fn empty_structured_list_falls_back() {
    let with_status = map_http_error(&RawError::structured(Some(504), vec![]), "m.op");
    assert_eq!(with_status.kind(), ErrorKind::OperationTimeout);

    let without = map_http_error(&RawError::structured(None, vec![]), "m.op");
    assert_eq!(without.kind(), ErrorKind::Unknown);
}

/// Validates that a record round-trips through JSON with its details.
#[test]
fn records_survive_serialization() {
    let raw = RawError::structured(
        Some(404),
        vec![VendorErrorEntry::new("NotFound", "Order 1 not found").with_details("orderId=1")],
    );
    let record = map_http_error(&raw, "vendors.get_purchase_order");

    let json = serde_json::to_string(&record).expect("record serializes");
    let back: ErrorRecord = serde_json::from_str(&json).expect("record deserializes");

    assert_eq!(back, record);
    assert_eq!(back.kind(), ErrorKind::OrderNotFound);
    assert_eq!(
        back.details().and_then(|d| d["entries"][0]["details"].as_str()),
        Some("orderId=1")
    );
}

/// Validates `create_error` and classification for lifecycle kinds.
#[test]
fn lifecycle_errors_are_critical_and_permanent() {
    for kind in [ErrorKind::InitializationError, ErrorKind::NotInitialized] {
        let record = create_error("module not ready", kind, Some(json!({"module": "vendors"})));
        assert!(!record.is_retryable());
        assert_eq!(record.severity(), ErrorSeverity::Critical);
        assert!(record.is_critical());
    }
}

/// Validates every kind has exactly one stable code.
#[test]
fn kind_codes_are_unique() {
    let mut codes: Vec<&str> = ErrorKind::ALL.iter().map(ErrorKind::code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), ErrorKind::ALL.len());
}
