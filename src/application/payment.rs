use serde_json::Value;

use crate::domain::PaymentRequest;

use super::AppError;

const PAYABLE_KINDS: [&str; 3] = ["market", "service", "resource"];

/// Parse an untyped payment request such as
/// `{"type": "service", "user_id": 3, "price_cents": 1500, "service_ids": [4, 8]}`.
///
/// Anything that is not one of the three payable kinds is rejected with
/// `InvalidRequest`; nothing is created for it.
pub fn parse_payment_request(input: &str) -> Result<PaymentRequest, AppError> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| AppError::InvalidRequest(format!("malformed JSON: {}", e)))?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::InvalidRequest("missing payment type".to_string()))?;

    if !PAYABLE_KINDS.contains(&kind) {
        return Err(AppError::InvalidRequest(format!(
            "unrecognized payment type: {}",
            kind
        )));
    }

    serde_json::from_value(value).map_err(|e| AppError::InvalidRequest(e.to_string()))
}
