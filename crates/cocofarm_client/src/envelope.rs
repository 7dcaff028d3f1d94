//! Response envelope normalization.
//!
//! The backend wraps some payloads as `{ "status": ..., "data": {...} }` and
//! returns others flat. [`unwrap_envelope`] is the single place that decides
//! which shape arrived; every JSON response goes through it.

use serde_json::Value;

use crate::FarmError;

/// Return the innermost meaningful payload of a response body.
///
/// If `body.data` is present and truthy it is returned, otherwise the body
/// itself is. Truthiness follows the backend's JavaScript heritage: `null`,
/// `false`, `0` and `""` are falsy; arrays and objects, even empty ones, are
/// truthy. A `null` body is a malformed response, never defaulted.
pub fn unwrap_envelope(body: Value) -> Result<Value, FarmError> {
    if body.is_null() {
        return Err(FarmError::MalformedResponse(
            "response body is null".into(),
        ));
    }
    let nested = body.get("data").map(is_truthy).unwrap_or(false);
    match body {
        // Presence was checked above.
        Value::Object(mut outer) if nested => Ok(outer.remove("data").unwrap_or(Value::Null)),
        other => Ok(other),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Unwrap the envelope and decode the payload into `T`. Decode failures
/// carry a body snippet so the mismatching endpoint can be identified from
/// logs.
pub fn decode_payload<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, FarmError> {
    let payload = unwrap_envelope(body)?;
    serde_json::from_value(payload.clone()).map_err(|e| {
        let snippet: String = payload.to_string().chars().take(256).collect();
        FarmError::MalformedResponse(format!("decoding payload: {e} - body: {snippet}"))
    })
}
