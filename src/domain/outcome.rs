use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Approved,
    Declined,
    Retryable,
    TransportError,
    Unknown,
}

/// Maps an HTTP status onto the closed outcome vocabulary. Total over `u16`;
/// codes outside the HTTP range land in `Unknown`.
pub fn classify(http_status: u16) -> OutcomeStatus {
    match http_status {
        200 | 201 => OutcomeStatus::Approved,
        400 | 401 | 402 | 403 | 404 | 422 => OutcomeStatus::Declined,
        429 => OutcomeStatus::Retryable,
        500..=599 => OutcomeStatus::TransportError,
        _ => OutcomeStatus::Unknown,
    }
}

/// One response from a gateway collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub status: u16,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl GatewayResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best-effort human message carried in the body, if any.
    pub fn message(&self) -> Option<&str> {
        self.body
            .pointer("/error/message")
            .or_else(|| self.body.get("message"))
            .and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizationResult {
    pub token: String,
    pub upstream_status: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementOutcome {
    pub status: OutcomeStatus,
    pub http_status: u16,
    pub message: String,
    #[serde(skip)]
    pub raw_response: serde_json::Value,
}

impl SettlementOutcome {
    pub fn new(status: OutcomeStatus, http_status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            http_status,
            message: message.into(),
            raw_response: serde_json::Value::Null,
        }
    }

    pub fn from_response(response: GatewayResponse) -> Self {
        let status = classify(response.status);
        let message = response
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| default_message(status).to_string());
        Self {
            status,
            http_status: response.status,
            message,
            raw_response: response.body,
        }
    }
}

pub fn default_message(status: OutcomeStatus) -> &'static str {
    match status {
        OutcomeStatus::Approved => "Payment approved",
        OutcomeStatus::Declined => "Payment declined",
        OutcomeStatus::Retryable => "Temporarily unavailable, try again later",
        OutcomeStatus::TransportError => "Processor error",
        OutcomeStatus::Unknown => "Unrecognized processor response",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_ranges() {
        assert_eq!(classify(200), OutcomeStatus::Approved);
        assert_eq!(classify(201), OutcomeStatus::Approved);
        for status in [400, 401, 402, 403, 404, 422] {
            assert_eq!(classify(status), OutcomeStatus::Declined, "{status}");
        }
        assert_eq!(classify(429), OutcomeStatus::Retryable);
        assert_eq!(classify(500), OutcomeStatus::TransportError);
        assert_eq!(classify(503), OutcomeStatus::TransportError);
        assert_eq!(classify(599), OutcomeStatus::TransportError);
    }

    #[test]
    fn test_classify_falls_back_to_unknown() {
        for status in [0, 100, 202, 204, 301, 405, 408, 418, 499, 600, 999, u16::MAX] {
            assert_eq!(classify(status), OutcomeStatus::Unknown, "{status}");
        }
    }

    #[test]
    fn test_outcome_prefers_upstream_message() {
        let outcome = SettlementOutcome::from_response(GatewayResponse::new(
            402,
            json!({"error": {"message": "Insufficient funds"}}),
        ));
        assert_eq!(outcome.status, OutcomeStatus::Declined);
        assert_eq!(outcome.message, "Insufficient funds");

        let outcome = SettlementOutcome::from_response(GatewayResponse::new(200, json!({})));
        assert_eq!(outcome.message, "Payment approved");
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_value(OutcomeStatus::TransportError).unwrap();
        assert_eq!(json, "TRANSPORT_ERROR");
    }
}
