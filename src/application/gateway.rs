use crate::domain::billing::BillingContext;
use crate::domain::card::NormalizedCredentials;
use crate::domain::outcome::{SettlementOutcome, TokenizationResult};
use crate::domain::ports::{SettlementGatewayBox, SettlementRequest, TokenGatewayBox, TokenRequest};
use crate::error::GatewayError;
use std::time::Duration;
use tracing::debug;

/// Exchanges validated card fields for a one-time token. One attempt per
/// call; retry policy belongs to whoever drives the pipeline.
pub struct TokenizationClient {
    gateway: TokenGatewayBox,
    timeout: Duration,
}

impl TokenizationClient {
    pub fn new(gateway: TokenGatewayBox, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    pub async fn tokenize(
        &self,
        credentials: &NormalizedCredentials,
        billing: &BillingContext,
    ) -> Result<TokenizationResult, GatewayError> {
        let request = TokenRequest {
            number: credentials.number().to_string(),
            exp_month: credentials.month(),
            exp_year: credentials.year().to_string(),
            cvv: credentials.cvv().to_string(),
            billing: billing.clone(),
        };
        let response = tokio::time::timeout(self.timeout, self.gateway.exchange(&request))
            .await
            .map_err(|_| GatewayError::Timeout)??;
        debug!(status = response.status, "tokenization responded");

        if !response.is_success() {
            return Err(GatewayError::Rejected {
                status: response.status,
                body: response.body,
            });
        }
        match response.body.get("token").and_then(|t| t.as_str()) {
            Some(token) if !token.is_empty() => Ok(TokenizationResult {
                token: token.to_string(),
                upstream_status: response.status,
            }),
            _ => Err(GatewayError::ProtocolViolation(
                "success body has no token field".to_string(),
            )),
        }
    }
}

/// Forwards a token to the settlement processor and classifies its answer.
pub struct SettlementClient {
    gateway: SettlementGatewayBox,
    timeout: Duration,
}

impl SettlementClient {
    pub fn new(gateway: SettlementGatewayBox, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    /// `idempotency_key` must be fresh for every logically distinct attempt.
    pub async fn settle(
        &self,
        token: &str,
        billing: &BillingContext,
        idempotency_key: &str,
    ) -> Result<SettlementOutcome, GatewayError> {
        let request = SettlementRequest {
            token: token.to_string(),
            billing: billing.clone(),
            idempotency_key: idempotency_key.to_string(),
        };
        let response = tokio::time::timeout(self.timeout, self.gateway.submit(&request))
            .await
            .map_err(|_| GatewayError::Timeout)??;
        debug!(status = response.status, idempotency_key, "settlement responded");
        Ok(SettlementOutcome::from_response(response))
    }
}
