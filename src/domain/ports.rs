use super::billing::BillingContext;
use super::outcome::GatewayResponse;
use crate::error::GatewayError;
use async_trait::async_trait;

/// Request for exchanging card fields for a one-time token.
#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: String,
    pub cvv: String,
    pub billing: BillingContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementRequest {
    pub token: String,
    pub billing: BillingContext,
    pub idempotency_key: String,
}

/// Remote issuer lookup keyed by a six-digit prefix.
#[async_trait]
pub trait IssuerLookup: Send + Sync {
    async fn lookup(&self, prefix: &str) -> Result<GatewayResponse, GatewayError>;
}

/// Upstream service that turns card fields into an opaque token.
#[async_trait]
pub trait TokenGateway: Send + Sync {
    async fn exchange(&self, request: &TokenRequest) -> Result<GatewayResponse, GatewayError>;
}

/// Downstream processor that settles a token. Implementations must return
/// the original response when an idempotency key is replayed.
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    async fn submit(&self, request: &SettlementRequest) -> Result<GatewayResponse, GatewayError>;
}

pub type IssuerLookupBox = Box<dyn IssuerLookup>;
pub type TokenGatewayBox = Box<dyn TokenGateway>;
pub type SettlementGatewayBox = Box<dyn SettlementGateway>;
