//! In-process gateway doubles.
//!
//! None of these touch the network. They answer from a scripted reply, count
//! calls, and are cheap to clone so a test can keep a handle for assertions
//! after boxing one into the pipeline.

use crate::domain::outcome::GatewayResponse;
use crate::domain::ports::{
    IssuerLookup, SettlementGateway, SettlementRequest, TokenGateway, TokenRequest,
};
use crate::error::GatewayError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// What a stub does when called.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(GatewayResponse),
    Fail(GatewayError),
    /// Sleeps before responding, for exercising timeouts.
    Delay(Duration, GatewayResponse),
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Reply::Respond(GatewayResponse::new(200, body))
    }

    pub fn status(status: u16, body: serde_json::Value) -> Self {
        Reply::Respond(GatewayResponse::new(status, body))
    }

    async fn play(&self) -> Result<GatewayResponse, GatewayError> {
        match self {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::Fail(err) => Err(err.clone()),
            Reply::Delay(delay, response) => {
                tokio::time::sleep(*delay).await;
                Ok(response.clone())
            }
        }
    }
}

#[derive(Clone)]
pub struct StubIssuerLookup {
    reply: Reply,
    calls: Arc<AtomicUsize>,
}

impl StubIssuerLookup {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unreachable() -> Self {
        Self::new(Reply::Fail(GatewayError::Unavailable(
            "connection refused".to_string(),
        )))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IssuerLookup for StubIssuerLookup {
    async fn lookup(&self, _prefix: &str) -> Result<GatewayResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.play().await
    }
}

/// Token gateway double. Records only the expiry of each request.
#[derive(Clone)]
pub struct StubTokenGateway {
    reply: Reply,
    calls: Arc<AtomicUsize>,
    expiries: Arc<RwLock<Vec<(u8, String)>>>,
}

impl StubTokenGateway {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            expiries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Always hands out `token`.
    pub fn issuing(token: &str) -> Self {
        Self::new(Reply::ok(serde_json::json!({ "token": token })))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn expiries(&self) -> Vec<(u8, String)> {
        self.expiries.read().await.clone()
    }
}

#[async_trait]
impl TokenGateway for StubTokenGateway {
    async fn exchange(&self, request: &TokenRequest) -> Result<GatewayResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.expiries
            .write()
            .await
            .push((request.exp_month, request.exp_year.clone()));
        self.reply.play().await
    }
}

/// Settlement double that honors idempotency keys: a replayed key returns
/// the stored response without counting as a new charge.
#[derive(Clone)]
pub struct StubSettlementGateway {
    reply: Reply,
    settled: Arc<RwLock<HashMap<String, GatewayResponse>>>,
    calls_per_key: Arc<RwLock<HashMap<String, usize>>>,
    tokens: Arc<RwLock<Vec<String>>>,
}

impl StubSettlementGateway {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            settled: Arc::default(),
            calls_per_key: Arc::default(),
            tokens: Arc::default(),
        }
    }

    pub fn responding(status: u16) -> Self {
        Self::new(Reply::status(status, serde_json::json!({})))
    }

    /// Number of distinct charges, i.e. first-seen idempotency keys that
    /// produced a response.
    pub async fn charges(&self) -> usize {
        self.settled.read().await.len()
    }

    pub async fn calls_for(&self, key: &str) -> usize {
        self.calls_per_key.read().await.get(key).copied().unwrap_or(0)
    }

    pub async fn total_calls(&self) -> usize {
        self.calls_per_key.read().await.values().sum()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.calls_per_key.read().await.keys().cloned().collect()
    }

    pub async fn tokens(&self) -> Vec<String> {
        self.tokens.read().await.clone()
    }
}

#[async_trait]
impl SettlementGateway for StubSettlementGateway {
    async fn submit(&self, request: &SettlementRequest) -> Result<GatewayResponse, GatewayError> {
        *self
            .calls_per_key
            .write()
            .await
            .entry(request.idempotency_key.clone())
            .or_default() += 1;

        if let Some(previous) = self.settled.read().await.get(&request.idempotency_key) {
            return Ok(previous.clone());
        }

        let response = self.reply.play().await?;
        self.tokens.write().await.push(request.token.clone());
        self.settled
            .write()
            .await
            .insert(request.idempotency_key.clone(), response.clone());
        Ok(response)
    }
}
