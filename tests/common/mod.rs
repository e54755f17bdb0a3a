#![allow(dead_code)]

use cardpipe::application::gateway::{SettlementClient, TokenizationClient};
use cardpipe::application::orchestrator::VerificationOrchestrator;
use cardpipe::application::resolver::MetadataResolver;
use cardpipe::config::PipelineConfig;
use cardpipe::domain::billing::BillingContext;
use cardpipe::infrastructure::static_table::StaticBinTable;
use cardpipe::infrastructure::stub::{StubIssuerLookup, StubSettlementGateway, StubTokenGateway};

pub struct Harness {
    pub lookup: StubIssuerLookup,
    pub tokens: StubTokenGateway,
    pub settlement: StubSettlementGateway,
    pub orchestrator: VerificationOrchestrator,
}

pub fn fast_config() -> PipelineConfig {
    PipelineConfig {
        lookup_timeout_ms: 50,
        tokenize_timeout_ms: 50,
        settle_timeout_ms: 50,
        event_log_capacity: 16,
    }
}

pub fn harness(
    table: StaticBinTable,
    lookup: StubIssuerLookup,
    tokens: StubTokenGateway,
    settlement: StubSettlementGateway,
) -> Harness {
    let config = fast_config();
    let resolver = MetadataResolver::new(table, config.lookup_timeout())
        .with_remote(Box::new(lookup.clone()));
    let tokenizer = TokenizationClient::new(Box::new(tokens.clone()), config.tokenize_timeout());
    let settler = SettlementClient::new(Box::new(settlement.clone()), config.settle_timeout());
    Harness {
        orchestrator: VerificationOrchestrator::new(config, resolver, tokenizer, settler),
        lookup,
        tokens,
        settlement,
    }
}

pub fn billing() -> BillingContext {
    BillingContext {
        order_ref: "order-42".to_string(),
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        postal_code: "10001".to_string(),
        amount_minor: 2500,
        currency: "USD".to_string(),
    }
}
