use super::gateway::{SettlementClient, TokenizationClient};
use super::resolver::MetadataResolver;
use crate::config::PipelineConfig;
use crate::domain::billing::BillingContext;
use crate::domain::card::{CardCredentials, CardDigest, validate, validate_prefix};
use crate::domain::issuer::{Brand, IssuerMetadata};
use crate::domain::outcome::{OutcomeStatus, SettlementOutcome, classify, default_message};
use crate::domain::report::{RunState, Stage, VerificationReport};
use crate::error::{GatewayError, Result, ValidationError};
use chrono::Utc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

/// Runs one card through validate, resolve, tokenize, settle and classify.
///
/// Owns its collaborators; nothing is shared between concurrent runs except
/// these read-only handles.
pub struct VerificationOrchestrator {
    config: PipelineConfig,
    resolver: MetadataResolver,
    tokenizer: TokenizationClient,
    settlement: SettlementClient,
}

struct Completed {
    expiry: Option<String>,
    metadata: IssuerMetadata,
    outcome: SettlementOutcome,
}

impl VerificationOrchestrator {
    pub fn new(
        config: PipelineConfig,
        resolver: MetadataResolver,
        tokenizer: TokenizationClient,
        settlement: SettlementClient,
    ) -> Self {
        Self {
            config,
            resolver,
            tokenizer,
            settlement,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Always produces a report. Faults inside the run become a redacted 500
    /// outcome; the detail goes to the log only.
    pub async fn verify(
        &self,
        credentials: CardCredentials,
        billing: &BillingContext,
    ) -> VerificationReport {
        let digest = CardDigest::of(&credentials.cc);
        let span = info_span!(
            "verify",
            run_id = %Uuid::new_v4(),
            first6 = %digest.first6,
            last4 = %digest.last4,
            order_ref = %billing.order_ref,
        );

        async move {
            let mut state = RunState::new(self.config.event_log_capacity);
            let completed = match self.run(credentials, billing, &digest, &mut state).await {
                Ok(completed) => completed,
                Err(err) => {
                    error!(error = %err, stage = ?state.stage(), "internal fault");
                    state.abort("internal fault");
                    Completed {
                        expiry: None,
                        metadata: IssuerMetadata::from_brand(Brand::from_prefix(&digest.first6)),
                        outcome: SettlementOutcome::new(
                            OutcomeStatus::TransportError,
                            500,
                            INTERNAL_ERROR_MESSAGE,
                        ),
                    }
                }
            };
            info!(
                status = ?completed.outcome.status,
                http_status = completed.outcome.http_status,
                "run classified"
            );
            VerificationReport {
                digest,
                expiry: completed.expiry,
                metadata: completed.metadata,
                outcome: completed.outcome,
                timestamp: Utc::now(),
                events: state.into_log(),
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        credentials: CardCredentials,
        billing: &BillingContext,
        digest: &CardDigest,
        state: &mut RunState,
    ) -> Result<Completed> {
        state.advance(Stage::Validating, "checking card fields")?;
        let normalized = match validate(&credentials) {
            Ok(normalized) => normalized,
            Err(err) => {
                warn!(field = %err.field, reason = err.reason, "validation failed");
                state.advance(Stage::Classified, err.to_string())?;
                return Ok(Completed {
                    expiry: None,
                    metadata: IssuerMetadata::from_brand(Brand::from_prefix(&digest.first6)),
                    outcome: SettlementOutcome::new(OutcomeStatus::Declined, 400, err.to_string()),
                });
            }
        };
        drop(credentials);
        let expiry = Some(normalized.expiry());

        state.advance(Stage::ResolvingMetadata, normalized.prefix().to_string())?;
        state.advance(Stage::Tokenizing, "requesting token")?;
        let (metadata, tokenized) = tokio::join!(
            self.resolver.resolve(normalized.prefix()),
            self.tokenizer.tokenize(&normalized, billing),
        );
        drop(normalized);

        let token = match tokenized {
            Ok(result) => result.token,
            Err(err) => {
                let outcome = gateway_outcome(&err);
                state.advance(Stage::Classified, format!("tokenization failed: {err}"))?;
                return Ok(Completed {
                    expiry,
                    metadata,
                    outcome,
                });
            }
        };

        let idempotency_key = Uuid::new_v4().to_string();
        state.advance(Stage::Settling, format!("idempotency key {idempotency_key}"))?;
        let outcome = match self.settlement.settle(&token, billing, &idempotency_key).await {
            Ok(outcome) => outcome,
            Err(err) => gateway_outcome(&err),
        };
        state.advance(Stage::Classified, format!("{:?}", outcome.status))?;

        Ok(Completed {
            expiry,
            metadata,
            outcome,
        })
    }

    /// Issuer lookup alone; no token or settlement calls are made.
    pub async fn lookup_issuer(
        &self,
        prefix: &str,
    ) -> std::result::Result<IssuerMetadata, ValidationError> {
        let prefix = validate_prefix(prefix)?;
        Ok(self.resolver.resolve(prefix).await)
    }
}

/// The single place gateway failures become client-facing outcomes.
fn gateway_outcome(err: &GatewayError) -> SettlementOutcome {
    match err {
        GatewayError::Timeout => {
            warn!("gateway timed out");
            SettlementOutcome::new(OutcomeStatus::Retryable, 408, "Gateway timed out")
        }
        GatewayError::Rejected { status, body } => {
            let outcome_status = match classify(*status) {
                s @ (OutcomeStatus::Retryable | OutcomeStatus::TransportError) => s,
                _ => OutcomeStatus::Declined,
            };
            let message = body
                .pointer("/error/message")
                .or_else(|| body.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or(default_message(outcome_status));
            warn!(status = *status, "gateway rejected request");
            SettlementOutcome {
                status: outcome_status,
                http_status: *status,
                message: message.to_string(),
                raw_response: body.clone(),
            }
        }
        GatewayError::ProtocolViolation(detail) => {
            error!(detail = %detail, "gateway protocol violation");
            SettlementOutcome::new(OutcomeStatus::TransportError, 500, INTERNAL_ERROR_MESSAGE)
        }
        GatewayError::Unavailable(detail) => {
            error!(detail = %detail, "gateway unavailable");
            SettlementOutcome::new(OutcomeStatus::TransportError, 502, "Processor unreachable")
        }
    }
}
