use super::card::CardDigest;
use super::issuer::IssuerMetadata;
use super::outcome::{OutcomeStatus, SettlementOutcome};
use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// Steps of a single run. Ordered: a run only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Pending,
    Validating,
    ResolvingMetadata,
    Tokenizing,
    Settling,
    Classified,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageEvent {
    pub stage: Stage,
    pub at: DateTime<Utc>,
    pub note: String,
}

/// Fixed-capacity log of stage transitions; the oldest entry is dropped
/// once full.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLog {
    capacity: usize,
    events: VecDeque<StageEvent>,
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, stage: Stage, note: impl Into<String>) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(StageEvent {
            stage,
            at: Utc::now(),
            note: note.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&StageEvent> {
        self.events.back()
    }

    pub fn find(&self, stage: Stage) -> Option<&StageEvent> {
        self.events.iter().find(|e| e.stage == stage)
    }
}

impl Serialize for EventLog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.events.iter())
    }
}

/// Tracks the current stage of a run and refuses to go backwards.
#[derive(Debug)]
pub struct RunState {
    stage: Stage,
    log: EventLog,
}

impl RunState {
    pub fn new(log_capacity: usize) -> Self {
        let mut log = EventLog::with_capacity(log_capacity);
        log.push(Stage::Pending, "run created");
        Self {
            stage: Stage::Pending,
            log,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn advance(&mut self, to: Stage, note: impl Into<String>) -> Result<(), PipelineError> {
        if to <= self.stage {
            return Err(PipelineError::IllegalTransition {
                from: self.stage,
                to,
            });
        }
        self.stage = to;
        self.log.push(to, note);
        Ok(())
    }

    /// Jumps straight to `Classified` after a fault; a no-op once terminal.
    pub fn abort(&mut self, note: impl Into<String>) {
        if self.stage != Stage::Classified {
            self.stage = Stage::Classified;
            self.log.push(Stage::Classified, note);
        }
    }

    pub fn into_log(self) -> EventLog {
        self.log
    }
}

/// Result of one pipeline run, handed to the caller and not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    pub digest: CardDigest,
    pub expiry: Option<String>,
    pub metadata: IssuerMetadata,
    pub outcome: SettlementOutcome,
    pub timestamp: DateTime<Utc>,
    pub events: EventLog,
}

impl VerificationReport {
    pub fn status(&self) -> OutcomeStatus {
        self.outcome.status
    }

    /// HTTP status a serving layer should answer with.
    pub fn http_status(&self) -> u16 {
        self.outcome.http_status
    }
}

#[derive(Serialize)]
struct CardInfo<'a> {
    bin: &'a str,
    brand: super::issuer::Brand,
    bank: &'a str,
    country: &'a str,
    #[serde(rename = "type")]
    card_type: super::issuer::CardType,
    first6: &'a str,
    last4: &'a str,
    expiry: Option<&'a str>,
}

#[derive(Serialize)]
struct TransactionInfo<'a> {
    status: OutcomeStatus,
    http_status: u16,
    message: &'a str,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct ReportView<'a> {
    card_info: CardInfo<'a>,
    transaction: TransactionInfo<'a>,
    events: &'a EventLog,
}

impl Serialize for VerificationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ReportView {
            card_info: CardInfo {
                bin: &self.digest.first6,
                brand: self.metadata.brand,
                bank: &self.metadata.bank,
                country: &self.metadata.country,
                card_type: self.metadata.card_type,
                first6: &self.digest.first6,
                last4: &self.digest.last4,
                expiry: self.expiry.as_deref(),
            },
            transaction: TransactionInfo {
                status: self.outcome.status,
                http_status: self.outcome.http_status,
                message: &self.outcome.message,
                timestamp: self.timestamp,
            },
            events: &self.events,
        }
        .serialize(serializer)
    }
}
