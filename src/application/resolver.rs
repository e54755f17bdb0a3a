use crate::domain::issuer::{Brand, CardType, IssuerMetadata, UNKNOWN};
use crate::domain::ports::IssuerLookupBox;
use crate::infrastructure::static_table::StaticBinTable;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Resolves issuer details for a prefix, degrading from the remote lookup
/// to the local table and finally to the brand heuristic. Never fails.
pub struct MetadataResolver {
    remote: Option<IssuerLookupBox>,
    table: StaticBinTable,
    timeout: Duration,
}

impl MetadataResolver {
    pub fn new(table: StaticBinTable, timeout: Duration) -> Self {
        Self {
            remote: None,
            table,
            timeout,
        }
    }

    pub fn with_remote(mut self, remote: IssuerLookupBox) -> Self {
        self.remote = Some(remote);
        self
    }

    pub async fn resolve(&self, prefix: &str) -> IssuerMetadata {
        if let Some(metadata) = self.resolve_remote(prefix).await {
            debug!(prefix, source = "remote", "issuer resolved");
            return metadata;
        }
        if let Some(metadata) = self.table.get(prefix) {
            debug!(prefix, source = "table", "issuer resolved");
            return metadata.clone();
        }
        debug!(prefix, source = "heuristic", "issuer resolved");
        IssuerMetadata::from_brand(Brand::from_prefix(prefix))
    }

    // One attempt only; any failure falls through to the table.
    async fn resolve_remote(&self, prefix: &str) -> Option<IssuerMetadata> {
        let remote = self.remote.as_ref()?;
        let response = match tokio::time::timeout(self.timeout, remote.lookup(prefix)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(prefix, error = %err, "issuer lookup failed");
                return None;
            }
            Err(_) => {
                warn!(prefix, timeout_ms = self.timeout.as_millis() as u64, "issuer lookup timed out");
                return None;
            }
        };
        if response.status != 200 {
            warn!(prefix, status = response.status, "issuer lookup returned non-200");
            return None;
        }
        let parsed = parse_lookup_body(prefix, &response.body);
        if parsed.is_none() {
            warn!(prefix, "issuer lookup body malformed");
        }
        parsed
    }
}

fn name_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    match body.get(key)? {
        Value::String(name) => Some(name.as_str()),
        nested => nested.get("name")?.as_str(),
    }
}

/// Accepts `{bank: {name}, country: {name}, type, scheme|brand}`; flat string
/// bank and country fields are tolerated. A body with none of those fields
/// is treated as malformed.
fn parse_lookup_body(prefix: &str, body: &Value) -> Option<IssuerMetadata> {
    if !body.is_object() {
        return None;
    }
    let bank = name_field(body, "bank");
    let country = name_field(body, "country");
    let card_type = body.get("type").and_then(Value::as_str);
    let brand = body
        .get("scheme")
        .or_else(|| body.get("brand"))
        .and_then(Value::as_str);
    if bank.is_none() && country.is_none() && card_type.is_none() && brand.is_none() {
        return None;
    }

    let brand = match brand.map(Brand::parse) {
        Some(Brand::Unknown) | None => Brand::from_prefix(prefix),
        Some(brand) => brand,
    };
    Some(IssuerMetadata {
        bank: bank.unwrap_or(UNKNOWN).to_string(),
        country: country.unwrap_or(UNKNOWN).to_string(),
        card_type: card_type.map(CardType::parse).unwrap_or_default(),
        brand,
    })
}
