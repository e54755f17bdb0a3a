use crate::domain::issuer::{Brand, CardType, IssuerMetadata};
use crate::error::Result;
use std::collections::HashMap;
use std::io::Read;

/// Local issuer table keyed by six-digit prefix.
///
/// Used as the first fallback when the remote lookup is unreachable or
/// answers with something unusable.
#[derive(Debug, Default, Clone)]
pub struct StaticBinTable {
    entries: HashMap<String, IssuerMetadata>,
}

impl StaticBinTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A small table of well-known network test prefixes.
    pub fn builtin() -> Self {
        let rows = [
            ("411111", "Test Bank Visa", "United States", CardType::Credit, Brand::Visa),
            ("401288", "Test Bank Visa", "United States", CardType::Credit, Brand::Visa),
            ("555555", "Test Bank Mastercard", "United States", CardType::Credit, Brand::Mastercard),
            ("510510", "Test Bank Mastercard", "United States", CardType::Debit, Brand::Mastercard),
            ("371449", "American Express", "United States", CardType::Credit, Brand::Amex),
            ("601111", "Discover", "United States", CardType::Credit, Brand::Discover),
            ("305693", "Diners Club", "United States", CardType::Credit, Brand::Diners),
        ];
        let mut table = Self::new();
        for (prefix, bank, country, card_type, brand) in rows {
            table.insert(
                prefix,
                IssuerMetadata {
                    bank: bank.to_string(),
                    country: country.to_string(),
                    card_type,
                    brand,
                },
            );
        }
        table
    }

    /// Loads a JSON object mapping prefixes to metadata.
    pub fn from_json<R: Read>(source: R) -> Result<Self> {
        let entries: HashMap<String, IssuerMetadata> = serde_json::from_reader(source)?;
        Ok(Self { entries })
    }

    pub fn insert(&mut self, prefix: impl Into<String>, metadata: IssuerMetadata) {
        self.entries.insert(prefix.into(), metadata);
    }

    pub fn get(&self, prefix: &str) -> Option<&IssuerMetadata> {
        self.entries.get(prefix)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
