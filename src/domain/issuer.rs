use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    Credit,
    Debit,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CardType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "CREDIT" => CardType::Credit,
            "DEBIT" => CardType::Debit,
            _ => CardType::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Brand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Diners,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Brand {
    /// Maps a network name as reported by a lookup source.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "VISA" => Brand::Visa,
            "MASTERCARD" => Brand::Mastercard,
            "AMEX" | "AMERICAN EXPRESS" => Brand::Amex,
            "DISCOVER" => Brand::Discover,
            "DINERS" | "DINERS CLUB" => Brand::Diners,
            _ => Brand::Unknown,
        }
    }

    /// Derives the network from the leading digits of a card number or prefix.
    pub fn from_prefix(digits: &str) -> Self {
        let lead = |n: usize| digits.get(..n).and_then(|s| s.parse::<u32>().ok());
        if digits.starts_with('4') {
            Brand::Visa
        } else if matches!(lead(2), Some(51..=55)) {
            Brand::Mastercard
        } else if matches!(lead(2), Some(34 | 37)) {
            Brand::Amex
        } else if digits.starts_with("6011") {
            Brand::Discover
        } else if matches!(lead(3), Some(300..=305)) {
            Brand::Diners
        } else {
            Brand::Unknown
        }
    }
}

/// Issuer details for a six-digit prefix. Built once by the resolver and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerMetadata {
    pub bank: String,
    pub country: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub brand: Brand,
}

impl IssuerMetadata {
    /// Only the brand is known; everything else is [`UNKNOWN`].
    pub fn from_brand(brand: Brand) -> Self {
        Self {
            bank: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            card_type: CardType::Unknown,
            brand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_heuristic() {
        assert_eq!(Brand::from_prefix("411111"), Brand::Visa);
        assert_eq!(Brand::from_prefix("510510"), Brand::Mastercard);
        assert_eq!(Brand::from_prefix("555555"), Brand::Mastercard);
        assert_eq!(Brand::from_prefix("560000"), Brand::Unknown);
        assert_eq!(Brand::from_prefix("341111"), Brand::Amex);
        assert_eq!(Brand::from_prefix("371449"), Brand::Amex);
        assert_eq!(Brand::from_prefix("601111"), Brand::Discover);
        assert_eq!(Brand::from_prefix("601211"), Brand::Unknown);
        assert_eq!(Brand::from_prefix("300000"), Brand::Diners);
        assert_eq!(Brand::from_prefix("305999"), Brand::Diners);
        assert_eq!(Brand::from_prefix("306000"), Brand::Unknown);
        assert_eq!(Brand::from_prefix(""), Brand::Unknown);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Brand::parse("visa"), Brand::Visa);
        assert_eq!(Brand::parse("American Express"), Brand::Amex);
        assert_eq!(Brand::parse("unionpay"), Brand::Unknown);
        assert_eq!(CardType::parse("debit"), CardType::Debit);
        assert_eq!(CardType::parse("prepaid"), CardType::Unknown);
    }

    #[test]
    fn test_metadata_serializes_uppercase() {
        let meta = IssuerMetadata::from_brand(Brand::Mastercard);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["brand"], "MASTERCARD");
        assert_eq!(json["type"], "UNKNOWN");
        assert_eq!(json["bank"], "Unknown");
    }
}
