use serde::{Deserialize, Serialize};

/// Order and cardholder details supplied by the merchant for one checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingContext {
    pub order_ref: String,
    pub name: String,
    pub email: String,
    pub postal_code: String,
    /// Amount in the currency's minor unit.
    pub amount_minor: u64,
    pub currency: String,
}
