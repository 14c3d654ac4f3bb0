//! Payment entity model

use crate::entities::dealer::Dealer;
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;
use validator::Validate;

/// Settlement status of a payment
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

crate::impl_wire_enum!(PaymentStatus, "payment status", {
    Pending => "PENDING",
    Success => "SUCCESS",
    Failed => "FAILED",
});

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// How the dealer paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Upi,
    BankTransfer,
    NetBanking,
    Wallet,
}

crate::impl_wire_enum!(PaymentMethod, "payment method", {
    Card => "CARD",
    Upi => "UPI",
    BankTransfer => "BANK_TRANSFER",
    NetBanking => "NET_BANKING",
    Wallet => "WALLET",
});

/// A subscription payment made by a dealer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Assigned once at creation; unique across payments
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::impl_entity!(
    Payment,
    "payment",
    "payments",
    unique: ["transaction_id"],
    fields: [dealer_id, amount, method, status, transaction_id]
);

impl Payment {
    /// A new PENDING payment with a fresh transaction id
    pub fn pending(dealer_id: Uuid, amount: Decimal, method: PaymentMethod) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            dealer_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            transaction_id: next_transaction_id(),
            created_at: now,
            updated_at: now,
        }
    }
}

static TRANSACTION_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a transaction id: `TXN<unix-millis>-<4-digit sequence><4 hex random>`
///
/// The per-process sequence keeps ids unique for up to 10 000 ids issued in
/// the same millisecond; the random suffix separates processes.
pub fn next_transaction_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let sequence = TRANSACTION_SEQUENCE.fetch_add(1, Ordering::Relaxed) % 10_000;
    let salt: u16 = rand::thread_rng().r#gen();
    format!("TXN{millis}-{sequence:04}{salt:04X}")
}

/// Body of `POST /payments`
///
/// The amount is checked by the settlement engine, not here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub dealer_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
}

/// A payment as returned by the API, joined with its dealer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Payment,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dealer_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dealer_email: Option<String>,
}

impl PaymentView {
    pub fn new(payment: Payment, dealer: Option<&Dealer>) -> Self {
        Self {
            payment,
            dealer_name: dealer.map(|d| d.name.clone()),
            dealer_email: dealer.map(|d| d.email.clone()),
        }
    }
}
