use crate::confirmation::ConfirmationCode;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated user profile. Its presence is what unlocks the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub email: String,
    /// Masked account identifier, e.g. `****-****-****-4892`.
    pub account_number: String,
    pub balance: Money,
}

/// Login input. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginOutcome {
    Authenticated(Session),
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeVerification {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    Accepted,
    Rejected,
}

/// Payable services offered by the payment overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Cfe,
    Telmex,
    Agua,
    Gas,
    Internet,
    Celular,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::Cfe,
        ServiceKind::Telmex,
        ServiceKind::Agua,
        ServiceKind::Gas,
        ServiceKind::Internet,
        ServiceKind::Celular,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Cfe => "cfe",
            Self::Telmex => "telmex",
            Self::Agua => "agua",
            Self::Gas => "gas",
            Self::Internet => "internet",
            Self::Celular => "celular",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Cfe => "CFE - Luz",
            Self::Telmex => "Telmex",
            Self::Agua => "Agua Potable",
            Self::Gas => "Gas Natural",
            Self::Internet => "Totalplay",
            Self::Celular => "Telcel Recarga",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|service| service.id() == id)
    }
}

/// Validated SPEI transfer ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOrder {
    pub beneficiary: String,
    pub clabe: String,
    pub amount: Money,
    pub concept: Option<String>,
}

/// Validated service payment ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub service: ServiceKind,
    pub reference: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptKind {
    Transfer,
    Payment,
}

/// Proof-of-submission shown on the success step of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub folio: ConfirmationCode,
    pub kind: ReceiptKind,
    pub amount: Money,
    /// Beneficiary name or service name.
    pub counterparty: String,
    /// Masked CLABE or service reference number.
    pub reference: String,
    pub concept: Option<String>,
    pub status: String,
    pub issued_at: DateTime<Utc>,
}

/// Receipt rendering of a CLABE: `****` followed by its last four characters.
pub fn mask_clabe(clabe: &str) -> String {
    let count = clabe.chars().count();
    let tail: String = clabe.chars().skip(count.saturating_sub(4)).collect();
    format!("****{tail}")
}

impl TransferOrder {
    pub fn settle(&self, folio: ConfirmationCode, issued_at: DateTime<Utc>) -> Receipt {
        Receipt {
            folio,
            kind: ReceiptKind::Transfer,
            amount: self.amount,
            counterparty: self.beneficiary.clone(),
            reference: mask_clabe(&self.clabe),
            concept: self.concept.clone(),
            status: "Completada".to_string(),
            issued_at,
        }
    }
}

impl PaymentOrder {
    pub fn settle(&self, folio: ConfirmationCode, issued_at: DateTime<Utc>) -> Receipt {
        Receipt {
            folio,
            kind: ReceiptKind::Payment,
            amount: self.amount,
            counterparty: self.service.display_name().to_string(),
            reference: self.reference.clone(),
            concept: None,
            status: "Pagado".to_string(),
            issued_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementQuery {
    pub account_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Credit,
    Debit,
}

/// Read-only movement record. Credits carry positive amounts, debits negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u32,
    pub name: String,
    pub amount: Money,
    pub date: String,
    pub kind: TxKind,
    pub category: String,
}

impl Transaction {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        amount_minor: i64,
        date: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let kind = if amount_minor < 0 {
            TxKind::Debit
        } else {
            TxKind::Credit
        };
        Self {
            id,
            name: name.into(),
            amount: Money::from_minor(amount_minor),
            date: date.into(),
            kind,
            category: category.into(),
        }
    }
}
