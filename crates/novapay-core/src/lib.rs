//! NovaPay core: the interaction state of a mobile banking prototype.
//!
//! Every screen is modeled as an explicit state machine, all network-looking work goes
//! through the [`RemoteOperation`] seam, and the single session value is owned by the
//! [`AppShell`] and injected into subordinate views through [`SessionContext`].

#![deny(unsafe_code)]

pub mod config;
pub mod confirmation;
pub mod dashboard;
pub mod error;
pub mod flow;
pub mod money;
pub mod registration;
pub mod remote;
pub mod session;
pub mod shell;
pub mod statement;
pub mod types;
pub mod validation;

mod task;

pub use config::{LatencyProfile, NovaPayConfig};
pub use confirmation::ConfirmationCode;
pub use dashboard::{Dashboard, DashboardView, Overlay, QuickAction};
pub use error::NovaPayError;
pub use flow::{
    FlowKind, FlowStage, ModalFlow, Payment, PaymentFlow, PaymentForm, Transfer, TransferFlow,
    TransferForm,
};
pub use money::Money;
pub use registration::{
    EmailVerificationState, RegistrationForm, RegistrationWizard, WizardEvent, WizardStep,
    WizardTarget,
};
pub use remote::{
    LoginOperation, PaymentOperation, RemoteOperation, RemoteOperations, StatementOperation,
    TransferOperation, VerificationOperation,
};
pub use session::{LoginForm, SessionContext, SessionStore};
pub use shell::{AppShell, AuthView, Screen, ScreenRouter};
pub use statement::{StatementScreen, StatementSummary};
pub use types::{
    CodeVerification, Credentials, LoginOutcome, PaymentOrder, Receipt, ReceiptKind, ServiceKind,
    Session, StatementQuery, Transaction, TransferOrder, TxKind, VerificationOutcome,
};
pub use validation::{FieldErrors, PasswordRule};
