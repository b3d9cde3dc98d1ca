use crate::error::NovaPayError;
use crate::types::{
    CodeVerification, Credentials, LoginOutcome, PaymentOrder, Receipt, StatementQuery,
    Transaction, TransferOrder, VerificationOutcome,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Asynchronous capability standing in for a backend call.
///
/// Production implementations would wrap HTTP/RPC clients; the adapters crate provides
/// fixed-latency simulations and tests provide deterministic fakes.
#[async_trait]
pub trait RemoteOperation: Send + Sync {
    type Request: Send + 'static;
    type Response: Send + 'static;

    fn name(&self) -> &'static str;

    async fn execute(&self, request: Self::Request) -> Result<Self::Response, NovaPayError>;
}

pub type LoginOperation =
    Arc<dyn RemoteOperation<Request = Credentials, Response = LoginOutcome>>;
pub type VerificationOperation =
    Arc<dyn RemoteOperation<Request = CodeVerification, Response = VerificationOutcome>>;
pub type TransferOperation = Arc<dyn RemoteOperation<Request = TransferOrder, Response = Receipt>>;
pub type PaymentOperation = Arc<dyn RemoteOperation<Request = PaymentOrder, Response = Receipt>>;
pub type StatementOperation =
    Arc<dyn RemoteOperation<Request = StatementQuery, Response = Vec<Transaction>>>;

/// Every backend capability the application shell hands down to its screens.
#[derive(Clone)]
pub struct RemoteOperations {
    pub login: LoginOperation,
    pub email_verification: VerificationOperation,
    pub transfer: TransferOperation,
    pub payment: PaymentOperation,
    pub statement: StatementOperation,
}

impl std::fmt::Debug for RemoteOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteOperations")
            .field("login", &self.login.name())
            .field("email_verification", &self.email_verification.name())
            .field("transfer", &self.transfer.name())
            .field("payment", &self.payment.name())
            .field("statement", &self.statement.name())
            .finish()
    }
}
