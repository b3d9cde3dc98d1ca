//! Remote operation adapters for NovaPay.
//!
//! Nothing here talks to a network. Each simulated operation waits out a fixed
//! latency and then applies the same deterministic rules a real backend would
//! be expected to honour for the demo account.

#![deny(unsafe_code)]

use async_trait::async_trait;
use chrono::Utc;
use novapay_core::confirmation::ConfirmationCode;
use novapay_core::flow::{FlowKind, Payment, Transfer};
use novapay_core::registration::check_verification_code;
use novapay_core::session::authenticate;
use novapay_core::statement::reference_statement;
use novapay_core::{
    CodeVerification, Credentials, LatencyProfile, LoginOutcome, NovaPayError, PaymentOrder,
    Receipt, RemoteOperation, RemoteOperations, StatementQuery, Transaction, TransferOrder,
    VerificationOutcome,
};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

async fn simulate_latency(operation: &'static str, delay: Duration) {
    debug!(operation, delay_ms = delay.as_millis() as u64, "simulating remote latency");
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Mock sign-in: any non-empty email/password pair yields the demo profile.
#[derive(Debug, Clone)]
pub struct SimulatedLogin {
    delay: Duration,
}

impl SimulatedLogin {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RemoteOperation for SimulatedLogin {
    type Request = Credentials;
    type Response = LoginOutcome;

    fn name(&self) -> &'static str {
        "simulated-login"
    }

    async fn execute(&self, request: Credentials) -> Result<LoginOutcome, NovaPayError> {
        simulate_latency(self.name(), self.delay).await;
        Ok(authenticate(&request))
    }
}

/// Email code check. Only the all-zero code is rejected.
#[derive(Debug, Clone)]
pub struct SimulatedEmailVerification {
    delay: Duration,
}

impl SimulatedEmailVerification {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RemoteOperation for SimulatedEmailVerification {
    type Request = CodeVerification;
    type Response = VerificationOutcome;

    fn name(&self) -> &'static str {
        "simulated-email-verification"
    }

    async fn execute(
        &self,
        request: CodeVerification,
    ) -> Result<VerificationOutcome, NovaPayError> {
        simulate_latency(self.name(), self.delay).await;
        let outcome = check_verification_code(&request.code);
        debug!(email = %request.email, ?outcome, "email code checked");
        Ok(outcome)
    }
}

/// SPEI transfer rail. Always settles and issues a `SPEI-` folio.
#[derive(Debug, Clone)]
pub struct SimulatedTransferRail {
    delay: Duration,
}

impl SimulatedTransferRail {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RemoteOperation for SimulatedTransferRail {
    type Request = TransferOrder;
    type Response = Receipt;

    fn name(&self) -> &'static str {
        "simulated-spei"
    }

    async fn execute(&self, request: TransferOrder) -> Result<Receipt, NovaPayError> {
        simulate_latency(self.name(), self.delay).await;
        let folio = ConfirmationCode::issue(Transfer::PREFIX);
        info!(folio = %folio, amount = %request.amount, "transfer settled");
        Ok(request.settle(folio, Utc::now()))
    }
}

/// Bill payment processor. Always pays and issues a `PAY-` folio.
#[derive(Debug, Clone)]
pub struct SimulatedBillPay {
    delay: Duration,
}

impl SimulatedBillPay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RemoteOperation for SimulatedBillPay {
    type Request = PaymentOrder;
    type Response = Receipt;

    fn name(&self) -> &'static str {
        "simulated-bill-pay"
    }

    async fn execute(&self, request: PaymentOrder) -> Result<Receipt, NovaPayError> {
        simulate_latency(self.name(), self.delay).await;
        let folio = ConfirmationCode::issue(Payment::PREFIX);
        info!(
            folio = %folio,
            service = request.service.display_name(),
            amount = %request.amount,
            "payment settled"
        );
        Ok(request.settle(folio, Utc::now()))
    }
}

/// Statement source returning the fixed February dataset for any account.
#[derive(Debug, Clone)]
pub struct SimulatedStatementSource {
    delay: Duration,
}

impl SimulatedStatementSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RemoteOperation for SimulatedStatementSource {
    type Request = StatementQuery;
    type Response = Vec<Transaction>;

    fn name(&self) -> &'static str {
        "simulated-statement"
    }

    async fn execute(&self, request: StatementQuery) -> Result<Vec<Transaction>, NovaPayError> {
        simulate_latency(self.name(), self.delay).await;
        debug!(account = %request.account_number, "statement served");
        Ok(reference_statement())
    }
}

/// Deterministic failing operation useful for outage drills.
pub struct UnavailableOperation<Req, Resp> {
    name: &'static str,
    reason: String,
    _marker: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> UnavailableOperation<Req, Resp> {
    pub fn new(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: reason.into(),
            _marker: PhantomData,
        }
    }
}

impl<Req, Resp> std::fmt::Debug for UnavailableOperation<Req, Resp> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnavailableOperation")
            .field("name", &self.name)
            .field("reason", &self.reason)
            .finish()
    }
}

#[async_trait]
impl<Req, Resp> RemoteOperation for UnavailableOperation<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    type Request = Req;
    type Response = Resp;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn execute(&self, _request: Req) -> Result<Resp, NovaPayError> {
        Err(NovaPayError::remote(self.name, self.reason.clone()))
    }
}

/// Wires every simulated operation with the delays from `latency`.
pub fn simulated_operations(latency: &LatencyProfile) -> RemoteOperations {
    RemoteOperations {
        login: Arc::new(SimulatedLogin::new(latency.login())),
        email_verification: Arc::new(SimulatedEmailVerification::new(
            latency.email_verification(),
        )),
        transfer: Arc::new(SimulatedTransferRail::new(latency.processing())),
        payment: Arc::new(SimulatedBillPay::new(latency.processing())),
        statement: Arc::new(SimulatedStatementSource::new(latency.statement_load())),
    }
}
