use async_trait::async_trait;
use chrono::Utc;
use novapay_core::confirmation::ConfirmationCode;
use novapay_core::registration::{check_verification_code, RegistrationField};
use novapay_core::session::authenticate;
use novapay_core::statement::reference_statement;
use novapay_core::{
    AppShell, CodeVerification, Credentials, FlowKind, FlowStage, LoginOutcome, NovaPayError,
    PaymentOrder, Receipt, RemoteOperation, RemoteOperations, Screen, StatementOperation,
    StatementQuery, Transaction, Transfer, TransferOrder, VerificationOutcome, WizardStep,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct Login;

#[async_trait]
impl RemoteOperation for Login {
    type Request = Credentials;
    type Response = LoginOutcome;

    fn name(&self) -> &'static str {
        "login"
    }

    async fn execute(&self, request: Credentials) -> Result<LoginOutcome, NovaPayError> {
        Ok(authenticate(&request))
    }
}

struct Verifier;

#[async_trait]
impl RemoteOperation for Verifier {
    type Request = CodeVerification;
    type Response = VerificationOutcome;

    fn name(&self) -> &'static str {
        "verifier"
    }

    async fn execute(
        &self,
        request: CodeVerification,
    ) -> Result<VerificationOutcome, NovaPayError> {
        Ok(check_verification_code(&request.code))
    }
}

/// Settles after one second and counts completed settlements.
#[derive(Default)]
struct SlowRail {
    settled: AtomicUsize,
}

#[async_trait]
impl RemoteOperation for SlowRail {
    type Request = TransferOrder;
    type Response = Receipt;

    fn name(&self) -> &'static str {
        "slow-rail"
    }

    async fn execute(&self, request: TransferOrder) -> Result<Receipt, NovaPayError> {
        tokio::time::sleep(Duration::from_secs(1)).await;
        self.settled.fetch_add(1, Ordering::SeqCst);
        Ok(request.settle(ConfirmationCode::issue(Transfer::PREFIX), Utc::now()))
    }
}

struct DownBiller;

#[async_trait]
impl RemoteOperation for DownBiller {
    type Request = PaymentOrder;
    type Response = Receipt;

    fn name(&self) -> &'static str {
        "down-biller"
    }

    async fn execute(&self, _request: PaymentOrder) -> Result<Receipt, NovaPayError> {
        Err(NovaPayError::remote(self.name(), "biller offline"))
    }
}

struct Statements;

#[async_trait]
impl RemoteOperation for Statements {
    type Request = StatementQuery;
    type Response = Vec<Transaction>;

    fn name(&self) -> &'static str {
        "statements"
    }

    async fn execute(&self, _request: StatementQuery) -> Result<Vec<Transaction>, NovaPayError> {
        Ok(reference_statement())
    }
}

/// Serves the reference statement after 1.5 s and counts what it served.
#[derive(Default)]
struct SlowStatements {
    served: AtomicUsize,
}

#[async_trait]
impl RemoteOperation for SlowStatements {
    type Request = StatementQuery;
    type Response = Vec<Transaction>;

    fn name(&self) -> &'static str {
        "slow-statements"
    }

    async fn execute(&self, _request: StatementQuery) -> Result<Vec<Transaction>, NovaPayError> {
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        self.served.fetch_add(1, Ordering::SeqCst);
        Ok(reference_statement())
    }
}

fn operations(rail: Arc<SlowRail>, statement: StatementOperation) -> RemoteOperations {
    RemoteOperations {
        login: Arc::new(Login),
        email_verification: Arc::new(Verifier),
        transfer: rail,
        payment: Arc::new(DownBiller),
        statement,
    }
}

fn shell_with(rail: Arc<SlowRail>) -> AppShell {
    AppShell::with_operations(operations(rail, Arc::new(Statements)))
}

async fn sign_in(shell: &mut AppShell) {
    shell.login_form_mut().email = "ana@novapay.mx".to_string();
    shell.login_form_mut().password = "Abc12345".to_string();
    assert!(shell.submit_login().await.unwrap());
}

async fn signed_in(rail: Arc<SlowRail>) -> AppShell {
    let mut shell = shell_with(rail);
    sign_in(&mut shell).await;
    shell
}

#[tokio::test(start_paused = true)]
async fn logout_mid_transfer_discards_the_pending_settlement() {
    let rail = Arc::new(SlowRail::default());
    let mut shell = signed_in(Arc::clone(&rail)).await;

    let flow = shell.dashboard_mut().unwrap().open_transfer().unwrap();
    let form = flow.form_mut().unwrap();
    form.beneficiary = "Maria Lopez".to_string();
    form.clabe = "012180001234567891".to_string();
    form.amount = "250".to_string();
    flow.submit().unwrap();
    assert_eq!(flow.stage(), FlowStage::Processing);

    shell.logout().await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(rail.settled.load(Ordering::SeqCst), 0);
    assert_eq!(shell.screen().await, Screen::Login);
    assert!(shell.dashboard().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn transfer_completes_after_processing() {
    let rail = Arc::new(SlowRail::default());
    let mut shell = signed_in(Arc::clone(&rail)).await;

    let flow = shell.dashboard_mut().unwrap().open_transfer().unwrap();
    let form = flow.form_mut().unwrap();
    form.beneficiary = "Maria Lopez".to_string();
    form.clabe = "0121".to_string();
    form.amount = "1,000".to_string();
    let receipt = flow.submit_and_finish().await.unwrap().clone();

    assert_eq!(rail.settled.load(Ordering::SeqCst), 1);
    assert_eq!(receipt.status, "Completada");
    assert!(ConfirmationCode::is_well_formed(
        receipt.folio.as_str(),
        Transfer::PREFIX
    ));
}

#[tokio::test(start_paused = true)]
async fn leaving_statement_view_cancels_its_load() {
    let statements = Arc::new(SlowStatements::default());
    let mut shell = AppShell::with_operations(operations(
        Arc::new(SlowRail::default()),
        Arc::clone(&statements) as StatementOperation,
    ));
    sign_in(&mut shell).await;

    let dashboard = shell.dashboard_mut().unwrap();
    assert!(dashboard.show_statement().unwrap().is_loading());
    dashboard.show_home();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(statements.served.load(Ordering::SeqCst), 0);
    assert!(dashboard.statement_mut().is_none());

    dashboard.show_statement().unwrap().wait_ready().await.unwrap();
    assert_eq!(statements.served.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_payment_returns_to_form_with_data() {
    let mut shell = signed_in(Arc::new(SlowRail::default())).await;

    let flow = shell.dashboard_mut().unwrap().open_payment().unwrap();
    let form = flow.form_mut().unwrap();
    form.service = "cfe".to_string();
    form.reference = "123456".to_string();
    form.amount = "842".to_string();

    let err = flow.submit_and_finish().await.unwrap_err();
    assert!(matches!(err, NovaPayError::Remote { .. }));
    assert_eq!(flow.stage(), FlowStage::Form);
    assert_eq!(flow.form().reference, "123456");
    assert!(flow.last_error().is_some());
}

#[tokio::test]
async fn registration_then_login() {
    let mut shell = shell_with(Arc::new(SlowRail::default()));
    shell.show_register();

    let wizard = shell.registration_mut().unwrap();
    wizard.set_field(RegistrationField::FirstName, "Ana");
    wizard.set_field(RegistrationField::LastName, "Ruiz");
    wizard.set_field(RegistrationField::Email, "ana@novapay.mx");
    wizard.set_field(RegistrationField::Phone, "5512345678");
    wizard.next().unwrap();
    wizard.set_field(RegistrationField::Password, "Abc12345");
    wizard.set_field(RegistrationField::ConfirmPassword, "Abc12345");
    wizard.next().unwrap();
    wizard.send_code().unwrap();
    wizard.enter_code("123456");

    assert_eq!(shell.registration_verify().await.unwrap(), WizardStep::Success);
    assert_eq!(shell.registration_finish().unwrap(), Screen::Login);
    assert!(shell.registration().is_none());

    shell.login_form_mut().email = "ana@novapay.mx".to_string();
    shell.login_form_mut().password = "Abc12345".to_string();
    assert!(shell.submit_login().await.unwrap());
    assert_eq!(shell.screen().await, Screen::Dashboard);
}
