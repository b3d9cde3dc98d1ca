use novapay_adapters::{simulated_operations, UnavailableOperation};
use novapay_core::registration::{RegistrationField, VERIFICATION_FAILED};
use novapay_core::statement::StatementState;
use novapay_core::{
    AppShell, CodeVerification, EmailVerificationState, LatencyProfile, NovaPayError,
    RegistrationWizard, StatementOperation, StatementQuery, StatementScreen, Transaction,
    VerificationOperation, VerificationOutcome, WizardStep,
};
use std::sync::Arc;

fn verifier_outage() -> VerificationOperation {
    Arc::new(UnavailableOperation::<CodeVerification, VerificationOutcome>::new(
        "verifier-outage",
        "mail service down",
    ))
}

fn statement_outage() -> StatementOperation {
    Arc::new(UnavailableOperation::<StatementQuery, Vec<Transaction>>::new(
        "statement-outage",
        "core banking down",
    ))
}

fn wizard_at_verification() -> RegistrationWizard {
    let mut wizard = RegistrationWizard::new();
    wizard.set_field(RegistrationField::FirstName, "Ana");
    wizard.set_field(RegistrationField::LastName, "Ruiz");
    wizard.set_field(RegistrationField::Email, "ana@novapay.mx");
    wizard.set_field(RegistrationField::Phone, "5512345678");
    wizard.next().unwrap();
    wizard.set_field(RegistrationField::Password, "Abc12345");
    wizard.set_field(RegistrationField::ConfirmPassword, "Abc12345");
    wizard.next().unwrap();
    wizard.send_code().unwrap();
    wizard.enter_code("482913");
    wizard
}

#[tokio::test]
async fn verification_outage_keeps_wizard_on_code_step() {
    let mut wizard = wizard_at_verification();

    let err = wizard.verify(&verifier_outage()).await.unwrap_err();
    assert!(matches!(
        err,
        NovaPayError::Remote { ref operation, .. } if operation == "verifier-outage"
    ));
    assert_eq!(wizard.step(), WizardStep::EmailVerification);
    assert_eq!(
        wizard.verification(),
        &EmailVerificationState::Error(VERIFICATION_FAILED.to_string())
    );

    let healthy = simulated_operations(&LatencyProfile::instant());
    assert_eq!(
        wizard.verify(&healthy.email_verification).await.unwrap(),
        WizardStep::Success
    );
}

#[tokio::test]
async fn statement_outage_moves_screen_to_failed() {
    let mut screen = StatementScreen::open(&statement_outage(), "****-****-****-4892");
    assert!(screen.is_loading());

    assert!(screen.wait_ready().await.is_err());
    assert!(matches!(
        screen.state(),
        StatementState::Failed(message) if message.contains("core banking down")
    ));
    assert!(screen.transactions().is_empty());
    assert!(screen.summary().is_none());
}

#[tokio::test]
async fn shell_survives_statement_outage() {
    let mut operations = simulated_operations(&LatencyProfile::instant());
    operations.statement = statement_outage();
    let mut shell = AppShell::with_operations(operations);
    shell.login_form_mut().email = "ana@novapay.mx".to_string();
    shell.login_form_mut().password = "Abc12345".to_string();
    assert!(shell.submit_login().await.unwrap());

    let dashboard = shell.dashboard_mut().unwrap();
    assert!(dashboard.show_statement().unwrap().wait_ready().await.is_err());
    dashboard.show_home();
    assert!(dashboard.open_transfer().is_ok());
}
