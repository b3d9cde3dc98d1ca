//! Four-step sign-up wizard: personal data, password, email verification, success.
//!
//! Step changes go through [`transition`], a pure table over `(step, event)`. The wizard
//! only feeds it an event after the corresponding validation or verification passed, so
//! no code path can jump to a step the table does not name.

use crate::error::NovaPayError;
use crate::remote::VerificationOperation;
use crate::types::{CodeVerification, VerificationOutcome};
use crate::validation::{
    is_blank, is_valid_email, is_valid_phone, password_checklist, password_meets_all_rules,
    FieldErrors, PasswordRule, INVALID_EMAIL, INVALID_PHONE, PASSWORD_MISMATCH, REQUIRED,
    WEAK_PASSWORD,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const TOTAL_STEPS: usize = 4;
pub const VERIFICATION_CODE_LEN: usize = 6;
/// The one code the simulated verifier refuses.
pub const VERIFICATION_FAILURE_CODE: &str = "000000";
pub const VERIFICATION_FAILED: &str = "Codigo incorrecto. Intenta de nuevo.";

/// Simulated verifier rule: every code except [`VERIFICATION_FAILURE_CODE`] is accepted.
pub fn check_verification_code(code: &str) -> VerificationOutcome {
    if code == VERIFICATION_FAILURE_CODE {
        VerificationOutcome::Rejected
    } else {
        VerificationOutcome::Accepted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PersonalData,
    Password,
    EmailVerification,
    Success,
}

impl WizardStep {
    pub const ALL: [WizardStep; TOTAL_STEPS] = [
        WizardStep::PersonalData,
        WizardStep::Password,
        WizardStep::EmailVerification,
        WizardStep::Success,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::PersonalData => 0,
            Self::Password => 1,
            Self::EmailVerification => 2,
            Self::Success => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PersonalData => "Datos Personales",
            Self::Password => "Contrasena",
            Self::EmailVerification => "Verificar Email",
            Self::Success => "Cuenta Creada",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PersonalData => "personal_data",
            Self::Password => "password",
            Self::EmailVerification => "email_verification",
            Self::Success => "success",
        }
    }

    /// Fraction of the progress bar filled at this step.
    pub fn progress(self) -> f32 {
        (self.index() + 1) as f32 / TOTAL_STEPS as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardEvent {
    /// Current step validated.
    Advance,
    Back,
    /// Email code accepted by the verifier.
    CodeAccepted,
    /// "Ir al Inicio de Sesion" on the success screen.
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardTarget {
    Step(WizardStep),
    /// Leave the wizard and return to the login screen.
    Exit,
}

/// Transition table. `None` marks an illegal `(step, event)` pair.
pub fn transition(step: WizardStep, event: WizardEvent) -> Option<WizardTarget> {
    use WizardEvent::*;
    use WizardStep::*;

    match (step, event) {
        (PersonalData, Advance) => Some(WizardTarget::Step(Password)),
        (Password, Advance) => Some(WizardTarget::Step(EmailVerification)),
        (EmailVerification, CodeAccepted) => Some(WizardTarget::Step(Success)),
        (PersonalData, Back) => Some(WizardTarget::Exit),
        (Password, Back) => Some(WizardTarget::Step(PersonalData)),
        (EmailVerification, Back) => Some(WizardTarget::Step(Password)),
        (Success, Finish) => Some(WizardTarget::Exit),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum EmailVerificationState {
    NotSent,
    Sent,
    Verifying,
    Error(String),
}

/// Editable registration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationField {
    FirstName,
    LastName,
    Email,
    Phone,
    Password,
    ConfirmPassword,
}

impl RegistrationField {
    pub const ALL: [RegistrationField; 6] = [
        RegistrationField::FirstName,
        RegistrationField::LastName,
        RegistrationField::Email,
        RegistrationField::Phone,
        RegistrationField::Password,
        RegistrationField::ConfirmPassword,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == raw || field.name().replace('_', "-") == raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn get(&self, field: RegistrationField) -> &str {
        match field {
            RegistrationField::FirstName => &self.first_name,
            RegistrationField::LastName => &self.last_name,
            RegistrationField::Email => &self.email,
            RegistrationField::Phone => &self.phone,
            RegistrationField::Password => &self.password,
            RegistrationField::ConfirmPassword => &self.confirm_password,
        }
    }

    fn slot(&mut self, field: RegistrationField) -> &mut String {
        match field {
            RegistrationField::FirstName => &mut self.first_name,
            RegistrationField::LastName => &mut self.last_name,
            RegistrationField::Email => &mut self.email,
            RegistrationField::Phone => &mut self.phone,
            RegistrationField::Password => &mut self.password,
            RegistrationField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    /// Validation for the personal-data slice (step 0).
    pub fn validate_personal_data(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.first_name) {
            errors.insert(RegistrationField::FirstName.name(), REQUIRED);
        }
        if is_blank(&self.last_name) {
            errors.insert(RegistrationField::LastName.name(), REQUIRED);
        }
        if is_blank(&self.email) {
            errors.insert(RegistrationField::Email.name(), REQUIRED);
        } else if !is_valid_email(&self.email) {
            errors.insert(RegistrationField::Email.name(), INVALID_EMAIL);
        }
        if is_blank(&self.phone) {
            errors.insert(RegistrationField::Phone.name(), REQUIRED);
        } else if !is_valid_phone(&self.phone) {
            errors.insert(RegistrationField::Phone.name(), INVALID_PHONE);
        }
        errors
    }

    /// Validation for the password slice (step 1).
    pub fn validate_password(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.password.is_empty() {
            errors.insert(RegistrationField::Password.name(), REQUIRED);
        } else if !password_meets_all_rules(&self.password) {
            errors.insert(RegistrationField::Password.name(), WEAK_PASSWORD);
        }
        if self.confirm_password.is_empty() {
            errors.insert(RegistrationField::ConfirmPassword.name(), REQUIRED);
        } else if self.confirm_password != self.password {
            errors.insert(RegistrationField::ConfirmPassword.name(), PASSWORD_MISMATCH);
        }
        errors
    }
}

/// Sign-up wizard state. Nothing here outlives the wizard; exiting discards the form.
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    step: WizardStep,
    form: RegistrationForm,
    errors: FieldErrors,
    code: String,
    verification: EmailVerificationState,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::PersonalData,
            form: RegistrationForm::default(),
            errors: FieldErrors::new(),
            code: String::new(),
            verification: EmailVerificationState::NotSent,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn progress(&self) -> f32 {
        self.step.progress()
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn verification(&self) -> &EmailVerificationState {
        &self.verification
    }

    pub fn password_checklist(&self) -> Vec<(PasswordRule, bool)> {
        password_checklist(&self.form.password)
    }

    /// Updates one field and clears any error shown for it.
    pub fn set_field(&mut self, field: RegistrationField, value: impl Into<String>) {
        *self.form.slot(field) = value.into();
        self.errors.remove(field.name());
    }

    /// Validates the current slice and advances on success.
    ///
    /// On failure the per-field errors are kept on the wizard and returned.
    pub fn next(&mut self) -> Result<WizardStep, NovaPayError> {
        let errors = match self.step {
            WizardStep::PersonalData => self.form.validate_personal_data(),
            WizardStep::Password => self.form.validate_password(),
            other => {
                return Err(NovaPayError::InvalidTransition(format!(
                    "cannot advance from '{}' with next",
                    other.name()
                )))
            }
        };

        if !errors.is_empty() {
            debug!(step = self.step.name(), errors = %errors, "step validation failed");
            self.errors = errors.clone();
            return Err(NovaPayError::Validation(errors));
        }

        self.errors.clear();
        self.apply(WizardEvent::Advance)?;
        Ok(self.step)
    }

    /// Goes one step back. From the first step this yields [`WizardTarget::Exit`].
    pub fn back(&mut self) -> Result<WizardTarget, NovaPayError> {
        let target = self.apply(WizardEvent::Back)?;
        if let EmailVerificationState::Error(_) = self.verification {
            self.verification = EmailVerificationState::Sent;
        }
        Ok(target)
    }

    /// Leaves the success screen for the login screen.
    pub fn finish(&mut self) -> Result<WizardTarget, NovaPayError> {
        self.apply(WizardEvent::Finish)
    }

    /// Simulated "send code": no delivery happens, the code input simply unlocks.
    /// Calling it again acts as a resend.
    pub fn send_code(&mut self) -> Result<(), NovaPayError> {
        self.require_step(WizardStep::EmailVerification)?;
        if self.verification == EmailVerificationState::Verifying {
            return Err(NovaPayError::InvalidTransition(
                "verification already in progress".to_string(),
            ));
        }
        info!(email = %self.form.email, "verification code sent");
        self.verification = EmailVerificationState::Sent;
        Ok(())
    }

    /// Keeps only digits, caps at six, and clears a previous verification error.
    pub fn enter_code(&mut self, raw: &str) {
        self.code = raw
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(VERIFICATION_CODE_LEN)
            .collect();
        if let EmailVerificationState::Error(_) = self.verification {
            self.verification = EmailVerificationState::Sent;
        }
    }

    pub fn can_verify(&self) -> bool {
        self.step == WizardStep::EmailVerification
            && self.code.len() == VERIFICATION_CODE_LEN
            && matches!(
                self.verification,
                EmailVerificationState::Sent | EmailVerificationState::Error(_)
            )
    }

    /// Submits the entered code. A rejected code keeps the wizard on the verification
    /// step with an error; an accepted one moves to success.
    pub async fn verify(
        &mut self,
        operation: &VerificationOperation,
    ) -> Result<WizardStep, NovaPayError> {
        self.require_step(WizardStep::EmailVerification)?;
        if !self.can_verify() {
            return Err(NovaPayError::InvalidTransition(format!(
                "verification needs a sent code and {} digits",
                VERIFICATION_CODE_LEN
            )));
        }

        self.verification = EmailVerificationState::Verifying;
        let request = CodeVerification {
            email: self.form.email.clone(),
            code: self.code.clone(),
        };

        let outcome = match operation.execute(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.verification = EmailVerificationState::Error(VERIFICATION_FAILED.to_string());
                return Err(err);
            }
        };

        match outcome {
            VerificationOutcome::Accepted => {
                self.verification = EmailVerificationState::Sent;
                self.apply(WizardEvent::CodeAccepted)?;
                info!(email = %self.form.email, "account registered");
                Ok(self.step)
            }
            VerificationOutcome::Rejected => {
                debug!("verification code rejected");
                self.verification = EmailVerificationState::Error(VERIFICATION_FAILED.to_string());
                Ok(self.step)
            }
        }
    }

    /// Greeting shown on the success screen.
    pub fn welcome_message(&self) -> String {
        format!(
            "Bienvenido a NovaPay, {}. Tu cuenta ha sido creada correctamente. \
             Ya puedes iniciar sesion con tu correo y contrasena.",
            self.form.first_name
        )
    }

    fn require_step(&self, expected: WizardStep) -> Result<(), NovaPayError> {
        if self.step != expected {
            return Err(NovaPayError::stage_violation(
                expected.name(),
                self.step.name(),
            ));
        }
        Ok(())
    }

    fn apply(&mut self, event: WizardEvent) -> Result<WizardTarget, NovaPayError> {
        let target = transition(self.step, event).ok_or_else(|| {
            NovaPayError::InvalidTransition(format!(
                "event {:?} not allowed at step '{}'",
                event,
                self.step.name()
            ))
        })?;
        if let WizardTarget::Step(next) = target {
            debug!(from = self.step.name(), to = next.name(), "wizard step changed");
            self.step = next;
        }
        Ok(target)
    }
}
