use crate::dashboard::Dashboard;
use crate::error::NovaPayError;
use crate::registration::{RegistrationWizard, WizardStep, WizardTarget};
use crate::remote::RemoteOperations;
use crate::session::{LoginForm, SessionContext, SessionStore};
use crate::types::Session;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Login,
    Register,
    Dashboard,
}

/// Which signed-out screen the user last asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthView {
    #[default]
    Login,
    Register,
}

pub struct ScreenRouter;

impl ScreenRouter {
    /// A present session always wins; otherwise the local view flag decides.
    pub fn resolve(session: Option<&Session>, view: AuthView) -> Screen {
        match (session, view) {
            (Some(_), _) => Screen::Dashboard,
            (None, AuthView::Register) => Screen::Register,
            (None, AuthView::Login) => Screen::Login,
        }
    }
}

/// Application shell: owns the session context and the state of whichever screen is up.
///
/// Every run starts signed out with empty forms; nothing survives the shell.
pub struct AppShell {
    session: Arc<dyn SessionContext>,
    operations: RemoteOperations,
    view: AuthView,
    login_form: LoginForm,
    registration: Option<RegistrationWizard>,
    dashboard: Option<Dashboard>,
}

impl AppShell {
    pub fn new(session: Arc<dyn SessionContext>, operations: RemoteOperations) -> Self {
        Self {
            session,
            operations,
            view: AuthView::Login,
            login_form: LoginForm::default(),
            registration: None,
            dashboard: None,
        }
    }

    /// Shell backed by an in-memory [`SessionStore`] using the bundled login operation.
    pub fn with_operations(operations: RemoteOperations) -> Self {
        let store = SessionStore::new(operations.login.clone());
        Self::new(Arc::new(store), operations)
    }

    pub fn session_context(&self) -> Arc<dyn SessionContext> {
        Arc::clone(&self.session)
    }

    pub fn operations(&self) -> &RemoteOperations {
        &self.operations
    }

    pub async fn screen(&self) -> Screen {
        let session = self.session.session().await;
        ScreenRouter::resolve(session.as_ref(), self.view)
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login_form
    }

    pub fn login_form_mut(&mut self) -> &mut LoginForm {
        &mut self.login_form
    }

    /// Submits the login form. On success the dashboard is built from the new session.
    pub async fn submit_login(&mut self) -> Result<bool, NovaPayError> {
        let signed_in = self.login_form.submit(self.session.as_ref()).await?;
        if signed_in {
            let session = self.session.session().await;
            self.dashboard = Some(Dashboard::open(session, self.operations.clone())?);
            self.login_form = LoginForm::default();
            self.registration = None;
        }
        Ok(signed_in)
    }

    /// Signs out and tears down the dashboard with every overlay and pending load.
    pub async fn logout(&mut self) {
        self.session.logout().await;
        if self.dashboard.take().is_some() {
            debug!("dashboard torn down");
        }
        self.view = AuthView::Login;
    }

    pub fn show_register(&mut self) {
        self.view = AuthView::Register;
        self.registration = Some(RegistrationWizard::new());
        info!("registration started");
    }

    pub fn show_login(&mut self) {
        self.view = AuthView::Login;
        self.registration = None;
    }

    pub fn registration(&self) -> Option<&RegistrationWizard> {
        self.registration.as_ref()
    }

    pub fn registration_mut(&mut self) -> Result<&mut RegistrationWizard, NovaPayError> {
        self.registration.as_mut().ok_or_else(|| {
            NovaPayError::InvalidTransition("registration is not open".to_string())
        })
    }

    /// Steps the wizard back, returning to the login screen when it exits.
    pub fn registration_back(&mut self) -> Result<Screen, NovaPayError> {
        let target = self.registration_mut()?.back()?;
        Ok(self.follow(target))
    }

    /// Leaves the success screen for login.
    pub fn registration_finish(&mut self) -> Result<Screen, NovaPayError> {
        let target = self.registration_mut()?.finish()?;
        Ok(self.follow(target))
    }

    /// Verifies the entered email code with the injected verification operation.
    pub async fn registration_verify(&mut self) -> Result<WizardStep, NovaPayError> {
        let operation = self.operations.email_verification.clone();
        self.registration_mut()?.verify(&operation).await
    }

    /// The dashboard, present only while a session is.
    pub async fn dashboard(&mut self) -> Option<&mut Dashboard> {
        if self.session.session().await.is_none() {
            self.dashboard = None;
        }
        self.dashboard.as_mut()
    }

    pub fn dashboard_mut(&mut self) -> Result<&mut Dashboard, NovaPayError> {
        self.dashboard.as_mut().ok_or(NovaPayError::NotAuthenticated)
    }

    fn follow(&mut self, target: WizardTarget) -> Screen {
        match target {
            WizardTarget::Exit => {
                self.show_login();
                Screen::Login
            }
            WizardTarget::Step(_) => Screen::Register,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::RegistrationField;
    use crate::remote::testing::instant_operations;

    fn shell() -> AppShell {
        AppShell::with_operations(instant_operations())
    }

    #[test]
    fn router_prefers_session() {
        let session = Session {
            name: "Ana".to_string(),
            email: "ana@novapay.mx".to_string(),
            account_number: "****".to_string(),
            balance: crate::money::Money::ZERO,
        };
        assert_eq!(
            ScreenRouter::resolve(Some(&session), AuthView::Register),
            Screen::Dashboard
        );
        assert_eq!(ScreenRouter::resolve(None, AuthView::Register), Screen::Register);
        assert_eq!(ScreenRouter::resolve(None, AuthView::Login), Screen::Login);
    }

    #[tokio::test]
    async fn starts_logged_out_on_login() {
        let mut shell = shell();
        assert_eq!(shell.screen().await, Screen::Login);
        assert!(shell.dashboard().await.is_none());
    }

    #[tokio::test]
    async fn login_then_logout_round_trip() {
        let mut shell = shell();
        shell.login_form_mut().email = "ana@novapay.mx".to_string();
        shell.login_form_mut().password = "Abc12345".to_string();
        assert!(shell.submit_login().await.unwrap());
        assert_eq!(shell.screen().await, Screen::Dashboard);
        assert!(shell.dashboard_mut().is_ok());
        assert!(shell.login_form().email.is_empty());

        shell.logout().await;
        assert_eq!(shell.screen().await, Screen::Login);
        assert!(shell.dashboard_mut().is_err());
    }

    #[tokio::test]
    async fn dashboard_disappears_when_session_is_cleared_elsewhere() {
        let mut shell = shell();
        shell.login_form_mut().email = "ana@novapay.mx".to_string();
        shell.login_form_mut().password = "x".to_string();
        shell.submit_login().await.unwrap();

        shell.session_context().logout().await;
        assert!(shell.dashboard().await.is_none());
    }

    #[tokio::test]
    async fn registration_back_from_first_step_returns_to_login() {
        let mut shell = shell();
        shell.show_register();
        assert_eq!(shell.screen().await, Screen::Register);
        shell
            .registration_mut()
            .unwrap()
            .set_field(RegistrationField::FirstName, "Ana");

        assert_eq!(shell.registration_back().unwrap(), Screen::Login);
        assert_eq!(shell.screen().await, Screen::Login);
        assert!(shell.registration().is_none());

        shell.show_register();
        assert!(shell.registration().unwrap().form().first_name.is_empty());
    }
}
