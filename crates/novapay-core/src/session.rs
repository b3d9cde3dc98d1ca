use crate::error::NovaPayError;
use crate::money::Money;
use crate::remote::LoginOperation;
use crate::types::{Credentials, LoginOutcome, Session};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const MOCK_PROFILE_NAME: &str = "Jesús Ayala";
pub const MOCK_ACCOUNT_NUMBER: &str = "****-****-****-4892";
pub const MOCK_BALANCE: Money = Money::from_minor(4_783_250);

pub const MISSING_CREDENTIALS: &str = "Por favor ingresa tu correo y contrasena";
pub const INVALID_CREDENTIALS: &str = "Credenciales incorrectas";

/// Mock authentication rule: any non-empty email/password pair signs in to the fixed
/// demo profile, echoing the email back.
pub fn authenticate(credentials: &Credentials) -> LoginOutcome {
    if !credentials.is_complete() {
        return LoginOutcome::Rejected;
    }
    LoginOutcome::Authenticated(Session {
        name: MOCK_PROFILE_NAME.to_string(),
        email: credentials.email.clone(),
        account_number: MOCK_ACCOUNT_NUMBER.to_string(),
        balance: MOCK_BALANCE,
    })
}

/// Session contract injected into every screen that needs the signed-in user.
#[async_trait]
pub trait SessionContext: Send + Sync {
    async fn session(&self) -> Option<Session>;

    /// Resolves to `true` and stores the session on success; leaves it absent otherwise.
    async fn login(&self, email: &str, password: &str) -> Result<bool, NovaPayError>;

    async fn logout(&self);

    /// True while a login call is in flight.
    fn is_loading(&self) -> bool;
}

/// In-memory holder of the single optional session.
pub struct SessionStore {
    current: RwLock<Option<Session>>,
    loading: AtomicBool,
    login_op: LoginOperation,
}

impl SessionStore {
    pub fn new(login_op: LoginOperation) -> Self {
        Self {
            current: RwLock::new(None),
            loading: AtomicBool::new(false),
            login_op,
        }
    }
}

/// Clears the loading flag however the login future ends, including cancellation.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionContext for SessionStore {
    async fn session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    async fn login(&self, email: &str, password: &str) -> Result<bool, NovaPayError> {
        let _loading = LoadingGuard::engage(&self.loading);
        debug!(operation = self.login_op.name(), "login requested");

        let outcome = self
            .login_op
            .execute(Credentials::new(email, password))
            .await?;

        match outcome {
            LoginOutcome::Authenticated(session) => {
                info!(email = %session.email, "session started");
                *self.current.write().await = Some(session);
                Ok(true)
            }
            LoginOutcome::Rejected => {
                debug!("login rejected");
                Ok(false)
            }
        }
    }

    async fn logout(&self) {
        if self.current.write().await.take().is_some() {
            info!("session cleared");
        }
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}

/// Login screen state: two inputs and one generic inline error.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Empty inputs are rejected locally without calling the backend.
    pub async fn submit(&mut self, context: &dyn SessionContext) -> Result<bool, NovaPayError> {
        self.error = None;
        if self.email.is_empty() || self.password.is_empty() {
            self.error = Some(MISSING_CREDENTIALS.to_string());
            return Ok(false);
        }

        let signed_in = context.login(&self.email, &self.password).await?;
        if !signed_in {
            self.error = Some(INVALID_CREDENTIALS.to_string());
        }
        Ok(signed_in)
    }
}
