use crate::error::NovaPayError;
use crate::flow::{PaymentFlow, TransferFlow};
use crate::remote::RemoteOperations;
use crate::statement::StatementScreen;
use crate::types::{Session, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const HIDDEN_BALANCE: &str = "$** *** **";

/// Latest movements shown on the home view.
pub fn recent_movements() -> Vec<Transaction> {
    vec![
        Transaction::new(1, "Amazon MX", -124_999, "Hoy, 14:32", "cart"),
        Transaction::new(2, "Transferencia recibida", 500_000, "Hoy, 09:15", "transfer"),
        Transaction::new(3, "Netflix", -21_900, "Ayer, 00:01", "entertainment"),
        Transaction::new(4, "Uber Eats", -38_750, "12 Feb, 21:45", "food"),
        Transaction::new(5, "Nomina", 2_850_000, "10 Feb, 06:00", "salary"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    Transfer,
    TopUp,
    Pay,
    More,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Transfer,
        QuickAction::TopUp,
        QuickAction::Pay,
        QuickAction::More,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Transfer => "Transferir",
            Self::TopUp => "Recargar",
            Self::Pay => "Pagar",
            Self::More => "Mas",
        }
    }
}

#[derive(Debug)]
pub enum DashboardView {
    Home,
    Statement(StatementScreen),
}

#[derive(Debug, Default)]
pub enum Overlay {
    #[default]
    None,
    Transfer(TransferFlow),
    Payment(PaymentFlow),
}

/// Signed-in home screen. It can only be built from a present session, and it owns
/// whatever overlay or statement load is active.
#[derive(Debug)]
pub struct Dashboard {
    session: Session,
    operations: RemoteOperations,
    view: DashboardView,
    overlay: Overlay,
    balance_visible: bool,
    has_notification: bool,
}

impl Dashboard {
    pub fn open(
        session: Option<Session>,
        operations: RemoteOperations,
    ) -> Result<Self, NovaPayError> {
        let session = session.ok_or(NovaPayError::NotAuthenticated)?;
        Ok(Self {
            session,
            operations,
            view: DashboardView::Home,
            overlay: Overlay::None,
            balance_visible: true,
            has_notification: true,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn greeting(&self) -> String {
        let first_name = self.session.name.split_whitespace().next().unwrap_or("");
        format!("Hola, {first_name}")
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn has_notification(&self) -> bool {
        self.has_notification
    }

    pub fn balance_visible(&self) -> bool {
        self.balance_visible
    }

    pub fn toggle_balance(&mut self) -> bool {
        self.balance_visible = !self.balance_visible;
        self.balance_visible
    }

    pub fn balance_label(&self) -> String {
        if self.balance_visible {
            self.session.balance.format_abs()
        } else {
            HIDDEN_BALANCE.to_string()
        }
    }

    pub fn recent_movements(&self) -> Vec<Transaction> {
        recent_movements()
    }

    /// Runs a quick action. "Recargar" shares the payment overlay; "Mas" does nothing.
    pub fn trigger(&mut self, action: QuickAction) -> Result<(), NovaPayError> {
        match action {
            QuickAction::Transfer => self.open_transfer().map(|_| ()),
            QuickAction::TopUp | QuickAction::Pay => self.open_payment().map(|_| ()),
            QuickAction::More => Ok(()),
        }
    }

    /// Opens a fresh transfer overlay, discarding any overlay already shown.
    pub fn open_transfer(&mut self) -> Result<&mut TransferFlow, NovaPayError> {
        self.require_home()?;
        self.overlay = Overlay::Transfer(TransferFlow::new(self.operations.transfer.clone()));
        match &mut self.overlay {
            Overlay::Transfer(flow) => Ok(flow),
            _ => Err(NovaPayError::InvalidTransition(
                "transfer overlay not open".to_string(),
            )),
        }
    }

    /// Opens a fresh payment overlay, discarding any overlay already shown.
    pub fn open_payment(&mut self) -> Result<&mut PaymentFlow, NovaPayError> {
        self.require_home()?;
        self.overlay = Overlay::Payment(PaymentFlow::new(self.operations.payment.clone()));
        match &mut self.overlay {
            Overlay::Payment(flow) => Ok(flow),
            _ => Err(NovaPayError::InvalidTransition(
                "payment overlay not open".to_string(),
            )),
        }
    }

    pub fn transfer_mut(&mut self) -> Option<&mut TransferFlow> {
        match &mut self.overlay {
            Overlay::Transfer(flow) => Some(flow),
            _ => None,
        }
    }

    pub fn payment_mut(&mut self) -> Option<&mut PaymentFlow> {
        match &mut self.overlay {
            Overlay::Payment(flow) => Some(flow),
            _ => None,
        }
    }

    /// Closes the active overlay, aborting any processing it still has in flight.
    pub fn close_overlay(&mut self) {
        match std::mem::take(&mut self.overlay) {
            Overlay::Transfer(flow) => flow.close(),
            Overlay::Payment(flow) => flow.close(),
            Overlay::None => {}
        }
    }

    /// Switches to the statement view and starts loading it.
    pub fn show_statement(&mut self) -> Result<&mut StatementScreen, NovaPayError> {
        self.close_overlay();
        if matches!(self.view, DashboardView::Home) {
            debug!("statement view opened");
            self.view = DashboardView::Statement(StatementScreen::open(
                &self.operations.statement,
                self.session.account_number.clone(),
            ));
        }
        self.statement_mut().ok_or_else(|| {
            NovaPayError::InvalidTransition("statement view not open".to_string())
        })
    }

    pub fn statement_mut(&mut self) -> Option<&mut StatementScreen> {
        match &mut self.view {
            DashboardView::Statement(screen) => Some(screen),
            DashboardView::Home => None,
        }
    }

    /// Back to home. A statement still loading is cancelled.
    pub fn show_home(&mut self) {
        self.view = DashboardView::Home;
    }

    fn require_home(&self) -> Result<(), NovaPayError> {
        match self.view {
            DashboardView::Home => Ok(()),
            DashboardView::Statement(_) => Err(NovaPayError::stage_violation("home", "statement")),
        }
    }
}
