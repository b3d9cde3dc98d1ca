use crate::error::NovaPayError;
use crate::money::Money;
use crate::remote::StatementOperation;
use crate::task::PendingTask;
use crate::types::{StatementQuery, Transaction, TxKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Fixed reference statement for the demo account (February 2026).
pub fn reference_statement() -> Vec<Transaction> {
    vec![
        Transaction::new(1, "Nomina - Empresa ABC", 2_850_000, "10 Feb 2026", "Ingreso"),
        Transaction::new(2, "Amazon MX", -124_999, "10 Feb 2026", "Compras"),
        Transaction::new(3, "Transferencia - Maria Lopez", 500_000, "09 Feb 2026", "Transferencia"),
        Transaction::new(4, "CFE - Luz", -84_200, "08 Feb 2026", "Servicios"),
        Transaction::new(5, "Spotify", -11_500, "07 Feb 2026", "Suscripcion"),
        Transaction::new(6, "Netflix", -21_900, "07 Feb 2026", "Suscripcion"),
        Transaction::new(7, "OXXO - Deposito", 300_000, "06 Feb 2026", "Deposito"),
        Transaction::new(8, "Uber Eats", -38_750, "05 Feb 2026", "Comida"),
        Transaction::new(9, "Telmex", -59_900, "04 Feb 2026", "Servicios"),
        Transaction::new(10, "Transferencia - Carlos R.", -250_000, "03 Feb 2026", "Transferencia"),
        Transaction::new(11, "Rappi", -25_600, "02 Feb 2026", "Comida"),
        Transaction::new(12, "Nomina - Empresa ABC", 2_850_000, "01 Feb 2026", "Ingreso"),
    ]
}

/// Period aggregates derived from a list of movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub total_income: Money,
    /// Absolute value of all debits.
    pub total_expenses: Money,
    pub period_balance: Money,
}

impl StatementSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_income: Money = transactions
            .iter()
            .filter(|tx| tx.kind == TxKind::Credit)
            .map(|tx| tx.amount)
            .sum();
        let total_expenses: Money = transactions
            .iter()
            .filter(|tx| tx.kind == TxKind::Debit)
            .map(|tx| tx.amount.abs())
            .sum();
        Self {
            total_income,
            total_expenses,
            period_balance: total_income - total_expenses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementState {
    Loading,
    Ready {
        transactions: Vec<Transaction>,
        summary: StatementSummary,
    },
    Failed(String),
}

/// Account statement screen. Opening it starts the load; dropping it cancels the load.
#[derive(Debug)]
pub struct StatementScreen {
    state: StatementState,
    pending: Option<PendingTask<Vec<Transaction>>>,
}

impl StatementScreen {
    pub fn open(operation: &StatementOperation, account_number: impl Into<String>) -> Self {
        let operation = Arc::clone(operation);
        let query = StatementQuery {
            account_number: account_number.into(),
        };
        debug!(operation = operation.name(), "statement load started");
        let pending = PendingTask::spawn(operation.name(), async move {
            operation.execute(query).await
        });
        Self {
            state: StatementState::Loading,
            pending: Some(pending),
        }
    }

    pub fn state(&self) -> &StatementState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, StatementState::Loading)
    }

    pub fn summary(&self) -> Option<StatementSummary> {
        match &self.state {
            StatementState::Ready { summary, .. } => Some(*summary),
            _ => None,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        match &self.state {
            StatementState::Ready { transactions, .. } => transactions,
            _ => &[],
        }
    }

    /// Waits for the load to complete. Idempotent once loaded.
    pub async fn wait_ready(&mut self) -> Result<&StatementState, NovaPayError> {
        if let Some(pending) = self.pending.take() {
            match pending.join().await {
                Ok(transactions) => {
                    let summary = StatementSummary::from_transactions(&transactions);
                    debug!(count = transactions.len(), "statement loaded");
                    self.state = StatementState::Ready {
                        transactions,
                        summary,
                    };
                }
                Err(err) => {
                    self.state = StatementState::Failed(err.to_string());
                    return Err(err);
                }
            }
        }
        Ok(&self.state)
    }
}
