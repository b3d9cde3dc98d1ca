//! Text and JSON rendering of shell state.

use crate::error::ShellError;
use novapay_core::flow::FlowKind;
use novapay_core::registration::RegistrationWizard;
use novapay_core::statement::StatementState;
use novapay_core::{
    Dashboard, DashboardView, FieldErrors, FlowStage, ModalFlow, Overlay, QuickAction, Receipt,
    StatementScreen, Transaction,
};
use serde::Serialize;
use std::io::{self, Write};

/// Output format for receipts and statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

pub fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, data: &T) -> Result<(), ShellError> {
    serde_json::to_writer_pretty(&mut *out, data)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_field_errors(out: &mut dyn Write, errors: &FieldErrors) -> io::Result<()> {
    for (field, message) in errors.iter() {
        writeln!(out, "  ! {field}: {message}")?;
    }
    Ok(())
}

fn print_movements(out: &mut dyn Write, movements: &[Transaction]) -> io::Result<()> {
    for tx in movements {
        writeln!(
            out,
            "  {:<32} {:>14}  {}",
            tx.name,
            tx.amount.format_signed(),
            tx.date
        )?;
    }
    Ok(())
}

pub fn print_registration(out: &mut dyn Write, wizard: &RegistrationWizard) -> io::Result<()> {
    let step = wizard.step();
    writeln!(
        out,
        "Crear cuenta - paso {}/4: {} ({:.0}%)",
        step.index() + 1,
        step.label(),
        wizard.progress() * 100.0
    )?;
    print_field_errors(out, wizard.errors())
}

pub fn print_password_checklist(out: &mut dyn Write, wizard: &RegistrationWizard) -> io::Result<()> {
    for (rule, passed) in wizard.password_checklist() {
        let mark = if passed { "x" } else { " " };
        writeln!(out, "  [{mark}] {}", rule.label())?;
    }
    Ok(())
}

pub fn print_receipt(out: &mut dyn Write, receipt: &Receipt) -> io::Result<()> {
    writeln!(out, "Comprobante {}", receipt.folio)?;
    writeln!(out, "  Monto:      {}", receipt.amount.format_abs())?;
    writeln!(out, "  Destino:    {}", receipt.counterparty)?;
    writeln!(out, "  Referencia: {}", receipt.reference)?;
    if let Some(concept) = &receipt.concept {
        writeln!(out, "  Concepto:   {concept}")?;
    }
    writeln!(out, "  Estado:     {}", receipt.status)?;
    writeln!(
        out,
        "  Fecha:      {}",
        receipt.issued_at.format("%d/%m/%Y %H:%M")
    )
}

pub fn print_flow<K: FlowKind>(out: &mut dyn Write, flow: &ModalFlow<K>) -> io::Result<()>
where
    K::Form: Serialize,
{
    writeln!(out, "{} [{}]", flow.title(), flow.stage().name())?;
    match flow.stage() {
        FlowStage::Form => {
            let form = serde_json::to_value(flow.form()).unwrap_or_default();
            if let Some(fields) = form.as_object() {
                for (name, value) in fields {
                    writeln!(out, "  {name}: {}", value.as_str().unwrap_or_default())?;
                }
            }
            if let Some(error) = flow.last_error() {
                writeln!(out, "  ! {error}")?;
            }
            print_field_errors(out, flow.errors())
        }
        FlowStage::Processing => writeln!(out, "  Procesando..."),
        FlowStage::Success => match flow.receipt() {
            Some(receipt) => print_receipt(out, receipt),
            None => Ok(()),
        },
    }
}

pub fn print_statement(out: &mut dyn Write, screen: &StatementScreen) -> io::Result<()> {
    match screen.state() {
        StatementState::Loading => writeln!(out, "Estado de cuenta: cargando..."),
        StatementState::Failed(message) => writeln!(out, "Estado de cuenta no disponible: {message}"),
        StatementState::Ready {
            transactions,
            summary,
        } => {
            writeln!(out, "Estado de cuenta - Febrero 2026")?;
            writeln!(out, "  Ingresos: {}", summary.total_income.format_abs())?;
            writeln!(out, "  Gastos:   {}", summary.total_expenses.format_abs())?;
            writeln!(
                out,
                "  Balance del periodo: {}",
                summary.period_balance.format_signed()
            )?;
            print_movements(out, transactions)
        }
    }
}

pub fn print_dashboard(out: &mut dyn Write, dashboard: &Dashboard) -> io::Result<()> {
    match dashboard.view() {
        DashboardView::Statement(screen) => return print_statement(out, screen),
        DashboardView::Home => {}
    }

    let bell = if dashboard.has_notification() { " (*)" } else { "" };
    writeln!(out, "{}{bell}", dashboard.greeting())?;
    writeln!(out, "Saldo disponible: {}", dashboard.balance_label())?;
    writeln!(out, "Cuenta {}", dashboard.session().account_number)?;
    let actions: Vec<&str> = QuickAction::ALL
        .iter()
        .map(|action| action.label())
        .collect();
    writeln!(out, "Acciones: {}", actions.join(" | "))?;
    writeln!(out, "Movimientos recientes:")?;
    print_movements(out, &dashboard.recent_movements())?;

    match dashboard.overlay() {
        Overlay::None => Ok(()),
        Overlay::Transfer(flow) => print_flow(out, flow),
        Overlay::Payment(flow) => print_flow(out, flow),
    }
}
