//! The command loop: reads lines, drives the [`AppShell`], prints the result.

use crate::commands::{Command, HELP};
use crate::error::ShellError;
use crate::output::{self, OutputFormat};
use novapay_core::registration::RegistrationField;
use novapay_core::{
    AppShell, Dashboard, EmailVerificationState, NovaPayError, PaymentForm, Receipt, Screen,
    StatementSummary, Transaction, TransferForm, WizardStep,
};
use serde::Serialize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Serialize)]
struct StatementReport<'a> {
    summary: StatementSummary,
    transactions: &'a [Transaction],
}

async fn active_dashboard(shell: &mut AppShell) -> Result<&mut Dashboard, ShellError> {
    shell
        .dashboard()
        .await
        .ok_or(ShellError::Core(NovaPayError::NotAuthenticated))
}

fn set_transfer_field(
    form: &mut TransferForm,
    field: &str,
    value: String,
) -> Result<(), ShellError> {
    match field {
        "beneficiary" | "beneficiario" => form.beneficiary = value,
        "clabe" => form.clabe = value,
        "amount" | "monto" => form.amount = value,
        "concept" | "concepto" => form.concept = value,
        other => {
            return Err(ShellError::UnknownField {
                form: "transferencia",
                field: other.to_string(),
            })
        }
    }
    Ok(())
}

fn set_payment_field(
    form: &mut PaymentForm,
    field: &str,
    value: String,
) -> Result<(), ShellError> {
    match field {
        "service" | "servicio" => form.service = value,
        "reference" | "referencia" => form.reference = value,
        "amount" | "monto" => form.amount = value,
        other => {
            return Err(ShellError::UnknownField {
                form: "pago",
                field: other.to_string(),
            })
        }
    }
    Ok(())
}

pub struct Repl<W: Write> {
    shell: AppShell,
    out: W,
    format: OutputFormat,
    prompt: bool,
}

impl<W: Write> Repl<W> {
    pub fn new(shell: AppShell, out: W, format: OutputFormat) -> Self {
        Self {
            shell,
            out,
            format,
            prompt: false,
        }
    }

    /// Prints a prompt before every line; meant for interactive terminals.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn shell(&self) -> &AppShell {
        &self.shell
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until `quit` or end of input.
    pub async fn run<R>(&mut self, reader: R) -> Result<(), ShellError>
    where
        R: AsyncBufRead + Unpin,
    {
        writeln!(self.out, "NovaPay - escribe 'help' para ver los comandos")?;
        let mut lines = reader.lines();
        loop {
            if self.prompt {
                write!(self.out, "novapay> ")?;
                self.out.flush()?;
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let result = match Command::parse(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => self.execute(command).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(Control::Quit) => break,
                Ok(Control::Continue) => {}
                Err(err) if err.is_recoverable() => self.report(&err)?,
                Err(err) => return Err(err),
            }
        }
        self.shell.logout().await;
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Result<Control, ShellError> {
        debug!(?command, "executing command");
        match command {
            Command::Login { email, password } => self.login(email, password).await?,
            Command::Logout => {
                self.shell.logout().await;
                writeln!(self.out, "Sesion cerrada")?;
            }
            Command::Register => {
                self.require_screen(Screen::Login, "register").await?;
                self.shell.show_register();
                self.print_registration()?;
            }
            Command::Set { field, value } => self.set(&field, value).await?,
            Command::Next => self.next().await?,
            Command::Back => self.back().await?,
            Command::SendCode => {
                let wizard = self.shell.registration_mut()?;
                wizard.send_code()?;
                let email = wizard.form().email.clone();
                writeln!(self.out, "Codigo enviado a {email}")?;
            }
            Command::Code(raw) => {
                let wizard = self.shell.registration_mut()?;
                wizard.enter_code(&raw);
                let code = wizard.code().to_string();
                writeln!(self.out, "Codigo: {code}")?;
            }
            Command::Verify => self.verify().await?,
            Command::Transfer => {
                self.dashboard().await?.open_transfer()?;
                self.print_dashboard().await?;
            }
            Command::Pay => {
                self.dashboard().await?.open_payment()?;
                self.print_dashboard().await?;
            }
            Command::Action(action) => {
                self.dashboard().await?.trigger(action)?;
                self.print_dashboard().await?;
            }
            Command::Submit => self.submit().await?,
            Command::Close => {
                self.dashboard().await?.close_overlay();
                self.print_dashboard().await?;
            }
            Command::Statement => self.statement().await?,
            Command::Home => {
                self.dashboard().await?.show_home();
                self.print_dashboard().await?;
            }
            Command::Balance => {
                let dashboard = self.dashboard().await?;
                dashboard.toggle_balance();
                let label = dashboard.balance_label();
                writeln!(self.out, "Saldo disponible: {label}")?;
            }
            Command::Status => self.status().await?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Control::Quit),
        }
        Ok(Control::Continue)
    }

    async fn login(
        &mut self,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<(), ShellError> {
        self.require_screen(Screen::Login, "login").await?;
        let form = self.shell.login_form_mut();
        if let Some(email) = email {
            form.email = email;
        }
        if let Some(password) = password {
            form.password = password;
        }

        writeln!(self.out, "Iniciando sesion...")?;
        self.out.flush()?;
        if self.shell.submit_login().await? {
            self.print_dashboard().await?;
        } else if let Some(error) = self.shell.login_form().error() {
            writeln!(self.out, "! {error}")?;
        }
        Ok(())
    }

    async fn set(&mut self, field: &str, value: String) -> Result<(), ShellError> {
        match self.shell.screen().await {
            Screen::Login => {
                let form = self.shell.login_form_mut();
                match field {
                    "email" | "correo" => form.email = value,
                    "password" | "contrasena" => form.password = value,
                    other => {
                        return Err(ShellError::UnknownField {
                            form: "inicio de sesion",
                            field: other.to_string(),
                        })
                    }
                }
            }
            Screen::Register => {
                let parsed =
                    RegistrationField::parse(field).ok_or_else(|| ShellError::UnknownField {
                        form: "registro",
                        field: field.to_string(),
                    })?;
                let wizard = self.shell.registration_mut()?;
                wizard.set_field(parsed, value);
                if parsed == RegistrationField::Password {
                    let wizard = self.shell.registration_mut()?;
                    output::print_password_checklist(&mut self.out, wizard)?;
                }
            }
            Screen::Dashboard => {
                let dashboard = self.dashboard().await?;
                if let Some(flow) = dashboard.transfer_mut() {
                    set_transfer_field(flow.form_mut()?, field, value)?;
                } else if let Some(flow) = dashboard.payment_mut() {
                    set_payment_field(flow.form_mut()?, field, value)?;
                } else {
                    return Err(ShellError::Unavailable("set"));
                }
            }
        }
        Ok(())
    }

    async fn next(&mut self) -> Result<(), ShellError> {
        if self.shell.registration_mut()?.step() == WizardStep::Success {
            self.shell.registration_finish()?;
            writeln!(self.out, "Inicia sesion con tu correo y contrasena")?;
            return Ok(());
        }
        self.shell.registration_mut()?.next()?;
        self.print_registration()
    }

    async fn back(&mut self) -> Result<(), ShellError> {
        match self.shell.screen().await {
            Screen::Register => match self.shell.registration_back()? {
                Screen::Login => writeln!(self.out, "Iniciar sesion")?,
                _ => self.print_registration()?,
            },
            Screen::Dashboard => {
                self.dashboard().await?.show_home();
                self.print_dashboard().await?;
            }
            Screen::Login => return Err(ShellError::Unavailable("back")),
        }
        Ok(())
    }

    async fn verify(&mut self) -> Result<(), ShellError> {
        writeln!(self.out, "Verificando...")?;
        self.out.flush()?;
        let step = self.shell.registration_verify().await?;
        let wizard = self.shell.registration_mut()?;
        if step == WizardStep::Success {
            let welcome = wizard.welcome_message();
            writeln!(self.out, "{welcome}")?;
        } else if let EmailVerificationState::Error(message) = wizard.verification() {
            writeln!(self.out, "! {message}")?;
        }
        Ok(())
    }

    async fn submit(&mut self) -> Result<(), ShellError> {
        let receipt: Receipt = {
            let dashboard = active_dashboard(&mut self.shell).await?;
            if let Some(flow) = dashboard.transfer_mut() {
                flow.submit()?;
                writeln!(self.out, "Procesando...")?;
                self.out.flush()?;
                flow.finish().await?.clone()
            } else if let Some(flow) = dashboard.payment_mut() {
                flow.submit()?;
                writeln!(self.out, "Procesando...")?;
                self.out.flush()?;
                flow.finish().await?.clone()
            } else {
                return Err(ShellError::Unavailable("submit"));
            }
        };
        match self.format {
            OutputFormat::Json => output::print_json(&mut self.out, &receipt)?,
            OutputFormat::Text => output::print_receipt(&mut self.out, &receipt)?,
        }
        Ok(())
    }

    async fn statement(&mut self) -> Result<(), ShellError> {
        writeln!(self.out, "Cargando estado de cuenta...")?;
        self.out.flush()?;
        let screen = active_dashboard(&mut self.shell).await?.show_statement()?;
        screen.wait_ready().await?;
        match self.format {
            OutputFormat::Json => {
                let summary = screen.summary().ok_or_else(|| {
                    NovaPayError::InvalidTransition("statement not loaded".to_string())
                })?;
                let report = StatementReport {
                    summary,
                    transactions: screen.transactions(),
                };
                output::print_json(&mut self.out, &report)?;
            }
            OutputFormat::Text => output::print_statement(&mut self.out, screen)?,
        }
        Ok(())
    }

    async fn status(&mut self) -> Result<(), ShellError> {
        match self.shell.screen().await {
            Screen::Login => {
                let form = self.shell.login_form();
                writeln!(self.out, "Iniciar sesion")?;
                writeln!(self.out, "  correo: {}", form.email)?;
                if let Some(error) = form.error() {
                    writeln!(self.out, "  ! {error}")?;
                }
            }
            Screen::Register => self.print_registration()?,
            Screen::Dashboard => self.print_dashboard().await?,
        }
        Ok(())
    }

    async fn dashboard(&mut self) -> Result<&mut Dashboard, ShellError> {
        active_dashboard(&mut self.shell).await
    }

    async fn require_screen(
        &self,
        expected: Screen,
        command: &'static str,
    ) -> Result<(), ShellError> {
        if self.shell.screen().await != expected {
            return Err(ShellError::Unavailable(command));
        }
        Ok(())
    }

    fn print_registration(&mut self) -> Result<(), ShellError> {
        let wizard = self.shell.registration_mut()?;
        output::print_registration(&mut self.out, wizard)?;
        Ok(())
    }

    async fn print_dashboard(&mut self) -> Result<(), ShellError> {
        let dashboard = active_dashboard(&mut self.shell).await?;
        output::print_dashboard(&mut self.out, dashboard)?;
        Ok(())
    }

    fn report(&mut self, err: &ShellError) -> Result<(), ShellError> {
        writeln!(self.out, "error: {err}")?;
        if let ShellError::Core(core) = err {
            if let Some(errors) = core.field_errors() {
                output::print_field_errors(&mut self.out, errors)?;
            }
        }
        Ok(())
    }
}
