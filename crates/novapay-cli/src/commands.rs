//! Line commands understood by the shell.

use crate::error::ShellError;
use novapay_core::QuickAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `login [email] [password]`; missing parts keep the form's current value.
    Login {
        email: Option<String>,
        password: Option<String>,
    },
    Logout,
    Register,
    /// `set <field> <value...>` on whichever form is on screen.
    Set { field: String, value: String },
    Next,
    Back,
    SendCode,
    Code(String),
    Verify,
    Transfer,
    Pay,
    Submit,
    Close,
    Statement,
    Home,
    Balance,
    Action(QuickAction),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Comandos disponibles:
  login [correo] [contrasena]   iniciar sesion
  logout                        cerrar sesion
  register                      crear una cuenta
  set <campo> <valor>           llenar un campo del formulario visible
  next | back                   avanzar o regresar en el registro
  send-code                     enviar (o reenviar) el codigo de verificacion
  code <digitos>                capturar el codigo de 6 digitos
  verify                        verificar el codigo
  transfer | pay                abrir transferencia SPEI o pago de servicio
  submit                        enviar el formulario abierto y esperar el comprobante
  close                         cerrar la ventana abierta
  statement | home              ver estado de cuenta o volver al inicio
  balance                       mostrar u ocultar el saldo
  action <transferir|recargar|pagar|mas>
  status                        mostrar la pantalla actual
  help | quit";

fn parse_action(raw: &str) -> Option<QuickAction> {
    let raw = raw.to_lowercase();
    QuickAction::ALL
        .into_iter()
        .find(|action| action.label().to_lowercase() == raw)
        .or(match raw.as_str() {
            "transfer" => Some(QuickAction::Transfer),
            "top-up" | "topup" => Some(QuickAction::TopUp),
            "pay" => Some(QuickAction::Pay),
            "more" => Some(QuickAction::More),
            _ => None,
        })
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, ShellError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match head.to_lowercase().as_str() {
            "login" => Command::Login {
                email: args.next().map(str::to_string),
                password: args.next().map(str::to_string),
            },
            "logout" => Command::Logout,
            "register" => Command::Register,
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None if !rest.is_empty() => (rest, ""),
                    None => return Err(ShellError::Usage("set <campo> <valor>")),
                };
                Command::Set {
                    field: field.to_lowercase(),
                    value: value.to_string(),
                }
            }
            "next" => Command::Next,
            "back" => Command::Back,
            "send-code" | "resend" => Command::SendCode,
            "code" => match args.next() {
                Some(code) => Command::Code(code.to_string()),
                None => return Err(ShellError::Usage("code <digitos>")),
            },
            "verify" => Command::Verify,
            "transfer" => Command::Transfer,
            "pay" => Command::Pay,
            "submit" => Command::Submit,
            "close" => Command::Close,
            "statement" => Command::Statement,
            "home" => Command::Home,
            "balance" => Command::Balance,
            "action" => match args.next().and_then(parse_action) {
                Some(action) => Command::Action(action),
                None => {
                    return Err(ShellError::Usage(
                        "action <transferir|recargar|pagar|mas>",
                    ))
                }
            },
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}
