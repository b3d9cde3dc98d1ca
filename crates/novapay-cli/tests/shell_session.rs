use novapay_adapters::simulated_operations;
use novapay_cli::{Command, OutputFormat, Repl, ShellError};
use novapay_core::{AppShell, LatencyProfile, NovaPayError, Screen};

async fn run_script(
    script: &str,
    format: OutputFormat,
    latency: LatencyProfile,
) -> (String, Screen) {
    let shell = AppShell::with_operations(simulated_operations(&latency));
    let mut repl = Repl::new(shell, Vec::new(), format);
    repl.run(script.as_bytes()).await.unwrap();
    let screen = repl.shell().screen().await;
    (String::from_utf8(repl.into_output()).unwrap(), screen)
}

async fn instant(script: &str) -> (String, Screen) {
    run_script(script, OutputFormat::Text, LatencyProfile::instant()).await
}

#[tokio::test]
async fn empty_login_shows_inline_error() {
    let (output, _) = instant("login\nstatus\n").await;
    assert!(output.contains("Por favor ingresa tu correo y contrasena"));
    assert!(output.contains("Iniciar sesion"));
}

#[tokio::test]
async fn transfer_produces_spei_receipt() {
    let script = "\
login ana@novapay.mx Abc12345
transfer
set beneficiary Maria Lopez
set clabe 012180001234567891
set amount 1,500.50
set concept Renta
submit
";
    let (output, _) = instant(script).await;
    assert!(output.contains("Hola, Jesús"));
    assert!(output.contains("$47,832.50"));
    assert!(output.contains("Comprobante SPEI-"));
    assert!(output.contains("$1,500.50"));
    assert!(output.contains("Completada"));
    assert!(output.contains("Referencia: ****7891"));
    assert!(!output.contains("012180001234567891"));
}

#[tokio::test]
async fn invalid_payment_reports_field_errors_and_keeps_form() {
    let script = "\
login ana@novapay.mx x
pay
set service cfe
set amount 0.50
submit
status
";
    let (output, _) = instant(script).await;
    assert!(output.contains("reference: Campo obligatorio"));
    assert!(output.contains("amount: El monto minimo es $1.00"));
    assert!(output.contains("Pagar Servicio [form]"));
    assert!(output.contains("service: cfe"));
}

#[tokio::test]
async fn payment_receipt_as_json() {
    let script = "\
login ana@novapay.mx x
action pagar
set service telmex
set reference 5512345678
set amount 599
submit
";
    let (output, _) = run_script(script, OutputFormat::Json, LatencyProfile::instant()).await;
    assert!(output.contains("\"status\": \"Pagado\""));
    assert!(output.contains("\"folio\": \"PAY-"));
    assert!(output.contains("\"amount\": 59900"));
}

#[tokio::test]
async fn statement_shows_period_totals() {
    let (output, _) = run_script(
        "login ana@novapay.mx x\nstatement\n",
        OutputFormat::Text,
        LatencyProfile::instant(),
    )
    .await;
    assert!(output.contains("Ingresos: $65,000.00"));
    assert!(output.contains("Gastos:   $6,168.49"));
    assert!(output.contains("Balance del periodo: +$58,831.51"));
    assert!(output.contains("Nomina - Empresa ABC"));
}

#[tokio::test]
async fn registration_wizard_end_to_end() {
    let script = "\
register
next
set first_name Ana
set last_name Ruiz
set email ana@novapay.mx
set phone 5512345678
next
set password Abc12345
set confirm_password Abc12345
next
send-code
code 000000
verify
code 48-29-13
verify
next
status
";
    let (output, screen) = instant(script).await;
    assert!(output.contains("first_name: Campo obligatorio"));
    assert!(output.contains("paso 2/4: Contrasena"));
    assert!(output.contains("[x] Minimo 8 caracteres"));
    assert!(output.contains("paso 3/4: Verificar Email"));
    assert!(output.contains("Codigo enviado a ana@novapay.mx"));
    assert!(output.contains("Codigo incorrecto. Intenta de nuevo."));
    assert!(output.contains("Bienvenido a NovaPay, Ana"));
    assert!(output.contains("Inicia sesion con tu correo y contrasena"));
    assert_eq!(screen, Screen::Login);
}

#[tokio::test]
async fn logout_returns_to_login_and_blocks_dashboard_commands() {
    let script = "\
login ana@novapay.mx x
logout
transfer
balance
";
    let (output, screen) = instant(script).await;
    assert!(output.contains("Sesion cerrada"));
    assert!(output.contains("error: No active session"));
    assert_eq!(screen, Screen::Login);
}

#[tokio::test]
async fn unknown_commands_do_not_stop_the_shell() {
    let (output, _) = instant("fly\nhelp\nquit\nstatus\n").await;
    assert!(output.contains("Unknown command 'fly'"));
    assert!(output.contains("Comandos disponibles"));
    assert!(!output.contains("correo: \n"));
}

#[tokio::test(start_paused = true)]
async fn default_latency_still_completes() {
    let started = tokio::time::Instant::now();
    let (output, _) = run_script(
        "login ana@novapay.mx x\nstatement\n",
        OutputFormat::Text,
        LatencyProfile::default(),
    )
    .await;
    assert!(started.elapsed() >= std::time::Duration::from_millis(3_300));
    assert!(output.contains("Balance del periodo"));
}

#[tokio::test]
async fn statement_needs_a_live_session() {
    let shell = AppShell::with_operations(simulated_operations(&LatencyProfile::instant()));
    let mut repl = Repl::new(shell, Vec::new(), OutputFormat::Text);
    repl.execute(Command::Login {
        email: Some("ana@novapay.mx".to_string()),
        password: Some("x".to_string()),
    })
    .await
    .unwrap();

    repl.shell().session_context().logout().await;
    let err = repl.execute(Command::Statement).await.unwrap_err();
    assert!(matches!(
        err,
        ShellError::Core(NovaPayError::NotAuthenticated)
    ));
}
