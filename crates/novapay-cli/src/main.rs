use anyhow::Context;
use clap::Parser;
use novapay_adapters::simulated_operations;
use novapay_cli::{OutputFormat, Repl};
use novapay_core::{AppShell, LatencyProfile, NovaPayConfig};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "novapay", version, about = "NovaPay mobile banking prototype shell")]
struct Cli {
    /// Skip every simulated backend delay.
    #[arg(long, default_value_t = false)]
    instant: bool,
    /// Multiplier applied to the simulated latencies, e.g. 0.5 halves them.
    #[arg(long, env = "NOVAPAY_LATENCY_SCALE")]
    latency_scale: Option<f64>,
    /// JSON configuration file, e.g. {"latency": {"login_ms": 500}}.
    #[arg(long, env = "NOVAPAY_CONFIG")]
    config: Option<PathBuf>,
    /// Print receipts and statements as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn resolve_config(cli: &Cli) -> anyhow::Result<NovaPayConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            NovaPayConfig::from_json(&raw)?
        }
        None => NovaPayConfig::default(),
    };

    if cli.instant {
        config.latency = LatencyProfile::instant();
    } else if let Some(scale) = cli.latency_scale {
        config.latency = config.latency.scaled(scale)?;
    }

    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "novapay=info,warn".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    info!(latency = ?config.latency, "novapay shell starting");

    let shell = AppShell::with_operations(simulated_operations(&config.latency));
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let interactive = std::io::stdin().is_terminal();

    let mut repl = Repl::new(shell, std::io::stdout(), format).with_prompt(interactive);
    repl.run(BufReader::new(tokio::io::stdin())).await?;

    info!("novapay shell stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_overrides_scale() {
        let cli = Cli::parse_from(["novapay", "--instant", "--latency-scale", "3"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.latency, LatencyProfile::instant());
    }

    #[test]
    fn scale_applies_to_defaults() {
        let cli = Cli::parse_from(["novapay", "--latency-scale", "0.5"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.latency.login_ms, 900);
        assert_eq!(config.latency.processing_ms, 1_000);
    }

    #[test]
    fn negative_scale_is_rejected() {
        let cli = Cli::parse_from(["novapay", "--latency-scale=-1"]);
        assert!(resolve_config(&cli).is_err());
    }
}
