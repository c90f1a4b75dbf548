//! cfn-check
//!
//! Runs the configured checks over one CloudFormation template.
//! Exit status: 0 without findings, 1 with findings, 2 on error.

use anyhow::Context;
use cfn_check::{check_str, ChecksConfig, Finding};
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "cfn-check")]
#[command(about = "Static policy checks for CloudFormation templates")]
struct Args {
    /// Template to check (reads stdin when omitted)
    #[arg(short = 't', long)]
    template_file: Option<PathBuf>,

    /// Checks configuration, JSON or TOML (built-in defaults when omitted)
    #[arg(short = 'c', long)]
    checks_file: Option<PathBuf>,

    /// Output format for findings
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn load_config(args: &Args) -> anyhow::Result<ChecksConfig> {
    match &args.checks_file {
        Some(path) => ChecksConfig::load(path)
            .with_context(|| format!("failed to load checks from {}", path.display())),
        None => Ok(ChecksConfig::default()),
    }
}

fn read_template(args: &Args) -> anyhow::Result<String> {
    match &args.template_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display())),
        None => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("failed to read template from stdin")?;
            Ok(json)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<Vec<Finding>> {
    let config = load_config(args)?;
    let template = read_template(args)?;
    debug!(checks = config.len(), bytes = template.len(), "loaded inputs");

    Ok(check_str(&template, &config)?)
}

fn report(findings: &[Finding], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Text => {
            for finding in findings {
                println!("{}", finding);
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(findings)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    let findings = match run(&args) {
        Ok(findings) => findings,
        Err(err) => {
            eprintln!("{:#}", err);
            return ExitCode::from(2);
        }
    };

    if let Err(err) = report(&findings, args.format) {
        eprintln!("{:#}", err);
        return ExitCode::from(2);
    }

    if findings.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
