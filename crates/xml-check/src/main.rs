//! xml-check - report XML well-formedness problems

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xml_check::{CheckOptions, DEFAULT_MAX_ERRORS, check_file};
use xml_error_log::{ErrorLog, Severity};

#[derive(Parser, Debug)]
#[command(name = "xml-check")]
#[command(version, about = "Check XML files for well-formedness problems", long_about = None)]
struct Args {
    /// XML files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Do not report a missing XML declaration or encoding
    #[arg(long)]
    no_declaration_check: bool,

    /// Stop checking a file after this many problems (0 = no limit)
    #[arg(long, default_value_t = DEFAULT_MAX_ERRORS)]
    max_errors: usize,

    /// Lowest severity to print (info, warning, error, fatal)
    #[arg(long, default_value = "info", value_parser = parse_severity)]
    min_severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_severity(s: &str) -> std::result::Result<Severity, String> {
    s.parse::<Severity>().map_err(|e| e.to_string())
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xml_check=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut options = CheckOptions::default().with_max_errors(args.max_errors);
    if args.no_declaration_check {
        options = options.without_declaration_check();
    }

    let mut log = ErrorLog::new();
    let mut invalid_files = 0usize;
    let mut reports = Vec::new();

    for path in &args.files {
        log.clear();
        check_file(path, &options, &mut log)
            .with_context(|| format!("Failed to check {}", path.display()))?;

        if log.has_errors() {
            invalid_files += 1;
        }

        let shown = log.iter().filter(|r| r.severity() >= args.min_severity);
        match args.format {
            OutputFormat::Text => {
                for record in shown {
                    println!("{}: {}", path.display(), record);
                }
            }
            OutputFormat::Json => {
                // The summary still counts every record; only the listing is filtered
                let mut report = log.to_json();
                report["file"] = serde_json::json!(path.display().to_string());
                report["records"] = shown.map(|r| r.to_json()).collect();
                reports.push(report);
            }
        }
    }

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    info!(
        files = args.files.len(),
        invalid = invalid_files,
        "check complete"
    );

    Ok(if invalid_files == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
