use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result, WrapErr};
use mml_core::{
    Conversion, ConvertOptions, Diagnostic, DiagnosticSeverity, Dialect, Milestone, RefLoc,
    convert_with_options,
};
use serde::Serialize;

#[derive(Parser)]
#[command(version, about = "Convert MML text to HTML", long_about = None)]
struct Cli {
    /// Input file; stdin when omitted
    input: Option<PathBuf>,

    /// Dialect JSON describing the markup in use
    #[arg(long, short, env = "MML_DIALECT")]
    dialect: Option<PathBuf>,

    /// Print the conversion as JSON instead of bare HTML
    #[arg(long)]
    json: bool,

    /// Pass the HTML through the allow-list sanitizer
    #[arg(long)]
    sanitized: bool,

    /// Leave `<`, `>` and `&` in the text unescaped
    #[arg(long)]
    no_escape: bool,

    /// Report diagnostics on stderr
    #[arg(long, value_enum)]
    diagnostics: Option<DiagnosticsMode>,

    /// Exit with status 1 when a diagnostic has error severity
    #[arg(long)]
    strict: bool,

    /// More logging; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum DiagnosticsMode {
    Json,
    Pretty,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    html: &'a str,
    milestones: &'a [Milestone],
    pages: Vec<RefLoc<usize>>,
    line_count: usize,
    diagnostics: &'a [Diagnostic],
}

fn main() -> Result<()> {
    init_miette();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let dialect = match &cli.dialect {
        Some(path) => Dialect::from_path(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load dialect {}", path.display()))?,
        None => Dialect::default(),
    };
    let source = read_source(cli.input.as_ref())?;
    tracing::debug!(
        dialect = ?cli.dialect,
        input = ?cli.input,
        bytes = source.len(),
        "input loaded"
    );

    let options = ConvertOptions {
        escape_html: !cli.no_escape,
    };
    let conversion = convert_with_options(&dialect, &source, options);

    if let Some(mode) = cli.diagnostics {
        emit_diagnostics(&conversion.diagnostics, mode)?;
    }

    let html = if cli.sanitized {
        conversion.sanitized_html()
    } else {
        conversion.html.clone()
    };

    if cli.json {
        let output = json_output(&conversion, &html);
        println!(
            "{}",
            serde_json::to_string_pretty(&output).into_diagnostic()?
        );
    } else {
        print!("{}", html);
    }

    if cli.strict && conversion.has_errors() {
        process::exit(1);
    }
    Ok(())
}

fn read_source(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .into_diagnostic()
                .wrap_err("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn json_output<'a>(conversion: &'a Conversion, html: &'a str) -> JsonOutput<'a> {
    JsonOutput {
        html,
        milestones: &conversion.milestones,
        pages: conversion.page_table(),
        line_count: conversion.line_count,
        diagnostics: &conversion.diagnostics,
    }
}

fn emit_diagnostics(diagnostics: &[Diagnostic], mode: DiagnosticsMode) -> Result<()> {
    match mode {
        DiagnosticsMode::Json => {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(diagnostics).into_diagnostic()?
            );
        }
        DiagnosticsMode::Pretty => {
            for diagnostic in diagnostics {
                eprintln!("{}", diagnostic_to_pretty(diagnostic));
            }
        }
    }
    Ok(())
}

fn diagnostic_to_pretty(diagnostic: &Diagnostic) -> String {
    let severity = match diagnostic.severity {
        DiagnosticSeverity::Error => "error",
        DiagnosticSeverity::Warning => "warning",
    };
    let start_line = diagnostic.range.start.line + 1;
    let start_col = diagnostic.range.start.character + 1;
    format!(
        "{}:{}:{} {} {}",
        start_line, start_col, severity, diagnostic.code, diagnostic.message
    )
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("MML_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

fn init_miette() {
    let _ = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .with_cause_chain()
                .context_lines(2)
                .build(),
        )
    }));
}
