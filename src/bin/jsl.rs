#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use jsl::cli::args::{CliArgs, ColorChoice, OutputFormat};
use jsl::cli::driver::{self, EXIT_ERRORS, Session};
use jsl::cli::reporter::Reporter;

fn main() {
    // Initialize tracing if JSL_LOG or RUST_LOG is set (zero cost otherwise).
    // Supports JSL_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    jsl::tracing_config::init_tracing();

    let args = CliArgs::parse();
    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("jsl: {err:#}");
            std::process::exit(EXIT_ERRORS);
        }
    }
}

fn run(args: &CliArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let session = Session::new(args, &cwd)?;

    let color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            args.format == OutputFormat::Text
                && session.color().unwrap_or(true)
                && std::io::stdout().is_terminal()
        }
    };
    colored::control::set_override(color);
    let reporter = Reporter::new(color, args.format);

    if args.list_warnings {
        println!("{}", reporter.render_warning_list(&session.config));
        return Ok(driver::EXIT_CLEAN);
    }

    let result = driver::run_session(session, args, &cwd)?;
    let output = reporter.render(&result.diagnostics)?;
    if !output.is_empty() {
        println!("{output}");
    }
    if args.format == OutputFormat::Text {
        eprintln!("{}", reporter.summary(&result.diagnostics, result.files.len()));
    }
    Ok(result.exit_code())
}
