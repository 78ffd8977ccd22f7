use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the jsl binary.
#[derive(Parser, Debug, Default)]
#[command(
    name = "jsl",
    version,
    about = "JavaScript Lint - static analysis for JavaScript and HTML-embedded scripts"
)]
pub struct CliArgs {
    /// Files or directories to lint. Directories are searched for .js, .htm
    /// and .html files.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Path to a jsl.json configuration file. Defaults to ./jsl.json when it
    /// exists.
    #[arg(long = "conf", value_name = "FILE")]
    pub conf: Option<PathBuf>,

    /// JavaScript version used when nothing else selects one (e.g. 1.6).
    #[arg(long = "default-version", value_name = "VERSION")]
    pub default_version: Option<String>,

    /// Source file encoding (utf-8 or latin-1).
    #[arg(long, value_name = "ENCODING")]
    pub encoding: Option<String>,

    /// Extra directory searched for jsl:import targets. May be repeated.
    #[arg(long = "include-dir", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Treat NAME as declared in every script. May be repeated.
    #[arg(long = "declare", value_name = "NAME", value_delimiter = ',')]
    pub declare: Vec<String>,

    /// Enable a warning by name. May be repeated.
    #[arg(long, value_name = "WARNING", value_delimiter = ',')]
    pub enable: Vec<String>,

    /// Disable a warning by name. May be repeated.
    #[arg(long, value_name = "WARNING", value_delimiter = ',')]
    pub disable: Vec<String>,

    /// External parser program implementing the jsl parser protocol.
    #[arg(long, value_name = "PROGRAM")]
    pub parser: Option<PathBuf>,

    /// Argument passed to the parser program before the protocol arguments.
    /// May be repeated.
    #[arg(long = "parser-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub parser_args: Vec<String>,

    /// Glob of files to skip while walking directories. May be repeated.
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// When to color text output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, ignore_case = true)]
    pub color: ColorChoice,

    /// Print every warning name with its current state and exit.
    #[arg(long = "list-warnings")]
    pub list_warnings: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}
