use anyhow::{Context, Result};
use jsl_common::JsVersion;
use jsl_lint::{Encoding, LintConfig};
use jsl_parser::CommandParser;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "jsl.json";

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrString {
    Bool(bool),
    String(String),
}

impl BoolOrString {
    fn into_bool<E: serde::de::Error>(self) -> Result<bool, E> {
        match self {
            BoolOrString::Bool(b) => Ok(b),
            BoolOrString::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(E::custom(format!(
                    "invalid boolean value: '{}'. Expected true, false, 'true', or 'false'",
                    s
                ))),
            },
        }
    }
}

/// Deserialize a boolean that may be given as a string ("on", "false", ...).
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BoolOrString>::deserialize(deserializer)?
        .map(BoolOrString::into_bool)
        .transpose()
}

/// `{"warning_name": true | false | "off" | ...}`
fn deserialize_warning_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, BoolOrString>::deserialize(deserializer)?
        .into_iter()
        .map(|(name, value)| Ok((name, value.into_bool::<D::Error>()?)))
        .collect()
}

/// Contents of `jsl.json`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JslConfig {
    #[serde(default)]
    pub default_version: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub include_dirs: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_warning_map")]
    pub warnings: BTreeMap<String, bool>,
    /// Linted when no paths are given on the command line
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub parser: Option<ParserConfig>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub color: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A loaded configuration file and the directory its relative paths are
/// resolved against.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
    pub config: JslConfig,
}

pub fn parse_config(source: &str) -> Result<JslConfig> {
    serde_json::from_str(source).context("failed to parse configuration")
}

pub fn load_config(path: &Path) -> Result<JslConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&source).with_context(|| format!("in {}", path.display()))
}

/// Load `--conf`, or `jsl.json` in `cwd` when it exists. Without either the
/// defaults are used.
pub fn find_and_load(conf: Option<&Path>, cwd: &Path) -> Result<LoadedConfig> {
    let path = match conf {
        Some(conf) => Some(cwd.join(conf)),
        None => Some(cwd.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
    };
    let Some(path) = path else {
        return Ok(LoadedConfig {
            path: None,
            base_dir: cwd.to_path_buf(),
            config: JslConfig::default(),
        });
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config = load_config(&path)?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());
    Ok(LoadedConfig {
        path: Some(path),
        base_dir,
        config,
    })
}

/// Merge the configuration file with command-line arguments. Arguments win:
/// their version and encoding replace the file's, and `--enable`/`--disable`
/// are applied after the file's `warnings`.
pub fn resolve_lint_config(loaded: &LoadedConfig, args: &CliArgs, cwd: &Path) -> Result<LintConfig> {
    let file = &loaded.config;
    let mut config = LintConfig::new();

    if let Some(version) = args
        .default_version
        .as_deref()
        .or(file.default_version.as_deref())
    {
        config.default_version = version
            .parse::<JsVersion>()
            .context("invalid default version")?;
    }

    if let Some(encoding) = args.encoding.as_deref().or(file.encoding.as_deref()) {
        config.encoding = encoding.parse::<Encoding>()?;
    }

    config.include_dirs = file
        .include_dirs
        .iter()
        .map(|dir| loaded.base_dir.join(dir))
        .chain(args.include_dirs.iter().map(|dir| cwd.join(dir)))
        .collect();

    for name in file.declarations.iter().chain(&args.declare) {
        config.declare(name.trim());
    }

    for (name, enabled) in &file.warnings {
        let result = if *enabled {
            config.enable(name)
        } else {
            config.disable(name)
        };
        result.with_context(|| format!("invalid \"warnings\" entry {name:?}"))?;
    }
    for name in &args.enable {
        config.enable(name)?;
    }
    for name in &args.disable {
        config.disable(name)?;
    }

    Ok(config)
}

/// The parser program to run, from `--parser` or the file's `parser` entry.
/// A program path containing a separator is relative to where it was given;
/// a bare name is looked up on `PATH`.
pub fn resolve_parser(loaded: &LoadedConfig, args: &CliArgs, cwd: &Path) -> Option<CommandParser> {
    if let Some(program) = &args.parser {
        let program = if program.components().count() > 1 {
            cwd.join(program)
        } else {
            program.clone()
        };
        return Some(CommandParser::new(program).with_args(args.parser_args.iter().cloned()));
    }

    let parser = loaded.config.parser.as_ref()?;
    let program = Path::new(&parser.program);
    let program = if program.components().count() > 1 {
        loaded.base_dir.join(program)
    } else {
        program.to_path_buf()
    };
    let extra = parser.args.iter().chain(&args.parser_args).cloned();
    Some(CommandParser::new(program).with_args(extra))
}

/// Exclude globs from the file followed by `--exclude`.
pub fn exclude_patterns(loaded: &LoadedConfig, args: &CliArgs) -> Vec<String> {
    loaded
        .config
        .exclude
        .iter()
        .chain(&args.exclude)
        .cloned()
        .collect()
}

/// Paths to lint: the command line's, else the file's `files` resolved
/// against the config directory.
pub fn input_paths(loaded: &LoadedConfig, args: &CliArgs, cwd: &Path) -> Vec<PathBuf> {
    if !args.paths.is_empty() {
        return args.paths.iter().map(|p| cwd.join(p)).collect();
    }
    loaded
        .config
        .files
        .iter()
        .map(|p| loaded.base_dir.join(p))
        .collect()
}
