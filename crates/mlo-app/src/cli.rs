use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use mlo_i18n::Translator;

use crate::bootstrap::{AppContext, HeadlessApp, bootstrap};
use crate::config::AppConfig;
use crate::error::{BootstrapError, CliError, Result};
use crate::logging;

#[derive(Debug, Parser)]
#[command(
    name = "mlo",
    about = "Magnetlink Optimizer front-end core: locale, settings, and bootstrap",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file (`.toml` or `.json`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the store files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Language tag to report instead of the system locale.
    #[arg(long, global = true)]
    pub lang: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bootstrap a headless application and print what it mounted (default).
    Boot,

    /// Inspect or change the active locale.
    #[command(subcommand)]
    Locale(LocaleCommand),

    /// Translate a message key in the active locale.
    #[command(name = "t")]
    Translate(TranslateArgs),

    /// Read a persisted setting.
    Get { key: String },

    /// Persist a setting. VALUE is parsed as JSON, else stored as a string.
    Set { key: String, value: String },

    /// Print per-locale key coverage.
    Coverage,
}

#[derive(Debug, Subcommand)]
pub enum LocaleCommand {
    /// Print the detected locale and the available languages.
    Show,
    /// Activate and persist a locale.
    Set { tag: String },
}

#[derive(Debug, Clone, Args)]
pub struct TranslateArgs {
    pub key: String,

    /// Plural count, available to the message as `{count}`.
    #[arg(long)]
    pub count: Option<i64>,

    /// Interpolation argument, repeatable.
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.global)?;
    logging::init(&config.log_filter)?;
    let mut stdout = std::io::stdout().lock();
    execute(cli, config, &mut stdout)
}

/// Run with a default-or-explicit config, without installing logging.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = load_config(&cli.global)?;
    execute(cli, config, out)
}

fn load_config(global: &GlobalArgs) -> Result<AppConfig> {
    match &global.config {
        Some(path) => Ok(AppConfig::load(path)?),
        None => Ok(AppConfig::default()),
    }
}

fn context(
    global: &GlobalArgs,
    config: AppConfig,
) -> std::result::Result<AppContext, BootstrapError> {
    AppContext::from_config(config, global.data_dir.as_deref(), global.lang.as_deref())
}

fn execute(cli: Cli, config: AppConfig, out: &mut dyn Write) -> Result<()> {
    let global = cli.global;
    match cli.command.unwrap_or(Commands::Boot) {
        Commands::Boot => {
            let mut app = HeadlessApp::new();
            let report = bootstrap(&mut app, || {
                let ctx = context(&global, config)?;
                Ok(Rc::new(ctx.registry()))
            });
            writeln!(out, "{report}")?;
            writeln!(out, "{}", app.summary())?;
        }
        Commands::Locale(LocaleCommand::Show) => {
            let ctx = context(&global, config)?;
            let registry = ctx.registry();
            let current = registry.setup();
            for language in registry.available_languages() {
                let marker = if language.code == current { '*' } else { ' ' };
                writeln!(
                    out,
                    "{marker} {:<6} {} ({})",
                    language.code.tag(),
                    language.native_name,
                    language.name
                )?;
            }
        }
        Commands::Locale(LocaleCommand::Set { tag }) => {
            let ctx = context(&global, config)?;
            let registry = ctx.registry();
            let locale = registry.set_active_locale(&tag)?;
            writeln!(out, "locale set to {}", locale.tag())?;
        }
        Commands::Translate(args) => {
            let ctx = context(&global, config)?;
            let registry = ctx.registry();
            registry.initialize_locale();
            let params = parse_params(&args.params)?;
            let params: Vec<(&str, &str)> =
                params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let text = match args.count {
                Some(count) => registry.plural(&args.key, count, &params),
                None => registry.t(&args.key, &params),
            };
            writeln!(out, "{text}")?;
        }
        Commands::Get { key } => {
            let ctx = context(&global, config)?;
            match ctx.store().load(&key) {
                Some(value) => writeln!(out, "{value}")?,
                None => writeln!(out, "null")?,
            }
        }
        Commands::Set { key, value } => {
            let ctx = context(&global, config)?;
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            ctx.store().save(&key, &value);
            writeln!(out, "{key} = {value}")?;
        }
        Commands::Coverage => {
            let ctx = context(&global, config)?;
            let registry = ctx.registry();
            registry.setup();
            let report = registry.coverage_report();
            writeln!(out, "{} keys", report.total_keys)?;
            for coverage in &report.locales {
                writeln!(
                    out,
                    "{:<6} {:>6.1}%  missing {}",
                    coverage.locale.tag(),
                    coverage.coverage_percent,
                    coverage.missing.len()
                )?;
            }
        }
    }
    Ok(())
}

fn parse_params(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
            _ => Err(CliError::invalid(format!("expected NAME=VALUE, got {pair:?}"))),
        })
        .collect()
}
