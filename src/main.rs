//! Command-line front end for the translation service.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use site_i18n::I18nError;
use site_i18n::Locale;
use site_i18n::config::{
    ConfigError,
    ConfigManager,
};
use site_i18n::coverage::CoverageReport;
use site_i18n::input::source::{
    BundleSource,
    FsBundleSource,
};
use site_i18n::service::{
    TranslationService,
    ambient_language_tag,
};
use site_i18n::storage::FilePreferenceStore;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// `site-i18n` CLI
#[derive(Debug, Parser)]
#[command(name = "site-i18n", version, about = "Inspect and switch the site's UI language")]
struct Cli {
    /// Site root containing `.site-i18n.json`
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Ambient language tag (defaults to `LC_ALL` / `LC_MESSAGES` / `LANG`)
    #[arg(long)]
    language: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
enum Command {
    /// Print the translation of each key, one per line
    Lookup {
        /// Dot-separated keys, e.g. `hero.title`
        #[arg(required = true)]
        keys: Vec<String>,
        /// Look up in this locale instead of the detected one
        #[arg(long)]
        locale: Option<String>,
        /// Printed instead of the raw key when a key is missing
        #[arg(long)]
        fallback: Option<String>,
    },
    /// Report keys missing relative to the fallback locale
    Check {
        /// Only check this locale
        #[arg(long)]
        locale: Option<String>,
    },
    /// List supported locales
    Locales,
    /// Save a locale as the preferred UI language
    Use {
        /// Locale code, e.g. `de`
        code: String,
    },
}

/// Errors that end the CLI with a failure exit code
#[derive(Error, Debug)]
enum CliError {
    /// `.site-i18n.json` could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Unsupported locale or unreadable bundle
    #[error(transparent)]
    I18n(#[from] I18nError),
    /// stdout closed or unwritable
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Service type wired by the CLI
type SiteService = TranslationService<FsBundleSource, FilePreferenceStore>;

#[tokio::main]
async fn main() -> ExitCode {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            tracing::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

/// Dispatch the parsed command
async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(cli.root.clone()))?;

    let settings = config_manager.get_settings();
    let base_dir = config_manager.base_dir();
    let source = FsBundleSource::new(settings.locales_path(base_dir), settings.bundle_name.clone());
    let store = FilePreferenceStore::new(settings.preference_path(base_dir));
    let service = TranslationService::new(source.clone(), store, settings);

    let ambient = cli.language.or_else(ambient_language_tag);

    match cli.command {
        Command::Lookup { keys, locale, fallback } => {
            lookup(&service, ambient.as_deref(), &keys, locale.as_deref(), fallback.as_deref())
                .await
        }
        Command::Check { locale } => check(&source, service.fallback_locale(), locale.as_deref()).await,
        Command::Locales => list_locales(&service, ambient.as_deref()),
        Command::Use { code } => {
            service.change_language(&code).await?;
            let locale = service.locale();
            let mut out = std::io::stdout().lock();
            writeln!(out, "Language set to {} ({locale})", locale.display_name())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `lookup`: translate keys in the detected (or given) locale
async fn lookup(
    service: &SiteService,
    ambient: Option<&str>,
    keys: &[String],
    locale: Option<&str>,
    fallback: Option<&str>,
) -> Result<ExitCode, CliError> {
    let mut out = std::io::stdout().lock();

    // --locale はプレビューなので設定を保存しない
    if let Some(code) = locale {
        let locale: Locale = code.parse()?;
        let bundle = service.load_bundle(locale).await;
        for key in keys {
            writeln!(out, "{}", bundle.translate(key, fallback))?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    service.start(ambient).await;
    for key in keys {
        let text = match fallback {
            Some(fallback) => service.translate_or(key, fallback),
            None => service.translate(key),
        };
        writeln!(out, "{text}")?;
    }
    Ok(ExitCode::SUCCESS)
}

/// `check`: coverage of each locale against the fallback bundle
async fn check(
    source: &FsBundleSource,
    reference: Locale,
    only: Option<&str>,
) -> Result<ExitCode, CliError> {
    let locales = match only {
        Some(code) => vec![code.parse::<Locale>()?],
        None => Locale::ALL.into_iter().filter(|locale| *locale != reference).collect(),
    };

    let reference_bundle = match source.fetch(reference).await {
        Ok(bundle) => bundle,
        Err(error) => return Err(I18nError::Load(error).into()),
    };

    let mut out = std::io::stdout().lock();
    let mut complete = true;

    for locale in locales {
        let bundle = match source.fetch(locale).await {
            Ok(bundle) => bundle,
            Err(error) => {
                complete = false;
                writeln!(out, "{locale}: unavailable ({error})")?;
                continue;
            }
        };

        let report = CoverageReport::compare(locale, &bundle, reference, &reference_bundle);
        writeln!(
            out,
            "{locale}: {}% ({} of {} keys missing, {} extra)",
            report.coverage_percent(),
            report.missing.len(),
            report.total,
            report.extra.len()
        )?;
        for key in &report.missing {
            writeln!(out, "  missing: {key}")?;
        }
        for key in &report.extra {
            writeln!(out, "  extra:   {key}")?;
        }
        complete &= report.is_complete();
    }

    Ok(if complete { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// `locales`: supported locales, marking the one that would be used
fn list_locales(service: &SiteService, ambient: Option<&str>) -> Result<ExitCode, CliError> {
    let active = service.detect_initial_locale(ambient);
    let mut out = std::io::stdout().lock();

    for info in service.locales() {
        let marker = if info.locale == active { '*' } else { ' ' };
        writeln!(out, "{marker} {:<3} {:<10} {}", info.locale.code(), info.name, info.country_code)?;
    }
    Ok(ExitCode::SUCCESS)
}
