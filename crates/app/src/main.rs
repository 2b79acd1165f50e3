use std::fmt;
use std::sync::Arc;

use cogtest_core::session::AdvancePolicy;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, LogicalSize, WindowBuilder};
use services::config::{DEFAULT_VIEWPORT, parse_policy};
use services::{ApiConfig, AppServices, RunLoopConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const LOG_ENV: &str = "COGTEST_LOG";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidPolicy { raw: String },
    InvalidSize { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidPolicy { raw } => {
                write!(f, "invalid --policy value: {raw} (expected immediate or manual)")
            }
            ArgsError::InvalidSize { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_size(raw: String, flag: &'static str) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ArgsError::InvalidSize { flag, raw }),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--api <url>] [--db <sqlite_url>] [--policy immediate|manual] [--width <px>] [--height <px>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api http://127.0.0.1:8000");
    eprintln!("  --db sqlite:cogtest.sqlite3");
    eprintln!("  --policy immediate");
    eprintln!(
        "  --width {} --height {}",
        DEFAULT_VIEWPORT.width, DEFAULT_VIEWPORT.height
    );
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COGTEST_API_URL, COGTEST_API_TIMEOUT_SECS, COGTEST_DB_URL, COGTEST_POLICY, COGTEST_LOG");
}

#[derive(Debug)]
struct Args {
    api_url: Option<String>,
    db_url: String,
    policy: AdvancePolicy,
    width: u32,
    height: u32,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("COGTEST_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("cogtest.sqlite3".into()), normalize_sqlite_url);
        let mut policy = match std::env::var("COGTEST_POLICY") {
            Ok(raw) => parse_policy(&raw).map_err(|_| ArgsError::InvalidPolicy { raw })?,
            Err(_) => AdvancePolicy::Immediate,
        };
        let mut api_url = None;
        let mut width = DEFAULT_VIEWPORT.width;
        let mut height = DEFAULT_VIEWPORT.height;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => api_url = Some(require_value(args, "--api")?),
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--policy" => {
                    let raw = require_value(args, "--policy")?;
                    policy = parse_policy(&raw).map_err(|_| ArgsError::InvalidPolicy { raw })?;
                }
                "--width" => width = parse_size(require_value(args, "--width")?, "--width")?,
                "--height" => height = parse_size(require_value(args, "--height")?, "--height")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api_url,
            db_url,
            policy,
            width,
            height,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let env_var = if std::env::var_os(LOG_ENV).is_some() {
        LOG_ENV
    } else {
        EnvFilter::DEFAULT_ENV
    };
    let env_filter = EnvFilter::builder()
        .with_env_var(env_var)
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let env_api = ApiConfig::from_env()?;
    let api_config = match parsed.api_url.as_deref() {
        Some(url) => ApiConfig::new(url)?.with_timeout(env_api.timeout),
        None => env_api,
    };
    let run_config = RunLoopConfig::default()
        .with_policy(parsed.policy)
        .with_viewport(parsed.width, parsed.height);
    tracing::debug!(
        api = %api_config.base_url,
        db = %parsed.db_url,
        policy = ?parsed.policy,
        "starting"
    );

    // Open + migrate SQLite at startup; the services crate only sees a URL.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, api_config, run_config).await?;

    let app: Arc<dyn UiApp> = Arc::new(services);
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Cogtest")
            .with_inner_size(LogicalSize::new(f64::from(parsed.width), f64::from(parsed.height)))
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
