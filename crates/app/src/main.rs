#![forbid(unsafe_code)]

use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing_subscriber::EnvFilter;

use services::{
    ApiClient, ApiConfig, AuthService, PreferencesService, QuizService, QuizTakingService,
    SessionManager, SubjectService, UserService,
};
use storage::{ClientStore, InMemoryStore};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

struct Args {
    api_url: Option<String>,
    db_url: String,
    volatile_only: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <base_url>] [--db <sqlite_url>] [--volatile]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api http://127.0.0.1:8000/api/");
    eprintln!("  --db  sqlite:quizdesk.sqlite3");
    eprintln!();
    eprintln!("  --volatile  keep credentials in memory only (no database file)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZDESK_API_BASE_URL, QUIZDESK_DB_URL");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_url = None;
        let mut db_url = std::env::var("QUIZDESK_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quizdesk.sqlite3".into(), normalize_sqlite_url);
        let mut volatile_only = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api_url = Some(value);
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--volatile" => volatile_only = true,
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
            volatile_only,
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

struct DesktopApp {
    auth: Arc<AuthService>,
    users: Arc<UserService>,
    quizzes: Arc<QuizService>,
    quiz_taking: Arc<QuizTakingService>,
    subjects: Arc<SubjectService>,
    preferences: Arc<PreferencesService>,
}

impl UiApp for DesktopApp {
    fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    fn users(&self) -> Arc<UserService> {
        Arc::clone(&self.users)
    }

    fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    fn quiz_taking(&self) -> Arc<QuizTakingService> {
        Arc::clone(&self.quiz_taking)
    }

    fn subjects(&self) -> Arc<SubjectService> {
        Arc::clone(&self.subjects)
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut iter = std::env::args().skip(1);
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut config = ApiConfig::from_env()?;
    if let Some(raw) = parsed.api_url {
        let mut raw = raw;
        if !raw.ends_with('/') {
            raw.push('/');
        }
        config.base_url = reqwest::Url::parse(&raw)
            .map_err(|_| ArgsError::InvalidApiUrl { raw: raw.clone() })?;
    }
    tracing::info!(api = %config.base_url, "starting");

    // The durable scope survives restarts ("stay signed in"); the volatile
    // scope lives only as long as the process.
    let durable_store = if parsed.volatile_only {
        ClientStore::in_memory()
    } else {
        prepare_sqlite_file(&parsed.db_url)?;
        ClientStore::sqlite(&parsed.db_url).await?
    };
    let volatile = Arc::new(InMemoryStore::new());

    let session = Arc::new(SessionManager::new(
        Arc::clone(&durable_store.credentials),
        volatile,
    ));
    let api = Arc::new(ApiClient::with_default_transport(config, session)?);

    let users = Arc::new(UserService::new(Arc::clone(&api)));
    let auth = Arc::new(AuthService::new(Arc::clone(&api), Arc::clone(&users)));
    let quizzes = Arc::new(QuizService::new(Arc::clone(&api)));
    let quiz_taking = Arc::new(QuizTakingService::new(Arc::clone(&quizzes)));
    let subjects = Arc::new(SubjectService::new(Arc::clone(&api)));
    let preferences = Arc::new(PreferencesService::new(Arc::clone(
        &durable_store.preferences,
    )));

    let app = DesktopApp {
        auth,
        users,
        quizzes,
        quiz_taking,
        subjects,
        preferences,
    };
    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("QuizDesk")
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
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
