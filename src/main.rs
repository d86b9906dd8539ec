use anyhow::Result;
use clap::{Parser, Subcommand};
use compd::component::{ComponentResolver, GitConfigStore};
use compd::config::CompdConfig;
use compd::status::{status_line, StatusReport};
use compd::{doctor, watch};

#[derive(Parser)]
#[command(
    name = "compd",
    about = "Component tracker — mirrors the latest-changed component from git config into a status line",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the git config file holding the component keys
    #[arg(long, env = "COMPD_GITCONFIG")]
    gitconfig: Option<std::path::PathBuf>,

    /// Watch-loop poll interval in milliseconds
    #[arg(long, env = "COMPD_POLL_MS")]
    poll_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "COMPD_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "COMPD_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Watch the git config and reprint the status line on every change
    /// (default when no subcommand given).
    ///
    /// Runs in the foreground and emits one line per change, so the output
    /// can feed a status-bar widget or a terminal pane.
    ///
    /// Examples:
    ///   compd watch
    ///   compd
    Watch,
    /// Print the current component status line once.
    ///
    /// Examples:
    ///   compd current
    ///   compd current --json
    Current {
        /// Emit a structured JSON report instead of the status line
        #[arg(long)]
        json: bool,
    },
    /// List the recently used components, most recent first.
    ///
    /// The entry matching the current component is marked `(current)`.
    ///
    /// Examples:
    ///   compd recent
    ///   compd recent --json
    Recent {
        /// Emit a structured JSON report instead of plain lines
        #[arg(long)]
        json: bool,
    },
    /// Set the current component and promote it in the recent list.
    ///
    /// Examples:
    ///   compd use api
    Use {
        /// Component name (surrounding whitespace is trimmed)
        component: String,
    },
    /// Run pre-flight environment checks.
    ///
    /// Examples:
    ///   compd doctor
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = CompdConfig::new(args.gitconfig, args.poll_ms, args.log);

    // ── Logging setup ────────────────────────────────────────────────────────
    // Init once — must happen before any tracing calls.
    let _file_guard = setup_logging(&config.log, args.log_file.as_deref(), &config.log_format);

    let store = GitConfigStore::new(&config.gitconfig).with_prefer_tool(config.prefer_tool);
    let resolver = ComponentResolver::new(store);

    match args.command {
        Some(Command::Current { json }) => run_current(&resolver, json).await,
        Some(Command::Recent { json }) => run_recent(&resolver, json).await,
        Some(Command::Use { component }) => run_use(&resolver, &component).await?,
        Some(Command::Doctor) => {
            let results = doctor::run_doctor(resolver.store()).await;
            doctor::print_doctor_results(&results);
            let failed = results.iter().filter(|r| !r.passed).count();
            std::process::exit(if failed == 0 { 0 } else { 1 });
        }
        None | Some(Command::Watch) => {
            watch::run_watch(resolver, config.poll_interval_ms).await?;
        }
    }

    Ok(())
}

// ── compd current ─────────────────────────────────────────────────────────────

async fn run_current(resolver: &ComponentResolver, json: bool) {
    let component = resolver.current().await;
    if json {
        let recent = resolver.recent().await;
        let report = StatusReport::new(component, recent.into_entries());
        println!("{}", serde_json::to_string(&report).unwrap_or_default());
    } else {
        println!("{}", status_line(component.as_deref()));
    }
}

// ── compd recent ──────────────────────────────────────────────────────────────

async fn run_recent(resolver: &ComponentResolver, json: bool) {
    let current = resolver.current().await;
    let recent = resolver.recent().await;

    if json {
        let report = StatusReport::new(current, recent.into_entries());
        println!("{}", serde_json::to_string(&report).unwrap_or_default());
        return;
    }

    if recent.is_empty() {
        println!("no recent components — record one with `compd use <component>`");
        return;
    }

    for entry in recent.iter() {
        let is_current = current
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(entry));
        if is_current {
            println!("{entry} (current)");
        } else {
            println!("{entry}");
        }
    }
}

// ── compd use ─────────────────────────────────────────────────────────────────

async fn run_use(resolver: &ComponentResolver, component: &str) -> Result<()> {
    resolver.set_current(component).await?;
    println!("{}", status_line(resolver.current().await.as_deref()));
    Ok(())
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("compd.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            // Fall back to stdout-only — don't panic on a bad log path.
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
