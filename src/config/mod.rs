use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{config_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// Path to the git config file holding the component keys
    /// (default: `~/.gitconfig`).
    gitconfig: Option<PathBuf>,
    /// Watch-loop poll interval in milliseconds (default: 1000).
    poll_interval_ms: Option<u64>,
    /// Read/write through the `git` binary, dropping to direct file access
    /// when it fails (default: true). false = file access only.
    prefer_tool: Option<bool>,
    /// Log level filter string, e.g. "debug", "info,compd=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured).
    log_format: Option<String>,
}

fn load_toml(config_dir: &Path) -> Option<TomlConfig> {
    let path = config_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            // Logging is not initialized yet — config feeds the subscriber.
            eprintln!(
                "warn: failed to parse {}: {e} — using defaults",
                path.display()
            );
            None
        }
    }
}

// ─── CompdConfig ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CompdConfig {
    /// Git config file holding the component keys.
    pub gitconfig: PathBuf,
    /// Watch-loop poll interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Prefer the `git` binary over direct file access.
    pub prefer_tool: bool,
    /// Log level filter string (default: "info").
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
}

impl CompdConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{config_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        gitconfig: Option<PathBuf>,
        poll_interval_ms: Option<u64>,
        log: Option<String>,
    ) -> Self {
        let toml = load_toml(&default_config_dir()).unwrap_or_default();

        let gitconfig = gitconfig
            .or(toml.gitconfig)
            .unwrap_or_else(default_gitconfig_path);

        let poll_interval_ms = poll_interval_ms
            .or(toml.poll_interval_ms)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        let prefer_tool = toml.prefer_tool.unwrap_or(true);

        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let log_format = std::env::var("COMPD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        Self {
            gitconfig,
            poll_interval_ms,
            prefer_tool,
            log,
            log_format,
        }
    }
}

/// The user's global git config file.
fn default_gitconfig_path() -> PathBuf {
    #[cfg(windows)]
    {
        if let Ok(profile) = std::env::var("USERPROFILE") {
            return PathBuf::from(profile).join(".gitconfig");
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".gitconfig");
    }
    PathBuf::from(".gitconfig")
}

fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/compd
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("compd");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_CONFIG_HOME/compd or ~/.config/compd
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("compd");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config").join("compd");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\compd
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("compd");
        }
    }
    // Fallback
    PathBuf::from(".compd")
}
