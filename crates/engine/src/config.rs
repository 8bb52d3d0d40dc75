//! Process-wide configuration.
//!
//! `spec` §5/§9: mode, runs directory, debug flag, and mock-IO are
//! startup-only and threaded through the driver as an immutable record —
//! never read as an ambient singleton mid-run.

use std::path::PathBuf;

/// Gates syntax and quarantine checks at the resolver and registry layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Permissive: template literals pass through, quarantine is ignored.
    Explore,
    /// Strict: template literals rejected, quarantine enforced, mock-IO
    /// may be requested.
    Verify,
    /// Strict: same gates as `Verify`.
    Prod,
}

impl Mode {
    /// Whether this mode rejects `{{ }}` template literals and enforces
    /// the quarantine list.
    pub fn is_strict(&self) -> bool {
        matches!(self, Mode::Verify | Mode::Prod)
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "explore" => Ok(Mode::Explore),
            "verify" => Ok(Mode::Verify),
            "prod" => Ok(Mode::Prod),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Explore => "explore",
            Mode::Verify => "verify",
            Mode::Prod => "prod",
        };
        write!(f, "{s}")
    }
}

/// Immutable configuration for a single engine invocation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub mode: Mode,
    pub mock_io: bool,
    pub dry_run: bool,
    pub runs_dir: PathBuf,
    pub debug_ref: bool,
    pub quarantine_file: Option<PathBuf>,
}

impl EngineConfig {
    /// Build configuration from explicit CLI values, falling back to the
    /// environment variables named in `spec` §5 and defaults from §6.1/§6.2.
    pub fn from_env_and_flags(
        mode_flag: Option<Mode>,
        mock_io_flag: bool,
        dry_run: bool,
        runs_dir_flag: Option<PathBuf>,
        quarantine_file: Option<PathBuf>,
    ) -> Self {
        let mode = mode_flag.unwrap_or_else(|| {
            std::env::var("AUTOMATOR_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Mode::Explore)
        });

        let env_mock_io = std::env::var("AUTOMATOR_MOCK_IO")
            .map(|v| v == "1")
            .unwrap_or(false);
        let mock_io = mock_io_flag || (mode == Mode::Verify && env_mock_io);

        let runs_dir = runs_dir_flag
            .or_else(|| std::env::var("AUTOMATOR_RUNS_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("runs"));

        let debug_ref = std::env::var("AUTOMATOR_DEBUG_REF")
            .map(|v| v == "1")
            .unwrap_or(false);

        Self {
            mode,
            mock_io,
            dry_run,
            runs_dir,
            debug_ref,
            quarantine_file,
        }
    }
}
