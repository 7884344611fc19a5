//! Subcommand implementations

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracksync_core::{RunReport, RunState, Settings, SyncConfig, SyncCoordinator, SyncResult};
use tracksync_document::{DocumentParser, SectionMarkers};
use tracksync_remote::{BoardClient, DocumentSource};

/// Process exit status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every entry synced cleanly
    Clean,
    /// Something in the batch failed
    Failures,
    /// Nothing ran: configuration is unusable
    Fatal,
}

impl ExitStatus {
    /// Status for a finished batch
    #[must_use]
    pub fn from_report(report: &RunReport) -> Self {
        if report.is_clean() {
            Self::Clean
        } else {
            Self::Failures
        }
    }

    /// Numeric process exit code
    #[inline]
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Failures => 1,
            Self::Fatal => 2,
        }
    }
}

/// Options for `tracksync run`
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Tracked-entry configuration file
    pub config: PathBuf,
    /// Run state file
    pub state: PathBuf,
}

/// Load a `.env` file from the working directory or one of its parents
///
/// Variables already set in the process environment are kept. A missing
/// file is not an error.
///
/// # Errors
/// Returns the loader error if a `.env` file exists but cannot be read or
/// parsed.
pub fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// `tracksync run`: load settings and config, sync every entry
pub async fn run(options: &RunOptions) -> ExitStatus {
    let (settings, config) = match prepare(options) {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!(error = %e, "cannot start sync");
            return if e.is_fatal_config() {
                ExitStatus::Fatal
            } else {
                ExitStatus::Failures
            };
        }
    };

    let clients = settings
        .document_source()
        .and_then(|source| settings.board_client().map(|board| (source, board)));
    let (source, board) = match clients {
        Ok(clients) => clients,
        Err(e) => {
            tracing::error!(error = %e, "cannot build http clients");
            return ExitStatus::Fatal;
        }
    };

    let report = run_batch(&source, &board, &config, &options.state).await;
    ExitStatus::from_report(&report)
}

fn prepare(options: &RunOptions) -> SyncResult<(Settings, SyncConfig)> {
    let settings = Settings::from_env()?;
    tracing::debug!(?settings, "loaded settings");
    let config = SyncConfig::load(&options.config)?;
    Ok((settings, config))
}

/// Sync `config` and persist the run state at `state_path`
///
/// A failure to save the state is recorded in the returned report.
pub async fn run_batch(
    source: &dyn DocumentSource,
    board: &dyn BoardClient,
    config: &SyncConfig,
    state_path: &Path,
) -> RunReport {
    let mut state = RunState::load(state_path);
    let coordinator = SyncCoordinator::new(source, board, config.markers.clone());
    let mut report = coordinator.run(config, &mut state).await;

    if let Err(e) = state.save(state_path) {
        report.state_error = Some(e.to_string());
    }

    report.log_summary();
    report
}

/// `tracksync parse`: parse a local document and render it as pretty JSON
///
/// # Errors
/// Fails if the document or the config file cannot be read.
pub fn parse_file(file: &Path, config: Option<&Path>) -> anyhow::Result<String> {
    let markers = match config {
        Some(path) => SyncConfig::load(path)
            .with_context(|| format!("loading section markers from {}", path.display()))?
            .markers,
        None => SectionMarkers::default(),
    };
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let document = DocumentParser::new(markers).parse(&text);
    serde_json::to_string_pretty(&document).context("encoding parsed document")
}
