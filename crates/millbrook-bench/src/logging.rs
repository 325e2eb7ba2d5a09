use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Overrides the configured directives when set, in `EnvFilter` syntax.
pub const LOG_ENV: &str = "MILLBROOK_LOG";

/// Crates whose events land in the telemetry file at the configured level.
const ENGINE_TARGETS: [&str; 2] = ["millbrook_core", "millbrook_bench"];

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Filter directives for a calibration run: engine targets at `level`,
/// everything else at warn.
pub fn default_directives(level: Level) -> String {
    let mut directives = vec![Level::WARN.as_str().to_ascii_lowercase()];
    directives.extend(
        ENGINE_TARGETS
            .iter()
            .map(|target| format!("{target}={}", level.as_str().to_ascii_lowercase())),
    );
    directives.join(",")
}

fn build_filter(logging: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    let level = logging.level().unwrap_or(Level::INFO);
    let directives = default_directives(level);
    EnvFilter::try_new(&directives).with_context(|| format!("parsing log filter `{directives}`"))
}

fn create_telemetry_file(dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    let path = dir.join("telemetry.jsonl");
    let file = File::create(&path)
        .with_context(|| format!("creating telemetry file at {}", path.display()))?;
    Ok((file, path))
}

/// Routes settlement and calibration events to `telemetry.jsonl` beside the
/// summary, one flattened JSON object per event.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let filter = build_filter(logging)?;
    let (file, telemetry_path) = create_telemetry_file(&outputs.telemetry_dir())?;
    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_target(true)
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!(
            target: "millbrook_bench",
            run_id,
            "subscriber already installed; telemetry file stays empty"
        );
    }

    tracing::info!(
        target: "millbrook_bench",
        run_id,
        telemetry = %telemetry_path.display(),
        "structured logging enabled"
    );

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}
