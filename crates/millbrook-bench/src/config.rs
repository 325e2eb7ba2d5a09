use millbrook_core::model::course::{CourseError, HOLES, HoleInfo, TeeOption, standard_tee};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const MAX_HANDICAP_INDEX: f64 = 54.0;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root calibration configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CalibrationConfig {
    pub run_id: String,
    pub ghosts: GhostsConfig,
    #[serde(default)]
    pub course: CourseConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CalibrationConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let mut cfg: CalibrationConfig = read_yaml(path)?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.ghosts.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Ghost sampling configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GhostsConfig {
    pub seed: Option<u64>,
    pub rounds: usize,
    pub handicaps: Vec<f64>,
}

impl GhostsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.rounds == 0 {
            return Err(ValidationError::InvalidField {
                field: "ghosts.rounds".to_string(),
                message: "number of rounds must be greater than zero".to_string(),
            });
        }

        if self.handicaps.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "ghosts.handicaps".to_string(),
                message: "at least one handicap index must be listed".to_string(),
            });
        }

        if let Some(bad) = self
            .handicaps
            .iter()
            .find(|index| !(0.0..=MAX_HANDICAP_INDEX).contains(*index))
        {
            return Err(ValidationError::InvalidField {
                field: "ghosts.handicaps".to_string(),
                message: format!("index {bad} is outside 0..={MAX_HANDICAP_INDEX}"),
            });
        }

        Ok(())
    }
}

/// Course layout used for the simulated rounds.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CourseConfig {
    /// YAML file holding one tee; the standard Millbrook tee when unset.
    #[serde(default)]
    pub tee_file: Option<PathBuf>,
}

impl CourseConfig {
    pub fn load_tee(&self) -> Result<TeeOption, ConfigError> {
        match self.tee_file.as_ref() {
            Some(path) => read_yaml(path),
            None => Ok(standard_tee()),
        }
    }

    /// Ordered holes of the configured tee. Both the hole set and the stroke
    /// index permutation must be complete.
    pub fn holes(&self) -> Result<[HoleInfo; HOLES], ConfigError> {
        let tee = self.load_tee()?;
        let course_err = |source| ConfigError::Course {
            path: self.tee_file.clone().unwrap_or_default(),
            source,
        };
        let holes = tee.ordered_holes().map_err(course_err)?;
        tee.stroke_indexes().map_err(course_err)?;
        Ok(holes)
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

pub(crate) fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Read {
        source,
        path: path.to_path_buf(),
    })?;
    serde_yaml::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
        source,
        path: path.to_path_buf(),
    })
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory that receives `telemetry.jsonl` alongside the summary.
    pub fn telemetry_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
    #[error("unusable course layout in {path:?}: {source}")]
    Course {
        path: PathBuf,
        source: CourseError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. }
            | ConfigError::Course { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASIC_YAML: &str = r#"
run_id: "ghost_smoke"
ghosts:
  seed: 123
  rounds: 16
  handicaps: [0.0, 9.5, 24.0]
outputs:
  jsonl: "bench/out/{run_id}/rounds.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: CalibrationConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.ghosts.handicaps.len(), 3);
        assert!(cfg.course.tee_file.is_none());
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/ghost_smoke/rounds.jsonl")
        );
        assert_eq!(
            outputs.telemetry_dir(),
            PathBuf::from("bench/out/ghost_smoke")
        );
    }

    #[test]
    fn rejects_zero_rounds() {
        let yaml = BASIC_YAML.replace("rounds: 16", "rounds: 0");
        let mut cfg: CalibrationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "ghosts.rounds"
        ));
    }

    #[test]
    fn rejects_out_of_range_handicap() {
        let yaml = BASIC_YAML.replace("24.0", "60.0");
        let mut cfg: CalibrationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("index above 54");
        assert!(err.to_string().contains("60"));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("ghost_smoke", "ghost smoke");
        let mut cfg: CalibrationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn tee_file_is_loaded_and_checked() {
        let mut tee = standard_tee();
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(serde_yaml::to_string(&tee).expect("yaml").as_bytes())
            .expect("write tee");
        let course = CourseConfig {
            tee_file: Some(file.path().to_path_buf()),
        };
        assert_eq!(course.holes().expect("valid tee")[4].stroke_index, 1);

        tee.holes.pop();
        let mut short = tempfile::NamedTempFile::new().expect("temp file");
        short
            .write_all(serde_yaml::to_string(&tee).expect("yaml").as_bytes())
            .expect("write tee");
        let course = CourseConfig {
            tee_file: Some(short.path().to_path_buf()),
        };
        assert!(matches!(course.holes(), Err(ConfigError::Course { .. })));
    }

    #[test]
    fn tee_file_with_repeated_stroke_index_is_rejected() {
        let mut tee = standard_tee();
        tee.holes[0].stroke_index = tee.holes[1].stroke_index;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(serde_yaml::to_string(&tee).expect("yaml").as_bytes())
            .expect("write tee");
        let course = CourseConfig {
            tee_file: Some(file.path().to_path_buf()),
        };
        assert!(tee.ordered_holes().is_ok());
        assert!(matches!(course.holes(), Err(ConfigError::Course { .. })));
    }
}
