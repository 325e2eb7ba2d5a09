use std::fs;
use std::path::Path;

use millbrook_bench::calibration::CalibrationRunner;
use millbrook_bench::config::CalibrationConfig;
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn load_config(output_dir: &Path) -> CalibrationConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
ghosts:
  seed: 4242
  rounds: 25
  handicaps: [2.0, 14.0, 28.0]
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("rounds.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: CalibrationConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_digest(dir: &Path) -> String {
    let config = load_config(dir);
    let outputs = config.resolved_outputs();
    let runner = CalibrationRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("calibration completes");

    assert_eq!(summary.handicaps, 3);
    assert_eq!(summary.rows_written, 75);
    assert!(summary.summary_path.exists(), "summary markdown missing");

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    for line in jsonl.lines() {
        let value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        assert_eq!(value["run_id"], "test_smoke");
        assert_eq!(value["scores"].as_array().map(Vec::len), Some(18));
    }

    let mut hasher = Sha256::new();
    hasher.update(jsonl.as_bytes());
    hex::encode(hasher.finalize())
}

#[test]
fn calibration_reruns_are_byte_identical() {
    let first = tempdir().expect("temp dir");
    let second = tempdir().expect("temp dir");
    assert_eq!(run_digest(first.path()), run_digest(second.path()));
}

#[test]
fn summary_orders_handicaps_by_scoring() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path());
    let outputs = config.resolved_outputs();
    let summary = CalibrationRunner::new(config, outputs)
        .expect("runner created")
        .run()
        .expect("calibration completes");

    let means: Vec<f64> = summary
        .analytics
        .handicaps
        .iter()
        .map(|report| report.mean_to_par)
        .collect();
    assert!(means[0] < means[1] && means[1] < means[2]);

    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    assert!(markdown.starts_with("# Ghost Calibration Summary"));
    assert_eq!(markdown.lines().filter(|line| line.starts_with("| ")).count(), 4);
}
