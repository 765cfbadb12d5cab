use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use shelfcast_datasets::{generate, write_csv};

fn write_sales(dir: &Path, n_days: usize) -> PathBuf {
    let mut rng = SmallRng::seed_from_u64(11);
    let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
    let frame = generate::sales(n_days, start, &mut rng).unwrap();

    let path = dir.join("sales.csv");
    write_csv(&frame, File::create(&path).unwrap()).unwrap();
    path
}

fn shelfcast(data: &Path, output: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shelfcast"))
        .arg("--data")
        .arg(data)
        .arg("--output")
        .arg(output)
        .args(["--n-trees", "20"])
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Checks that `line` is `prefix` followed by a number with `decimals` fractional digits
fn assert_metric(line: &str, prefix: &str, decimals: usize) {
    let value = line
        .strip_prefix(prefix)
        .unwrap_or_else(|| panic!("`{}` does not start with `{}`", line, prefix));
    let (_, fraction) = value.split_once('.').unwrap();

    assert_eq!(fraction.len(), decimals, "{}", line);
    assert!(value.parse::<f64>().unwrap().is_finite(), "{}", line);
}

#[test]
fn prints_progress_and_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sales(dir.path(), 100);
    let model = dir.path().join("model.pkl");

    let output = shelfcast(&data, &model);

    assert!(output.status.success(), "{:?}", output);
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 5, "{:?}", lines);
    assert_eq!(lines[0], "Loaded 100 records");
    assert_eq!(lines[1], "Training model...");
    assert_metric(&lines[2], "RMSE: ", 2);
    assert_metric(&lines[3], "R2 Score: ", 4);
    assert_eq!(lines[4], format!("Model saved to {}", model.display()));
    assert!(fs::metadata(&model).unwrap().len() > 0);
}

#[test]
fn missing_column_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("sales.csv");
    fs::write(
        &data,
        "date,price,sales\n2024-01-01,19.99,120\n2024-01-02,18.50,131\n",
    )
    .unwrap();
    let model = dir.path().join("model.pkl");

    let output = shelfcast(&data, &model);

    assert!(!output.status.success());
    assert_eq!(stdout_lines(&output), vec!["Loaded 2 records"]);
    assert!(!model.exists());
}

#[test]
fn metrics_are_printed_before_persist_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sales(dir.path(), 40);
    let model = dir.path().join("models").join("model.pkl");

    let output = shelfcast(&data, &model);

    assert!(!output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 4, "{:?}", lines);
    assert_metric(&lines[2], "RMSE: ", 2);
    assert_metric(&lines[3], "R2 Score: ", 4);
    assert!(!model.exists());
}

#[test]
fn single_record_fails_without_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("sales.csv");
    fs::write(&data, "date,price,promotion,sales\n2024-01-01,19.99,0,120\n").unwrap();

    let output = shelfcast(&data, &dir.path().join("model.pkl"));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to train"));
}
