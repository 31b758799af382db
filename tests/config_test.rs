use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::{TempDir, tempdir};

const POST: &str = "# Deploy with Defang\n\nShip your Compose app to AWS.";

fn run_with_config(dir: &TempDir, config_path: &Path, extra_args: &[&str]) -> Output {
    let post = dir.path().join("post.md");
    fs::write(&post, POST).unwrap();

    std::process::Command::new(env!("CARGO_BIN_EXE_defang-seo"))
        .current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .arg(&post)
        .arg("--config")
        .arg(config_path)
        .args(extra_args)
        .output()
        .expect("Failed to execute command")
}

fn stdout_is_json(output: &Output) -> bool {
    serde_json::from_slice::<serde_json::Value>(&output.stdout).is_ok()
}

#[test]
fn test_cli_with_json_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, r#"{ "output": "json", "concurrency": 8 }"#).unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(output.status.success());
    assert!(stdout_is_json(&output), "config should switch output to JSON");
}

#[test]
fn test_cli_with_toml_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "output = \"json\"\ntimeout = 3\n").unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(output.status.success());
    assert!(stdout_is_json(&output));
}

#[test]
fn test_cli_with_yaml_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, "output: json\ncontent_type: markdown\n").unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(output.status.success());
    assert!(stdout_is_json(&output));
}

#[test]
fn test_cli_with_yml_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.yml");
    fs::write(&config_path, "output: json\n").unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(output.status.success());
    assert!(stdout_is_json(&output));
}

#[test]
fn test_cli_args_override_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let report_path = dir.path().join("report.json");
    fs::write(&config_path, r#"{ "output": "text" }"#).unwrap();

    let output = run_with_config(
        &dir,
        &config_path,
        &["--output", "json", "--save", report_path.to_str().unwrap()],
    );

    assert!(output.status.success());
    assert!(report_path.exists());
    assert!(
        String::from_utf8_lossy(&output.stdout).contains("\"overallScore\""),
        "--output should win over the config file"
    );
}

#[test]
fn test_config_save_path_is_used() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    let report_path = dir.path().join("from-config.json");
    fs::write(
        &config_path,
        format!("save = {:?}\n", report_path.to_str().unwrap()),
    )
    .unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(output.status.success());
    assert!(report_path.exists());
}

#[test]
fn test_empty_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, "{}").unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Analysis Report"));
}

#[test]
fn test_cli_with_invalid_config_format() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.txt");
    fs::write(&config_path, "output = json").unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported file format"), "{}", stderr);
}

#[test]
fn test_cli_with_invalid_json_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, "{ invalid json }").unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse JSON"), "{}", stderr);
}

#[test]
fn test_cli_with_invalid_toml_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "output = [unterminated").unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse TOML"), "{}", stderr);
}

#[test]
fn test_cli_with_invalid_yaml_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, "concurrency: \"not a number\"").unwrap();

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse YAML"), "{}", stderr);
}

#[test]
fn test_cli_with_nonexistent_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("nonexistent.json");

    let output = run_with_config(&dir, &config_path, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read file"), "{}", stderr);
}
