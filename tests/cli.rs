//! End-to-end tests for the `npk` binary

use std::path::PathBuf;
use std::process::{Command, Output};

use npk::model::{InferenceBackend, NutrientRegressor};
use npk::{Config, DataConfig, ModelConfig};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("npk-cli-{}-{}", std::process::id(), name))
}

/// Save a freshly initialised model and return its path (without extension)
fn saved_model(name: &str, config: &ModelConfig) -> String {
    let path = temp_path(name).to_string_lossy().into_owned();
    let device = Default::default();
    NutrientRegressor::<InferenceBackend>::new(&device, config)
        .save(&path)
        .unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    let no_config = temp_path("no-config.toml");
    Command::new(env!("CARGO_BIN_EXE_npk"))
        .arg("--config")
        .arg(&no_config)
        .args(args)
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "expected one line, got {:?}", stdout);
    serde_json::from_str(stdout.trim()).unwrap()
}

#[test]
fn test_no_arguments() {
    let output = run(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "{\"error\": \"Four parameters required: temperature, humidity, ph, rainfall\"}\n"
    );
}

#[test]
fn test_too_few_and_too_many_arguments() {
    for args in [&["20", "80", "6.5"][..], &["20", "80", "6.5", "200", "1"][..]] {
        let output = run(args);
        assert_eq!(output.status.code(), Some(1));
        assert_eq!(
            stdout_json(&output)["error"],
            "Four parameters required: temperature, humidity, ph, rainfall"
        );
    }
}

#[test]
fn test_valid_prediction() {
    let model = saved_model("valid", &ModelConfig::default());
    let output = run(&["--model", model.as_str(), "20", "80", "6.5", "200"]);
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 3);
    for key in ["nitrogen", "phosphorus", "potassium"] {
        assert!(object[key].is_number(), "{} should be numeric", key);
    }
}

#[test]
fn test_invalid_values_exit_zero() {
    let model = saved_model("invalid", &ModelConfig::default());
    let output = run(&["--model", model.as_str(), "abc", "80", "6.5", "200"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({ "error": "Invalid input values" })
    );
}

#[test]
fn test_negative_values_accepted() {
    let model = saved_model("negative", &ModelConfig::default());
    let output = run(&["--model", model.as_str(), "-5", "80", "6.5", "-1.5"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_json(&output)["nitrogen"].is_number());
}

#[test]
fn test_hyphen_prefixed_numbers_accepted() {
    let model = saved_model("hyphen-numbers", &ModelConfig::default());

    let output = run(&["--model", model.as_str(), "-.5", "80", "6.5", "200"]);
    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    for key in ["nitrogen", "phosphorus", "potassium"] {
        assert!(json[key].is_number(), "{} should be numeric: {}", key, json);
    }

    // Non-finite predictions print as null, but the shape is still a success
    let output = run(&["--model", model.as_str(), "20", "80", "6.5", "-inf"]);
    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    let object = json.as_object().unwrap();
    let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, ["nitrogen", "phosphorus", "potassium"]);
}

#[test]
fn test_hyphen_prefixed_text_is_invalid_input() {
    let model = saved_model("hyphen-text", &ModelConfig::default());

    for args in [["20", "80", "6.5", "-abc"], ["-abc", "80", "6.5", "200"]] {
        let mut full = vec!["--model", model.as_str()];
        full.extend(args);
        let output = run(&full);
        assert_eq!(output.status.code(), Some(0), "args: {:?}", args);
        assert_eq!(
            output.stdout,
            b"{\"error\": \"Invalid input values\"}\n",
            "args: {:?}",
            args
        );
    }
}

/// Flags after the first value are counted as values
#[test]
fn test_flags_after_values_are_values() {
    let model = saved_model("trailing-flag", &ModelConfig::default());
    let output = run(&["--model", model.as_str(), "20", "80", "6.5", "200", "-v"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output)["error"],
        "Four parameters required: temperature, humidity, ph, rainfall"
    );
}

/// A leading `--` ends option parsing and is not counted as a value
#[test]
fn test_leading_double_dash_ends_options() {
    let model = saved_model("double-dash", &ModelConfig::default());
    let output = run(&["--model", model.as_str(), "--", "20", "80", "6.5", "200"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_json(&output)["nitrogen"].is_number());
}

#[test]
fn test_model_from_config_file() {
    let model_config = ModelConfig {
        hidden_dims: vec![8],
    };
    let model = saved_model("configured", &model_config);
    let config_path = temp_path("configured.toml");
    Config {
        model: model_config,
        data: DataConfig { model_path: model },
    }
    .save(&config_path.to_string_lossy())
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_npk"))
        .arg("--config")
        .arg(&config_path)
        .args(["20", "80", "6.5", "200"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_json(&output)["potassium"].is_number());
}

/// A missing model is a fatal failure, not a JSON error
#[test]
fn test_missing_model_is_fatal() {
    let missing = temp_path("missing-model").to_string_lossy().into_owned();
    let output = run(&["--model", missing.as_str(), "20", "80", "6.5", "200"]);

    assert_ne!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Model file not found"), "stderr: {}", stderr);
}

/// Argument count is checked before the model is loaded
#[test]
fn test_argument_count_checked_before_model() {
    let missing = temp_path("never-loaded").to_string_lossy().into_owned();
    let output = run(&["--model", missing.as_str(), "20"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_json(&output)["error"].is_string());
}
