use std::{fs, path::PathBuf};

use serde_json::Value;
use tempfile::tempdir;

use scenaria::ScenariaError;
use scenaria_cli::{Args, run};

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|crates| crates.parent())
        .expect("crate lives two levels below the workspace root")
        .join("demos")
}

/// Collects all .scn files from a directory
fn collect_scn_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| {
                    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("scn")
                })
                .collect()
        })
        .unwrap_or_default();

    files.sort();
    files
}

fn args(input: &PathBuf, output: &PathBuf, config: Option<&PathBuf>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: config.map(|path| path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_scn_files(demos_dir());
    assert!(!demos.is_empty(), "No demos found in demos/");

    let mut failed = Vec::new();
    for demo in &demos {
        let stem = demo.file_stem().unwrap().to_string_lossy().to_string();
        let output = temp_dir.path().join(format!("{stem}.json"));

        match run(&args(demo, &output, None)) {
            Ok(()) => {
                let json = fs::read_to_string(&output).expect("output should be written");
                let value: Value = serde_json::from_str(&json).expect("output should be JSON");
                assert_eq!(value["name"], stem.as_str());
                assert!(value["actors"].as_array().is_some_and(|a| !a.is_empty()));
            }
            Err(e) => failed.push((demo.clone(), e)),
        }
    }

    if !failed.is_empty() {
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_invalid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_scn_files(demos_dir().join("invalid"));
    assert!(!demos.is_empty(), "No invalid demos found in demos/invalid/");

    for demo in &demos {
        let output = temp_dir.path().join("out.json");
        let result = run(&args(demo, &output, None));
        assert!(
            matches!(result, Err(ScenariaError::Parse { .. })),
            "{} should fail to parse",
            demo.display()
        );
        assert!(!output.exists());
    }
}

#[test]
fn e2e_config_file_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("shop.scn");
    let config = temp_dir.path().join("config.toml");
    let output = temp_dir.path().join("shop.json");

    fs::write(
        &input,
        "agent 'Web' as web is @Blue; @Blue { color: 'blue' }; agent 'Web again' as web;",
    )
    .unwrap();
    fs::write(&config, "[export]\npretty = false\n").unwrap();

    run(&args(&input, &output, Some(&config))).expect("lenient config should accept source");
    let json = fs::read_to_string(&output).unwrap();
    assert!(!json.contains('\n'));
    assert!(json.contains(r#""caption":"Web again""#));

    fs::write(&config, "[parser]\nredeclaration = \"reject\"\n").unwrap();
    let err = run(&args(&input, &output, Some(&config))).unwrap_err();
    let ScenariaError::Parse { err, .. } = err else {
        panic!("expected a parse error");
    };
    assert_eq!(err.diagnostics()[0].code().map(|c| c.as_str()), Some("E301"));
}

#[test]
fn e2e_missing_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("missing.scn");
    let output = temp_dir.path().join("out.json");

    let err = run(&args(&input, &output, None)).unwrap_err();
    assert!(matches!(err, ScenariaError::Io(_)));
}
