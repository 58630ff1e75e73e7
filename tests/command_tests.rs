use std::fs;
use wperf_studio::aggregator::aggregate;
use wperf_studio::commands::decorate::{load_sample, render_hottest};
use wperf_studio::commands::{load_config, RecordArgs};
use wperf_studio::output::{read_sample, write_sample};
use wperf_studio::record::{build_record_command, split_arguments, EventSpec};

const RAW: &str = r#"{"sampling":{"events":[
    {"type":"ld_spec","samples":[{"symbol":"main","count":8,"overhead":100}],
     "annotate":[{"function_name":"main","source_code":[
        {"filename":"a.c","line_number":1,"hits":2},
        {"filename":"a.c","line_number":9,"hits":6}
     ]}]}
]}}"#;

#[test]
fn test_record_args_to_options() {
    let args = RecordArgs {
        events: vec![EventSpec::new("ld_spec")],
        core: 3,
        target: vec!["app.exe".to_string(), "-n".to_string(), "5".to_string()],
        timeout: Some(2),
        ..Default::default()
    };

    let options = args.to_options().unwrap();
    assert_eq!(options.command, "app.exe");
    assert_eq!(split_arguments(&options.arguments).unwrap(), vec!["-n", "5"]);
    assert_eq!(options.core, 3);
    assert_eq!(options.timeout_seconds, Some(2));
    assert!(!options.disassemble_enabled);
}

#[test]
fn test_target_arguments_with_spaces_survive() {
    let args = RecordArgs {
        events: vec![EventSpec::new("ld_spec")],
        target: vec!["app.exe".to_string(), "C:\\My Files\\in.txt".to_string()],
        ..Default::default()
    };

    let options = args.to_options().unwrap();
    let line = build_record_command(std::path::Path::new("wperf"), &options, false).unwrap();
    let separator = line.args.iter().position(|a| a == "--").unwrap();

    assert_eq!(
        line.args[separator + 1..].to_vec(),
        vec!["app.exe", "C:\\My Files\\in.txt"]
    );
}

#[test]
fn test_record_args_without_target() {
    let args = RecordArgs {
        events: vec![EventSpec::new("ld_spec")],
        ..Default::default()
    };

    assert!(args.to_options().is_err());
}

#[test]
fn test_load_sample_accepts_raw_and_recorded() {
    let dir = tempfile::tempdir().unwrap();

    let raw_path = dir.path().join("raw.json");
    fs::write(&raw_path, RAW).unwrap();
    let sample = load_sample(&raw_path).unwrap();
    assert_eq!(sample.total_count, 8);

    let recorded_path = dir.path().join("out/sample.json");
    write_sample(&sample, &recorded_path).unwrap();
    assert_eq!(load_sample(&recorded_path).unwrap(), sample);
    assert_eq!(read_sample(&recorded_path).unwrap(), sample);
}

#[test]
fn test_load_sample_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "##!@#!").unwrap();

    assert!(load_sample(&path).is_err());
}

#[test]
fn test_render_hottest_sorts_by_hits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.json");
    fs::write(&path, RAW).unwrap();

    let decorations = aggregate(&load_sample(&path).unwrap());
    let table = render_hottest(&decorations, 1);

    assert!(table.contains("a.c:9 (main)"));
    assert!(!table.contains("a.c:1 "));
    assert!(table.contains("75.00%"));
}

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wperf-studio.toml");
    fs::write(&path, "recent_events_capacity = 8\noutput_dir = \"samples\"\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.recent_events_capacity, 8);
    assert_eq!(config.output_dir, std::path::PathBuf::from("samples"));
    assert!(config.version_check);
}
