//! Report normalization tests for the core crate.

use epub_validator_core::{FailureReport, ToolReport, ValidationReport, MESSAGE_SAMPLE_LIMIT};
use serde_json::{json, Value};

fn normalize(raw: Value) -> Value {
    let tool = ToolReport::parse(raw.to_string().as_bytes()).unwrap();
    serde_json::to_value(ValidationReport::from_tool(&tool)).unwrap()
}

#[test]
fn single_warning_is_still_valid() {
    let out = normalize(json!({
        "messages": [
            {"ID": "OPF-086", "severity": "WARNING", "message": "deprecated metadata"}
        ],
        "publication": {"epub-version": "3.0"}
    }));

    assert_eq!(out["valid"], json!(true));
    assert_eq!(out["errors"], json!([]));
    assert_eq!(out["warnings"], json!(["deprecated metadata"]));
    assert_eq!(out["fatals"], json!([]));
    assert_eq!(out["version"], json!("3.0"));
    assert_eq!(out["warningCount"], json!(1));
    assert_eq!(out["errorCount"], json!(0));
    assert_eq!(out["fatalCount"], json!(0));
    assert_eq!(out["messages"][0]["ID"], json!("OPF-086"));
}

#[test]
fn errors_and_fatals_make_report_invalid() {
    let only_error = normalize(json!({
        "messages": [{"severity": "ERROR", "message": "missing mimetype"}]
    }));
    assert_eq!(only_error["valid"], json!(false));
    assert_eq!(only_error["errorCount"], json!(1));

    let only_fatal = normalize(json!({
        "messages": [{"severity": "FATAL", "message": "not a zip"}]
    }));
    assert_eq!(only_fatal["valid"], json!(false));
    assert_eq!(only_fatal["fatals"], json!(["not a zip"]));
}

#[test]
fn counts_match_list_lengths() {
    let severities = ["ERROR", "WARNING", "FATAL", "USAGE", "ERROR", "WARNING", "INFO"];
    let messages: Vec<Value> = severities
        .iter()
        .enumerate()
        .map(|(i, s)| json!({"severity": s, "message": format!("m{i}")}))
        .collect();
    let out = normalize(json!({ "messages": messages }));

    for (list, count) in [
        ("errors", "errorCount"),
        ("warnings", "warningCount"),
        ("fatals", "fatalCount"),
    ] {
        assert_eq!(
            out[list].as_array().unwrap().len() as u64,
            out[count].as_u64().unwrap(),
            "{list} vs {count}"
        );
    }
    assert_eq!(out["errors"], json!(["m0", "m4"]));
    assert_eq!(out["valid"], json!(false));
}

#[test]
fn unclassified_messages_are_relayed_but_not_counted() {
    let out = normalize(json!({
        "messages": [
            {"severity": "USAGE", "message": "consider alt text"},
            {"message": "no severity at all"}
        ]
    }));

    assert_eq!(out["valid"], json!(true));
    assert_eq!(out["errorCount"], json!(0));
    assert_eq!(out["warningCount"], json!(0));
    assert_eq!(out["fatalCount"], json!(0));
    assert_eq!(out["messages"].as_array().unwrap().len(), 2);
}

#[test]
fn message_sample_is_capped() {
    let messages: Vec<Value> = (0..25)
        .map(|i| json!({"severity": "WARNING", "message": format!("w{i}")}))
        .collect();
    let out = normalize(json!({ "messages": messages }));

    let sample = out["messages"].as_array().unwrap();
    assert_eq!(sample.len(), MESSAGE_SAMPLE_LIMIT);
    assert_eq!(sample[0]["message"], json!("w0"));
    assert_eq!(out["warningCount"], json!(25));
}

#[test]
fn missing_fields_use_defaults() {
    let out = normalize(json!({"checker": {"checkerVersion": "5.1.0"}}));
    assert_eq!(out["valid"], json!(true));
    assert_eq!(out["version"], json!("N/A"));
    assert_eq!(out["messages"], json!([]));

    let out = normalize(json!({"messages": "oops", "publication": {}}));
    assert_eq!(out["messages"], json!([]));
    assert_eq!(out["version"], json!("N/A"));
}

#[test]
fn message_without_text_is_empty_string() {
    let out = normalize(json!({"messages": [{"severity": "ERROR"}]}));
    assert_eq!(out["errors"], json!([""]));
}

#[test]
fn failure_report_has_uniform_shape() {
    let out = serde_json::to_value(FailureReport::new("Validation timeout", "too slow")).unwrap();
    assert_eq!(
        out,
        json!({
            "valid": false,
            "error": "Validation timeout",
            "errors": ["too slow"],
            "warnings": [],
            "version": "N/A"
        })
    );
}
