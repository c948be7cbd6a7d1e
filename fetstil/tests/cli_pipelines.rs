//! End-to-end runs of the file-level entry points.

use fetstil::{bolden_file, extract_widths_file, BoldenOptions, Error};
use fetstil_test_data::{bold, bold_fixture, widths_fixture};
use pretty_assertions::assert_eq;
use write_fonts::{
    read::{FontRef, TableProvider},
    types::GlyphId,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn bolden_writes_a_readable_font() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Regular.ttf");
    let output = dir.path().join("Bold.ttf");
    std::fs::write(&input, bold_fixture().build()).unwrap();

    let report = bolden_file(&input, &output, &BoldenOptions::default()).unwrap();
    assert_eq!(report.outlines, 3);

    let data = std::fs::read(&output).unwrap();
    let font = FontRef::new(&data).unwrap();
    let hmtx = font.hmtx().unwrap();
    assert_eq!(hmtx.advance(GlyphId::new(bold::A)), Some(600));
    assert_eq!(hmtx.advance(GlyphId::new(bold::B)), Some(700));
    assert_eq!(hmtx.advance(GlyphId::new(bold::AACUTE)), Some(500));
    assert_eq!(font.maxp().unwrap().num_glyphs(), 6);
}

#[test]
fn bolden_then_extract_widths() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let regular = dir.path().join("Regular.ttf");
    let bold_path = dir.path().join("Bold.ttf");
    let json = dir.path().join("widths.json");
    std::fs::write(&regular, bold_fixture().build()).unwrap();

    bolden_file(&regular, &bold_path, &BoldenOptions::with_offset(50)).unwrap();
    let table = extract_widths_file(&bold_path, &json, false).unwrap();

    // space 300, A 550, Aacute stays 500, B and O 650
    let written = std::fs::read_to_string(&json).unwrap();
    assert_eq!(written, r#"{"300":[32],"500":[193],"550":[65],"650":[66,79]}"#);
    assert_eq!(table.width_of('A' as u32), Some(550));
}

#[test]
fn widths_file_matches_in_memory_table() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("font.ttf");
    let output = dir.path().join("widths.json");
    std::fs::write(&input, widths_fixture().build()).unwrap();

    let table = extract_widths_file(&input, &output, true).unwrap();
    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, table.to_json(true).unwrap());
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, serde_json::json!({"500": [65, 913], "600": [66]}));
}

#[test]
fn missing_input_reports_path() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nope.ttf");
    let output = dir.path().join("out.ttf");

    let err = bolden_file(&input, &output, &BoldenOptions::default()).unwrap_err();
    match &err {
        Error::Io { path, .. } => assert_eq!(path, &input),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("nope.ttf"));
    assert!(!output.exists());
}

#[test]
fn garbage_input_is_not_a_font() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("garbage.ttf");
    let output = dir.path().join("widths.json");
    std::fs::write(&input, b"definitely not a font").unwrap();

    let err = extract_widths_file(&input, &output, false).unwrap_err();
    assert!(matches!(err, Error::InvalidFont { .. }), "{err:?}");
    assert!(!output.exists());
}

#[test]
fn failed_bolden_leaves_no_output() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Regular.ttf");
    let output = dir.path().join("Bold.ttf");
    std::fs::write(&input, bold_fixture().build()).unwrap();

    let err = bolden_file(&input, &output, &BoldenOptions::with_offset(0)).unwrap_err();
    assert!(matches!(err, Error::InvalidOffset));
    assert!(!output.exists());
}
