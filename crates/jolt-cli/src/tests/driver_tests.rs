use std::sync::Arc;

use jolt_common::diagnostics::{Log, MsgKind};
use jolt_fs::{Dialect, Fs, MockFs, ZipFs};

use crate::driver::scan_entry_points;
use crate::loader::Loader;

fn mock_fs(files: &[(&str, &str)]) -> Arc<dyn Fs> {
    Arc::new(MockFs::new(files, Dialect::UNIX, "/proj"))
}

#[test]
fn scans_clean_entry_points() {
    let fs = mock_fs(&[
        ("/proj/a.js", "let x = 1;\nlet y = 2;\n"),
        ("/proj/b.js", "export default function () {}\n"),
    ]);
    let log = Log::new();
    let result = scan_entry_points(
        &fs,
        &log,
        &["a.js".to_string(), "b.js".to_string()],
        Loader::Default,
    )
    .unwrap();

    assert_eq!(result.sources.len(), 2);
    assert_eq!(result.sources[0].index, 0);
    assert_eq!(result.sources[1].index, 1);
    assert!(log.take_msgs().is_empty());
}

#[test]
fn syntax_errors_land_on_the_log() {
    let fs = mock_fs(&[("/proj/bad.js", "let x = 0b;\n")]);
    let log = Log::new();
    let result = scan_entry_points(&fs, &log, &["bad.js".to_string()], Loader::Js).unwrap();

    // The file was read but its scan stopped at the error
    assert_eq!(result.sources.len(), 1);
    let msgs = log.take_msgs();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].kind, MsgKind::Error);
    assert!(msgs[0].data.text.contains("Invalid number"));
}

#[test]
fn missing_files_are_reported_not_fatal() {
    let fs = mock_fs(&[("/proj/real.js", "1\n")]);
    let log = Log::new();
    let result = scan_entry_points(
        &fs,
        &log,
        &["gone.js".to_string(), "real.js".to_string()],
        Loader::Js,
    )
    .unwrap();

    assert_eq!(result.sources.len(), 1);
    let msgs = log.take_msgs();
    assert_eq!(msgs.len(), 1);
    assert!(msgs[0].data.text.contains("gone.js"));
}

#[test]
fn empty_entry_list_is_an_error() {
    let fs = mock_fs(&[]);
    let log = Log::new();
    assert!(scan_entry_points(&fs, &log, &[], Loader::Default).is_err());
}

#[test]
fn json_loader_applies_json_restrictions() {
    let fs = mock_fs(&[("/proj/data.json", "{\"a\": 'nope'}\n")]);
    let log = Log::new();
    let _ = scan_entry_points(&fs, &log, &["data.json".to_string()], Loader::Json).unwrap();
    let msgs = log.take_msgs();
    assert!(!msgs.is_empty());
    assert!(msgs[0].data.text.contains("double quotes"));
}

#[test]
fn loader_inference_uses_the_extension() {
    // .json via the default loader should also hit JSON mode
    let fs = mock_fs(&[("/proj/data.json", "{\"a\": 'nope'}\n")]);
    let log = Log::new();
    let _ = scan_entry_points(&fs, &log, &["data.json".to_string()], Loader::Default).unwrap();
    assert!(!log.take_msgs().is_empty());
}

#[test]
fn zip_overlay_composes_with_the_driver() {
    // The overlay delegates to the mock for normal paths
    let inner = MockFs::new(&[("/proj/lib.js", "let ok = true;\n")], Dialect::UNIX, "/proj");
    let fs: Arc<dyn Fs> = Arc::new(ZipFs::new(Arc::new(inner)));
    let log = Log::new();
    let result = scan_entry_points(&fs, &log, &["lib.js".to_string()], Loader::Js).unwrap();
    assert_eq!(result.sources.len(), 1);
    assert!(log.take_msgs().is_empty());
}
