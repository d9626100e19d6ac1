use jolt_compat::{Engine, JsFeature, unsupported_js_features};

use crate::targets::parse_target_list;

#[test]
fn parses_engine_version_pairs() {
    let constraints = parse_target_list("es2020,chrome58,node12.19.0").unwrap();
    assert_eq!(constraints.get(&Engine::Es), Some(&vec![2020]));
    assert_eq!(constraints.get(&Engine::Chrome), Some(&vec![58]));
    assert_eq!(constraints.get(&Engine::Node), Some(&vec![12, 19, 0]));
}

#[test]
fn esnext_imposes_no_constraint() {
    let constraints = parse_target_list("esnext").unwrap();
    assert!(constraints.is_empty());
    assert_eq!(
        unsupported_js_features(&constraints),
        JsFeature::empty()
    );
}

#[test]
fn names_are_case_insensitive() {
    let constraints = parse_target_list("Chrome90,SAFARI15").unwrap();
    assert_eq!(constraints.get(&Engine::Chrome), Some(&vec![90]));
    assert_eq!(constraints.get(&Engine::Safari), Some(&vec![15]));
}

#[test]
fn invalid_targets_list_valid_engines() {
    let err = parse_target_list("netscape4").unwrap_err();
    assert!(err.contains("Invalid target"));
    assert!(err.contains("chrome"));
    assert!(err.contains("esnext"));

    assert!(parse_target_list("chrome").is_err());
    assert!(parse_target_list("12").is_err());
}

#[test]
fn parsed_targets_drive_feature_computation() {
    let constraints = parse_target_list("chrome58").unwrap();
    let unsupported = unsupported_js_features(&constraints);
    assert!(unsupported.contains(JsFeature::OPTIONAL_CHAIN));
    assert!(!unsupported.contains(JsFeature::ARROW));
}
