//! Engine and feature compatibility tables for the jolt bundler.
//!
//! For each syntax feature, the tables record the engine version ranges
//! that support it. Given the user's target constraints, the bundler
//! computes the set of features that at least one target engine lacks and
//! hands it to the down-leveling transforms.

use rustc_hash::FxHashMap;

pub mod version;
pub use version::{ParsedVersion, Version, compare_versions, parse_version};

mod js_table;
pub use js_table::JsFeature;

mod css_table;
pub use css_table::CssFeature;

/// A target engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Engine {
    Chrome,
    Deno,
    Edge,
    /// An ECMAScript language edition (`es2020`); the "version" is the year
    Es,
    Firefox,
    Hermes,
    Ie,
    Ios,
    Node,
    Opera,
    Rhino,
    Safari,
}

impl Engine {
    pub const ALL: &'static [Engine] = &[
        Engine::Chrome,
        Engine::Deno,
        Engine::Edge,
        Engine::Es,
        Engine::Firefox,
        Engine::Hermes,
        Engine::Ie,
        Engine::Ios,
        Engine::Node,
        Engine::Opera,
        Engine::Rhino,
        Engine::Safari,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Engine::Chrome => "chrome",
            Engine::Deno => "deno",
            Engine::Edge => "edge",
            Engine::Es => "es",
            Engine::Firefox => "firefox",
            Engine::Hermes => "hermes",
            Engine::Ie => "ie",
            Engine::Ios => "ios",
            Engine::Node => "node",
            Engine::Opera => "opera",
            Engine::Rhino => "rhino",
            Engine::Safari => "safari",
        }
    }

    /// Look up an engine by its lowercase name.
    pub fn from_name(name: &str) -> Option<Engine> {
        Engine::ALL.iter().copied().find(|e| e.name() == name)
    }
}

/// A half-open supported range: `[start, end)`, open-ended when `end` is
/// absent.
#[derive(Clone, Copy, Debug)]
pub struct VersionRange {
    pub start: Version,
    pub end: Option<Version>,
}

impl VersionRange {
    pub const fn from_start(major: u16, minor: u8, patch: u8) -> VersionRange {
        VersionRange {
            start: Version::new(major, minor, patch),
            end: None,
        }
    }

    pub const fn bounded(start: Version, end: Version) -> VersionRange {
        VersionRange {
            start,
            end: Some(end),
        }
    }
}

/// The user's target constraints: engine version parts per engine.
pub type Constraints = FxHashMap<Engine, Vec<u32>>;

/// Is version `v` inside some range of `ranges`?
fn is_version_supported(ranges: &[VersionRange], v: &[u32]) -> bool {
    ranges.iter().any(|range| {
        range.start.compare_to_parts(v) != std::cmp::Ordering::Greater
            && match range.end {
                Some(end) => end.compare_to_parts(v) == std::cmp::Ordering::Greater,
                None => true,
            }
    })
}

/// Compute the JS features unsupported by at least one target engine.
///
/// An engine with no table entry for a feature does not support it at any
/// version.
pub fn unsupported_js_features(constraints: &Constraints) -> JsFeature {
    let mut unsupported = JsFeature::empty();
    for (feature, engines) in js_table::JS_TABLE {
        for (engine, version) in constraints {
            let ranges = engines
                .iter()
                .find(|(e, _)| e == engine)
                .map(|(_, ranges)| *ranges);
            match ranges {
                Some(ranges) if is_version_supported(ranges, version) => {}
                _ => unsupported |= *feature,
            }
        }
    }
    unsupported
}

/// Compute the CSS features unsupported by at least one target engine.
///
/// ES and Node are script targets, not style engines, so they never
/// constrain CSS. `InlineStyle` is set only by explicit configuration,
/// never inferred here.
pub fn unsupported_css_features(constraints: &Constraints) -> CssFeature {
    let mut unsupported = CssFeature::empty();
    for (feature, engines) in css_table::CSS_TABLE {
        if *feature == CssFeature::INLINE_STYLE {
            continue;
        }
        for (engine, version) in constraints {
            if matches!(engine, Engine::Es | Engine::Node) {
                continue;
            }
            let ranges = engines
                .iter()
                .find(|(e, _)| e == engine)
                .map(|(_, ranges)| *ranges);
            match ranges {
                Some(ranges) if is_version_supported(ranges, version) => {}
                _ => unsupported |= *feature,
            }
        }
    }
    unsupported
}

#[cfg(test)]
#[path = "tests/compat_tests.rs"]
mod tests;
