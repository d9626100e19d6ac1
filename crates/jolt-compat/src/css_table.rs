//! CSS feature support table.
//!
//! Same shape as the JS table. ES and Node never appear here: they are
//! script targets and place no constraint on stylesheets.

use bitflags::bitflags;

use crate::{Engine, VersionRange};

bitflags! {
    /// CSS syntax features the transforms know how to lower.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CssFeature: u32 {
        const COLOR_FUNCTIONS = 1 << 0;
        const GRADIENT_DOUBLE_POSITION = 1 << 1;
        const GRADIENT_INTERPOLATION = 1 << 2;
        const HEX_RGBA = 1 << 3;
        const HWB = 1 << 4;
        /// Set only by explicit configuration (`--supported:inline-style`),
        /// never inferred from engine versions
        const INLINE_STYLE = 1 << 5;
        const INSET_PROPERTY = 1 << 6;
        const IS_PSEUDO_CLASS = 1 << 7;
        const MODERN_RGB_HSL = 1 << 8;
        const NESTING = 1 << 9;
        const REBECCA_PURPLE = 1 << 10;
    }
}

type Entry = (CssFeature, &'static [(Engine, &'static [VersionRange])]);

const fn v(major: u16) -> VersionRange {
    VersionRange::from_start(major, 0, 0)
}

const fn v2(major: u16, minor: u8) -> VersionRange {
    VersionRange::from_start(major, minor, 0)
}

pub(crate) static CSS_TABLE: &[Entry] = &[
    (
        CssFeature::COLOR_FUNCTIONS,
        &[
            (Engine::Chrome, &[v(111)]),
            (Engine::Edge, &[v(111)]),
            (Engine::Firefox, &[v(113)]),
            (Engine::Ios, &[v2(15, 4)]),
            (Engine::Opera, &[v(97)]),
            (Engine::Safari, &[v2(15, 4)]),
        ],
    ),
    (
        CssFeature::GRADIENT_DOUBLE_POSITION,
        &[
            (Engine::Chrome, &[v(72)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Firefox, &[v(83)]),
            (Engine::Ios, &[v2(12, 2)]),
            (Engine::Opera, &[v(60)]),
            (Engine::Safari, &[v2(12, 1)]),
        ],
    ),
    (
        CssFeature::GRADIENT_INTERPOLATION,
        &[
            (Engine::Chrome, &[v(111)]),
            (Engine::Edge, &[v(111)]),
            (Engine::Ios, &[v2(16, 2)]),
            (Engine::Opera, &[v(97)]),
            (Engine::Safari, &[v2(16, 2)]),
        ],
    ),
    (
        CssFeature::HEX_RGBA,
        &[
            (Engine::Chrome, &[v(62)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Firefox, &[v(49)]),
            (Engine::Ios, &[v2(9, 3)]),
            (Engine::Opera, &[v(49)]),
            (Engine::Safari, &[v(10)]),
        ],
    ),
    (
        CssFeature::HWB,
        &[
            (Engine::Chrome, &[v(101)]),
            (Engine::Edge, &[v(101)]),
            (Engine::Firefox, &[v(96)]),
            (Engine::Ios, &[v(15)]),
            (Engine::Opera, &[v(87)]),
            (Engine::Safari, &[v(15)]),
        ],
    ),
    // INLINE_STYLE has no engine data on purpose; see the flag docs
    (
        CssFeature::INSET_PROPERTY,
        &[
            (Engine::Chrome, &[v(87)]),
            (Engine::Edge, &[v(87)]),
            (Engine::Firefox, &[v(66)]),
            (Engine::Ios, &[v2(14, 5)]),
            (Engine::Opera, &[v(73)]),
            (Engine::Safari, &[v2(14, 1)]),
        ],
    ),
    (
        CssFeature::IS_PSEUDO_CLASS,
        &[
            (Engine::Chrome, &[v(88)]),
            (Engine::Edge, &[v(88)]),
            (Engine::Firefox, &[v(78)]),
            (Engine::Ios, &[v(14)]),
            (Engine::Opera, &[v(75)]),
            (Engine::Safari, &[v(14)]),
        ],
    ),
    (
        CssFeature::MODERN_RGB_HSL,
        &[
            (Engine::Chrome, &[v(66)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Firefox, &[v(52)]),
            (Engine::Ios, &[v2(12, 2)]),
            (Engine::Opera, &[v(53)]),
            (Engine::Safari, &[v2(12, 1)]),
        ],
    ),
    (
        CssFeature::NESTING,
        &[
            (Engine::Chrome, &[v(120)]),
            (Engine::Edge, &[v(120)]),
            (Engine::Firefox, &[v(117)]),
            (Engine::Ios, &[v2(17, 2)]),
            (Engine::Opera, &[v(106)]),
            (Engine::Safari, &[v2(17, 2)]),
        ],
    ),
    (
        CssFeature::REBECCA_PURPLE,
        &[
            (Engine::Chrome, &[v(38)]),
            (Engine::Edge, &[v(12)]),
            (Engine::Firefox, &[v(33)]),
            (Engine::Ie, &[v(11)]),
            (Engine::Ios, &[v(8)]),
            (Engine::Opera, &[v(25)]),
            (Engine::Safari, &[v(9)]),
        ],
    ),
];
