//! JS feature support table.
//!
//! Data distilled from the caniuse and kangax compatibility tables and the
//! Node changelog. A feature maps each engine to the version ranges in
//! which it works; an engine that is absent never supports the feature.

use bitflags::bitflags;

use crate::{Engine, VersionRange};

bitflags! {
    /// JS syntax features the transforms know how to lower.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct JsFeature: u64 {
        const ARROW = 1 << 0;
        const ARRAY_SPREAD = 1 << 1;
        const ASYNC_AWAIT = 1 << 2;
        const ASYNC_GENERATOR = 1 << 3;
        const BIGINT = 1 << 4;
        const CLASS = 1 << 5;
        const CLASS_FIELD = 1 << 6;
        const CLASS_PRIVATE_FIELD = 1 << 7;
        const CLASS_STATIC_BLOCKS = 1 << 8;
        const CONST_AND_LET = 1 << 9;
        const DEFAULT_ARGUMENT = 1 << 10;
        const DESTRUCTURING = 1 << 11;
        const DYNAMIC_IMPORT = 1 << 12;
        const EXPONENT_OPERATOR = 1 << 13;
        const FOR_AWAIT = 1 << 14;
        const FOR_OF = 1 << 15;
        const GENERATOR = 1 << 16;
        const HASHBANG = 1 << 17;
        const IMPORT_META = 1 << 18;
        const LOGICAL_ASSIGNMENT = 1 << 19;
        const NESTED_REST_BINDING = 1 << 20;
        const NEW_TARGET = 1 << 21;
        const NULLISH_COALESCING = 1 << 22;
        const OBJECT_ACCESSORS = 1 << 23;
        const OBJECT_REST_SPREAD = 1 << 24;
        const OPTIONAL_CATCH_BINDING = 1 << 25;
        const OPTIONAL_CHAIN = 1 << 26;
        const REGEXP_DOT_ALL_FLAG = 1 << 27;
        const REGEXP_LOOKBEHIND_ASSERTIONS = 1 << 28;
        const REGEXP_NAMED_CAPTURE_GROUPS = 1 << 29;
        const REGEXP_STICKY_AND_UNICODE_FLAGS = 1 << 30;
        const REST_ARGUMENT = 1 << 31;
        const TEMPLATE_LITERAL = 1 << 32;
        const TOP_LEVEL_AWAIT = 1 << 33;
        const UNICODE_ESCAPES = 1 << 34;
    }
}

type Entry = (JsFeature, &'static [(Engine, &'static [VersionRange])]);

const fn v(major: u16) -> VersionRange {
    VersionRange::from_start(major, 0, 0)
}

const fn v2(major: u16, minor: u8) -> VersionRange {
    VersionRange::from_start(major, minor, 0)
}

pub(crate) static JS_TABLE: &[Entry] = &[
    (
        JsFeature::ARROW,
        &[
            (Engine::Chrome, &[v(49)]),
            (Engine::Edge, &[v(13)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(45)]),
            (Engine::Ios, &[v(10)]),
            (Engine::Node, &[v(6)]),
            (Engine::Opera, &[v(36)]),
            (Engine::Safari, &[v(10)]),
        ],
    ),
    (
        JsFeature::ARRAY_SPREAD,
        &[
            (Engine::Chrome, &[v(46)]),
            (Engine::Edge, &[v(13)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(36)]),
            (Engine::Ios, &[v(10)]),
            (Engine::Node, &[v(5)]),
            (Engine::Opera, &[v(33)]),
            (Engine::Safari, &[v(10)]),
        ],
    ),
    (
        JsFeature::ASYNC_AWAIT,
        &[
            (Engine::Chrome, &[v(55)]),
            (Engine::Edge, &[v(15)]),
            (Engine::Es, &[v(2017)]),
            (Engine::Firefox, &[v(52)]),
            (Engine::Ios, &[v2(10, 3)]),
            (Engine::Node, &[v2(7, 6)]),
            (Engine::Opera, &[v(42)]),
            (Engine::Safari, &[v2(10, 1)]),
        ],
    ),
    (
        JsFeature::ASYNC_GENERATOR,
        &[
            (Engine::Chrome, &[v(63)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2018)]),
            (Engine::Firefox, &[v(57)]),
            (Engine::Ios, &[v(12)]),
            (Engine::Node, &[v(10)]),
            (Engine::Opera, &[v(50)]),
            (Engine::Safari, &[v(12)]),
        ],
    ),
    (
        JsFeature::BIGINT,
        &[
            (Engine::Chrome, &[v(67)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2020)]),
            (Engine::Firefox, &[v(68)]),
            (Engine::Ios, &[v(14)]),
            (Engine::Node, &[v2(10, 4)]),
            (Engine::Opera, &[v(54)]),
            (Engine::Safari, &[v(14)]),
        ],
    ),
    (
        JsFeature::CLASS,
        &[
            (Engine::Chrome, &[v(49)]),
            (Engine::Edge, &[v(13)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(45)]),
            (Engine::Ios, &[v(9)]),
            (Engine::Node, &[v(6)]),
            (Engine::Opera, &[v(36)]),
            (Engine::Safari, &[v(9)]),
        ],
    ),
    (
        JsFeature::CLASS_FIELD,
        &[
            (Engine::Chrome, &[v(73)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2022)]),
            (Engine::Firefox, &[v(69)]),
            (Engine::Ios, &[v(14)]),
            (Engine::Node, &[v(12)]),
            (Engine::Opera, &[v(60)]),
            (Engine::Safari, &[v(14)]),
        ],
    ),
    (
        JsFeature::CLASS_PRIVATE_FIELD,
        &[
            (Engine::Chrome, &[v(84)]),
            (Engine::Edge, &[v(84)]),
            (Engine::Es, &[v(2022)]),
            (Engine::Firefox, &[v(90)]),
            (Engine::Ios, &[v2(14, 5)]),
            (Engine::Node, &[v2(14, 6)]),
            (Engine::Opera, &[v(70)]),
            (Engine::Safari, &[v2(14, 1)]),
        ],
    ),
    (
        JsFeature::CLASS_STATIC_BLOCKS,
        &[
            (Engine::Chrome, &[v(91)]),
            (Engine::Edge, &[v(94)]),
            (Engine::Es, &[v(2022)]),
            (Engine::Firefox, &[v(93)]),
            (Engine::Ios, &[v2(16, 4)]),
            (Engine::Node, &[v(16)]),
            (Engine::Opera, &[v(80)]),
            (Engine::Safari, &[v2(16, 4)]),
        ],
    ),
    (
        JsFeature::CONST_AND_LET,
        &[
            (Engine::Chrome, &[v(49)]),
            (Engine::Edge, &[v(14)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(51)]),
            (Engine::Ios, &[v(11)]),
            (Engine::Node, &[v(6)]),
            (Engine::Opera, &[v(36)]),
            (Engine::Safari, &[v(11)]),
        ],
    ),
    (
        JsFeature::DEFAULT_ARGUMENT,
        &[
            (Engine::Chrome, &[v(49)]),
            (Engine::Edge, &[v(14)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(53)]),
            (Engine::Ios, &[v(10)]),
            (Engine::Node, &[v(6)]),
            (Engine::Opera, &[v(36)]),
            (Engine::Safari, &[v(10)]),
        ],
    ),
    (
        JsFeature::DESTRUCTURING,
        &[
            (Engine::Chrome, &[v(51)]),
            (Engine::Edge, &[v(18)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(53)]),
            (Engine::Ios, &[v(10)]),
            (Engine::Node, &[v2(6, 5)]),
            (Engine::Opera, &[v(38)]),
            (Engine::Safari, &[v(10)]),
        ],
    ),
    (
        JsFeature::DYNAMIC_IMPORT,
        &[
            (Engine::Chrome, &[v(63)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2020)]),
            (Engine::Firefox, &[v(67)]),
            (Engine::Ios, &[v(11)]),
            (Engine::Node, &[v2(13, 2)]),
            (Engine::Opera, &[v(50)]),
            (Engine::Safari, &[v2(11, 1)]),
        ],
    ),
    (
        JsFeature::EXPONENT_OPERATOR,
        &[
            (Engine::Chrome, &[v(52)]),
            (Engine::Edge, &[v(14)]),
            (Engine::Es, &[v(2016)]),
            (Engine::Firefox, &[v(52)]),
            (Engine::Ios, &[v2(10, 3)]),
            (Engine::Node, &[v(7)]),
            (Engine::Opera, &[v(39)]),
            (Engine::Safari, &[v2(10, 1)]),
        ],
    ),
    (
        JsFeature::FOR_AWAIT,
        &[
            (Engine::Chrome, &[v(63)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2018)]),
            (Engine::Firefox, &[v(57)]),
            (Engine::Ios, &[v(12)]),
            (Engine::Node, &[v(10)]),
            (Engine::Opera, &[v(50)]),
            (Engine::Safari, &[v(12)]),
        ],
    ),
    (
        JsFeature::FOR_OF,
        &[
            (Engine::Chrome, &[v(51)]),
            (Engine::Edge, &[v(15)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(53)]),
            (Engine::Ios, &[v(10)]),
            (Engine::Node, &[v2(6, 5)]),
            (Engine::Opera, &[v(38)]),
            (Engine::Safari, &[v(10)]),
        ],
    ),
    (
        JsFeature::GENERATOR,
        &[
            (Engine::Chrome, &[v(50)]),
            (Engine::Edge, &[v(13)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(53)]),
            (Engine::Ios, &[v(10)]),
            (Engine::Node, &[v(6)]),
            (Engine::Opera, &[v(37)]),
            (Engine::Safari, &[v(10)]),
        ],
    ),
    (
        JsFeature::HASHBANG,
        &[
            (Engine::Chrome, &[v(74)]),
            (Engine::Deno, &[v(1)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2023)]),
            (Engine::Firefox, &[v(67)]),
            (Engine::Ios, &[v2(13, 4)]),
            (Engine::Node, &[v2(12, 5)]),
            (Engine::Opera, &[v(62)]),
            (Engine::Safari, &[v2(13, 1)]),
        ],
    ),
    (
        JsFeature::IMPORT_META,
        &[
            (Engine::Chrome, &[v(64)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2020)]),
            (Engine::Firefox, &[v(62)]),
            (Engine::Ios, &[v(12)]),
            (Engine::Node, &[v2(10, 4)]),
            (Engine::Opera, &[v(51)]),
            (Engine::Safari, &[v2(11, 1)]),
        ],
    ),
    (
        JsFeature::LOGICAL_ASSIGNMENT,
        &[
            (Engine::Chrome, &[v(85)]),
            (Engine::Edge, &[v(85)]),
            (Engine::Es, &[v(2021)]),
            (Engine::Firefox, &[v(79)]),
            (Engine::Ios, &[v(14)]),
            (Engine::Node, &[v(15)]),
            (Engine::Opera, &[v(71)]),
            (Engine::Safari, &[v(14)]),
        ],
    ),
    (
        JsFeature::NESTED_REST_BINDING,
        &[
            (Engine::Chrome, &[v(49)]),
            (Engine::Edge, &[v(14)]),
            (Engine::Es, &[v(2016)]),
            (Engine::Firefox, &[v(47)]),
            (Engine::Ios, &[v2(10, 3)]),
            (Engine::Node, &[v(6)]),
            (Engine::Opera, &[v(36)]),
            (Engine::Safari, &[v2(10, 1)]),
        ],
    ),
    (
        JsFeature::NEW_TARGET,
        &[
            (Engine::Chrome, &[v(46)]),
            (Engine::Edge, &[v(14)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(41)]),
            (Engine::Ios, &[v(10)]),
            (Engine::Node, &[v(5)]),
            (Engine::Opera, &[v(33)]),
            (Engine::Safari, &[v(10)]),
        ],
    ),
    (
        JsFeature::NULLISH_COALESCING,
        &[
            (Engine::Chrome, &[v(80)]),
            (Engine::Edge, &[v(80)]),
            (Engine::Es, &[v(2020)]),
            (Engine::Firefox, &[v(72)]),
            (Engine::Ios, &[v2(13, 4)]),
            (Engine::Node, &[v(14)]),
            (Engine::Opera, &[v(67)]),
            (Engine::Safari, &[v2(13, 1)]),
        ],
    ),
    (
        JsFeature::OBJECT_ACCESSORS,
        &[
            (Engine::Chrome, &[v(5)]),
            (Engine::Edge, &[v(12)]),
            (Engine::Es, &[v(5)]),
            (Engine::Firefox, &[v(2)]),
            (Engine::Ie, &[v(9)]),
            (Engine::Ios, &[v(6)]),
            (Engine::Node, &[v2(0, 4)]),
            (Engine::Opera, &[v2(10, 10)]),
            (Engine::Safari, &[v2(3, 1)]),
        ],
    ),
    (
        JsFeature::OBJECT_REST_SPREAD,
        &[
            (Engine::Chrome, &[v(60)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2018)]),
            (Engine::Firefox, &[v(55)]),
            (Engine::Ios, &[v2(11, 3)]),
            (Engine::Node, &[v2(8, 3)]),
            (Engine::Opera, &[v(47)]),
            (Engine::Safari, &[v2(11, 1)]),
        ],
    ),
    (
        JsFeature::OPTIONAL_CATCH_BINDING,
        &[
            (Engine::Chrome, &[v(66)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2019)]),
            (Engine::Firefox, &[v(58)]),
            (Engine::Ios, &[v2(11, 3)]),
            (Engine::Node, &[v(10)]),
            (Engine::Opera, &[v(53)]),
            (Engine::Safari, &[v2(11, 1)]),
        ],
    ),
    (
        JsFeature::OPTIONAL_CHAIN,
        &[
            (Engine::Chrome, &[v(91)]),
            (Engine::Edge, &[v(91)]),
            (Engine::Es, &[v(2020)]),
            (Engine::Firefox, &[v(74)]),
            (Engine::Ios, &[v2(13, 4)]),
            (Engine::Node, &[v2(16, 1)]),
            (Engine::Opera, &[v(77)]),
            (Engine::Safari, &[v2(13, 1)]),
        ],
    ),
    (
        JsFeature::REGEXP_DOT_ALL_FLAG,
        &[
            (Engine::Chrome, &[v(62)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2018)]),
            (Engine::Firefox, &[v(78)]),
            (Engine::Ios, &[v2(11, 3)]),
            (Engine::Node, &[v2(8, 10)]),
            (Engine::Opera, &[v(49)]),
            (Engine::Safari, &[v2(11, 1)]),
        ],
    ),
    (
        JsFeature::REGEXP_LOOKBEHIND_ASSERTIONS,
        &[
            (Engine::Chrome, &[v(62)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2018)]),
            (Engine::Firefox, &[v(78)]),
            (Engine::Ios, &[v2(16, 4)]),
            (Engine::Node, &[v2(8, 10)]),
            (Engine::Opera, &[v(49)]),
            (Engine::Safari, &[v2(16, 4)]),
        ],
    ),
    (
        JsFeature::REGEXP_NAMED_CAPTURE_GROUPS,
        &[
            (Engine::Chrome, &[v(64)]),
            (Engine::Edge, &[v(79)]),
            (Engine::Es, &[v(2018)]),
            (Engine::Firefox, &[v(78)]),
            (Engine::Ios, &[v2(11, 3)]),
            (Engine::Node, &[v(10)]),
            (Engine::Opera, &[v(51)]),
            (Engine::Safari, &[v2(11, 1)]),
        ],
    ),
    (
        JsFeature::REGEXP_STICKY_AND_UNICODE_FLAGS,
        &[
            (Engine::Chrome, &[v(50)]),
            (Engine::Edge, &[v(13)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(46)]),
            (Engine::Ios, &[v(12)]),
            (Engine::Node, &[v(6)]),
            (Engine::Opera, &[v(37)]),
            (Engine::Safari, &[v(12)]),
        ],
    ),
    (
        JsFeature::REST_ARGUMENT,
        &[
            (Engine::Chrome, &[v(47)]),
            (Engine::Edge, &[v(12)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(43)]),
            (Engine::Ios, &[v(10)]),
            (Engine::Node, &[v(6)]),
            (Engine::Opera, &[v(34)]),
            (Engine::Safari, &[v(10)]),
        ],
    ),
    (
        JsFeature::TEMPLATE_LITERAL,
        &[
            (Engine::Chrome, &[v(41)]),
            (Engine::Edge, &[v(13)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(34)]),
            (Engine::Ios, &[v(13)]),
            (Engine::Node, &[v(10)]),
            (Engine::Opera, &[v(28)]),
            (Engine::Safari, &[v(13)]),
        ],
    ),
    (
        JsFeature::TOP_LEVEL_AWAIT,
        &[
            (Engine::Chrome, &[v(89)]),
            (Engine::Edge, &[v(89)]),
            (Engine::Es, &[v(2022)]),
            (Engine::Firefox, &[v(89)]),
            (Engine::Ios, &[v(15)]),
            (Engine::Node, &[v2(14, 8)]),
            (Engine::Opera, &[v(75)]),
            (Engine::Safari, &[v(15)]),
        ],
    ),
    (
        JsFeature::UNICODE_ESCAPES,
        &[
            (Engine::Chrome, &[v(44)]),
            (Engine::Edge, &[v(12)]),
            (Engine::Es, &[v(2015)]),
            (Engine::Firefox, &[v(53)]),
            (Engine::Ios, &[v(9)]),
            (Engine::Node, &[v(4)]),
            (Engine::Opera, &[v(31)]),
            (Engine::Safari, &[v(9)]),
        ],
    ),
];
