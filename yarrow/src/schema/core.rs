//! Types of the failsafe, JSON and core schemas.

use std::sync::OnceLock;

use hashlink::LinkedHashMap;
use ordered_float::OrderedFloat;
use regex::Regex;

use super::{NodeKind, TypeDef};
use crate::{Scalar, Yaml};

/// Return the text of a raw scalar node.
fn text(raw: &Yaml) -> Option<&str> {
    match raw {
        Yaml::Value(Scalar::String(s)) => Some(s),
        _ => None,
    }
}

macro_rules! lazy_regex {
    ($name:ident, $re:literal) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            // The pattern is a literal, checked by the tests below.
            RE.get_or_init(|| Regex::new($re).unwrap_or_else(|e| panic!("{e}")))
        }
    };
}

lazy_regex!(
    core_int,
    r"^([-+]?)(?:0b([01_]*[01][01_]*)|0o([0-7_]*[0-7][0-7_]*)|0x([0-9a-fA-F_]*[0-9a-fA-F][0-9a-fA-F_]*)|([0-9][0-9_]*))$"
);
lazy_regex!(
    core_float,
    r"^(?:[-+]?[0-9][0-9_]*(?:\.[0-9_]*)?(?:[eE][-+]?[0-9]+)?|\.[0-9_]+(?:[eE][-+]?[0-9]+)?|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$"
);
lazy_regex!(json_int, r"^-?(?:0|[1-9][0-9]*)$");
lazy_regex!(json_float, r"^-?(?:0|[1-9][0-9]*)(?:\.[0-9]*)?(?:[eE][-+]?[0-9]+)?$");

fn tag(name: &str) -> String {
    format!("{}{name}", super::YAML_TAG_PREFIX)
}

/// `!!str`, `!!seq` and `!!map`.
pub(crate) fn failsafe_types() -> Vec<TypeDef> {
    vec![
        TypeDef::new(tag("str"), NodeKind::Scalar).with_construct(|raw| match raw {
            Yaml::Value(Scalar::Null) => Yaml::string(""),
            other => other,
        }),
        TypeDef::new(tag("seq"), NodeKind::Sequence).with_construct(|raw| match raw {
            Yaml::Value(Scalar::Null) => Yaml::Sequence(vec![]),
            other => other,
        }),
        TypeDef::new(tag("map"), NodeKind::Mapping).with_construct(|raw| match raw {
            Yaml::Value(Scalar::Null) => Yaml::Mapping(LinkedHashMap::new()),
            other => other,
        }),
    ]
}

/// The JSON schema resolvers.
pub(crate) fn json_types() -> Vec<TypeDef> {
    vec![
        TypeDef::new(tag("null"), NodeKind::Scalar)
            .with_resolve(|raw| raw.is_null() || text(raw) == Some("null"))
            .with_construct(|_| Yaml::null()),
        TypeDef::new(tag("bool"), NodeKind::Scalar)
            .with_resolve(|raw| matches!(text(raw), Some("true" | "false")))
            .with_construct(|raw| Yaml::Value(Scalar::Boolean(text(&raw) == Some("true")))),
        TypeDef::new(tag("int"), NodeKind::Scalar)
            .with_resolve(|raw| {
                text(raw).is_some_and(|s| json_int().is_match(s) && s.parse::<i64>().is_ok())
            })
            .with_construct(|raw| match text(&raw).and_then(|s| s.parse::<i64>().ok()) {
                Some(v) => Yaml::Value(Scalar::Integer(v)),
                None => raw,
            }),
        TypeDef::new(tag("float"), NodeKind::Scalar)
            .with_resolve(|raw| text(raw).is_some_and(|s| json_float().is_match(s)))
            .with_construct(|raw| match text(&raw).and_then(|s| s.parse::<f64>().ok()) {
                Some(v) => Yaml::Value(Scalar::FloatingPoint(OrderedFloat(v))),
                None => raw,
            }),
    ]
}

/// The YAML 1.2 core schema resolvers.
pub(crate) fn core_types() -> Vec<TypeDef> {
    vec![
        TypeDef::new(tag("null"), NodeKind::Scalar)
            .with_resolve(|raw| {
                raw.is_null() || matches!(text(raw), Some("" | "~" | "null" | "Null" | "NULL"))
            })
            .with_construct(|_| Yaml::null()),
        TypeDef::new(tag("bool"), NodeKind::Scalar)
            .with_resolve(|raw| parse_core_bool(text(raw).unwrap_or_default()).is_some())
            .with_construct(|raw| match text(&raw).and_then(parse_core_bool) {
                Some(v) => Yaml::Value(Scalar::Boolean(v)),
                None => raw,
            }),
        TypeDef::new(tag("int"), NodeKind::Scalar)
            .with_resolve(|raw| text(raw).and_then(parse_core_int).is_some())
            .with_construct(|raw| match text(&raw).and_then(parse_core_int) {
                Some(v) => Yaml::Value(Scalar::Integer(v)),
                None => raw,
            }),
        TypeDef::new(tag("float"), NodeKind::Scalar)
            .with_resolve(|raw| text(raw).and_then(parse_core_float).is_some())
            .with_construct(|raw| match text(&raw).and_then(parse_core_float) {
                Some(v) => Yaml::Value(Scalar::FloatingPoint(OrderedFloat(v))),
                None => raw,
            }),
    ]
}

fn parse_core_bool(v: &str) -> Option<bool> {
    match v {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Parse an integer of the core schema.
///
/// Binary (`0b`), octal (`0o`), hexadecimal (`0x`) and decimal notations are accepted, with an
/// optional sign and `_` separators anywhere but at the end. Values not fitting an `i64` are
/// rejected (and end up resolved as floats).
pub(crate) fn parse_core_int(v: &str) -> Option<i64> {
    if v.ends_with('_') {
        return None;
    }
    let caps = core_int().captures(v)?;
    let sign = caps.get(1).map_or("", |m| m.as_str());
    let (digits, radix) = [(2, 2), (3, 8), (4, 16), (5, 10)]
        .into_iter()
        .find_map(|(group, radix)| caps.get(group).map(|m| (m.as_str(), radix)))?;
    let digits: String = sign.chars().chain(digits.chars().filter(|&c| c != '_')).collect();
    i64::from_str_radix(&digits, radix).ok()
}

/// Parse a floating point of the core schema.
///
/// See [10.2.1.4](https://yaml.org/spec/1.2.2/#10214-floating-point) for the definition.
pub(crate) fn parse_core_float(v: &str) -> Option<f64> {
    if v.ends_with('_') || !core_float().is_match(v) {
        return None;
    }
    match v {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ => v.replace('_', "").parse::<f64>().ok(),
    }
}

#[cfg(test)]
mod test {
    use super::{parse_core_float, parse_core_int};

    #[test]
    fn core_int() {
        assert_eq!(parse_core_int("0"), Some(0));
        assert_eq!(parse_core_int("-17"), Some(-17));
        assert_eq!(parse_core_int("+17"), Some(17));
        assert_eq!(parse_core_int("012"), Some(12));
        assert_eq!(parse_core_int("1_000"), Some(1000));
        assert_eq!(parse_core_int("0x_2A"), Some(42));
        assert_eq!(parse_core_int("0o52"), Some(42));
        assert_eq!(parse_core_int("-0b101010"), Some(-42));
        assert_eq!(parse_core_int("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_core_int("9223372036854775808"), None);
        assert_eq!(parse_core_int("1_"), None);
        assert_eq!(parse_core_int("_1"), None);
        assert_eq!(parse_core_int("0x"), None);
        assert_eq!(parse_core_int("0b2"), None);
        assert_eq!(parse_core_int("1.0"), None);
        assert_eq!(parse_core_int(""), None);
    }

    #[test]
    fn core_float() {
        assert_eq!(parse_core_float("1.5"), Some(1.5));
        assert_eq!(parse_core_float("-1_0.5e1"), Some(-105.0));
        assert_eq!(parse_core_float(".5"), Some(0.5));
        assert_eq!(parse_core_float("3."), Some(3.0));
        assert_eq!(parse_core_float("+.inf"), Some(f64::INFINITY));
        assert_eq!(parse_core_float("-.Inf"), Some(f64::NEG_INFINITY));
        assert!(parse_core_float(".NaN").is_some_and(f64::is_nan));
        assert_eq!(parse_core_float("9223372036854775808"), Some(9.223_372_036_854_776e18));
        assert_eq!(parse_core_float("inf"), None);
        assert_eq!(parse_core_float("1e"), None);
        assert_eq!(parse_core_float("."), None);
        assert_eq!(parse_core_float("1.0_"), None);
    }
}
