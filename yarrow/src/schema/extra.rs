//! Types of the default schema that are not part of the core schema.

use std::collections::HashSet;

use super::{NodeKind, TypeDef, YAML_TAG_PREFIX};
use crate::{Scalar, Yaml};

/// The tag of the merge key (`<<`).
pub(crate) const MERGE_TAG: &str = "tag:yaml.org,2002:merge";

/// The `<<` merge key.
///
/// The type itself keeps the key as is: merging is done by the mapping readers, which look at the
/// tag the key resolved to.
pub(crate) fn merge() -> TypeDef {
    TypeDef::new(MERGE_TAG, NodeKind::Scalar).with_resolve(|raw| {
        raw.is_null() || raw.as_str() == Some("<<")
    })
}

/// `!!set`, `!!omap` and `!!pairs`.
pub(crate) fn collection_types() -> Vec<TypeDef> {
    vec![
        TypeDef::new(format!("{YAML_TAG_PREFIX}set"), NodeKind::Mapping)
            .with_resolve(|raw| match raw {
                Yaml::Mapping(map) => map.values().all(Yaml::is_null),
                _ => raw.is_null(),
            }),
        TypeDef::new(format!("{YAML_TAG_PREFIX}omap"), NodeKind::Sequence)
            .with_resolve(resolve_omap),
        TypeDef::new(format!("{YAML_TAG_PREFIX}pairs"), NodeKind::Sequence)
            .with_resolve(|raw| match raw {
                Yaml::Sequence(items) => items.iter().all(single_pair_mapping),
                _ => raw.is_null(),
            })
            .with_construct(construct_pairs),
    ]
}

fn single_pair_mapping(item: &Yaml) -> bool {
    item.as_mapping().is_some_and(|map| map.len() == 1)
}

/// An ordered map is a sequence of single-pair mappings whose keys are unique.
fn resolve_omap(raw: &Yaml) -> bool {
    let Yaml::Sequence(items) = raw else {
        return raw.is_null();
    };
    let mut keys = HashSet::new();
    items.iter().all(|item| {
        single_pair_mapping(item)
            && item
                .as_mapping()
                .and_then(|map| map.keys().next())
                .is_some_and(|key| keys.insert(key))
    })
}

/// Turn a sequence of single-pair mappings into a sequence of `[key, value]` sequences.
fn construct_pairs(raw: Yaml) -> Yaml {
    match raw {
        Yaml::Sequence(items) => Yaml::Sequence(
            items
                .into_iter()
                .flat_map(|item| item.into_mapping().unwrap_or_default())
                .map(|(key, value)| Yaml::Sequence(vec![key, value]))
                .collect(),
        ),
        Yaml::Value(Scalar::Null) => Yaml::Sequence(vec![]),
        other => other,
    }
}
