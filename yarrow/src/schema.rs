//! The type registry used to turn raw nodes into typed values.
//!
//! A [`Schema`] is a set of [`TypeDef`]s. Plain scalars go through the schema's *implicit* types,
//! in order, until one of them recognizes the text. Nodes with an explicit tag (`!!int 3`,
//! `!custom {}`) are looked up by their tag and node kind.

use std::{collections::HashMap, fmt};

use crate::Yaml;

pub(crate) mod core;
pub(crate) mod extra;

/// The prefix the `!!` tag handle expands to.
pub const YAML_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// The kind of a node, as far as tags are concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// A scalar node, including empty nodes.
    Scalar,
    /// A sequence node.
    Sequence,
    /// A mapping node.
    Mapping,
}

impl NodeKind {
    /// Return the kind of the given node, or `None` for [`Yaml::BadValue`].
    #[must_use]
    pub fn of(node: &Yaml) -> Option<NodeKind> {
        match node {
            Yaml::Value(_) => Some(NodeKind::Scalar),
            Yaml::Sequence(_) => Some(NodeKind::Sequence),
            Yaml::Mapping(_) => Some(NodeKind::Mapping),
            Yaml::BadValue => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Scalar => "scalar",
            NodeKind::Sequence => "sequence",
            NodeKind::Mapping => "mapping",
        })
    }
}

/// Check whether a raw node can be represented by a type.
pub type ResolveFn = fn(&Yaml) -> bool;
/// Turn a raw node into its typed value. Only called after a successful [`ResolveFn`].
pub type ConstructFn = fn(Yaml) -> Yaml;

/// A type known to a [`Schema`].
///
/// The functions receive the node as it was read: scalars as [`Scalar::String`], empty nodes as
/// [`Scalar::Null`] and collections with their (already resolved) children.
///
/// ```
/// use yarrow::{NodeKind, Scalar, Schema, TypeDef, Yaml};
///
/// let upper = TypeDef::new("!upper", NodeKind::Scalar)
///     .with_resolve(|raw| raw.is_string())
///     .with_construct(|raw| match raw {
///         Yaml::Value(Scalar::String(s)) => Yaml::string(s.to_uppercase()),
///         other => other,
///     });
/// let schema = Schema::default().extend(vec![], vec![upper]);
/// let options = yarrow::LoadOptions::new().schema(schema);
/// let doc = yarrow::load_with_options("!upper shout", options).unwrap();
/// assert_eq!(doc.as_str(), Some("SHOUT"));
/// ```
///
/// [`Scalar::String`]: crate::Scalar::String
/// [`Scalar::Null`]: crate::Scalar::Null
#[derive(Clone, Debug)]
pub struct TypeDef {
    tag: String,
    kind: NodeKind,
    resolve: ResolveFn,
    construct: ConstructFn,
}

impl TypeDef {
    /// Create a type that accepts every node of its kind and keeps it unchanged.
    pub fn new(tag: impl Into<String>, kind: NodeKind) -> Self {
        TypeDef {
            tag: tag.into(),
            kind,
            resolve: |_| true,
            construct: |raw| raw,
        }
    }

    /// Set the function deciding whether a raw node belongs to this type.
    #[must_use]
    pub fn with_resolve(mut self, resolve: ResolveFn) -> Self {
        self.resolve = resolve;
        self
    }

    /// Set the function building the value of a raw node.
    #[must_use]
    pub fn with_construct(mut self, construct: ConstructFn) -> Self {
        self.construct = construct;
        self
    }

    /// The full tag of the type.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The kind of node the type applies to.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Check whether `raw` can be represented by this type.
    #[must_use]
    pub fn resolve(&self, raw: &Yaml) -> bool {
        (self.resolve)(raw)
    }

    /// Build the value of `raw`.
    #[must_use]
    pub fn construct(&self, raw: Yaml) -> Yaml {
        (self.construct)(raw)
    }
}

/// A set of types used to resolve the nodes of a document.
#[derive(Clone, Debug)]
pub struct Schema {
    /// Types tried, in order, on plain scalars.
    implicit: Vec<TypeDef>,
    /// Every type, keyed by tag, one table per node kind.
    scalar: HashMap<String, TypeDef>,
    sequence: HashMap<String, TypeDef>,
    mapping: HashMap<String, TypeDef>,
    /// Every type, keyed by tag only. Used for empty nodes.
    fallback: HashMap<String, TypeDef>,
}

impl Schema {
    fn empty() -> Self {
        Schema {
            implicit: vec![],
            scalar: HashMap::new(),
            sequence: HashMap::new(),
            mapping: HashMap::new(),
            fallback: HashMap::new(),
        }
    }

    /// The failsafe schema: strings, sequences and mappings only.
    #[must_use]
    pub fn failsafe() -> Self {
        Self::empty().extend(vec![], core::failsafe_types())
    }

    /// The JSON schema: failsafe, plus `null`, `true`/`false` and JSON numbers.
    #[must_use]
    pub fn json() -> Self {
        Self::failsafe().extend(core::json_types(), vec![])
    }

    /// The YAML 1.2 core schema: failsafe, plus the core `null`, `bool`, `int` and `float`
    /// resolvers.
    #[must_use]
    pub fn core() -> Self {
        Self::failsafe().extend(core::core_types(), vec![])
    }

    /// Add types to the schema.
    ///
    /// `implicit` types are tried, after the existing ones, on every plain scalar. `explicit`
    /// types are only used when a node carries their tag. A type registered later replaces an
    /// earlier type with the same tag and kind.
    #[must_use]
    pub fn extend(mut self, implicit: Vec<TypeDef>, explicit: Vec<TypeDef>) -> Self {
        for def in implicit.iter().chain(explicit.iter()) {
            self.table_mut(def.kind).insert(def.tag.clone(), def.clone());
            self.fallback.insert(def.tag.clone(), def.clone());
        }
        self.implicit.extend(implicit);
        self
    }

    fn table_mut(&mut self, kind: NodeKind) -> &mut HashMap<String, TypeDef> {
        match kind {
            NodeKind::Scalar => &mut self.scalar,
            NodeKind::Sequence => &mut self.sequence,
            NodeKind::Mapping => &mut self.mapping,
        }
    }

    /// The types tried on plain scalars, in order.
    #[must_use]
    pub fn implicit_types(&self) -> &[TypeDef] {
        &self.implicit
    }

    /// Look up the type for `tag`.
    ///
    /// `kind` is the kind of the tagged node, or `None` if the node is empty, in which case any
    /// type with that tag matches.
    #[must_use]
    pub fn lookup(&self, kind: Option<NodeKind>, tag: &str) -> Option<&TypeDef> {
        let table = match kind {
            Some(NodeKind::Scalar) => &self.scalar,
            Some(NodeKind::Sequence) => &self.sequence,
            Some(NodeKind::Mapping) => &self.mapping,
            None => &self.fallback,
        };
        table.get(tag).or_else(|| self.fallback.get(tag))
    }
}

impl Default for Schema {
    /// The core schema, plus the `merge` key and the `set`, `omap` and `pairs` collections.
    fn default() -> Self {
        Self::core().extend(vec![extra::merge()], extra::collection_types())
    }
}
