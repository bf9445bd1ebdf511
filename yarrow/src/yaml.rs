//! YAML objects manipulation utilities.

#![allow(clippy::module_name_repetitions)]

use std::{
    hash::{BuildHasher, Hasher},
    ops::{Index, IndexMut},
};

use hashlink::LinkedHashMap;

use crate::{loader, LoadError, Scalar};

/// A YAML node is stored as this `Yaml` enumeration, which provides an easy way to
/// access your YAML document.
///
/// # Examples
///
/// ```
/// use yarrow::{Scalar, Yaml};
///
/// let doc = yarrow::load("- 1\n- 2\n").unwrap();
/// for v in doc.as_vec().unwrap() {
///     assert!(v.is_integer());
/// }
/// assert_eq!(doc[1], Yaml::Value(Scalar::Integer(2)));
/// ```
#[derive(Clone, PartialEq, PartialOrd, Debug, Eq, Ord, Hash)]
pub enum Yaml {
    /// A scalar, resolved by the schema the document was loaded with.
    Value(Scalar),
    /// YAML sequence, can be accessed as a `Vec`.
    Sequence(Sequence),
    /// YAML mapping, can be accessed as a [`LinkedHashMap`].
    ///
    /// Iteration order will match the order of the keys in the document. Keys may be any node;
    /// complex keys (sequences, mappings) are compared structurally and are sensitive to order.
    Mapping(Mapping),
    /// Accessing a nonexistent node via the [`Index`] trait returns `BadValue`. This simplifies
    /// error handling in the calling code. The loader never produces it.
    BadValue,
}

/// The type contained in the `Yaml::Sequence` variant.
pub type Sequence = Vec<Yaml>;
/// The type contained in the `Yaml::Mapping` variant.
pub type Mapping = LinkedHashMap<Yaml, Yaml>;

static BAD_VALUE: Yaml = Yaml::BadValue;

// This defines most common operations on a YAML object. See macro definition for details.
define_yaml_object_impl!(
    Yaml,
    mappingtype = Mapping,
    sequencetype = Sequence,
    scalartype = { Scalar },
    selfname = "YAML"
);

impl Yaml {
    /// Load the given string as an array of YAML documents, with the default options.
    ///
    /// ```
    /// use yarrow::{Scalar, Yaml};
    ///
    /// let docs = Yaml::load_from_str("First document\n---\n- Second document\n").unwrap();
    /// assert_eq!(docs[0], Yaml::Value(Scalar::String("First document".into())));
    /// assert_eq!(docs[1][0].as_str(), Some("Second document"));
    /// ```
    ///
    /// # Errors
    /// Returns a [`LoadError`] when loading fails.
    pub fn load_from_str(source: &str) -> Result<Vec<Self>, LoadError> {
        loader::load_all(source)
    }

    /// Return the null node.
    #[must_use]
    pub fn null() -> Self {
        Self::Value(Scalar::Null)
    }

    /// Build a string node.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Value(Scalar::String(value.into()))
    }

    /// Return the name of the kind of node, as used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Value(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::BadValue => "bad value",
        }
    }

    /// Take the value out of `self`, leaving a [`Self::BadValue`] in its place.
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::BadValue)
    }

    /// Implementation detail for [`Self::as_mapping_get`], which is generated from a macro.
    #[must_use]
    fn as_mapping_get_impl(&self, key: &str) -> Option<&Self> {
        match self.as_mapping() {
            Some(mapping) => {
                let hash = hash_str_as_yaml_string(key, mapping.hasher().build_hasher());
                mapping
                    .raw_entry()
                    .from_hash(hash, |k| k.as_str().is_some_and(|s| s == key))
                    .map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Implementation detail for [`Self::as_mapping_get_mut`], which is generated from a macro.
    #[must_use]
    fn as_mapping_get_mut_impl(&mut self, key: &str) -> Option<&mut Self> {
        use hashlink::linked_hash_map::RawEntryMut::{Occupied, Vacant};
        match self.as_mapping_mut() {
            Some(mapping) => {
                let hash = hash_str_as_yaml_string(key, mapping.hasher().build_hasher());
                match mapping
                    .raw_entry_mut()
                    .from_hash(hash, |k| k.as_str().is_some_and(|s| s == key))
                {
                    Occupied(entry) => Some(entry.into_mut()),
                    Vacant(_) => None,
                }
            }
            _ => None,
        }
    }
}

impl From<Scalar> for Yaml {
    fn from(value: Scalar) -> Self {
        Self::Value(value)
    }
}

impl IntoIterator for Yaml {
    type Item = Yaml;
    type IntoIter = YamlIter;

    fn into_iter(self) -> Self::IntoIter {
        YamlIter {
            yaml: self.into_vec().unwrap_or_default().into_iter(),
        }
    }
}

/// An iterator over a [`Yaml`] node.
///
/// Iterating a node that is not a sequence yields nothing.
pub struct YamlIter {
    yaml: std::vec::IntoIter<Yaml>,
}

impl Iterator for YamlIter {
    type Item = Yaml;

    fn next(&mut self) -> Option<Yaml> {
        self.yaml.next()
    }
}

/// Hash the given `str` as if it were a [`Scalar::String`] node.
fn hash_str_as_yaml_string<H: Hasher>(key: &str, mut hasher: H) -> u64 {
    use std::hash::Hash;
    let key = Yaml::Value(Scalar::String(key.into()));
    key.hash(&mut hasher);
    hasher.finish()
}
