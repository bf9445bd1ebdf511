//! Internal helpers for generating code.

/// Generate the conversion and introspection methods of [`Scalar`].
///
/// [`Scalar`]: crate::Scalar
macro_rules! define_yaml_scalar_conversion_ops (
    () => (
// ---------- SCALAR CONVERSIONS ----------
define_as!(as_bool,           bool,              Boolean);
define_as!(as_integer,        i64,               Integer);
define_as_pattern!(as_floating_point, f64 => Self::FloatingPoint(v) => Some(v.into_inner()));

define_as_ref_pattern!(as_str, &str => Self::String(v) => Some(v.as_str()));

define_as_ref_mut!(as_bool_mut,    &mut bool,   Boolean);
define_as_ref_mut!(as_integer_mut, &mut i64,    Integer);
define_as_ref_mut!(as_string_mut,  &mut String, String);

define_into!(into_bool,    bool,   Boolean);
define_into!(into_integer, i64,    Integer);
define_into_pattern!(into_floating_point, f64 => Self::FloatingPoint(v) => Some(v.into_inner()));
define_into!(into_string,  String, String);

// ---------- VARIANT TESTING ----------
define_is!(is_null,           Self::Null);
define_is!(is_boolean,        Self::Boolean(_));
define_is!(is_integer,        Self::Integer(_));
define_is!(is_floating_point, Self::FloatingPoint(_));
define_is!(is_string,         Self::String(_));
    );
);

/// Generate the common methods of a YAML node type.
///
/// The generated methods are:
///  - `as_*` access methods (including ref / ref mut versions for mappings, sequences, strings)
///  - `into_*` conversion methods
///  - `is_*` introspection methods
///  - `or` and `borrowed_or`
///  - `contains_mapping_key`, `as_mapping_get`, `as_mapping_get_mut`
///  - `as_sequence_get` and `as_sequence_get_mut`
///
/// This also calls `define_yaml_object_index_traits_impl`, which creates the [`Index`] and
/// [`IndexMut`] impls.
///
/// The type must provide `as_mapping_get_impl` and `as_mapping_get_mut_impl`.
///
/// [`Index`]: std::ops::Index
/// [`IndexMut`]: std::ops::IndexMut
macro_rules! define_yaml_object_impl (
    (
        $yaml:ty,
        mappingtype = $mappingtype:ty,
        sequencetype = $sequencetype:ty,
        scalartype = { $scalartype:tt },
        selfname = $selfname:literal
    ) => (
impl $yaml {
    // ---------- SCALAR CONVERSIONS ----------
    define_as_pattern!(as_bool,           bool => Self::Value($scalartype::Boolean(v))       => Some(v));
    define_as_pattern!(as_integer,        i64  => Self::Value($scalartype::Integer(v))       => Some(v));
    define_as_pattern!(as_floating_point, f64  => Self::Value($scalartype::FloatingPoint(v)) => Some(v.into_inner()));
    define_as_ref_pattern!(as_str,        &str => Self::Value($scalartype::String(v))        => Some(v.as_str()));

    define_as_ref_mut_pattern!(as_bool_mut,    &mut bool => Self::Value($scalartype::Boolean(ref mut v)) => Some(v));
    define_as_ref_mut_pattern!(as_integer_mut, &mut i64  => Self::Value($scalartype::Integer(ref mut v)) => Some(v));
    define_as_ref_mut_pattern!(as_str_mut,     &mut str  => Self::Value($scalartype::String(ref mut v))  => Some(v.as_mut_str()));

    define_into_pattern!(into_bool,           bool   => Self::Value($scalartype::Boolean(v))       => Some(v));
    define_into_pattern!(into_integer,        i64    => Self::Value($scalartype::Integer(v))       => Some(v));
    define_into_pattern!(into_floating_point, f64    => Self::Value($scalartype::FloatingPoint(v)) => Some(v.into_inner()));
    define_into_pattern!(into_string,         String => Self::Value($scalartype::String(v))        => Some(v));

    // ---------- MAPPING / SEQUENCE CONVERSIONS ----------
    define_as_ref!(as_mapping,          &$mappingtype,      Mapping);
    define_as_ref!(as_sequence,         &$sequencetype,     Sequence);
    define_as_ref!(as_vec,              &$sequencetype,     Sequence);

    define_as_ref_mut!(as_mapping_mut,  &mut $mappingtype,  Mapping);
    define_as_ref_mut!(as_sequence_mut, &mut $sequencetype, Sequence);
    define_as_ref_mut!(as_vec_mut,      &mut $sequencetype, Sequence);

    define_into!(into_mapping,          $mappingtype,       Mapping);
    define_into!(into_vec,              $sequencetype,      Sequence);
    define_into!(into_sequence,         $sequencetype,      Sequence);

    // ---------- VARIANT TESTING ----------
    define_is!(is_boolean,        Self::Value($scalartype::Boolean(_)));
    define_is!(is_integer,        Self::Value($scalartype::Integer(_)));
    define_is!(is_null,           Self::Value($scalartype::Null));
    define_is!(is_floating_point, Self::Value($scalartype::FloatingPoint(_)));
    define_is!(is_string,         Self::Value($scalartype::String(_)));

    define_is!(is_sequence,       Self::Sequence(_));
    define_is!(is_badvalue,       Self::BadValue);
    define_is!(is_mapping,        Self::Mapping(_));
    define_is!(is_value,          Self::Value(_));

    /// If a value is null or otherwise bad (see variants), consume it and
    /// replace it with a given value `other`. Otherwise, return self unchanged.
    ///
    /// ```
    /// # use yarrow::{Scalar, Yaml};
    /// #
    /// assert_eq!(
    ///     Yaml::Value(Scalar::Null).or(Yaml::Value(Scalar::Integer(3))),
    ///     Yaml::Value(Scalar::Integer(3))
    /// );
    /// assert_eq!(
    ///     Yaml::Value(Scalar::Integer(3)).or(Yaml::Value(Scalar::Integer(7))),
    ///     Yaml::Value(Scalar::Integer(3))
    /// );
    /// ```
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::BadValue | Self::Value($scalartype::Null) => other,
            this => this,
        }
    }

    /// See [`Self::or`] for behavior.
    ///
    /// This performs the same operations, but with borrowed values for less linear pipelines.
    #[must_use]
    pub fn borrowed_or<'a>(&'a self, other: &'a Self) -> &'a Self {
        match self {
            Self::BadValue | Self::Value($scalartype::Null) => other,
            this => this,
        }
    }

    /// Check whether `self` is a [`Self::Mapping`] and that it contains the given string key.
    #[must_use]
    pub fn contains_mapping_key(&self, key: &str) -> bool {
        self.as_mapping_get_impl(key).is_some()
    }

    /// Return the value associated to the given string key if `self` is a [`Self::Mapping`].
    ///
    /// # Return
    /// If the variant of `self` is `Self::Mapping` and the mapping contains the key, returns the
    /// value associated with it.
    /// Otherwise, returns `None`.
    #[must_use]
    pub fn as_mapping_get(&self, key: &str) -> Option<&Self> {
        self.as_mapping_get_impl(key)
    }

    /// Mutable version of [`Self::as_mapping_get`].
    #[must_use]
    pub fn as_mapping_get_mut(&mut self, key: &str) -> Option<&mut Self> {
        self.as_mapping_get_mut_impl(key)
    }

    /// Return the value at the given index if `self` is a [`Self::Sequence`].
    #[must_use]
    pub fn as_sequence_get(&self, idx: usize) -> Option<&Self> {
        self.as_sequence().and_then(|seq| seq.get(idx))
    }

    /// Mutable version of [`Self::as_sequence_get`].
    #[must_use]
    pub fn as_sequence_get_mut(&mut self, idx: usize) -> Option<&mut Self> {
        self.as_sequence_mut().and_then(|seq| seq.get_mut(idx))
    }
}

define_yaml_object_index_traits_impl!($yaml, scalartype = { $scalartype }, selfname = $selfname);
    );
);

/// Generate the [`Index`] and [`IndexMut`] impls for a YAML node type.
///
/// This is called by [`define_yaml_object_impl`].
///
/// [`Index`]: std::ops::Index
/// [`IndexMut`]: std::ops::IndexMut
macro_rules! define_yaml_object_index_traits_impl (
    ($yaml:ty, scalartype = { $scalartype:tt }, selfname = $selfname:literal) => (
impl<'key> Index<&'key str> for $yaml {
    type Output = $yaml;

    /// Perform indexing if `self` is a mapping.
    ///
    /// Missing keys and non-mapping nodes yield [`Yaml::BadValue`](crate::Yaml::BadValue), so
    /// that lookups can be chained.
    fn index(&self, idx: &'key str) -> &$yaml {
        self.as_mapping_get_impl(idx).unwrap_or(&BAD_VALUE)
    }
}

impl<'key> IndexMut<&'key str> for $yaml {
    /// Perform indexing if `self` is a mapping.
    ///
    /// # Panics
    /// This function panics if the key given does not exist within `self` or if `self` is not a
    /// mapping.
    fn index_mut(&mut self, idx: &'key str) -> &mut $yaml {
        assert!(
            matches!(self, Self::Mapping(_)),
            "Attempt to index {} with '{idx}' but it's not a mapping", $selfname
        );
        match self.as_mapping_get_mut_impl(idx) {
            Some(value) => value,
            None => panic!("Key '{idx}' not found in {} mapping", $selfname),
        }
    }
}

impl Index<usize> for $yaml {
    type Output = $yaml;

    /// Perform indexing if `self` is a sequence or a mapping.
    ///
    /// On a mapping, this looks up the [`Scalar::Integer`] key `idx`. Anything missing yields
    /// [`Yaml::BadValue`](crate::Yaml::BadValue).
    ///
    /// [`Scalar::Integer`]: crate::Scalar::Integer
    fn index(&self, idx: usize) -> &$yaml {
        match self {
            Self::Sequence(sequence) => sequence.get(idx).unwrap_or(&BAD_VALUE),
            Self::Mapping(mapping) => i64::try_from(idx)
                .ok()
                .and_then(|key| mapping.get(&Self::Value($scalartype::Integer(key))))
                .unwrap_or(&BAD_VALUE),
            _ => &BAD_VALUE,
        }
    }
}

impl IndexMut<usize> for $yaml {
    /// Perform indexing if `self` is a sequence or a mapping.
    ///
    /// # Panics
    /// This function panics if the index given is out of range, if the mapping does not contain
    /// [`Scalar::Integer`]`(idx)` as a key, or if `self` is neither a sequence nor a mapping.
    ///
    /// [`Scalar::Integer`]: crate::Scalar::Integer
    fn index_mut(&mut self, idx: usize) -> &mut $yaml {
        match self {
            Self::Sequence(sequence) => sequence
                .get_mut(idx)
                .unwrap_or_else(|| panic!("Index {idx} out of bounds in {} sequence", $selfname)),
            Self::Mapping(mapping) => {
                let key = i64::try_from(idx).unwrap_or_else(|_| {
                    panic!("Attempt to index {} mapping with overflowing index", $selfname)
                });
                mapping
                    .get_mut(&Self::Value($scalartype::Integer(key)))
                    .unwrap_or_else(|| panic!("Key {idx} not found in {} mapping", $selfname))
            }
            _ => panic!(
                "Attempt to index {} with {idx} but it's not a mapping nor a sequence",
                $selfname
            ),
        }
    }
}
    );
);

// ================================== HIGH-LEVEL DEFINE MACROS ==================================

/// Generate `as_TYPE` methods returning a copy of a variant's payload.
macro_rules! define_as (
    ($fn_name:ident, $t:ident, $variant:ident) => (
define_as_pattern!($fn_name, $t => Self::$variant(v) => Some(v));
    );
);

/// Generate `as_TYPE` methods returning a reference to a variant's payload.
macro_rules! define_as_ref (
    ($fn_name:ident, $t:ty, $variant:ident) => (
define_as_ref_pattern!($fn_name, $t => Self::$variant(ref v) => Some(v));
    );
);

/// Generate `as_TYPE_mut` methods returning a mutable reference to a variant's payload.
macro_rules! define_as_ref_mut (
    ($fn_name:ident, $t:ty, $variant:ident) => (
define_as_ref_mut_pattern!($fn_name, $t => Self::$variant(ref mut v) => Some(v));
    );
);

/// Generate `into_TYPE` methods.
macro_rules! define_into (
    ($fn_name:ident, $t:ty, $variant:ident) => (
define_into_pattern!($fn_name, $t => Self::$variant(v) => Some(v));
    );
);

/// Generate `is_TYPE` methods.
macro_rules! define_is (
    ($fn_name:ident, $variant:pat) => (
/// Check whether the enum contains the given variant.
///
/// # Return
/// If the variant of `self` is `Self::$variant`, return `true`. Otherwise, return `false`.
#[must_use]
pub fn $fn_name(&self) -> bool {
    matches!(self, $variant)
}
    );
);

// ================================== LOW-LEVEL DEFINE MACROS ==================================

/// Generate `as_TYPE` methods from a match arm.
///
/// If matching a variant of `self`, use [`define_as`].
macro_rules! define_as_pattern (
    ($fn_name:ident, $t:ty => $($variant:tt)+ ) => (
/// Get a copy of the inner object if it is a `$t`.
///
/// # Return
/// If the variant of `self` is `Self::$variant`, return `Some($t)` with a copy of the `$t` contained.
/// Otherwise, return `None`.
#[must_use]
pub fn $fn_name(&self) -> Option<$t> {
    match *self {
        $($variant)+,
        _ => None
    }
}
    );
);

/// Generate `as_TYPE` methods returning references from a match arm.
macro_rules! define_as_ref_pattern (
    ($fn_name:ident, $t:ty => $($variant:tt)+) => (
/// Get a reference to the inner object if it is a `$t`.
///
/// # Return
/// If the variant of `self` is `Self::$variant`, return `Some(&$t)` with the `$t` contained. Otherwise,
/// return `None`.
#[must_use]
pub fn $fn_name(&self) -> Option<$t> {
    match self {
        $($variant)+,
        _ => None
    }
}
    );
);

/// Generate `as_TYPE_mut` methods returning mutable references from a match arm.
macro_rules! define_as_ref_mut_pattern (
    ($fn_name:ident, $t:ty => $($variant:tt)+) => (
/// Get a mutable reference to the inner object if it is a `$t`.
///
/// # Return
/// If the variant of `self` is `Self::$variant`, return `Some(&mut $t)` with the `$t` contained.
/// Otherwise, return `None`.
#[must_use]
pub fn $fn_name(&mut self) -> Option<$t> {
    match *self {
        $($variant)+,
        _ => None
    }
}
    );
);

/// Generate `into_TYPE` methods from a match arm.
macro_rules! define_into_pattern (
    ($fn_name:ident, $t:ty => $($variant:tt)+) => (
/// Get the inner object if it is a `$t`.
///
/// # Return
/// If the variant of `self` is `Self::$variant`, return `Some($t)` with the `$t` contained. Otherwise,
/// return `None`.
#[must_use]
pub fn $fn_name(self) -> Option<$t> {
    match self {
        $($variant)+,
        _ => None
    }
}
    );
);
