//! Wrapper around a [YAML scalar](https://yaml.org/spec/1.2.2/#23-scalars).

use ordered_float::OrderedFloat;

/// The resolved value of a scalar YAML node.
///
/// Which variant a scalar ends up in is decided by the [`Schema`] used to load the document. With
/// the [failsafe schema], every scalar is a [`Scalar::String`].
///
/// [`Schema`]: crate::Schema
/// [failsafe schema]: crate::Schema::failsafe
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Scalar {
    /// A null value ([10.2.1.1 Null](https://yaml.org/spec/1.2.2/#null)).
    ///
    /// This is also the value of empty nodes.
    Null,
    /// A boolean value ([10.2.1.2 Boolean](https://yaml.org/spec/1.2.2/#boolean)).
    Boolean(bool),
    /// An integer value ([10.2.1.3 Integer](https://yaml.org/spec/1.2.2/#integer)).
    Integer(i64),
    /// A floating point value ([10.2.1.4 Floating
    /// Point](https://yaml.org/spec/1.2.2/#floating-point)).
    ///
    /// Wrapped in an [`OrderedFloat`] so that scalars can be hashed and used as mapping keys.
    FloatingPoint(OrderedFloat<f64>),
    /// A string ([10.1.1.3 Generic String](https://yaml.org/spec/1.2.2/#generic-string)).
    String(String),
}

impl Scalar {
    define_yaml_scalar_conversion_ops!();
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::FloatingPoint(OrderedFloat(value))
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
