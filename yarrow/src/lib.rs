// Copyright 2015, Yuheng Chen.
// Copyright 2023, Ethiraric.
// See the LICENSE file at the top-level directory of this distribution.

//! A single-pass YAML 1.2 loader in pure Rust.
//!
//! `yarrow` reads YAML text straight into a tree of [`Yaml`] values, without going through an
//! event stream. Scalars are resolved through a [`Schema`]: plain scalars are typed by its implicit
//! types (`null`, booleans, integers, floats), and tagged nodes (`!!int 3`, `!!set {a}`) by the
//! type registered for their tag.
//!
//! # Usage
//!
//! ```
//! use yarrow::Yaml;
//!
//! let doc = yarrow::load(
//!     "
//! defaults: &defaults
//!   retries: 3
//!   verbose: false
//! production:
//!   <<: *defaults
//!   verbose: true
//! ",
//! )
//! .unwrap();
//! assert_eq!(doc["production"]["retries"].as_integer(), Some(3));
//! assert_eq!(doc["production"]["verbose"].as_bool(), Some(true));
//!
//! let docs = yarrow::load_all("--- first\n--- [second]\n").unwrap();
//! assert_eq!(docs[1], Yaml::Sequence(vec![Yaml::string("second")]));
//! ```
//!
//! # Options
//!
//! [`LoadOptions`] sets the schema, the name of the source (reported in errors), the maximal
//! nesting depth, the number of nodes aliases may copy, and a function receiving warnings:
//!
//! ```
//! use yarrow::{LoadOptions, Schema};
//!
//! let options = LoadOptions::new().schema(Schema::failsafe()).filename("inventory.yml");
//! let doc = yarrow::load_with_options("count: 12", options).unwrap();
//! assert_eq!(doc["count"].as_str(), Some("12"));
//! ```
//!
//! # Errors
//!
//! Malformed input fails with a [`ScanError`] (wrapped in a [`LoadError`]) pointing at the
//! offending position:
//!
//! ```
//! let err = yarrow::load("a: 1\na: 2\n").unwrap_err();
//! assert_eq!(err.to_string(), "duplicated mapping key at byte 5 line 2 column 1");
//! ```
//!
//! # Features
//!
//! #### `encoding` (_enabled by default_)
//! Enables [`YamlDecoder`], which loads UTF-8 or UTF-16 byte streams.
//!
//! #### `debug_prints`
//! Traces the parser on the error output, in debug builds, when the `YARROW_DEBUG` environment
//! variable is set.

#![warn(missing_docs, clippy::pedantic)]

#[macro_use]
mod debug;
#[macro_use]
mod macros;

mod char_traits;
mod error;
mod input;
mod loader;
mod parser;
mod scalar;
mod schema;
mod yaml;

// Re-export main components.
pub use crate::error::{Marker, ScanError};
pub use crate::loader::{
    load, load_all, load_all_with, load_all_with_options, load_all_with_options_and,
    load_with_options, LoadError, LoadOptions, DEFAULT_MAX_ALIAS_NODES, DEFAULT_MAX_DEPTH,
};
pub use crate::scalar::Scalar;
pub use crate::schema::{ConstructFn, NodeKind, ResolveFn, Schema, TypeDef, YAML_TAG_PREFIX};
pub use crate::yaml::{Mapping, Sequence, Yaml, YamlIter};

#[cfg(feature = "encoding")]
mod encoding;
#[cfg(feature = "encoding")]
pub use crate::encoding::{YAMLDecodingTrap, YAMLDecodingTrapFn, YamlDecoder};
