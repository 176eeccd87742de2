//! Dataset metadata fields and their flattening into scalar values
//!
//! Dataverse describes every metadata value as a field with a `typeName`, a
//! `typeClass` (`primitive`, `controlledVocabulary` or `compound`), a `multiple`
//! flag and a `value` whose JSON shape depends on the other two. Compound values
//! nest further fields, to any depth.
//!
//! # Implementation Model
//!
//! Decoding and flattening are kept apart:
//!
//! - [`Field::from_json`] validates the raw JSON and builds a [`FieldValue`], a
//!   tagged variant with one case per legal shape. Shapes that do not match their
//!   declared class are rejected with [`FieldError::MalformedShape`]; classes the
//!   decoder does not know are reported as [`FieldError::UnrecognizedTypeClass`].
//! - [`flatten`] turns a decoded field into a single string. It is an exhaustive
//!   match over [`FieldValue`] and cannot fail.
//!
//! Flattened values use three separators: [`VALUE_SEPARATOR`] between the terms
//! of a list, [`SUBFIELD_SEPARATOR`] between the sub-fields of a compound group
//! and [`GROUP_SEPARATOR`] between repeated compound groups.

mod field;
mod flatten;

pub use field::{Field, FieldError, FieldValue, TypeClass};
pub use flatten::{GROUP_SEPARATOR, SUBFIELD_SEPARATOR, VALUE_SEPARATOR, flatten};
