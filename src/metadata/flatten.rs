use super::{Field, FieldValue};

/// Separator between the terms of a list value.
pub const VALUE_SEPARATOR: &str = ", ";

/// Separator between the sub-fields of one compound group.
pub const SUBFIELD_SEPARATOR: &str = " - ";

/// Separator between repeated compound groups.
pub const GROUP_SEPARATOR: &str = " ; ";

/// Flatten a metadata field into a single string.
///
/// - primitive values are returned verbatim
/// - lists and vocabulary terms are joined with [`VALUE_SEPARATOR`]
/// - a compound group joins its flattened sub-fields with [`SUBFIELD_SEPARATOR`]
/// - repeated compound groups are joined with [`GROUP_SEPARATOR`]
///
/// Sub-fields go through the same dispatch, so nested lists and nested compounds
/// flatten the same way at any depth. Empty sequences produce an empty string and a
/// trailing group or sub-field separator is never left on the result.
#[must_use]
pub fn flatten(field: &Field) -> String {
    match field.value() {
        FieldValue::Primitive(value) => value.clone(),
        FieldValue::PrimitiveList(values) | FieldValue::Vocabulary(values) => values.join(VALUE_SEPARATOR),
        FieldValue::Compound(group) => flatten_group(group),
        FieldValue::CompoundList(groups) => join_trimmed(groups.iter().map(|group| flatten_group(group)), GROUP_SEPARATOR),
    }
}

fn flatten_group(group: &[Field]) -> String {
    join_trimmed(group.iter().map(flatten), SUBFIELD_SEPARATOR)
}

fn join_trimmed(parts: impl Iterator<Item = String>, separator: &str) -> String {
    let mut joined = parts.collect::<Vec<_>>().join(separator);
    while !separator.is_empty() && joined.ends_with(separator) {
        joined.truncate(joined.len() - separator.len());
    }
    joined
}
