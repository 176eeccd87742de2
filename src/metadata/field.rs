use core::fmt::{Display, Formatter};
use serde_json::{Map, Value};
use strum::{Display as StrumDisplay, EnumString};

/// The `typeClass` of a metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(serialize_all = "camelCase")]
pub enum TypeClass {
    Primitive,
    ControlledVocabulary,
    Compound,
}

/// A decoded field value, one variant per legal (`typeClass`, `multiple`) shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// `primitive`, single: a scalar string.
    Primitive(String),

    /// `primitive`, multiple: an ordered list of strings.
    PrimitiveList(Vec<String>),

    /// `controlledVocabulary`: an ordered list of vocabulary terms.
    Vocabulary(Vec<String>),

    /// `compound`, single: one group of sub-fields in document order.
    Compound(Vec<Field>),

    /// `compound`, multiple: an ordered list of sub-field groups.
    CompoundList(Vec<Vec<Field>>),
}

impl FieldValue {
    #[must_use]
    pub const fn type_class(&self) -> TypeClass {
        match self {
            Self::Primitive(_) | Self::PrimitiveList(_) => TypeClass::Primitive,
            Self::Vocabulary(_) => TypeClass::ControlledVocabulary,
            Self::Compound(_) | Self::CompoundList(_) => TypeClass::Compound,
        }
    }
}

/// A named metadata field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    type_name: String,
    value: FieldValue,
}

/// Reasons a raw field description could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field description lacks a required attribute or has it with the wrong JSON type.
    MissingAttribute {
        type_name: Option<String>,
        attribute: &'static str,
    },

    /// The `typeClass` is not one this decoder knows. Recoverable: the field flattens to an empty value.
    UnrecognizedTypeClass { type_name: String, type_class: String },

    /// The `value` does not have the shape its `typeClass` and `multiple` flag require.
    MalformedShape {
        type_name: String,
        type_class: TypeClass,
        multiple: bool,
        expected: &'static str,
    },
}

impl FieldError {
    /// Whether the enclosing record can still be built with an empty value for this field.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnrecognizedTypeClass { .. })
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingAttribute {
                type_name: Some(type_name),
                attribute,
            } => write!(f, "field '{type_name}' has no valid '{attribute}' attribute"),
            Self::MissingAttribute { type_name: None, attribute } => {
                write!(f, "field description has no valid '{attribute}' attribute")
            }
            Self::UnrecognizedTypeClass { type_name, type_class } => {
                write!(f, "field '{type_name}' has unrecognized typeClass '{type_class}'")
            }
            Self::MalformedShape {
                type_name,
                type_class,
                multiple,
                expected,
            } => {
                let multiplicity = if *multiple { "multiple" } else { "single" };
                write!(f, "{multiplicity} {type_class} field '{type_name}' must have {expected} as its value")
            }
        }
    }
}

impl core::error::Error for FieldError {}

impl Field {
    #[must_use]
    pub fn new(type_name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Decode a field description as returned by the Dataverse native API.
    ///
    /// Compound sub-fields are decoded recursively and keep the order in which they
    /// appear in the document.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnrecognizedTypeClass`] for unknown classes (anywhere in the
    /// nesting) and [`FieldError::MalformedShape`] or [`FieldError::MissingAttribute`] when
    /// the description does not have the structure its class requires.
    pub fn from_json(json: &Value) -> Result<Self, FieldError> {
        let Some(object) = json.as_object() else {
            return Err(FieldError::MissingAttribute {
                type_name: None,
                attribute: "typeName",
            });
        };

        let type_name = object
            .get("typeName")
            .and_then(Value::as_str)
            .ok_or(FieldError::MissingAttribute {
                type_name: None,
                attribute: "typeName",
            })?;

        let missing = |attribute| FieldError::MissingAttribute {
            type_name: Some(type_name.to_string()),
            attribute,
        };

        let raw_class = object.get("typeClass").and_then(Value::as_str).ok_or_else(|| missing("typeClass"))?;
        let multiple = object.get("multiple").and_then(Value::as_bool).ok_or_else(|| missing("multiple"))?;
        let value = object.get("value").ok_or_else(|| missing("value"))?;

        let type_class: TypeClass = raw_class.parse().map_err(|_parse_error| FieldError::UnrecognizedTypeClass {
            type_name: type_name.to_string(),
            type_class: raw_class.to_string(),
        })?;

        let malformed = |expected| FieldError::MalformedShape {
            type_name: type_name.to_string(),
            type_class,
            multiple,
            expected,
        };

        let value = match (type_class, multiple) {
            (TypeClass::Primitive, false) => {
                FieldValue::Primitive(value.as_str().ok_or_else(|| malformed("a string"))?.to_string())
            }
            (TypeClass::Primitive, true) => {
                FieldValue::PrimitiveList(decode_strings(value).ok_or_else(|| malformed("an array of strings"))?)
            }
            (TypeClass::ControlledVocabulary, _) => {
                FieldValue::Vocabulary(decode_strings(value).ok_or_else(|| malformed("an array of strings"))?)
            }
            (TypeClass::Compound, false) => {
                let group = value.as_object().ok_or_else(|| malformed("an object of sub-fields"))?;
                FieldValue::Compound(decode_group(group)?)
            }
            (TypeClass::Compound, true) => {
                let entries = value.as_array().ok_or_else(|| malformed("an array of sub-field objects"))?;
                let groups = entries
                    .iter()
                    .map(|entry| {
                        let group = entry.as_object().ok_or_else(|| malformed("an array of sub-field objects"))?;
                        decode_group(group)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                FieldValue::CompoundList(groups)
            }
        };

        Ok(Self::new(type_name, value))
    }
}

fn decode_strings(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(ToString::to_string))
        .collect()
}

fn decode_group(group: &Map<String, Value>) -> Result<Vec<Field>, FieldError> {
    group.values().map(Field::from_json).collect()
}
