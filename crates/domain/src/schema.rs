//! Static field schema: the single source of truth for what a record may
//! contain. Payload validation, filter validation and the storage adapter's
//! column mapping all read from it.

use std::cmp::Ordering;

use serde_json::Value;

use crate::error::PayloadError;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Boolean,
}

impl FieldKind {
    /// Human-readable description used in error messages.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Integer => "an integer",
            Self::Text => "a string",
            Self::Boolean => "a boolean",
        }
    }
}

/// One declared property of an entity.
#[derive(Debug, PartialEq, Eq)]
pub struct Field {
    /// JSON property name.
    pub name: &'static str,
    /// Storage column name.
    pub column: &'static str,
    pub kind: FieldKind,
    /// Must be present on create and replace.
    pub required: bool,
    /// Accepts `null`.
    pub nullable: bool,
    /// Assigned by the datastore, never by callers.
    pub generated: bool,
}

/// Closed set of fields and relations for one entity type.
#[derive(Debug)]
pub struct Schema {
    pub entity: &'static str,
    pub fields: &'static [Field],
    pub relations: &'static [&'static str],
}

impl Schema {
    /// Look up a field by its JSON name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Check a JSON body against the schema and return the typed values it
    /// carries, in body order.
    ///
    /// Generated fields are returned like any other; callers decide whether
    /// they are acceptable.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the body is not an object, names an
    /// unknown property, carries a value of the wrong type or a `null` for a
    /// non-nullable field, or (with `require_all`) omits a required field.
    pub fn read_object(
        &self,
        body: &Value,
        require_all: bool,
    ) -> Result<Vec<(&'static Field, Scalar)>, PayloadError> {
        let Value::Object(map) = body else {
            return Err(PayloadError::NotAnObject);
        };

        let mut values = Vec::with_capacity(map.len());
        for (key, value) in map {
            let field = self
                .field(key)
                .ok_or_else(|| PayloadError::UnknownProperty(key.clone()))?;
            values.push((field, Scalar::from_json(field, value)?));
        }

        if require_all {
            if let Some(missing) = self
                .fields
                .iter()
                .find(|field| field.required && !map.contains_key(field.name))
            {
                return Err(PayloadError::MissingProperty(missing.name));
            }
        }

        Ok(values)
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Integer(i64),
    Text(String),
    Boolean(bool),
}

impl Scalar {
    /// Type-check `value` against `field`, rejecting `null` for
    /// non-nullable fields.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::WrongType`] or [`PayloadError::NotNullable`].
    pub fn from_json(field: &'static Field, value: &Value) -> Result<Self, PayloadError> {
        match Self::coerce(field.kind, value) {
            Some(Self::Null) if !field.nullable => Err(PayloadError::NotNullable(field.name)),
            Some(scalar) => Ok(scalar),
            None => Err(PayloadError::WrongType {
                field: field.name,
                expected: field.kind.describe(),
            }),
        }
    }

    /// Convert a JSON literal to the given kind. `null` is always accepted;
    /// `None` means the literal has the wrong type.
    #[must_use]
    pub fn coerce(kind: FieldKind, value: &Value) -> Option<Self> {
        match (kind, value) {
            (_, Value::Null) => Some(Self::Null),
            (FieldKind::Integer, Value::Number(number)) => number.as_i64().map(Self::Integer),
            (FieldKind::Text, Value::String(text)) => Some(Self::Text(text.clone())),
            (FieldKind::Boolean, Value::Bool(flag)) => Some(Self::Boolean(*flag)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Order two non-null values of the same kind. `None` when either side
    /// is null or the kinds differ.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Extract text, mapping `null` (and anything else) to `None`.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Integer(value) => Value::from(value),
            Scalar::Text(value) => Value::String(value),
            Scalar::Boolean(value) => Value::Bool(value),
        }
    }
}
