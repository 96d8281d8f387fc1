//! `fields` projection.

use serde_json::{Map, Value};

use crate::alumno::Alumno;
use crate::error::FilterError;
use crate::schema::{Field, Schema};

/// The set of properties to return, kept in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    fields: Vec<&'static Field>,
}

impl Projection {
    /// Every field of `schema`.
    #[must_use]
    pub fn all(schema: &'static Schema) -> Self {
        Self {
            fields: schema.fields.iter().collect(),
        }
    }

    /// Parse `{"name": true}` (inclusion), `{"email": false}` (exclusion) or
    /// `["name", "email"]`. When an object mixes both, only the included
    /// fields are returned. An empty selection returns every field.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidFields`] for other shapes and
    /// [`FilterError::UnknownField`] for names not in `schema`.
    pub fn parse(schema: &'static Schema, value: &Value) -> Result<Self, FilterError> {
        let lookup = |name: &str| {
            schema
                .field(name)
                .ok_or_else(|| FilterError::UnknownField(name.to_string()))
        };

        let mut included = Vec::new();
        let mut excluded = Vec::new();
        match value {
            Value::Array(items) => {
                for item in items {
                    let name = item.as_str().ok_or(FilterError::InvalidFields)?;
                    included.push(lookup(name)?);
                }
            }
            Value::Object(flags) => {
                for (name, flag) in flags {
                    let field = lookup(name)?;
                    match flag.as_bool() {
                        Some(true) => included.push(field),
                        Some(false) => excluded.push(field),
                        None => return Err(FilterError::InvalidFields),
                    }
                }
            }
            _ => return Err(FilterError::InvalidFields),
        }

        let fields = schema
            .fields
            .iter()
            .filter(|field| {
                if included.is_empty() {
                    !excluded.contains(field)
                } else {
                    included.contains(field)
                }
            })
            .collect();
        Ok(Self { fields })
    }

    #[must_use]
    pub fn fields(&self) -> &[&'static Field] {
        &self.fields
    }

    /// Render a record as a JSON object holding only the selected properties.
    #[must_use]
    pub fn project(&self, alumno: &Alumno) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|field| (field.name.to_string(), Value::from(alumno.get(field))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alumno::{NewAlumno, SCHEMA};
    use crate::id::AlumnoId;
    use serde_json::json;

    fn ana() -> Alumno {
        NewAlumno::builder()
            .name("Ana")
            .build()
            .unwrap()
            .into_alumno(AlumnoId::new(1))
    }

    #[test]
    fn should_keep_only_included_fields() {
        let projection = Projection::parse(&SCHEMA, &json!({"name": true, "email": false})).unwrap();
        let object = projection.project(&ana());
        assert_eq!(object.len(), 1);
        assert_eq!(object["name"], "Ana");
    }

    #[test]
    fn should_drop_excluded_fields() {
        let projection = Projection::parse(&SCHEMA, &json!({"email": false})).unwrap();
        let object = projection.project(&ana());
        assert!(!object.contains_key("email"));
        assert!(object.contains_key("idAlumno"));
        assert_eq!(object.len(), 4);
    }

    #[test]
    fn should_accept_array_of_names() {
        let projection = Projection::parse(&SCHEMA, &json!(["idAlumno", "active"])).unwrap();
        assert_eq!(projection.fields().len(), 2);
    }

    #[test]
    fn should_return_every_field_for_all() {
        let object = Projection::all(&SCHEMA).project(&ana());
        assert_eq!(object.len(), 5);
        assert_eq!(object["lastName"], Value::Null);
    }

    #[test]
    fn should_reject_unknown_field_and_bad_shape() {
        assert_eq!(
            Projection::parse(&SCHEMA, &json!(["age"])).unwrap_err(),
            FilterError::UnknownField("age".into())
        );
        assert_eq!(
            Projection::parse(&SCHEMA, &json!("name")).unwrap_err(),
            FilterError::InvalidFields
        );
    }
}
