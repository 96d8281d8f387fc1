//! Alumno: a student record and the payload shapes derived from it.
//!
//! [`NewAlumno`] is the record without its identifier (create and full
//! replace); [`AlumnoPatch`] has every property optional (partial and bulk
//! updates). Both are produced from JSON bodies by checking them against
//! [`SCHEMA`] first.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PayloadError, ProgrMobilError, ValidationError};
use crate::id::AlumnoId;
use crate::schema::{Field, FieldKind, Scalar, Schema};

const ID: Field = Field {
    name: "idAlumno",
    column: "id_alumno",
    kind: FieldKind::Integer,
    required: false,
    nullable: false,
    generated: true,
};

const NAME: Field = Field {
    name: "name",
    column: "name",
    kind: FieldKind::Text,
    required: true,
    nullable: false,
    generated: false,
};

const LAST_NAME: Field = Field {
    name: "lastName",
    column: "last_name",
    kind: FieldKind::Text,
    required: false,
    nullable: true,
    generated: false,
};

const EMAIL: Field = Field {
    name: "email",
    column: "email",
    kind: FieldKind::Text,
    required: false,
    nullable: true,
    generated: false,
};

const ACTIVE: Field = Field {
    name: "active",
    column: "active",
    kind: FieldKind::Boolean,
    required: false,
    nullable: false,
    generated: false,
};

/// Field schema of [`Alumno`]. Alumno declares no relations.
pub static SCHEMA: Schema = Schema {
    entity: "Alumno",
    fields: &[ID, NAME, LAST_NAME, EMAIL, ACTIVE],
    relations: &[],
};

/// A persisted student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alumno {
    pub id_alumno: AlumnoId,
    pub name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub active: bool,
}

impl Alumno {
    /// Read one property as a typed value.
    #[must_use]
    pub fn get(&self, field: &Field) -> Scalar {
        match field.name {
            "idAlumno" => Scalar::Integer(self.id_alumno.as_i64()),
            "name" => Scalar::Text(self.name.clone()),
            "lastName" => self.last_name.clone().map_or(Scalar::Null, Scalar::Text),
            "email" => self.email.clone().map_or(Scalar::Null, Scalar::Text),
            "active" => Scalar::Boolean(self.active),
            _ => Scalar::Null,
        }
    }
}

/// An alumno without its identifier: the body of create and replace.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlumno {
    pub name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub active: bool,
}

impl NewAlumno {
    /// Create a builder for constructing a [`NewAlumno`].
    #[must_use]
    pub fn builder() -> NewAlumnoBuilder {
        NewAlumnoBuilder::default()
    }

    /// Validate a create body. The identifier must not be present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Payload`] when the body does not match the
    /// schema or carries `idAlumno`.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let mut values = SCHEMA.read_object(body, true)?;
        take_identifier(&mut values, None)?;
        Ok(Self::from_values(values)?)
    }

    /// Validate a full-replace body for the record `id`. The identifier may
    /// be present only if it equals `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Payload`] when the body does not match the
    /// schema or tries to change the identifier.
    pub fn from_replacement(id: AlumnoId, body: &Value) -> Result<Self, ValidationError> {
        let mut values = SCHEMA.read_object(body, true)?;
        take_identifier(&mut values, Some(id))?;
        Ok(Self::from_values(values)?)
    }

    fn from_values(values: Vec<(&'static Field, Scalar)>) -> Result<Self, PayloadError> {
        let mut alumno = Self {
            name: String::new(),
            last_name: None,
            email: None,
            active: true,
        };
        for (field, value) in values {
            match (field.name, value) {
                ("name", Scalar::Text(name)) => alumno.name = name,
                ("lastName", value) => alumno.last_name = value.into_text(),
                ("email", value) => alumno.email = value.into_text(),
                ("active", Scalar::Boolean(active)) => alumno.active = active,
                _ => {}
            }
        }
        if alumno.name.is_empty() {
            return Err(PayloadError::Empty(NAME.name));
        }
        Ok(alumno)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ProgrMobilError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), ProgrMobilError> {
        if self.name.is_empty() {
            return Err(ValidationError::from(PayloadError::Empty(NAME.name)).into());
        }
        Ok(())
    }

    /// Attach an identifier, producing the stored record.
    #[must_use]
    pub fn into_alumno(self, id: AlumnoId) -> Alumno {
        Alumno {
            id_alumno: id,
            name: self.name,
            last_name: self.last_name,
            email: self.email,
            active: self.active,
        }
    }
}

/// Step-by-step builder for [`NewAlumno`].
#[derive(Debug, Default)]
pub struct NewAlumnoBuilder {
    name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    active: Option<bool>,
}

impl NewAlumnoBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Consume the builder, validate, and return a [`NewAlumno`].
    ///
    /// # Errors
    ///
    /// Returns [`ProgrMobilError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<NewAlumno, ProgrMobilError> {
        let alumno = NewAlumno {
            name: self.name.unwrap_or_default(),
            last_name: self.last_name,
            email: self.email,
            active: self.active.unwrap_or(true),
        };
        alumno.validate()?;
        Ok(alumno)
    }
}

/// A partial update: absent properties are left untouched, `Some(None)`
/// clears a nullable property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlumnoPatch {
    pub name: Option<String>,
    pub last_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub active: Option<bool>,
}

impl AlumnoPatch {
    /// Validate a bulk-update body. The identifier must not be present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Payload`] when the body does not match the
    /// schema or carries `idAlumno`.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let mut values = SCHEMA.read_object(body, false)?;
        take_identifier(&mut values, None)?;
        Ok(Self::from_values(values)?)
    }

    /// Validate a partial-update body for the record `id`. The identifier
    /// may be present only if it equals `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Payload`] when the body does not match the
    /// schema or tries to change the identifier.
    pub fn for_id(id: AlumnoId, body: &Value) -> Result<Self, ValidationError> {
        let mut values = SCHEMA.read_object(body, false)?;
        take_identifier(&mut values, Some(id))?;
        Ok(Self::from_values(values)?)
    }

    fn from_values(values: Vec<(&'static Field, Scalar)>) -> Result<Self, PayloadError> {
        let mut patch = Self::default();
        for (field, value) in values {
            match (field.name, value) {
                ("name", Scalar::Text(name)) => patch.name = Some(name),
                ("lastName", value) => patch.last_name = Some(value.into_text()),
                ("email", value) => patch.email = Some(value.into_text()),
                ("active", Scalar::Boolean(active)) => patch.active = Some(active),
                _ => {}
            }
        }
        patch.check_name()?;
        Ok(patch)
    }

    fn check_name(&self) -> Result<(), PayloadError> {
        if self.name.as_deref() == Some("") {
            return Err(PayloadError::Empty(NAME.name));
        }
        Ok(())
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ProgrMobilError::Validation`] when `name` is set to an
    /// empty string.
    pub fn validate(&self) -> Result<(), ProgrMobilError> {
        self.check_name()
            .map_err(|err| ValidationError::from(err).into())
    }

    /// `true` when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// The properties this patch sets, with their new values.
    #[must_use]
    pub fn assignments(&self) -> Vec<(&'static Field, Scalar)> {
        let mut out = Vec::new();
        if let Some(name) = &self.name {
            out.push((&NAME, Scalar::Text(name.clone())));
        }
        if let Some(last_name) = &self.last_name {
            out.push((&LAST_NAME, last_name.clone().map_or(Scalar::Null, Scalar::Text)));
        }
        if let Some(email) = &self.email {
            out.push((&EMAIL, email.clone().map_or(Scalar::Null, Scalar::Text)));
        }
        if let Some(active) = self.active {
            out.push((&ACTIVE, Scalar::Boolean(active)));
        }
        out
    }

    /// Apply the patch to a record in place. The identifier is never touched.
    pub fn apply(&self, alumno: &mut Alumno) {
        if let Some(name) = &self.name {
            alumno.name.clone_from(name);
        }
        if let Some(last_name) = &self.last_name {
            alumno.last_name.clone_from(last_name);
        }
        if let Some(email) = &self.email {
            alumno.email.clone_from(email);
        }
        if let Some(active) = self.active {
            alumno.active = active;
        }
    }
}

/// Remove the identifier from a validated body, accepting it only when it
/// equals `expected`.
fn take_identifier(
    values: &mut Vec<(&'static Field, Scalar)>,
    expected: Option<AlumnoId>,
) -> Result<(), PayloadError> {
    let Some(position) = values.iter().position(|(field, _)| field.generated) else {
        return Ok(());
    };
    let (field, value) = values.remove(position);
    match (expected, value) {
        (Some(expected), Scalar::Integer(found)) if found == expected.as_i64() => Ok(()),
        (Some(expected), Scalar::Integer(found)) => Err(PayloadError::Immutable {
            field: field.name,
            expected: expected.as_i64(),
            found,
        }),
        _ => Err(PayloadError::Generated(field.name)),
    }
}
