//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ProgrMobilError`] via `#[from]`, so handlers only ever see one type.

/// Top-level error returned by services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum ProgrMobilError {
    /// The caller sent something the schema does not accept.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The datastore failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Client-side input problems, detected before any datastore access.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A path identifier was not an integer.
    #[error("invalid identifier `{0}`, expected an integer")]
    InvalidId(String),

    /// A request body did not match the entity schema.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// A `filter` or `where` query parameter was rejected.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Reasons a request body is rejected.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PayloadError {
    #[error("malformed request body: {0}")]
    Malformed(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    #[error("missing required property `{0}`")]
    MissingProperty(&'static str),

    #[error("property `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("property `{0}` must not be null")]
    NotNullable(&'static str),

    #[error("property `{0}` must not be empty")]
    Empty(&'static str),

    #[error("property `{0}` is assigned by the server")]
    Generated(&'static str),

    #[error("property `{field}` cannot change from {expected} to {found}")]
    Immutable {
        field: &'static str,
        expected: i64,
        found: i64,
    },
}

/// Reasons a query filter is rejected.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("malformed filter: {0}")]
    Malformed(String),

    #[error("filter must be a JSON object")]
    NotAnObject,

    #[error("unknown filter key `{0}`")]
    UnknownKey(String),

    #[error("`where` is not allowed in this filter")]
    WhereNotAllowed,

    #[error("`where` must be a JSON object")]
    InvalidWhere,

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("unsupported operator `{0}`")]
    UnsupportedOperator(String),

    #[error("invalid operand for `{op}` on `{field}`: {reason}")]
    InvalidOperand {
        field: &'static str,
        op: &'static str,
        reason: &'static str,
    },

    #[error("invalid order clause `{0}`")]
    InvalidOrder(String),

    #[error("`{0}` must be a non-negative integer")]
    InvalidPagination(&'static str),

    #[error("`fields` must be an object of booleans or an array of field names")]
    InvalidFields,

    #[error("`include` must be a relation name or an array of relation names")]
    InvalidInclude,

    #[error("relation `{relation}` is not defined for {entity}")]
    UnknownRelation {
        entity: &'static str,
        relation: String,
    },
}

/// A record looked up by identifier does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} with id `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
