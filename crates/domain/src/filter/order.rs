//! `order` clauses.

use std::cmp::Ordering;

use serde_json::Value;

use crate::alumno::Alumno;
use crate::error::FilterError;
use crate::schema::{Field, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub field: &'static Field,
    pub direction: Direction,
}

impl Order {
    /// Parse `"name DESC"`, `"name ASC, email"` or `["name DESC", "email"]`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidOrder`] for malformed clauses and
    /// [`FilterError::UnknownField`] for fields not in `schema`.
    pub fn parse_list(schema: &'static Schema, value: &Value) -> Result<Vec<Self>, FilterError> {
        match value {
            Value::String(clauses) => clauses
                .split(',')
                .map(str::trim)
                .filter(|clause| !clause.is_empty())
                .map(|clause| Self::parse_one(schema, clause))
                .collect(),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or_else(|| FilterError::InvalidOrder(item.to_string()))
                        .and_then(|clause| Self::parse_one(schema, clause.trim()))
                })
                .collect(),
            other => Err(FilterError::InvalidOrder(other.to_string())),
        }
    }

    fn parse_one(schema: &'static Schema, clause: &str) -> Result<Self, FilterError> {
        let mut parts = clause.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| FilterError::InvalidOrder(clause.to_string()))?;
        let field = schema
            .field(name)
            .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
        let direction = match parts.next() {
            None => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(_) => return Err(FilterError::InvalidOrder(clause.to_string())),
        };
        if parts.next().is_some() {
            return Err(FilterError::InvalidOrder(clause.to_string()));
        }
        Ok(Self { field, direction })
    }

    /// Compare two records on this key. Nulls sort first in ascending order,
    /// as `SQLite` does.
    #[must_use]
    pub fn compare(&self, a: &Alumno, b: &Alumno) -> Ordering {
        let (left, right) = (a.get(self.field), b.get(self.field));
        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => left.compare(&right).unwrap_or(Ordering::Equal),
        };
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}
