//! `where` predicates.

use std::cmp::Ordering;

use serde_json::Value;

use crate::alumno::Alumno;
use crate::error::FilterError;
use crate::schema::{Field, FieldKind, Scalar, Schema};

/// A validated match predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    /// Every clause must hold. An empty list matches everything.
    And(Vec<Where>),
    /// At least one clause must hold. An empty list matches nothing.
    Or(Vec<Where>),
    Compare {
        field: &'static Field,
        op: Operator,
        operand: Operand,
    },
}

/// Comparison operators accepted inside a field condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Inq,
    Nin,
    Between,
    Like,
    Nlike,
    Ilike,
    Nilike,
}

impl Operator {
    fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "eq" => Self::Eq,
            "neq" => Self::Neq,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "inq" => Self::Inq,
            "nin" => Self::Nin,
            "between" => Self::Between,
            "like" => Self::Like,
            "nlike" => Self::Nlike,
            "ilike" => Self::Ilike,
            "nilike" => Self::Nilike,
            _ => return None,
        })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Inq => "inq",
            Self::Nin => "nin",
            Self::Between => "between",
            Self::Like => "like",
            Self::Nlike => "nlike",
            Self::Ilike => "ilike",
            Self::Nilike => "nilike",
        }
    }

    fn is_pattern(self) -> bool {
        matches!(self, Self::Like | Self::Nlike | Self::Ilike | Self::Nilike)
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Single literal; `Null` only appears with `eq`/`neq`.
    Value(Scalar),
    /// `inq`/`nin` list, never containing `Null`.
    List(Vec<Scalar>),
    /// `between` bounds, inclusive, never `Null`.
    Range(Scalar, Scalar),
}

impl Where {
    /// Parse a `where` object against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] for unknown fields or operators and for
    /// operands of the wrong shape or type.
    pub fn parse(schema: &'static Schema, value: &Value) -> Result<Self, FilterError> {
        let Value::Object(map) = value else {
            return Err(FilterError::InvalidWhere);
        };

        let mut clauses = Vec::with_capacity(map.len());
        for (key, value) in map {
            match key.as_str() {
                "and" => clauses.push(Self::And(Self::parse_group(schema, value)?)),
                "or" => clauses.push(Self::Or(Self::parse_group(schema, value)?)),
                name => {
                    let field = schema
                        .field(name)
                        .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
                    Self::parse_field(field, value, &mut clauses)?;
                }
            }
        }

        if clauses.len() == 1 {
            if let Some(only) = clauses.pop() {
                return Ok(only);
            }
        }
        Ok(Self::And(clauses))
    }

    /// Decode and parse a JSON-encoded `where` query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Malformed`] when `raw` is not JSON, otherwise
    /// as [`Where::parse`].
    pub fn from_query(schema: &'static Schema, raw: &str) -> Result<Self, FilterError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| FilterError::Malformed(err.to_string()))?;
        Self::parse(schema, &value)
    }

    fn parse_group(schema: &'static Schema, value: &Value) -> Result<Vec<Self>, FilterError> {
        let Value::Array(items) = value else {
            return Err(FilterError::InvalidWhere);
        };
        items.iter().map(|item| Self::parse(schema, item)).collect()
    }

    fn parse_field(
        field: &'static Field,
        value: &Value,
        clauses: &mut Vec<Self>,
    ) -> Result<(), FilterError> {
        match value {
            Value::Object(conditions) => {
                for (key, operand) in conditions {
                    let op = Operator::from_key(key)
                        .ok_or_else(|| FilterError::UnsupportedOperator(key.clone()))?;
                    clauses.push(Self::Compare {
                        field,
                        op,
                        operand: parse_operand(field, op, operand)?,
                    });
                }
                Ok(())
            }
            literal => {
                clauses.push(Self::Compare {
                    field,
                    op: Operator::Eq,
                    operand: parse_operand(field, Operator::Eq, literal)?,
                });
                Ok(())
            }
        }
    }

    /// Evaluate the predicate against a record with SQL `NULL` semantics:
    /// only `eq null`/`neq null` match on absent values.
    #[must_use]
    pub fn matches(&self, alumno: &Alumno) -> bool {
        match self {
            Self::And(clauses) => clauses.iter().all(|clause| clause.matches(alumno)),
            Self::Or(clauses) => clauses.iter().any(|clause| clause.matches(alumno)),
            Self::Compare { field, op, operand } => compare(&alumno.get(field), *op, operand),
        }
    }
}

fn parse_operand(field: &'static Field, op: Operator, value: &Value) -> Result<Operand, FilterError> {
    let invalid = |reason: &'static str| FilterError::InvalidOperand {
        field: field.name,
        op: op.as_str(),
        reason,
    };
    let literal = |value: &Value| match Scalar::coerce(field.kind, value) {
        Some(Scalar::Null) => Err(invalid("null is only allowed with eq and neq")),
        Some(scalar) => Ok(scalar),
        None => Err(invalid("value does not match the field type")),
    };

    if op.is_pattern() && field.kind != FieldKind::Text {
        return Err(invalid("pattern operators only apply to string fields"));
    }

    match op {
        Operator::Eq | Operator::Neq => Scalar::coerce(field.kind, value)
            .map(Operand::Value)
            .ok_or_else(|| invalid("value does not match the field type")),
        Operator::Inq | Operator::Nin => {
            let Value::Array(items) = value else {
                return Err(invalid("expected an array"));
            };
            items
                .iter()
                .map(literal)
                .collect::<Result<Vec<_>, _>>()
                .map(Operand::List)
        }
        Operator::Between => match value.as_array().map(Vec::as_slice) {
            Some([low, high]) => Ok(Operand::Range(literal(low)?, literal(high)?)),
            _ => Err(invalid("expected an array of exactly two values")),
        },
        _ => literal(value).map(Operand::Value),
    }
}

fn compare(actual: &Scalar, op: Operator, operand: &Operand) -> bool {
    use Operator::{Between, Eq, Gt, Gte, Ilike, Inq, Like, Lt, Lte, Neq, Nilike, Nin, Nlike};

    match (op, operand) {
        (Eq, Operand::Value(Scalar::Null)) => actual.is_null(),
        (Neq, Operand::Value(Scalar::Null)) => !actual.is_null(),
        (Nin, Operand::List(values)) if values.is_empty() => true,
        _ if actual.is_null() => false,
        (Eq, Operand::Value(expected)) => actual == expected,
        (Neq, Operand::Value(expected)) => actual != expected,
        (Gt, Operand::Value(bound)) => actual.compare(bound) == Some(Ordering::Greater),
        (Gte, Operand::Value(bound)) => {
            matches!(actual.compare(bound), Some(Ordering::Greater | Ordering::Equal))
        }
        (Lt, Operand::Value(bound)) => actual.compare(bound) == Some(Ordering::Less),
        (Lte, Operand::Value(bound)) => {
            matches!(actual.compare(bound), Some(Ordering::Less | Ordering::Equal))
        }
        (Inq, Operand::List(values)) => values.contains(actual),
        (Nin, Operand::List(values)) => !values.contains(actual),
        (Between, Operand::Range(low, high)) => {
            matches!(actual.compare(low), Some(Ordering::Greater | Ordering::Equal))
                && matches!(actual.compare(high), Some(Ordering::Less | Ordering::Equal))
        }
        (Like | Nlike | Ilike | Nilike, Operand::Value(Scalar::Text(pattern))) => {
            let Scalar::Text(text) = actual else {
                return false;
            };
            let hit = if matches!(op, Ilike | Nilike) {
                like(&text.to_lowercase(), &pattern.to_lowercase())
            } else {
                like(text, pattern)
            };
            hit != matches!(op, Nlike | Nilike)
        }
        _ => false,
    }
}

/// SQL `LIKE` matching: `%` is any run of characters, `_` exactly one.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    like_chars(&text, &pattern)
}

fn like_chars(text: &[char], pattern: &[char]) -> bool {
    let (mut t, mut p) = (0, 0);
    // Pattern position after the last `%`, and the text position it resumes at.
    let mut resume: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                resume = Some((p + 1, t));
                p += 1;
            }
            Some(&expected) if expected == '_' || expected == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match resume {
                Some((after, start)) => {
                    resume = Some((after, start + 1));
                    p = after;
                    t = start + 1;
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}
