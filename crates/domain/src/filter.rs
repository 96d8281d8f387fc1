//! Query filters: predicate, projection, ordering, pagination and relation
//! inclusion, validated against an entity [`Schema`].
//!
//! Filters arrive as JSON (usually a URL-encoded query parameter):
//!
//! ```json
//! {
//!   "where": {"active": true, "name": {"like": "A%"}},
//!   "fields": {"name": true},
//!   "order": ["name DESC"],
//!   "limit": 10,
//!   "skip": 20
//! }
//! ```

mod order;
mod predicate;
mod projection;

use serde_json::Value;

pub use order::{Direction, Order};
pub use predicate::{Operand, Operator, Where};
pub use projection::Projection;

use crate::alumno::Alumno;
use crate::error::FilterError;
use crate::schema::Schema;

/// A validated query filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub predicate: Option<Where>,
    pub fields: Option<Projection>,
    pub order: Vec<Order>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub include: Vec<String>,
}

impl Filter {
    /// Parse a complete filter object.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the object uses unknown keys, fields or
    /// operators, or carries values of the wrong type.
    pub fn parse(schema: &'static Schema, value: &Value) -> Result<Self, FilterError> {
        Self::parse_with(schema, value, true)
    }

    /// Parse a filter that may not carry a `where` clause (lookups by id).
    ///
    /// # Errors
    ///
    /// Same as [`Filter::parse`], plus [`FilterError::WhereNotAllowed`].
    pub fn parse_excluding_where(
        schema: &'static Schema,
        value: &Value,
    ) -> Result<Self, FilterError> {
        Self::parse_with(schema, value, false)
    }

    /// Decode and parse a JSON-encoded filter query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Malformed`] when `raw` is not JSON, otherwise
    /// as [`Filter::parse`].
    pub fn from_query(schema: &'static Schema, raw: &str) -> Result<Self, FilterError> {
        Self::parse(schema, &decode(raw)?)
    }

    /// Decode and parse a JSON-encoded filter that may not carry `where`.
    ///
    /// # Errors
    ///
    /// As [`Filter::from_query`] and [`Filter::parse_excluding_where`].
    pub fn from_query_excluding_where(
        schema: &'static Schema,
        raw: &str,
    ) -> Result<Self, FilterError> {
        Self::parse_excluding_where(schema, &decode(raw)?)
    }

    fn parse_with(
        schema: &'static Schema,
        value: &Value,
        allow_where: bool,
    ) -> Result<Self, FilterError> {
        let Value::Object(map) = value else {
            return Err(FilterError::NotAnObject);
        };

        let mut filter = Self::default();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                "where" if allow_where => filter.predicate = Some(Where::parse(schema, value)?),
                "where" => return Err(FilterError::WhereNotAllowed),
                "fields" => filter.fields = Some(Projection::parse(schema, value)?),
                "order" => filter.order = Order::parse_list(schema, value)?,
                "limit" => filter.limit = Some(pagination("limit", value)?),
                "skip" => filter.skip = Some(pagination("skip", value)?),
                "offset" => filter.skip = Some(pagination("offset", value)?),
                "include" => filter.include = parse_include(schema, value)?,
                other => return Err(FilterError::UnknownKey(other.to_string())),
            }
        }
        Ok(filter)
    }

    /// Evaluate the filter over records already in memory: predicate, then
    /// order (identifier ascending when none is given), then skip and limit.
    #[must_use]
    pub fn apply(&self, mut alumnos: Vec<Alumno>) -> Vec<Alumno> {
        if let Some(predicate) = &self.predicate {
            alumnos.retain(|alumno| predicate.matches(alumno));
        }
        alumnos.sort_by(|a, b| {
            self.order
                .iter()
                .map(|order| order.compare(a, b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.id_alumno.cmp(&b.id_alumno))
        });

        let skip = usize::try_from(self.skip.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = self
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        alumnos.into_iter().skip(skip).take(limit).collect()
    }
}

fn decode(raw: &str) -> Result<Value, FilterError> {
    serde_json::from_str(raw).map_err(|err| FilterError::Malformed(err.to_string()))
}

fn pagination(key: &'static str, value: &Value) -> Result<u64, FilterError> {
    value.as_u64().ok_or(FilterError::InvalidPagination(key))
}

fn parse_include(schema: &'static Schema, value: &Value) -> Result<Vec<String>, FilterError> {
    let names: Vec<&str> = match value {
        Value::String(name) => vec![name.as_str()],
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.as_str()),
                Value::Object(scope) => scope
                    .get("relation")
                    .and_then(Value::as_str)
                    .ok_or(FilterError::InvalidInclude),
                _ => Err(FilterError::InvalidInclude),
            })
            .collect::<Result<_, _>>()?,
        _ => return Err(FilterError::InvalidInclude),
    };

    names
        .into_iter()
        .map(|name| {
            if schema.relations.iter().any(|relation| *relation == name) {
                Ok(name.to_string())
            } else {
                Err(FilterError::UnknownRelation {
                    entity: schema.entity,
                    relation: name.to_string(),
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alumno::{NewAlumno, SCHEMA};
    use crate::id::AlumnoId;
    use serde_json::json;

    fn alumno(id: i64, name: &str, active: bool) -> Alumno {
        NewAlumno::builder()
            .name(name)
            .active(active)
            .build()
            .unwrap()
            .into_alumno(AlumnoId::new(id))
    }

    #[test]
    fn should_parse_every_filter_key() {
        let filter = Filter::parse(
            &SCHEMA,
            &json!({
                "where": {"active": true},
                "fields": ["name"],
                "order": "name DESC",
                "limit": 5,
                "skip": 2
            }),
        )
        .unwrap();

        assert!(filter.predicate.is_some());
        assert_eq!(filter.fields.unwrap().fields().len(), 1);
        assert_eq!(filter.order[0].direction, Direction::Desc);
        assert_eq!(filter.limit, Some(5));
        assert_eq!(filter.skip, Some(2));
    }

    #[test]
    fn should_accept_offset_as_alias_of_skip() {
        let filter = Filter::parse(&SCHEMA, &json!({"offset": 3})).unwrap();
        assert_eq!(filter.skip, Some(3));
    }

    #[test]
    fn should_reject_unknown_filter_key() {
        let result = Filter::parse(&SCHEMA, &json!({"page": 1}));
        assert_eq!(result.unwrap_err(), FilterError::UnknownKey("page".into()));
    }

    #[test]
    fn should_reject_negative_limit() {
        let result = Filter::parse(&SCHEMA, &json!({"limit": -1}));
        assert_eq!(result.unwrap_err(), FilterError::InvalidPagination("limit"));
    }

    #[test]
    fn should_reject_where_when_excluded() {
        let result = Filter::parse_excluding_where(&SCHEMA, &json!({"where": {"name": "Ana"}}));
        assert_eq!(result.unwrap_err(), FilterError::WhereNotAllowed);
    }

    #[test]
    fn should_reject_any_include_because_alumno_has_no_relations() {
        let result = Filter::parse(&SCHEMA, &json!({"include": ["courses"]}));
        assert_eq!(
            result.unwrap_err(),
            FilterError::UnknownRelation {
                entity: "Alumno",
                relation: "courses".into()
            }
        );
    }

    #[test]
    fn should_report_malformed_query_parameter() {
        let result = Filter::from_query(&SCHEMA, "{not json");
        assert!(matches!(result, Err(FilterError::Malformed(_))));
    }

    #[test]
    fn should_apply_predicate_order_and_pagination_in_memory() {
        let filter = Filter::from_query(
            &SCHEMA,
            r#"{"where":{"active":true},"order":"name DESC","skip":1,"limit":1}"#,
        )
        .unwrap();
        let rows = vec![
            alumno(1, "Ana", true),
            alumno(2, "Bea", false),
            alumno(3, "Ciro", true),
            alumno(4, "Dora", true),
        ];

        let result = filter.apply(rows);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Ciro");
    }

    #[test]
    fn should_order_by_identifier_when_no_order_given() {
        let rows = vec![alumno(3, "C", true), alumno(1, "A", true), alumno(2, "B", true)];
        let ids: Vec<i64> = Filter::default()
            .apply(rows)
            .iter()
            .map(|a| a.id_alumno.as_i64())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
