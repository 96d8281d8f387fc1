//! Translation of domain filters into parameterized `SQLite` SQL.
//!
//! Column names come from the static entity schema; every user-supplied
//! value goes through `push_bind`.

use sqlx::{QueryBuilder, Sqlite};

use progrmobil_domain::filter::{Operand, Operator, Order, Where};
use progrmobil_domain::schema::{Field, Scalar};

pub(crate) const ID_COLUMN: &str = "id_alumno";

pub(crate) fn push_scalar(builder: &mut QueryBuilder<'_, Sqlite>, scalar: Scalar) {
    match scalar {
        Scalar::Null => builder.push("NULL"),
        Scalar::Integer(value) => builder.push_bind(value),
        Scalar::Text(value) => builder.push_bind(value),
        Scalar::Boolean(value) => builder.push_bind(value),
    };
}

/// Append ` WHERE <predicate>` when there is one.
pub(crate) fn push_where_clause(builder: &mut QueryBuilder<'_, Sqlite>, predicate: Option<&Where>) {
    if let Some(predicate) = predicate {
        builder.push(" WHERE ");
        push_where(builder, predicate);
    }
}

fn push_where(builder: &mut QueryBuilder<'_, Sqlite>, predicate: &Where) {
    match predicate {
        Where::And(clauses) => push_group(builder, clauses, " AND ", "1"),
        Where::Or(clauses) => push_group(builder, clauses, " OR ", "0"),
        Where::Compare { field, op, operand } => push_compare(builder, field, *op, operand),
    }
}

fn push_group(
    builder: &mut QueryBuilder<'_, Sqlite>,
    clauses: &[Where],
    separator: &str,
    empty: &str,
) {
    if clauses.is_empty() {
        builder.push(empty);
        return;
    }
    builder.push("(");
    for (index, clause) in clauses.iter().enumerate() {
        if index > 0 {
            builder.push(separator);
        }
        push_where(builder, clause);
    }
    builder.push(")");
}

fn push_compare(
    builder: &mut QueryBuilder<'_, Sqlite>,
    field: &Field,
    op: Operator,
    operand: &Operand,
) {
    let column = field.column;
    match (op, operand) {
        (Operator::Eq, Operand::Value(Scalar::Null)) => {
            builder.push(column).push(" IS NULL");
        }
        (Operator::Neq, Operand::Value(Scalar::Null)) => {
            builder.push(column).push(" IS NOT NULL");
        }
        (Operator::Inq, Operand::List(values)) if values.is_empty() => {
            builder.push("0");
        }
        (Operator::Nin, Operand::List(values)) if values.is_empty() => {
            builder.push("1");
        }
        (Operator::Inq | Operator::Nin, Operand::List(values)) => {
            builder.push(column);
            builder.push(if op == Operator::Inq { " IN (" } else { " NOT IN (" });
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    builder.push(", ");
                }
                push_scalar(builder, value.clone());
            }
            builder.push(")");
        }
        (Operator::Between, Operand::Range(low, high)) => {
            builder.push(column).push(" BETWEEN ");
            push_scalar(builder, low.clone());
            builder.push(" AND ");
            push_scalar(builder, high.clone());
        }
        (Operator::Ilike | Operator::Nilike, Operand::Value(pattern)) => {
            builder.push("LOWER(").push(column).push(")");
            builder.push(if op == Operator::Ilike { " LIKE LOWER(" } else { " NOT LIKE LOWER(" });
            push_scalar(builder, pattern.clone());
            builder.push(")");
        }
        (_, Operand::Value(value)) => {
            let symbol = match op {
                Operator::Neq => " != ",
                Operator::Gt => " > ",
                Operator::Gte => " >= ",
                Operator::Lt => " < ",
                Operator::Lte => " <= ",
                Operator::Like => " LIKE ",
                Operator::Nlike => " NOT LIKE ",
                _ => " = ",
            };
            builder.push(column).push(symbol);
            push_scalar(builder, value.clone());
        }
        // parsing never pairs an operator with another operand shape
        _ => {
            builder.push("0");
        }
    }
}

/// Append ` ORDER BY`, always ending on the identifier so pages are stable.
pub(crate) fn push_order(builder: &mut QueryBuilder<'_, Sqlite>, order: &[Order]) {
    builder.push(" ORDER BY ");
    for clause in order {
        builder
            .push(clause.field.column)
            .push(" ")
            .push(clause.direction.as_sql())
            .push(", ");
    }
    builder.push(ID_COLUMN).push(" ASC");
}

/// Append `LIMIT`/`OFFSET`. `SQLite` needs a `LIMIT` before `OFFSET`; `-1`
/// means unbounded.
pub(crate) fn push_pagination(
    builder: &mut QueryBuilder<'_, Sqlite>,
    limit: Option<u64>,
    skip: Option<u64>,
) {
    if limit.is_none() && skip.is_none() {
        return;
    }
    let limit = limit.map_or(-1, |limit| i64::try_from(limit).unwrap_or(i64::MAX));
    let skip = skip.map_or(0, |skip| i64::try_from(skip).unwrap_or(i64::MAX));
    builder.push(" LIMIT ").push_bind(limit);
    builder.push(" OFFSET ").push_bind(skip);
}

/// Append `col = ?, col = ?` for each assignment.
pub(crate) fn push_assignments(
    builder: &mut QueryBuilder<'_, Sqlite>,
    assignments: Vec<(&'static Field, Scalar)>,
) {
    for (index, (field, value)) in assignments.into_iter().enumerate() {
        if index > 0 {
            builder.push(", ");
        }
        builder.push(field.column).push(" = ");
        push_scalar(builder, value);
    }
}
