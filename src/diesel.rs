//! Diesel rendering of keyset predicates and sort orders.
//!
//! [`SqlFilter`] is a boolean expression usable in `.filter(..)`; every
//! anchor value is sent as a bind parameter and every column name is quoted
//! by the backend. [`SqlOrder`] renders the matching `ORDER BY` list.

use crate::{Predicate, SortDirection, SortSpec, Value};
use ::chrono::NaiveDateTime;
use ::diesel::backend::Backend;
use ::diesel::expression::{expression_types::NotSelectable, is_aggregate, AppearsOnTable, SelectableExpression, ValidGrouping};
use ::diesel::query_builder::*;
use ::diesel::serialize::ToSql;
use ::diesel::sql_types::{BigInt, Binary, Bool, HasSqlType, Text, Timestamp};
use ::diesel::{Expression, QueryResult};
use ::either::Either::*;
use ::itertools::intersperse;

#[derive(Clone, Debug, From)]
pub struct SqlFilter(pub Predicate);

#[derive(Clone, Debug, From)]
pub struct SqlOrder(pub SortSpec);

impl Predicate {
    pub fn sql_filter(&self) -> SqlFilter {
        SqlFilter(self.clone())
    }
}

impl SortSpec {
    pub fn sql_order(&self) -> SqlOrder {
        SqlOrder(self.clone())
    }
}

fn walk_value<'b, DB>(value: &'b Value, pass: &mut AstPass<'_, 'b, DB>) -> QueryResult<()>
where
    DB: Backend + HasSqlType<Bool>,
    bool: ToSql<Bool, DB>,
    i64: ToSql<BigInt, DB>,
    String: ToSql<Text, DB>,
    NaiveDateTime: ToSql<Timestamp, DB>,
    [u8]: ToSql<Binary, DB>,
{
    match value {
        Value::Bool(value) => pass.push_bind_param::<Bool, _>(value),
        Value::Int(value) => pass.push_bind_param::<BigInt, _>(value),
        Value::Text(value) => pass.push_bind_param::<Text, _>(value),
        Value::Timestamp(value) => pass.push_bind_param::<Timestamp, _>(value),
        // uuids travel as their 16 raw bytes
        Value::Uuid(value) => pass.push_bind_param::<Binary, [u8]>(value.as_bytes().as_slice()),
    }
}

fn walk_predicate<'b, DB>(predicate: &'b Predicate, pass: &mut AstPass<'_, 'b, DB>) -> QueryResult<()>
where
    DB: Backend + HasSqlType<Bool>,
    bool: ToSql<Bool, DB>,
    i64: ToSql<BigInt, DB>,
    String: ToSql<Text, DB>,
    NaiveDateTime: ToSql<Timestamp, DB>,
    [u8]: ToSql<Binary, DB>,
{
    match predicate {
        Predicate::Compare { column, op, value } => {
            pass.push_identifier(column)?;
            pass.push_sql(&format!(" {op} "));
            walk_value(value, pass)?;
        }
        Predicate::And(lhs, rhs) | Predicate::Or(lhs, rhs) => {
            let joiner = match predicate {
                Predicate::And(..) => " and ",
                _ => " or ",
            };
            pass.push_sql("(");
            walk_predicate(lhs, pass)?;
            pass.push_sql(joiner);
            walk_predicate(rhs, pass)?;
            pass.push_sql(")");
        }
        Predicate::Not(inner) => {
            pass.push_sql("not (");
            walk_predicate(inner, pass)?;
            pass.push_sql(")");
        }
    }
    Ok(())
}

impl<DB> QueryFragment<DB> for SqlFilter
where
    DB: Backend + HasSqlType<Bool>,
    bool: ToSql<Bool, DB>,
    i64: ToSql<BigInt, DB>,
    String: ToSql<Text, DB>,
    NaiveDateTime: ToSql<Timestamp, DB>,
    [u8]: ToSql<Binary, DB>,
{
    fn walk_ast<'b>(&'b self, mut pass: AstPass<'_, 'b, DB>) -> QueryResult<()> {
        // the tree shape changes with the sort order
        pass.unsafe_to_cache_prepared();
        walk_predicate(&self.0, &mut pass)
    }
}

impl<DB: Backend> QueryFragment<DB> for SqlOrder {
    fn walk_ast<'b>(&'b self, mut pass: AstPass<'_, 'b, DB>) -> QueryResult<()> {
        pass.unsafe_to_cache_prepared();
        for item in intersperse(self.0.columns().iter().map(Left), Right(())) {
            match item {
                Left(column) => {
                    pass.push_identifier(&column.name)?;
                    pass.push_sql(match column.direction {
                        SortDirection::Ascending => " asc",
                        SortDirection::Descending => " desc",
                    });
                }
                Right(_) => pass.push_sql(", "),
            }
        }
        Ok(())
    }
}

impl QueryId for SqlFilter {
    type QueryId = ();
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl QueryId for SqlOrder {
    type QueryId = ();
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl Expression for SqlFilter {
    type SqlType = Bool;
}

impl Expression for SqlOrder {
    type SqlType = NotSelectable;
}

impl<QS: ?Sized> AppearsOnTable<QS> for SqlFilter {}
impl<QS: ?Sized> SelectableExpression<QS> for SqlFilter {}
impl<QS: ?Sized> AppearsOnTable<QS> for SqlOrder {}

impl<GB> ValidGrouping<GB> for SqlFilter {
    type IsAggregate = is_aggregate::Never;
}

impl<GB> ValidGrouping<GB> for SqlOrder {
    type IsAggregate = is_aggregate::Never;
}
