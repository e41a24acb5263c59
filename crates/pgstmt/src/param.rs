//! Bound parameters and value coercion.
//!
//! Prepared rendering fills an ordered table of [`BoundParam`]s; insertion
//! order is binding order and the label counter is the table's length, so
//! labels stay unique across a query and all of its nested subqueries.

use crate::schema::ColumnDescriptor;
use crate::types::TypeTag;
use crate::value::SqlValue;

/// One prepared-statement binding.
#[derive(Debug, Clone)]
pub struct BoundParam {
    /// Placeholder label without the sigil, e.g. `p0`.
    pub label: String,
    /// The database column this value targets, when known.
    pub column: Option<String>,
    pub value: SqlValue,
    /// Resolved type tag the execution seam uses to pick a native bind type.
    pub ty: Option<TypeTag>,
    /// Whether literal substitution quotes the value.
    pub escape: bool,
}

impl BoundParam {
    /// The placeholder token as it appears in prepared SQL.
    pub fn placeholder(&self) -> String {
        format!("@{}", self.label)
    }
}

/// Outcome of coercing a field value against its column descriptor.
#[derive(Debug, Clone)]
pub enum Coerced {
    Bind {
        value: SqlValue,
        ty: Option<TypeTag>,
    },
    /// The value is dropped from the statement entirely.
    Omit,
}

/// Coerce a field value into a bindable parameter.
///
/// An absent value becomes NULL. A null on a NOT NULL primary-key column is
/// omitted rather than bound, so serial columns keep their generated value;
/// this rule is deliberately not applied to other NOT NULL columns. The type
/// resolves free-form override first, then the declared type, then inference
/// from the native value; when nothing resolves the parameter still binds
/// as a generic pass-through.
pub fn coerce(value: Option<SqlValue>, column: &ColumnDescriptor) -> Coerced {
    let value = value.unwrap_or(SqlValue::Null);
    if column.primary_key && column.not_null && value.is_null() {
        return Coerced::Omit;
    }
    let ty = resolve_type(&value, column);
    Coerced::Bind { value, ty }
}

fn resolve_type(value: &SqlValue, column: &ColumnDescriptor) -> Option<TypeTag> {
    if let Some(name) = column.type_override {
        return Some(TypeTag::Custom(name));
    }
    if let Some(ty) = column.sql_type {
        return Some(TypeTag::Sql(ty));
    }
    value.inferred_type().map(TypeTag::Sql)
}

/// Replace each label in `sql` with its literally-rendered value.
///
/// Highest-numbered labels are substituted first so a label that is a
/// textual prefix of another (`@p1` inside `@p10`) is never clobbered.
pub fn substitute_labels(sql: &str, params: &[BoundParam]) -> String {
    let mut out = sql.to_string();
    for param in params.iter().rev() {
        let mut rendered = String::new();
        param.value.render_literal(&mut rendered, param.escape);
        out = out.replace(&param.placeholder(), &rendered);
    }
    out
}

/// Convert label placeholders to the wire-native positional `$n` form.
///
/// Labels are emitted in binding order, so position `i` maps to `$i+1`.
pub fn positional_sql(sql: &str, params: &[BoundParam]) -> String {
    let mut out = sql.to_string();
    for (i, param) in params.iter().enumerate().rev() {
        out = out.replace(&param.placeholder(), &format!("${}", i + 1));
    }
    out
}
