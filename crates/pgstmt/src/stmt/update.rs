//! SET assignments, shared by UPDATE statements and INSERT value rows.

use crate::param::{coerce, Coerced};
use crate::schema::{self, TableSchema};
use crate::value::SqlValue;

use super::fragment::SetClause;
use super::{Query, StatementKind};

impl Query {
    /// Set a column value. On an UPDATE this appends a SET assignment; on
    /// an INSERT it fills the open value row.
    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        if self.kind == Some(StatementKind::Insert) {
            self.insert_value(column, value);
        } else {
            let ty = value.inferred_type().map(crate::types::TypeTag::Sql);
            self.sets.push(SetClause {
                column: column.to_string(),
                value,
                ty,
                escape: true,
            });
        }
        self.touch();
        self
    }

    /// Set an optional column value (None => skip).
    pub fn set_opt<T: Into<SqlValue>>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Set a raw SQL expression, e.g. `NOW()`.
    pub fn set_raw(self, column: &str, expr: &str) -> Self {
        self.set(column, SqlValue::raw(expr))
    }

    /// Set a JSON column from any serializable value.
    pub fn set_json<T: serde::Serialize>(self, column: &str, value: &T) -> serde_json::Result<Self> {
        let json = serde_json::to_value(value)?;
        Ok(self.set(column, json))
    }

    /// Set every pair in `values`, coerced against `T`'s column descriptors
    /// in declaration order.
    pub fn set_record<T: TableSchema>(mut self, values: &[(&str, SqlValue)]) -> Self {
        let info = schema::lookup::<T>();
        for col in info.columns {
            let supplied = values.iter().find(|(name, _)| *name == col.name);
            let Some((_, value)) = supplied else {
                continue;
            };
            match coerce(Some(value.clone()), col) {
                Coerced::Bind { value, ty } => {
                    if self.kind == Some(StatementKind::Insert) {
                        self.insert_value(col.name, value);
                    } else {
                        self.sets.push(SetClause {
                            column: col.name.to_string(),
                            value,
                            ty,
                            escape: true,
                        });
                    }
                }
                Coerced::Omit => {}
            }
        }
        self.touch();
        self
    }
}
