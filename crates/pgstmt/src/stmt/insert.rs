//! INSERT-side attach operations: declared columns, sparse value rows,
//! ON CONFLICT clauses and the schema-coerced record path.

use crate::param::{coerce, Coerced};
use crate::schema::{self, TableSchema};
use crate::value::SqlValue;

use super::fragment::{ConflictAction, InsertRow, OnConflictClause, RowValue};
use super::Query;

impl Query {
    /// Declare the INSERT column list explicitly. Without this, columns
    /// accumulate in first-use order as rows set them.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        for col in cols {
            self.declare_column(col);
        }
        self.touch();
        self
    }

    /// Finish the open value row; the next `set` starts a new one.
    pub fn end_row(mut self) -> Self {
        self.row_open = false;
        self.touch();
        self
    }

    /// Append a complete row, coercing every pair against `T`'s column
    /// descriptors: types resolve through the schema and a null on a
    /// NOT NULL primary key is omitted instead of bound.
    pub fn record<T: TableSchema>(mut self, values: &[(&str, SqlValue)]) -> Self {
        let info = schema::lookup::<T>();
        self.row_open = false;
        let mut row = InsertRow::default();
        for col in info.columns {
            let supplied = values.iter().find(|(name, _)| *name == col.name);
            let Some((_, value)) = supplied else {
                continue;
            };
            match coerce(Some(value.clone()), col) {
                Coerced::Bind { value, ty } => {
                    self.declare_column(col.name);
                    row.values.push(RowValue {
                        column: col.name.to_string(),
                        value,
                        ty,
                    });
                }
                Coerced::Omit => {}
            }
        }
        self.rows.push(row);
        self.touch();
        self
    }

    /// ON CONFLICT on the given column: DO NOTHING.
    pub fn on_conflict_do_nothing(mut self, target: &str) -> Self {
        self.conflict = Some(OnConflictClause {
            target: target.to_string(),
            action: ConflictAction::DoNothing,
        });
        self.touch();
        self
    }

    /// ON CONFLICT on the given column: DO UPDATE reassigning every declared
    /// column to its incoming-row (`EXCLUDED`) reference.
    pub fn on_conflict_upsert(mut self, target: &str) -> Self {
        self.conflict = Some(OnConflictClause {
            target: target.to_string(),
            action: ConflictAction::UpsertAll,
        });
        self.touch();
        self
    }

    /// Set a value in the open row (starting one if none is open) and
    /// declare its column on first use.
    pub(crate) fn insert_value(&mut self, column: &str, value: SqlValue) {
        self.declare_column(column);
        if !self.row_open {
            self.rows.push(InsertRow::default());
            self.row_open = true;
        }
        let ty = value.inferred_type().map(crate::types::TypeTag::Sql);
        if let Some(row) = self.rows.last_mut() {
            row.values.push(RowValue {
                column: column.to_string(),
                value,
                ty,
            });
        }
    }

    fn declare_column(&mut self, column: &str) {
        if !self.insert_columns.iter().any(|c| c == column) {
            self.insert_columns.push(column.to_string());
        }
    }
}
