//! Unified statement builder.
//!
//! One [`Query`] type carries every statement kind. Callers attach fragments
//! through the builder methods, then render either form:
//!
//! ```ignore
//! use pgstmt::stmt;
//!
//! let mut q = stmt::select("users")
//!     .eq("status", "active")
//!     .order_by_desc("created_at")
//!     .limit(20);
//!
//! let literal = q.literal_sql().to_string();
//! let prepared = q.prepared_sql().to_string();
//! let params = q.params();
//! ```
//!
//! Rendered text is cached per output and invalidated by every mutation, so
//! repeated renders of an unmutated query are byte-identical and free.

mod fragment;
mod insert;
mod render;
mod select;
mod update;

#[cfg(test)]
mod tests;

pub use fragment::{
    BoolOp, CmpOp, ConflictAction, CreateTable, Field, FromClause, InsertRow, JoinClause,
    JoinKind, LimitClause, OnConflictClause, Rhs, RowValue, SetClause, SortClause, SortDir,
    Source, UnionBranch, WhereClause,
};
pub use select::on;

use crate::error::{StmtError, StmtResult};
use crate::param::BoundParam;
use crate::schema::{self, TableSchema};
use crate::value::SqlValue;

use render::RenderMode;

/// The statement kind, set exactly once by the entry point that creates the
/// query. It decides which renderer clauses fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    SelectCount,
    SelectUnion,
    Insert,
    Update,
    Delete,
    Create,
}

/// One in-flight statement.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub(crate) kind: Option<StatementKind>,
    pub(crate) columns: Vec<Field>,
    pub(crate) from: Vec<FromClause>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) wheres: Vec<WhereClause>,
    pub(crate) group_by: Vec<SortClause>,
    pub(crate) having: Vec<WhereClause>,
    pub(crate) order_by: Vec<SortClause>,
    pub(crate) limit: Option<LimitClause>,
    pub(crate) unions: Vec<UnionBranch>,
    pub(crate) union_alias: Option<String>,
    pub(crate) sets: Vec<SetClause>,
    pub(crate) insert_columns: Vec<String>,
    pub(crate) rows: Vec<InsertRow>,
    pub(crate) row_open: bool,
    pub(crate) conflict: Option<OnConflictClause>,
    pub(crate) returning: Vec<String>,
    /// Primary-key column captured when the target table was set from a
    /// schema; used by `returning_key`.
    pub(crate) key_column: Option<&'static str>,
    pub(crate) create: Option<CreateTable>,
    cached_literal: Option<String>,
    cached_prepared: Option<String>,
    params: Vec<BoundParam>,
}

/// Create a SELECT query over the given table.
pub fn select(table: &str) -> Query {
    Query::new(StatementKind::Select).with_table(table)
}

/// Create a SELECT COUNT(*) query over the given table.
pub fn select_count(table: &str) -> Query {
    Query::new(StatementKind::SelectCount).with_table(table)
}

/// Create a SELECT query over a derived subquery source.
pub fn select_from_subquery(query: Query, alias: &str) -> Query {
    Query::new(StatementKind::Select).from_subquery(query, alias)
}

/// Create an empty UNION query; attach branches with [`Query::branch`] and
/// [`Query::branch_all`].
pub fn union() -> Query {
    Query::new(StatementKind::SelectUnion)
}

/// Create an INSERT query for the given table.
pub fn insert(table: &str) -> Query {
    Query::new(StatementKind::Insert).with_table(table)
}

/// Create an INSERT query targeting a schema-described table, capturing its
/// primary-key column for `returning_key`.
pub fn insert_into<T: TableSchema>() -> Query {
    let info = schema::lookup::<T>();
    let mut q = Query::new(StatementKind::Insert).with_table(info.name);
    q.key_column = info.primary_key;
    q
}

/// Create an UPDATE query for the given table.
pub fn update(table: &str) -> Query {
    Query::new(StatementKind::Update).with_table(table)
}

/// Create an UPDATE query for a schema-described table, coercing every pair
/// in `values` against the type's column descriptors.
pub fn update_record<T: TableSchema>(values: &[(&str, SqlValue)]) -> Query {
    let info = schema::lookup::<T>();
    update(info.name).set_record::<T>(values)
}

/// Create a DELETE query for the given table.
pub fn delete(table: &str) -> Query {
    Query::new(StatementKind::Delete).with_table(table)
}

impl Query {
    fn new(kind: StatementKind) -> Self {
        Query {
            kind: Some(kind),
            ..Default::default()
        }
    }

    fn with_table(mut self, table: &str) -> Self {
        self.from.push(FromClause {
            source: Source::Table(table.to_string()),
            alias: None,
            escape: true,
        });
        self
    }

    /// The statement kind, if an entry point has set one.
    pub fn kind(&self) -> Option<StatementKind> {
        self.kind
    }

    /// Invalidate both cached outputs. Every mutating call goes through
    /// here, so a reader never observes text stale against the fragments.
    pub(crate) fn touch(&mut self) {
        self.cached_literal = None;
        self.cached_prepared = None;
        self.params.clear();
    }

    /// Render as literal SQL with every value inlined and escaped.
    ///
    /// Idempotent between mutations; the text is cached.
    pub fn literal_sql(&mut self) -> &str {
        if self.cached_literal.is_none() {
            let mut params = Vec::new();
            let sql = render::render(self, RenderMode::Literal, &mut params);
            #[cfg(feature = "tracing")]
            tracing::debug!(kind = ?self.kind, sql = %sql, "rendered literal statement");
            self.cached_literal = Some(sql);
        }
        self.cached_literal.as_deref().unwrap_or_default()
    }

    /// Render as prepared SQL with unique `@pN` placeholder labels, filling
    /// the ordered label→value table returned by [`Query::params`].
    pub fn prepared_sql(&mut self) -> &str {
        if self.cached_prepared.is_none() {
            let mut params = Vec::new();
            let sql = render::render(self, RenderMode::Prepared, &mut params);
            #[cfg(feature = "tracing")]
            tracing::debug!(kind = ?self.kind, sql = %sql, params = params.len(), "rendered prepared statement");
            self.params = params;
            self.cached_prepared = Some(sql);
        }
        self.cached_prepared.as_deref().unwrap_or_default()
    }

    /// Bound parameters from the last prepared render, in binding order.
    pub fn params(&self) -> &[BoundParam] {
        &self.params
    }

    /// Add RETURNING columns.
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning.extend(cols.iter().map(|c| c.to_string()));
        self.touch();
        self
    }

    /// RETURNING the primary-key column captured from the target schema.
    /// A no-op when the table was not set from a schema.
    pub fn returning_key(mut self) -> Self {
        if let Some(key) = self.key_column {
            self.returning.push(key.to_string());
        }
        self.touch();
        self
    }

    /// Build a CREATE TABLE statement for a schema-described type.
    ///
    /// Fails fast with a configuration error when the type carries no
    /// table descriptor.
    pub fn create_table<T: TableSchema>() -> StmtResult<Query> {
        let info = schema::lookup::<T>();
        if info.table.is_none() {
            return Err(StmtError::configuration(format!(
                "CREATE TABLE requires a table descriptor, `{}` has none",
                info.name
            )));
        }
        let mut q = Query::new(StatementKind::Create);
        q.create = Some(CreateTable { info });
        Ok(q)
    }
}
