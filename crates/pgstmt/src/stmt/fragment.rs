//! Typed statement fragments.
//!
//! Each fragment is one clause-sized piece of a statement. Attach order is
//! render order; WHERE predicates additionally carry the boolean connective
//! to their predecessor.

use crate::ident;
use crate::schema::TableInfo;
use crate::types::TypeTag;
use crate::value::SqlValue;

use super::Query;

/// A column reference, optionally table-qualified.
#[derive(Debug, Clone)]
pub struct Field {
    pub table: Option<String>,
    pub name: String,
    /// Quote as an identifier; cleared for raw expressions.
    pub escape: bool,
}

impl Field {
    /// A plain column name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
            escape: true,
        }
    }

    /// A table-qualified column.
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
            escape: true,
        }
    }

    /// A raw expression emitted verbatim, e.g. `COUNT(*)`.
    pub fn raw(expr: impl Into<String>) -> Self {
        Self {
            table: None,
            name: expr.into(),
            escape: false,
        }
    }

    /// Parse `"t.c"` into a qualified field, treating anything that is not
    /// a plain (possibly dotted) name as a raw expression.
    pub fn parse(s: &str) -> Self {
        if s == "*" || s.contains('(') || s.contains(' ') {
            return Self::raw(s);
        }
        match s.split_once('.') {
            Some((table, column)) => Self::qualified(table, column),
            None => Self::new(s),
        }
    }

    pub fn render(&self, out: &mut String) {
        if !self.escape {
            out.push_str(&self.name);
            return;
        }
        match &self.table {
            Some(table) => ident::quote_qualified(out, table, &self.name),
            None => ident::quote_into(out, &self.name),
        }
    }
}

/// Comparison operators. `as_sql` includes the spacing the operator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Equals,
    NotEquals,
    Is,
    IsNot,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Like,
    ILike,
    In,
    NotIn,
}

impl CmpOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::Is => " IS ",
            Self::IsNot => " IS NOT ",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Like => " LIKE ",
            Self::ILike => " ILIKE ",
            Self::In => " IN ",
            Self::NotIn => " NOT IN ",
        }
    }

    /// The null-comparison form: a null value can never be compared with
    /// `=`, so equality operators collapse to `IS` / `IS NOT`.
    pub fn null_form(&self) -> CmpOp {
        match self {
            Self::Equals => Self::Is,
            Self::NotEquals => Self::IsNot,
            other => *other,
        }
    }
}

/// Boolean connective between consecutive WHERE predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolOp {
    #[default]
    And,
    Or,
}

impl BoolOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    /// No direction token is rendered.
    #[default]
    None,
    Asc,
    Desc,
}

/// Right-hand side of a WHERE predicate.
#[derive(Debug, Clone)]
pub enum Rhs {
    Value(SqlValue),
    /// WHERE-IN value set.
    Values(Vec<SqlValue>),
    /// Field-to-field comparison.
    Field(Field),
    Subquery(Box<Query>),
    /// Raw predicates carry everything in the field; a predicate that ends
    /// up here without a raw field is an authoring bug and renders as-is.
    None,
}

#[derive(Debug, Clone)]
pub struct WhereClause {
    pub connective: BoolOp,
    pub field: Field,
    pub op: CmpOp,
    pub rhs: Rhs,
    /// Controls literal quoting of the bound value.
    pub escape: bool,
}

/// A FROM/JOIN source: a named table or a derived subquery.
#[derive(Debug, Clone)]
pub enum Source {
    Table(String),
    Subquery(Box<Query>),
}

#[derive(Debug, Clone)]
pub struct FromClause {
    pub source: Source,
    pub alias: Option<String>,
    pub escape: bool,
}

#[derive(Debug, Clone)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub target: Source,
    pub alias: Option<String>,
    pub on: WhereClause,
    pub escape: bool,
}

/// ORDER BY and GROUP BY entries share this shape.
#[derive(Debug, Clone)]
pub struct SortClause {
    pub field: Field,
    pub dir: SortDir,
}

/// LIMIT/OFFSET; a negative component is omitted from the rendered text.
#[derive(Debug, Clone, Copy)]
pub struct LimitClause {
    pub count: i64,
    pub offset: i64,
}

impl Default for LimitClause {
    fn default() -> Self {
        Self {
            count: -1,
            offset: -1,
        }
    }
}

/// One UPDATE assignment.
#[derive(Debug, Clone)]
pub struct SetClause {
    pub column: String,
    pub value: SqlValue,
    pub ty: Option<TypeTag>,
    pub escape: bool,
}

/// One value of a sparse INSERT row.
#[derive(Debug, Clone)]
pub struct RowValue {
    pub column: String,
    pub value: SqlValue,
    pub ty: Option<TypeTag>,
}

/// A sparse INSERT row; columns missing from it render as NULL.
#[derive(Debug, Clone, Default)]
pub struct InsertRow {
    pub values: Vec<RowValue>,
}

impl InsertRow {
    pub fn get(&self, column: &str) -> Option<&RowValue> {
        self.values.iter().find(|v| v.column == column)
    }
}

#[derive(Debug, Clone)]
pub enum ConflictAction {
    DoNothing,
    /// Reassign every declared column to its incoming-row reference.
    UpsertAll,
}

#[derive(Debug, Clone)]
pub struct OnConflictClause {
    pub target: String,
    pub action: ConflictAction,
}

/// One branch of a UNION statement.
#[derive(Debug, Clone)]
pub struct UnionBranch {
    pub query: Query,
    pub all: bool,
}

/// CREATE TABLE payload: the resolved schema entry.
#[derive(Debug, Clone)]
pub struct CreateTable {
    pub info: TableInfo,
}
