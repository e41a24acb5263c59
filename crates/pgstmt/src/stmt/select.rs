//! SELECT-side attach operations: output columns, sources, joins,
//! predicates, grouping, ordering, limits and union branches.
//!
//! Every method appends to its fragment sequence and invalidates the cached
//! renders; all are total over well-formed inputs.

use crate::value::SqlValue;

use super::fragment::{
    BoolOp, CmpOp, Field, FromClause, JoinClause, JoinKind, LimitClause, Rhs, SortClause,
    SortDir, Source, UnionBranch, WhereClause,
};
use super::Query;

/// Build an ON condition for a join: `left <op> right`, both sides fields.
pub fn on(left: &str, op: CmpOp, right: &str) -> WhereClause {
    WhereClause {
        connective: BoolOp::And,
        field: Field::parse(left),
        op,
        rhs: Rhs::Field(Field::parse(right)),
        escape: true,
    }
}

impl Query {
    // ==================== Output columns ====================

    /// Append one output column. Dotted names qualify, `*` and expressions
    /// pass through unquoted.
    pub fn column(mut self, col: &str) -> Self {
        self.columns.push(Field::parse(col));
        self.touch();
        self
    }

    /// Append several output columns.
    pub fn columns_list(mut self, cols: &[&str]) -> Self {
        self.columns.extend(cols.iter().map(|c| Field::parse(c)));
        self.touch();
        self
    }

    /// Append a fully-specified field selector.
    pub fn field(mut self, field: Field) -> Self {
        self.columns.push(field);
        self.touch();
        self
    }

    // ==================== FROM ====================

    /// Add a FROM table.
    pub fn from(mut self, table: &str) -> Self {
        self.from.push(FromClause {
            source: Source::Table(table.to_string()),
            alias: None,
            escape: true,
        });
        self.touch();
        self
    }

    /// Add an aliased FROM table.
    pub fn from_alias(mut self, table: &str, alias: &str) -> Self {
        self.from.push(FromClause {
            source: Source::Table(table.to_string()),
            alias: Some(alias.to_string()),
            escape: true,
        });
        self.touch();
        self
    }

    /// Add a derived FROM source.
    pub fn from_subquery(mut self, query: Query, alias: &str) -> Self {
        self.from.push(FromClause {
            source: Source::Subquery(Box::new(query)),
            alias: Some(alias.to_string()),
            escape: true,
        });
        self.touch();
        self
    }

    // ==================== JOIN ====================

    /// Add a JOIN with an explicit ON condition.
    pub fn join(mut self, target: &str, on: WhereClause) -> Self {
        self.joins.push(JoinClause {
            kind: JoinKind::Inner,
            target: Source::Table(target.to_string()),
            alias: None,
            on,
            escape: true,
        });
        self.touch();
        self
    }

    /// Add a JOIN on `left = right`.
    pub fn join_eq(self, target: &str, left: &str, right: &str) -> Self {
        self.join(target, on(left, CmpOp::Equals, right))
    }

    /// Add a LEFT JOIN.
    pub fn left_join(mut self, target: &str, on: WhereClause) -> Self {
        self.joins.push(JoinClause {
            kind: JoinKind::Left,
            target: Source::Table(target.to_string()),
            alias: None,
            on,
            escape: true,
        });
        self.touch();
        self
    }

    /// Add a RIGHT JOIN.
    pub fn right_join(mut self, target: &str, on: WhereClause) -> Self {
        self.joins.push(JoinClause {
            kind: JoinKind::Right,
            target: Source::Table(target.to_string()),
            alias: None,
            on,
            escape: true,
        });
        self.touch();
        self
    }

    /// Add a JOIN against a derived subquery.
    pub fn join_subquery(mut self, query: Query, alias: &str, on: WhereClause) -> Self {
        self.joins.push(JoinClause {
            kind: JoinKind::Inner,
            target: Source::Subquery(Box::new(query)),
            alias: Some(alias.to_string()),
            on,
            escape: true,
        });
        self.touch();
        self
    }

    // ==================== WHERE ====================

    /// Add a predicate with an explicit operator, ANDed to its predecessor.
    pub fn filter(mut self, column: &str, op: CmpOp, value: impl Into<SqlValue>) -> Self {
        self.wheres.push(WhereClause {
            connective: BoolOp::And,
            field: Field::parse(column),
            op,
            rhs: Rhs::Value(value.into()),
            escape: true,
        });
        self.touch();
        self
    }

    /// Add a predicate ORed to its predecessor.
    pub fn or_filter(mut self, column: &str, op: CmpOp, value: impl Into<SqlValue>) -> Self {
        self.wheres.push(WhereClause {
            connective: BoolOp::Or,
            field: Field::parse(column),
            op,
            rhs: Rhs::Value(value.into()),
            escape: true,
        });
        self.touch();
        self
    }

    /// Add WHERE: column = value
    pub fn eq(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter(column, CmpOp::Equals, value)
    }

    /// Add WHERE: column != value
    pub fn ne(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter(column, CmpOp::NotEquals, value)
    }

    /// Add WHERE: column > value
    pub fn gt(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter(column, CmpOp::Greater, value)
    }

    /// Add WHERE: column >= value
    pub fn gte(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter(column, CmpOp::GreaterOrEqual, value)
    }

    /// Add WHERE: column < value
    pub fn lt(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter(column, CmpOp::Less, value)
    }

    /// Add WHERE: column <= value
    pub fn lte(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter(column, CmpOp::LessOrEqual, value)
    }

    /// Add WHERE: column LIKE pattern
    pub fn like(self, column: &str, pattern: impl Into<SqlValue>) -> Self {
        self.filter(column, CmpOp::Like, pattern)
    }

    /// Add WHERE: column ILIKE pattern (case-insensitive)
    pub fn ilike(self, column: &str, pattern: impl Into<SqlValue>) -> Self {
        self.filter(column, CmpOp::ILike, pattern)
    }

    /// Add WHERE: column = value, ORed to the previous predicate.
    pub fn or_eq(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.or_filter(column, CmpOp::Equals, value)
    }

    /// Add WHERE: column IS NULL
    pub fn is_null(self, column: &str) -> Self {
        self.filter(column, CmpOp::Is, SqlValue::Null)
    }

    /// Add WHERE: column IS NOT NULL
    pub fn is_not_null(self, column: &str) -> Self {
        self.filter(column, CmpOp::IsNot, SqlValue::Null)
    }

    /// Add WHERE: column IN (values...)
    pub fn in_list<T: Into<SqlValue>>(mut self, column: &str, values: Vec<T>) -> Self {
        self.wheres.push(WhereClause {
            connective: BoolOp::And,
            field: Field::parse(column),
            op: CmpOp::In,
            rhs: Rhs::Values(values.into_iter().map(Into::into).collect()),
            escape: true,
        });
        self.touch();
        self
    }

    /// Add WHERE: column NOT IN (values...)
    pub fn not_in<T: Into<SqlValue>>(mut self, column: &str, values: Vec<T>) -> Self {
        self.wheres.push(WhereClause {
            connective: BoolOp::And,
            field: Field::parse(column),
            op: CmpOp::NotIn,
            rhs: Rhs::Values(values.into_iter().map(Into::into).collect()),
            escape: true,
        });
        self.touch();
        self
    }

    /// Add WHERE comparing two fields.
    pub fn filter_field(mut self, left: &str, op: CmpOp, right: &str) -> Self {
        self.wheres.push(WhereClause {
            connective: BoolOp::And,
            field: Field::parse(left),
            op,
            rhs: Rhs::Field(Field::parse(right)),
            escape: true,
        });
        self.touch();
        self
    }

    /// Add WHERE: left = right, both fields.
    pub fn eq_field(self, left: &str, right: &str) -> Self {
        self.filter_field(left, CmpOp::Equals, right)
    }

    /// Add WHERE with a subquery right-hand side.
    pub fn filter_subquery(mut self, column: &str, op: CmpOp, query: Query) -> Self {
        self.wheres.push(WhereClause {
            connective: BoolOp::And,
            field: Field::parse(column),
            op,
            rhs: Rhs::Subquery(Box::new(query)),
            escape: true,
        });
        self.touch();
        self
    }

    /// Add WHERE: column IN (subquery)
    pub fn in_subquery(self, column: &str, query: Query) -> Self {
        self.filter_subquery(column, CmpOp::In, query)
    }

    /// Add WHERE: column = (subquery)
    pub fn eq_subquery(self, column: &str, query: Query) -> Self {
        self.filter_subquery(column, CmpOp::Equals, query)
    }

    /// Add a raw WHERE predicate without parameters.
    pub fn raw_where(mut self, sql: &str) -> Self {
        self.wheres.push(WhereClause {
            connective: BoolOp::And,
            field: Field::raw(sql),
            op: CmpOp::Equals,
            rhs: Rhs::None,
            escape: false,
        });
        self.touch();
        self
    }

    // ==================== Optional value helpers ====================

    /// Add WHERE if value is Some: column = value
    pub fn eq_opt<T: Into<SqlValue>>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// Add WHERE if value is Some: column LIKE pattern
    pub fn like_opt<T: Into<SqlValue>>(self, column: &str, pattern: Option<T>) -> Self {
        match pattern {
            Some(v) => self.like(column, v),
            None => self,
        }
    }

    /// Add WHERE if values is Some and non-empty: column IN (values...)
    pub fn in_opt<T: Into<SqlValue>>(self, column: &str, values: Option<Vec<T>>) -> Self {
        match values {
            Some(v) if !v.is_empty() => self.in_list(column, v),
            _ => self,
        }
    }

    // ==================== Grouping & ordering ====================

    /// Add a GROUP BY field.
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(SortClause {
            field: Field::parse(column),
            dir: SortDir::None,
        });
        self.touch();
        self
    }

    /// Add a HAVING predicate.
    pub fn having(mut self, column: &str, op: CmpOp, value: impl Into<SqlValue>) -> Self {
        self.having.push(WhereClause {
            connective: BoolOp::And,
            field: Field::parse(column),
            op,
            rhs: Rhs::Value(value.into()),
            escape: true,
        });
        self.touch();
        self
    }

    /// Add an ORDER BY field without a direction token.
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push(SortClause {
            field: Field::parse(column),
            dir: SortDir::None,
        });
        self.touch();
        self
    }

    /// Add ORDER BY column ASC.
    pub fn order_by_asc(mut self, column: &str) -> Self {
        self.order_by.push(SortClause {
            field: Field::parse(column),
            dir: SortDir::Asc,
        });
        self.touch();
        self
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by.push(SortClause {
            field: Field::parse(column),
            dir: SortDir::Desc,
        });
        self.touch();
        self
    }

    // ==================== LIMIT / OFFSET ====================

    /// Set LIMIT.
    pub fn limit(mut self, count: i64) -> Self {
        let mut clause = self.limit.unwrap_or_default();
        clause.count = count;
        self.limit = Some(clause);
        self.touch();
        self
    }

    /// Set OFFSET. A negative offset is omitted from the rendered text.
    pub fn offset(mut self, offset: i64) -> Self {
        let mut clause = self.limit.unwrap_or_default();
        clause.offset = offset;
        self.limit = Some(clause);
        self.touch();
        self
    }

    /// Pagination helper; `page` is 1-based.
    pub fn paginate(self, page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        let size = per_page.max(1);
        self.limit(size).offset((page - 1) * size)
    }

    // ==================== UNION ====================

    /// Attach a UNION branch.
    pub fn branch(mut self, query: Query) -> Self {
        self.unions.push(UnionBranch { query, all: false });
        self.touch();
        self
    }

    /// Attach a UNION ALL branch.
    pub fn branch_all(mut self, query: Query) -> Self {
        self.unions.push(UnionBranch { query, all: true });
        self.touch();
        self
    }

    /// Wrap the union as a derived FROM source under this alias.
    pub fn union_alias(mut self, alias: &str) -> Self {
        self.union_alias = Some(alias.to_string());
        self.touch();
        self
    }
}
