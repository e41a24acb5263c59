//! The shared fragment walk producing literal or prepared SQL.
//!
//! Both render entry points drive the same walk; the mode only decides
//! whether a value is inlined as escaped text or replaced by a fresh
//! `@pN` label pushed onto the shared parameter table. Subqueries recurse
//! with the same table, so the label counter (the table's length) is global
//! to the statement tree and labels never collide.
//!
//! Clause order is fixed regardless of statement kind: header → FROM →
//! JOIN → WHERE → GROUP BY → HAVING → ORDER BY → LIMIT → VALUES /
//! ON CONFLICT → RETURNING. Missing clauses contribute nothing, so the
//! output never carries stray separators.

use crate::ddl;
use crate::ident;
use crate::param::BoundParam;
use crate::types::TypeTag;
use crate::value::SqlValue;

use super::fragment::{
    ConflictAction, Field, FromClause, Rhs, SortClause, SortDir, Source, WhereClause,
};
use super::{Query, StatementKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderMode {
    Literal,
    Prepared,
}

pub(crate) struct RenderCtx<'a> {
    mode: RenderMode,
    params: &'a mut Vec<BoundParam>,
}

impl RenderCtx<'_> {
    /// Inline the value (literal mode, raw fragments) or bind it under the
    /// next label.
    fn value_token(
        &mut self,
        value: &SqlValue,
        ty: Option<TypeTag>,
        column: Option<&str>,
        escape: bool,
    ) -> String {
        if self.mode == RenderMode::Literal || value.is_raw() {
            let mut out = String::new();
            value.render_literal(&mut out, escape);
            return out;
        }
        let ty = ty.or_else(|| value.inferred_type().map(TypeTag::Sql));
        let label = format!("p{}", self.params.len());
        let token = format!("@{label}");
        self.params.push(BoundParam {
            label,
            column: column.map(str::to_string),
            value: value.clone(),
            ty,
            escape,
        });
        token
    }
}

pub(crate) fn render(q: &Query, mode: RenderMode, params: &mut Vec<BoundParam>) -> String {
    let mut ctx = RenderCtx { mode, params };
    render_query(q, &mut ctx)
}

fn render_query(q: &Query, ctx: &mut RenderCtx) -> String {
    match q.kind {
        Some(StatementKind::Create) => {
            return q
                .create
                .as_ref()
                .map(|c| ddl::render_create_table(&c.info))
                .unwrap_or_default();
        }
        Some(StatementKind::SelectUnion) => return render_union(q, ctx),
        _ => {}
    }

    let mut out = String::new();
    render_header(q, ctx, &mut out);
    if matches!(
        q.kind,
        Some(StatementKind::Select) | Some(StatementKind::SelectCount) | Some(StatementKind::Delete)
    ) {
        render_from(q, ctx, &mut out);
    }
    render_joins(q, ctx, &mut out);
    render_predicates(&q.wheres, "WHERE", ctx, &mut out);
    render_group_by(q, &mut out);
    render_predicates(&q.having, "HAVING", ctx, &mut out);
    render_order_by(q, &mut out);
    render_limit(q, &mut out);
    if q.kind == Some(StatementKind::Insert) {
        render_values(q, ctx, &mut out);
        render_conflict(q, &mut out);
    }
    render_returning(q, &mut out);
    out
}

fn render_header(q: &Query, ctx: &mut RenderCtx, out: &mut String) {
    match q.kind {
        Some(StatementKind::Select) => {
            out.push_str("SELECT ");
            if q.columns.is_empty() {
                out.push('*');
            } else {
                push_fields(out, &q.columns);
            }
        }
        Some(StatementKind::SelectCount) => {
            out.push_str("SELECT COUNT(*)");
        }
        Some(StatementKind::Insert) => {
            out.push_str("INSERT INTO ");
            if let Some(target) = q.from.first() {
                push_source(target, ctx, out);
            }
            if !q.insert_columns.is_empty() {
                out.push_str(" (");
                for (i, col) in q.insert_columns.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    ident::quote_into(out, col);
                }
                out.push(')');
            }
        }
        Some(StatementKind::Update) => {
            out.push_str("UPDATE ");
            if let Some(target) = q.from.first() {
                push_source(target, ctx, out);
            }
            if !q.sets.is_empty() {
                out.push_str(" SET ");
                for (i, set) in q.sets.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    ident::quote_into(out, &set.column);
                    out.push('=');
                    let token = ctx.value_token(&set.value, set.ty, Some(&set.column), set.escape);
                    out.push_str(&token);
                }
            }
        }
        Some(StatementKind::Delete) => {
            out.push_str("DELETE");
        }
        _ => {}
    }
}

fn render_from(q: &Query, ctx: &mut RenderCtx, out: &mut String) {
    if q.from.is_empty() {
        return;
    }
    out.push_str(" FROM ");
    for (i, from) in q.from.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_source(from, ctx, out);
    }
}

fn push_source(from: &FromClause, ctx: &mut RenderCtx, out: &mut String) {
    match &from.source {
        Source::Table(name) => {
            if from.escape {
                ident::quote_into(out, name);
            } else {
                out.push_str(name);
            }
        }
        Source::Subquery(sub) => {
            out.push('(');
            out.push_str(&render_query(sub, ctx));
            out.push(')');
        }
    }
    if let Some(alias) = &from.alias {
        out.push_str(" AS ");
        ident::quote_into(out, alias);
    }
}

fn render_joins(q: &Query, ctx: &mut RenderCtx, out: &mut String) {
    for join in &q.joins {
        out.push(' ');
        out.push_str(join.kind.as_sql());
        out.push(' ');
        match &join.target {
            Source::Table(name) => {
                if join.escape {
                    ident::quote_into(out, name);
                } else {
                    out.push_str(name);
                }
            }
            Source::Subquery(sub) => {
                out.push('(');
                out.push_str(&render_query(sub, ctx));
                out.push(')');
            }
        }
        if let Some(alias) = &join.alias {
            out.push_str(" AS ");
            ident::quote_into(out, alias);
        }
        out.push_str(" ON ");
        let predicate = render_predicate(&join.on, ctx);
        out.push_str(&predicate);
    }
}

fn render_predicates(
    clauses: &[WhereClause],
    keyword: &str,
    ctx: &mut RenderCtx,
    out: &mut String,
) {
    if clauses.is_empty() {
        return;
    }
    out.push(' ');
    out.push_str(keyword);
    out.push(' ');
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            out.push_str(clause.connective.as_sql());
        }
        let predicate = render_predicate(clause, ctx);
        out.push_str(&predicate);
    }
}

fn render_predicate(clause: &WhereClause, ctx: &mut RenderCtx) -> String {
    let mut out = String::new();
    clause.field.render(&mut out);
    match &clause.rhs {
        // Raw predicates carry everything in the field; an authored
        // fragment with nothing else renders as-is.
        Rhs::None => {}
        Rhs::Value(value) => {
            if value.is_null() && !value.is_raw() {
                // NULL never compares with `=`; it renders inline in both
                // modes because `IS @p0` is not bindable.
                out.push_str(clause.op.null_form().as_sql());
                out.push_str("NULL");
            } else {
                out.push_str(clause.op.as_sql());
                let token =
                    ctx.value_token(value, None, Some(&clause.field.name), clause.escape);
                out.push_str(&token);
            }
        }
        Rhs::Values(values) => {
            out.push_str(clause.op.as_sql());
            out.push('(');
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if value.is_null() {
                    out.push_str("NULL");
                } else {
                    let token =
                        ctx.value_token(value, None, Some(&clause.field.name), clause.escape);
                    out.push_str(&token);
                }
            }
            out.push(')');
        }
        Rhs::Field(field) => {
            out.push_str(clause.op.as_sql());
            field.render(&mut out);
        }
        Rhs::Subquery(sub) => {
            out.push_str(clause.op.as_sql());
            out.push('(');
            out.push_str(&render_query(sub, ctx));
            out.push(')');
        }
    }
    out
}

fn render_group_by(q: &Query, out: &mut String) {
    if q.group_by.is_empty() {
        return;
    }
    out.push_str(" GROUP BY ");
    push_sorts(out, &q.group_by);
}

fn render_order_by(q: &Query, out: &mut String) {
    if q.order_by.is_empty() {
        return;
    }
    out.push_str(" ORDER BY ");
    push_sorts(out, &q.order_by);
}

fn push_sorts(out: &mut String, sorts: &[SortClause]) {
    for (i, sort) in sorts.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        sort.field.render(out);
        match sort.dir {
            SortDir::None => {}
            SortDir::Asc => out.push_str(" ASC"),
            SortDir::Desc => out.push_str(" DESC"),
        }
    }
}

fn render_limit(q: &Query, out: &mut String) {
    let Some(limit) = q.limit else {
        return;
    };
    if limit.count >= 0 {
        out.push_str(" LIMIT ");
        out.push_str(&limit.count.to_string());
    }
    if limit.offset >= 0 {
        out.push_str(" OFFSET ");
        out.push_str(&limit.offset.to_string());
    }
}

fn render_values(q: &Query, ctx: &mut RenderCtx, out: &mut String) {
    if q.insert_columns.is_empty() && q.rows.is_empty() {
        out.push_str(" DEFAULT VALUES");
        return;
    }
    if q.rows.is_empty() {
        return;
    }
    out.push_str(" VALUES ");
    for (row_index, row) in q.rows.iter().enumerate() {
        if row_index > 0 {
            out.push(',');
        }
        out.push('(');
        // One positional slot per declared column, in declared order;
        // columns a row does not set render as NULL.
        for (i, column) in q.insert_columns.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            match row.get(column) {
                Some(value) => {
                    let token = ctx.value_token(&value.value, value.ty, Some(column), true);
                    out.push_str(&token);
                }
                None => out.push_str("NULL"),
            }
        }
        out.push(')');
    }
}

fn render_conflict(q: &Query, out: &mut String) {
    let Some(conflict) = &q.conflict else {
        return;
    };
    out.push_str(" ON CONFLICT (");
    ident::quote_into(out, &conflict.target);
    out.push(')');
    match &conflict.action {
        ConflictAction::DoNothing => out.push_str(" DO NOTHING"),
        ConflictAction::UpsertAll => {
            out.push_str(" DO UPDATE SET ");
            for (i, column) in q.insert_columns.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                ident::quote_into(out, column);
                out.push_str("=EXCLUDED.");
                ident::quote_into(out, column);
            }
        }
    }
}

fn render_returning(q: &Query, out: &mut String) {
    if q.returning.is_empty() {
        return;
    }
    out.push_str(" RETURNING ");
    let fields: Vec<Field> = q.returning.iter().map(|c| Field::parse(c)).collect();
    push_fields(out, &fields);
}

fn render_union(q: &Query, ctx: &mut RenderCtx) -> String {
    let mut body = String::new();
    for (i, branch) in q.unions.iter().enumerate() {
        if i > 0 {
            body.push_str(if branch.all { " UNION ALL " } else { " UNION " });
        }
        body.push_str(&render_query(&branch.query, ctx));
    }
    match &q.union_alias {
        Some(alias) => {
            let mut out = String::from("SELECT * FROM (");
            out.push_str(&body);
            out.push_str(") AS ");
            ident::quote_into(&mut out, alias);
            out
        }
        None => body,
    }
}

fn push_fields(out: &mut String, fields: &[Field]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        field.render(out);
    }
}
