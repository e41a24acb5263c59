//! The execution seam.
//!
//! The builder itself never touches the network; a [`GenericClient`] is the
//! capability that transmits a rendered statement and hands back rows, a
//! scalar, or an affected-row count. The trait is implemented for
//! `tokio_postgres::Client` and `Transaction`, so a query composes into a
//! transaction unchanged.
//!
//! Prepared text carries `@pN` labels; [`positional_sql`] converts them to
//! the wire-native `$n` form at this boundary, and [`Query::params_refs`]
//! exposes the bound values as `ToSql` trait objects.

use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

use crate::error::{StmtError, StmtResult};
use crate::param::positional_sql;
use crate::stmt::Query;

/// A capability that executes rendered statements.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = StmtResult<Vec<Row>>> + Send;

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = StmtResult<Option<Row>>> + Send;

    /// Execute a query and return the first row.
    ///
    /// Returns [`StmtError::NotFound`] if no rows come back.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = StmtResult<Row>> + Send {
        async move {
            match self.query_opt(sql, params).await? {
                Some(row) => Ok(row),
                None => Err(StmtError::not_found("Expected 1 row, got 0")),
            }
        }
    }

    /// Execute a statement and return the affected-row count.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = StmtResult<u64>> + Send;
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Vec<Row>> {
        Ok(tokio_postgres::Client::query(self, sql, params).await?)
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StmtResult<Option<Row>> {
        Ok(tokio_postgres::Client::query_opt(self, sql, params).await?)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, params).await?)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Vec<Row>> {
        Ok(tokio_postgres::Transaction::query(self, sql, params).await?)
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StmtResult<Option<Row>> {
        Ok(tokio_postgres::Transaction::query_opt(self, sql, params).await?)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, sql, params).await?)
    }
}

impl Query {
    /// Bound parameters as `ToSql` trait objects, in binding order.
    pub fn params_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params()
            .iter()
            .map(|p| &p.value as &(dyn ToSql + Sync))
            .collect()
    }

    /// Prepared SQL in the wire-native positional form.
    pub fn positional_sql(&mut self) -> String {
        let prepared = self.prepared_sql().to_string();
        positional_sql(&prepared, self.params())
    }

    /// Execute and return all rows.
    pub async fn fetch_all(&mut self, conn: &impl GenericClient) -> StmtResult<Vec<Row>> {
        let sql = self.positional_sql();
        let params = self.params_refs();
        conn.query(&sql, &params).await
    }

    /// Execute and return the first row, if any.
    pub async fn fetch_opt(&mut self, conn: &impl GenericClient) -> StmtResult<Option<Row>> {
        let sql = self.positional_sql();
        let params = self.params_refs();
        conn.query_opt(&sql, &params).await
    }

    /// Execute and return the first row.
    pub async fn fetch_one(&mut self, conn: &impl GenericClient) -> StmtResult<Row> {
        let sql = self.positional_sql();
        let params = self.params_refs();
        conn.query_one(&sql, &params).await
    }

    /// Execute and return the affected-row count.
    pub async fn execute(&mut self, conn: &impl GenericClient) -> StmtResult<u64> {
        let sql = self.positional_sql();
        let params = self.params_refs();
        conn.execute(&sql, &params).await
    }
}
