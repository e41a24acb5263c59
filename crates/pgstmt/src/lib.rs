//! # pgstmt
//!
//! A fragment-based PostgreSQL statement builder.
//!
//! ## Features
//!
//! - **One mutable statement model**: SELECT / INSERT / UPDATE / DELETE /
//!   UNION / CREATE share a single [`Query`] type built from typed fragments
//! - **Two renderers, one walk**: literal SQL with inlined escaped values,
//!   or prepared SQL with unique `@pN` labels plus an ordered, typed
//!   parameter table
//! - **Schema-driven coercion**: declarative column descriptors resolve
//!   parameter types and apply the primary-key null-skip rule
//! - **DDL from descriptors**: `CREATE TYPE ... AS ENUM` and `CREATE TABLE`
//!   rendered straight from the schema metadata
//! - **Narrow execution seam**: a [`GenericClient`] capability binds the
//!   parameter table over tokio-postgres; the builder itself does no I/O
//!
//! ## Building statements
//!
//! ```ignore
//! use pgstmt::stmt;
//!
//! let mut q = stmt::select("users")
//!     .eq("status", "active")
//!     .order_by_desc("created_at")
//!     .limit(20);
//!
//! assert_eq!(
//!     q.literal_sql(),
//!     r#"SELECT * FROM "users" WHERE "status"='active' ORDER BY "created_at" DESC LIMIT 20"#
//! );
//! assert_eq!(
//!     q.prepared_sql(),
//!     r#"SELECT * FROM "users" WHERE "status"=@p0 ORDER BY "created_at" DESC LIMIT 20"#
//! );
//! ```
//!
//! ## Executing
//!
//! ```ignore
//! let rows = stmt::select("users").eq("id", 7).fetch_all(&client).await?;
//! ```

pub mod client;
pub mod ddl;
pub mod error;
pub mod ident;
pub mod param;
pub mod prelude;
pub mod schema;
pub mod stmt;
pub mod types;
pub mod value;

pub use client::GenericClient;
pub use error::{StmtError, StmtResult};
pub use param::{BoundParam, Coerced};
pub use schema::{
    ColumnDescriptor, EnumVariant, ForeignKey, PgEnum, RefAction, SchemaRegistration,
    SchemaRegistry, TableDescriptor, TableInfo, TableSchema, UniqueKey,
};
pub use stmt::{
    delete, insert, insert_into, select, select_count, select_from_subquery, union, update,
    update_record, CmpOp, Field, JoinKind, Query, SortDir, StatementKind,
};
pub use types::{SqlType, TypeTag};
pub use value::SqlValue;

// Re-export inventory so schema registrations can be submitted without a
// direct dependency.
pub use inventory;
