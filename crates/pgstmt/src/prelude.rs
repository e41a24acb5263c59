//! Convenience re-exports for the common surface.
//!
//! ```ignore
//! use pgstmt::prelude::*;
//! ```

pub use crate::client::GenericClient;
pub use crate::ddl::{create_enum_type, create_table};
pub use crate::error::{StmtError, StmtResult};
pub use crate::param::BoundParam;
pub use crate::schema::{
    ColumnDescriptor, EnumVariant, ForeignKey, PgEnum, RefAction, SchemaRegistration,
    TableDescriptor, TableSchema, UniqueKey,
};
pub use crate::stmt::{
    delete, insert, insert_into, on, select, select_count, select_from_subquery, union, update,
    update_record, CmpOp, Field, JoinKind, Query, SortDir, StatementKind,
};
pub use crate::types::{SqlType, TypeTag};
pub use crate::value::SqlValue;
