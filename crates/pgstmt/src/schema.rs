//! Declarative schema descriptors and the type-keyed registry.
//!
//! A record type maps to a table through a [`TableSchema`] implementation
//! carrying `const`-constructed [`ColumnDescriptor`]s and an optional
//! [`TableDescriptor`]. Lookups go through [`lookup`], which populates the
//! process-wide [`SchemaRegistry`] lazily on first use; schemas can also be
//! submitted at startup via [`SchemaRegistration`] and the `inventory` crate.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::types::SqlType;

/// Per-column metadata mapping a record field to a database column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    /// Declared engine type. Resolution order is free-form override first,
    /// then this, then inference from the runtime value.
    pub sql_type: Option<SqlType>,
    /// Free-form type string rendered verbatim (e.g. an enum type name).
    pub type_override: Option<&'static str>,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub not_null: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub auto_increment: bool,
    pub default: Option<&'static str>,
    pub check: Option<&'static str>,
    pub comment: Option<&'static str>,
}

impl ColumnDescriptor {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            sql_type: None,
            type_override: None,
            length: None,
            precision: None,
            not_null: false,
            primary_key: false,
            unique: false,
            auto_increment: false,
            default: None,
            check: None,
            comment: None,
        }
    }

    pub const fn of_type(mut self, ty: SqlType) -> Self {
        self.sql_type = Some(ty);
        self
    }

    pub const fn override_type(mut self, ty: &'static str) -> Self {
        self.type_override = Some(ty);
        self
    }

    pub const fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub const fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub const fn with_default(mut self, expr: &'static str) -> Self {
        self.default = Some(expr);
        self
    }

    pub const fn with_check(mut self, expr: &'static str) -> Self {
        self.check = Some(expr);
        self
    }

    pub const fn with_comment(mut self, text: &'static str) -> Self {
        self.comment = Some(text);
        self
    }
}

/// A named multi-column unique constraint.
#[derive(Debug, Clone, Copy)]
pub struct UniqueKey {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl UniqueKey {
    pub const fn new(name: &'static str, columns: &'static [&'static str]) -> Self {
        Self { name, columns }
    }
}

/// Referential action for foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl RefAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A named foreign-key constraint.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub ref_table: &'static str,
    pub ref_columns: &'static [&'static str],
    pub delete_action: RefAction,
    pub update_action: RefAction,
}

impl ForeignKey {
    pub const fn new(
        name: &'static str,
        columns: &'static [&'static str],
        ref_table: &'static str,
        ref_columns: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            columns,
            ref_table,
            ref_columns,
            delete_action: RefAction::NoAction,
            update_action: RefAction::NoAction,
        }
    }

    pub const fn on_delete(mut self, action: RefAction) -> Self {
        self.delete_action = action;
        self
    }

    pub const fn on_update(mut self, action: RefAction) -> Self {
        self.update_action = action;
        self
    }
}

/// Table-level metadata: constraints, creation flags and storage options.
#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub temporary: bool,
    pub if_not_exists: bool,
    pub unique_keys: &'static [UniqueKey],
    pub foreign_keys: &'static [ForeignKey],
    /// Trailing storage options rendered as `WITH (key=value, ...)`.
    pub storage: &'static [(&'static str, &'static str)],
}

impl TableDescriptor {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            temporary: false,
            if_not_exists: false,
            unique_keys: &[],
            foreign_keys: &[],
            storage: &[],
        }
    }

    pub const fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    pub const fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub const fn with_unique_keys(mut self, keys: &'static [UniqueKey]) -> Self {
        self.unique_keys = keys;
        self
    }

    pub const fn with_foreign_keys(mut self, keys: &'static [ForeignKey]) -> Self {
        self.foreign_keys = keys;
        self
    }

    pub const fn with_storage(mut self, options: &'static [(&'static str, &'static str)]) -> Self {
        self.storage = options;
        self
    }
}

/// Metadata for a record type that maps to a table.
pub trait TableSchema: 'static {
    /// The database table name.
    fn table_name() -> &'static str;

    /// Column descriptors in declaration order; render order follows it.
    fn columns() -> &'static [ColumnDescriptor];

    /// Table-level metadata. Required for CREATE TABLE rendering.
    fn table() -> Option<&'static TableDescriptor> {
        None
    }

    /// The primary key column name, if any.
    fn primary_key() -> Option<&'static str> {
        Self::columns().iter().find(|c| c.primary_key).map(|c| c.name)
    }

    /// Look up a column descriptor by name.
    fn column(name: &str) -> Option<&'static ColumnDescriptor> {
        Self::columns().iter().find(|c| c.name == name)
    }
}

/// One enumerant of a [`PgEnum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariant {
    /// The symbolic (source-level) name.
    pub name: &'static str,
    /// Declared external name, when renamed for the database.
    pub external: Option<&'static str>,
}

impl EnumVariant {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            external: None,
        }
    }

    pub const fn renamed(name: &'static str, external: &'static str) -> Self {
        Self {
            name,
            external: Some(external),
        }
    }

    /// The label written to the database: external name, falling back to
    /// the symbolic name.
    pub fn label(&self) -> &'static str {
        match self.external {
            Some(external) => external,
            None => self.name,
        }
    }
}

/// Metadata for a Rust enum that maps to a database enumeration type.
pub trait PgEnum: 'static {
    /// The database type name.
    fn type_name() -> &'static str;

    /// All enumerants in declaration order.
    fn variants() -> &'static [EnumVariant];

    /// The enumerant for this value.
    fn variant(&self) -> &'static EnumVariant;
}

/// A resolved schema entry as stored in the registry.
#[derive(Debug, Clone, Copy)]
pub struct TableInfo {
    pub name: &'static str,
    pub columns: &'static [ColumnDescriptor],
    pub table: Option<&'static TableDescriptor>,
    pub primary_key: Option<&'static str>,
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&'static ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Registration entry for schemas submitted at startup.
///
/// ```ignore
/// inventory::submit! {
///     pgstmt::SchemaRegistration { register: |r| r.register::<User>() }
/// }
/// ```
pub struct SchemaRegistration {
    pub register: fn(&mut SchemaRegistry),
}

inventory::collect!(SchemaRegistration);

/// Registry of table schemas keyed by record type identity.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    tables: HashMap<TypeId, TableInfo>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type's schema.
    pub fn register<T: TableSchema>(&mut self) {
        self.tables.insert(
            TypeId::of::<T>(),
            TableInfo {
                name: T::table_name(),
                columns: T::columns(),
                table: T::table(),
                primary_key: T::primary_key(),
            },
        );
    }

    /// Get a registered schema by type.
    pub fn get<T: TableSchema>(&self) -> Option<TableInfo> {
        self.tables.get(&TypeId::of::<T>()).copied()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

static GLOBAL: OnceLock<RwLock<SchemaRegistry>> = OnceLock::new();

fn global() -> &'static RwLock<SchemaRegistry> {
    GLOBAL.get_or_init(|| {
        let mut registry = SchemaRegistry::new();
        for registration in inventory::iter::<SchemaRegistration> {
            (registration.register)(&mut registry);
        }
        RwLock::new(registry)
    })
}

/// Look up a record type's schema in the process-wide registry, registering
/// it on first use. Descriptors are static data, so this never re-scans.
pub fn lookup<T: TableSchema>() -> TableInfo {
    let lock = global();
    if let Ok(registry) = lock.read() {
        if let Some(info) = registry.get::<T>() {
            return info;
        }
    }
    let mut registry = lock.write().expect("schema registry lock poisoned");
    registry.register::<T>();
    registry.get::<T>().expect("schema registered above")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account;

    impl TableSchema for Account {
        fn table_name() -> &'static str {
            "accounts"
        }

        fn columns() -> &'static [ColumnDescriptor] {
            const COLUMNS: &[ColumnDescriptor] = &[
                ColumnDescriptor::new("id")
                    .of_type(SqlType::BigInt)
                    .primary_key()
                    .not_null()
                    .auto_increment(),
                ColumnDescriptor::new("email")
                    .of_type(SqlType::VarChar)
                    .with_length(255)
                    .not_null()
                    .unique(),
            ];
            COLUMNS
        }
    }

    #[test]
    fn columns_keep_declaration_order() {
        let cols = Account::columns();
        assert_eq!(cols[0].name, "id");
        assert_eq!(cols[1].name, "email");
    }

    #[test]
    fn primary_key_derived_from_columns() {
        assert_eq!(Account::primary_key(), Some("id"));
    }

    #[test]
    fn lazy_lookup_registers_once() {
        let first = lookup::<Account>();
        let second = lookup::<Account>();
        assert_eq!(first.name, "accounts");
        assert_eq!(second.columns.len(), 2);
        assert_eq!(first.primary_key, Some("id"));
    }

    #[test]
    fn enum_variant_label_falls_back_to_name() {
        const PLAIN: EnumVariant = EnumVariant::new("active");
        const RENAMED: EnumVariant = EnumVariant::renamed("Active", "active");
        assert_eq!(PLAIN.label(), "active");
        assert_eq!(RENAMED.label(), "active");
        assert_eq!(RENAMED.name, "Active");
    }
}
