//! DDL rendering example: CREATE TYPE and CREATE TABLE from descriptors.
//!
//! Run with: cargo run --example ddl -p pgstmt

use pgstmt::prelude::*;

#[allow(dead_code)]
enum Status {
    Active,
    Suspended,
}

impl PgEnum for Status {
    fn type_name() -> &'static str {
        "account_status"
    }

    fn variants() -> &'static [EnumVariant] {
        const VARIANTS: &[EnumVariant] = &[
            EnumVariant::renamed("Active", "active"),
            EnumVariant::renamed("Suspended", "suspended"),
        ];
        VARIANTS
    }

    fn variant(&self) -> &'static EnumVariant {
        match self {
            Status::Active => &Self::variants()[0],
            Status::Suspended => &Self::variants()[1],
        }
    }
}

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
                .not_null(),
            ColumnDescriptor::new("status")
                .override_type("account_status")
                .not_null()
                .with_default("'active'"),
            ColumnDescriptor::new("balance")
                .of_type(SqlType::Numeric)
                .with_length(12)
                .with_precision(2)
                .with_check("balance >= 0"),
            ColumnDescriptor::new("team_id").of_type(SqlType::BigInt),
            ColumnDescriptor::new("created_at")
                .of_type(SqlType::TimestampTz)
                .not_null()
                .with_default("NOW()")
                .with_comment("set on insert, never updated"),
        ];
        COLUMNS
    }

    fn table() -> Option<&'static TableDescriptor> {
        const UNIQUE: &[UniqueKey] = &[UniqueKey::new("uq_accounts_email", &["email"])];
        const FOREIGN: &[ForeignKey] = &[ForeignKey::new(
            "fk_accounts_team",
            &["team_id"],
            "teams",
            &["id"],
        )
        .on_delete(RefAction::SetNull)];
        const TABLE: &TableDescriptor = &TableDescriptor::new("accounts")
            .if_not_exists()
            .with_unique_keys(UNIQUE)
            .with_foreign_keys(FOREIGN);
        Some(TABLE)
    }
}

fn main() -> StmtResult<()> {
    println!("{}", create_enum_type::<Status>());
    println!();
    println!("{}", create_table::<Account>()?);
    Ok(())
}
