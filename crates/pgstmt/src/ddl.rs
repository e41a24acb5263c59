//! CREATE TYPE and CREATE TABLE rendering from schema descriptors.
//!
//! These entry points produce statement text and nothing else; executing the
//! DDL is the collaborator's business. `create_table` is the one place the
//! builder fails fast: a type without a table descriptor is a configuration
//! error, never a silently degraded statement.

use crate::error::{StmtError, StmtResult};
use crate::ident;
use crate::schema::{self, ColumnDescriptor, PgEnum, RefAction, TableInfo, TableSchema};
use crate::value::push_quoted_text;

/// Render `CREATE TYPE name AS ENUM (...)` listing each enumerant's label.
pub fn create_enum_type<E: PgEnum>() -> String {
    let mut out = String::from("CREATE TYPE ");
    ident::quote_into(&mut out, E::type_name());
    out.push_str(" AS ENUM (");
    for (i, variant) in E::variants().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_quoted_text(&mut out, variant.label());
    }
    out.push(')');
    out
}

/// Render a CREATE TABLE statement for a schema-described type.
pub fn create_table<T: TableSchema>() -> StmtResult<String> {
    let info = schema::lookup::<T>();
    if info.table.is_none() {
        return Err(StmtError::configuration(format!(
            "CREATE TABLE requires a table descriptor, `{}` has none",
            info.name
        )));
    }
    Ok(render_create_table(&info))
}

pub(crate) fn render_create_table(info: &TableInfo) -> String {
    let Some(table) = info.table else {
        return String::new();
    };

    let mut out = String::from("CREATE ");
    if table.temporary {
        out.push_str("TEMPORARY ");
    }
    out.push_str("TABLE ");
    if table.if_not_exists {
        out.push_str("IF NOT EXISTS ");
    }
    ident::quote_into(&mut out, table.name);
    out.push_str(" (");

    let mut parts: Vec<String> = info.columns.iter().map(column_def).collect();

    for key in table.unique_keys {
        let mut part = String::from("CONSTRAINT ");
        ident::quote_into(&mut part, key.name);
        part.push_str(" UNIQUE (");
        push_column_list(&mut part, key.columns);
        part.push(')');
        parts.push(part);
    }

    for fk in table.foreign_keys {
        let mut part = String::from("CONSTRAINT ");
        ident::quote_into(&mut part, fk.name);
        part.push_str(" FOREIGN KEY (");
        push_column_list(&mut part, fk.columns);
        part.push_str(") REFERENCES ");
        ident::quote_into(&mut part, fk.ref_table);
        part.push_str(" (");
        push_column_list(&mut part, fk.ref_columns);
        part.push(')');
        if fk.delete_action != RefAction::NoAction {
            part.push_str(" ON DELETE ");
            part.push_str(fk.delete_action.as_sql());
        }
        if fk.update_action != RefAction::NoAction {
            part.push_str(" ON UPDATE ");
            part.push_str(fk.update_action.as_sql());
        }
        parts.push(part);
    }

    out.push_str(&parts.join(","));
    out.push(')');

    if !table.storage.is_empty() {
        out.push_str(" WITH (");
        for (i, (key, value)) in table.storage.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out.push(')');
    }

    for col in info.columns {
        if let Some(comment) = col.comment {
            out.push_str(";\nCOMMENT ON COLUMN ");
            ident::quote_qualified(&mut out, table.name, col.name);
            out.push_str(" IS ");
            push_quoted_text(&mut out, comment);
        }
    }

    out
}

fn column_def(col: &ColumnDescriptor) -> String {
    let mut out = String::new();
    ident::quote_into(&mut out, col.name);
    out.push(' ');
    out.push_str(&column_type(col));
    if col.primary_key {
        out.push_str(" PRIMARY KEY");
    }
    if col.not_null && !col.primary_key {
        out.push_str(" NOT NULL");
    }
    if col.unique && !col.primary_key {
        out.push_str(" UNIQUE");
    }
    if let Some(default) = col.default {
        out.push_str(" DEFAULT ");
        out.push_str(default);
    }
    if let Some(check) = col.check {
        out.push_str(" CHECK (");
        out.push_str(check);
        out.push(')');
    }
    out
}

fn column_type(col: &ColumnDescriptor) -> String {
    if let Some(name) = col.type_override {
        return name.to_string();
    }
    match col.sql_type {
        Some(ty) => {
            if col.primary_key && col.auto_increment {
                if let Some(serial) = ty.serial_substitute() {
                    return serial.render(None, None);
                }
            }
            ty.render(col.length, col.precision)
        }
        None => "TEXT".to_string(),
    }
}

fn push_column_list(out: &mut String, columns: &[&str]) {
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        ident::quote_into(out, column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        EnumVariant, ForeignKey, TableDescriptor, UniqueKey,
    };
    use crate::types::SqlType;

    enum Mood {
        Happy,
        Sad,
    }

    impl PgEnum for Mood {
        fn type_name() -> &'static str {
            "mood"
        }

        fn variants() -> &'static [EnumVariant] {
            const VARIANTS: &[EnumVariant] = &[
                EnumVariant::renamed("Happy", "happy"),
                EnumVariant::new("Sad"),
            ];
            VARIANTS
        }

        fn variant(&self) -> &'static EnumVariant {
            match self {
                Mood::Happy => &Self::variants()[0],
                Mood::Sad => &Self::variants()[1],
            }
        }
    }

    struct Person;

    impl TableSchema for Person {
        fn table_name() -> &'static str {
            "people"
        }

        fn columns() -> &'static [ColumnDescriptor] {
            const COLUMNS: &[ColumnDescriptor] = &[
                ColumnDescriptor::new("id")
                    .of_type(SqlType::BigInt)
                    .primary_key()
                    .not_null()
                    .auto_increment(),
                ColumnDescriptor::new("name")
                    .of_type(SqlType::VarChar)
                    .with_length(120)
                    .not_null()
                    .with_comment("display name"),
                ColumnDescriptor::new("mood").override_type("mood"),
                ColumnDescriptor::new("age")
                    .of_type(SqlType::SmallInt)
                    .with_check("age >= 0"),
                ColumnDescriptor::new("team_id").of_type(SqlType::BigInt),
            ];
            COLUMNS
        }

        fn table() -> Option<&'static TableDescriptor> {
            const UNIQUE: &[UniqueKey] = &[UniqueKey::new("uq_people_name", &["name"])];
            const FOREIGN: &[ForeignKey] = &[ForeignKey::new(
                "fk_people_team",
                &["team_id"],
                "teams",
                &["id"],
            )
            .on_delete(RefAction::Cascade)];
            const TABLE: &TableDescriptor = &TableDescriptor::new("people")
                .with_unique_keys(UNIQUE)
                .with_foreign_keys(FOREIGN)
                .with_storage(&[("fillfactor", "70")]);
            Some(TABLE)
        }
    }

    struct Bare;

    impl TableSchema for Bare {
        fn table_name() -> &'static str {
            "bare"
        }

        fn columns() -> &'static [ColumnDescriptor] {
            const COLUMNS: &[ColumnDescriptor] =
                &[ColumnDescriptor::new("x").of_type(SqlType::Integer)];
            COLUMNS
        }
    }

    #[test]
    fn enum_type_lists_labels() {
        assert_eq!(
            create_enum_type::<Mood>(),
            r#"CREATE TYPE "mood" AS ENUM ('happy','Sad')"#
        );
    }

    #[test]
    fn create_table_renders_columns_in_declared_order() {
        let sql = create_table::<Person>().unwrap();
        assert!(sql.starts_with(r#"CREATE TABLE "people" ("id" BIGSERIAL PRIMARY KEY,"#));
        let id = sql.find(r#""id""#).unwrap();
        let name = sql.find(r#""name""#).unwrap();
        let mood = sql.find(r#""mood""#).unwrap();
        let age = sql.find(r#""age""#).unwrap();
        assert!(id < name && name < mood && mood < age);
    }

    #[test]
    fn create_table_renders_constraints_and_storage() {
        let sql = create_table::<Person>().unwrap();
        assert!(sql.contains(r#"CONSTRAINT "uq_people_name" UNIQUE ("name")"#));
        assert!(sql.contains(
            r#"CONSTRAINT "fk_people_team" FOREIGN KEY ("team_id") REFERENCES "teams" ("id") ON DELETE CASCADE"#
        ));
        assert!(sql.contains("WITH (fillfactor=70)"));
    }

    #[test]
    fn create_table_renders_checks_and_comments() {
        let sql = create_table::<Person>().unwrap();
        assert!(sql.contains(r#""age" SMALLINT CHECK (age >= 0)"#));
        assert!(sql.contains(r#"COMMENT ON COLUMN "people"."name" IS 'display name'"#));
    }

    #[test]
    fn free_form_type_passes_through() {
        let sql = create_table::<Person>().unwrap();
        assert!(sql.contains(r#""mood" mood"#));
    }

    #[test]
    fn missing_descriptor_is_a_configuration_error() {
        let err = create_table::<Bare>().unwrap_err();
        assert!(err.is_configuration());
    }
}
