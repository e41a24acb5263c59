use super::*;
use crate::param::substitute_labels;
use crate::schema::{ColumnDescriptor, EnumVariant, PgEnum, TableSchema};
use crate::types::{SqlType, TypeTag};
use crate::value::SqlValue;

struct Item;

impl TableSchema for Item {
    fn table_name() -> &'static str {
        "items"
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
                .with_length(80)
                .not_null(),
            ColumnDescriptor::new("qty").of_type(SqlType::Integer),
            ColumnDescriptor::new("mood").override_type("mood"),
        ];
        COLUMNS
    }
}

enum Mood {
    Happy,
}

impl PgEnum for Mood {
    fn type_name() -> &'static str {
        "mood"
    }

    fn variants() -> &'static [EnumVariant] {
        const VARIANTS: &[EnumVariant] = &[EnumVariant::renamed("Happy", "happy")];
        VARIANTS
    }

    fn variant(&self) -> &'static EnumVariant {
        match self {
            Mood::Happy => &Self::variants()[0],
        }
    }
}

#[test]
fn simple_select_literal() {
    let mut q = select("t").eq("id", 5).limit(1);
    assert_eq!(q.literal_sql(), r#"SELECT * FROM "t" WHERE "id"=5 LIMIT 1"#);
}

#[test]
fn simple_select_prepared() {
    let mut q = select("t").eq("id", 5).limit(1);
    assert_eq!(
        q.prepared_sql(),
        r#"SELECT * FROM "t" WHERE "id"=@p0 LIMIT 1"#
    );
    let params = q.params();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].label, "p0");
    assert_eq!(params[0].value, SqlValue::Int(5));
}

#[test]
fn render_is_idempotent() {
    let mut q = select("users").eq("status", "active").order_by_desc("created_at");
    let first = q.literal_sql().to_string();
    let second = q.literal_sql().to_string();
    assert_eq!(first, second);
    let prepared_first = q.prepared_sql().to_string();
    let prepared_second = q.prepared_sql().to_string();
    assert_eq!(prepared_first, prepared_second);
}

#[test]
fn mutation_invalidates_caches() {
    let mut q = select("users");
    assert_eq!(q.literal_sql(), r#"SELECT * FROM "users""#);
    q = q.eq("id", 1);
    assert_eq!(q.literal_sql(), r#"SELECT * FROM "users" WHERE "id"=1"#);
}

#[test]
fn statement_kind_is_set_by_entry_point() {
    let q = select("t");
    assert_eq!(q.kind(), Some(StatementKind::Select));
    let q = q.eq("a", 1).limit(5);
    assert_eq!(q.kind(), Some(StatementKind::Select));
    assert_eq!(insert("t").kind(), Some(StatementKind::Insert));
    assert_eq!(update("t").kind(), Some(StatementKind::Update));
    assert_eq!(delete("t").kind(), Some(StatementKind::Delete));
    assert_eq!(select_count("t").kind(), Some(StatementKind::SelectCount));
}

#[test]
fn null_value_forces_is() {
    let mut q = select("t").eq("deleted_at", SqlValue::Null);
    assert_eq!(q.literal_sql(), r#"SELECT * FROM "t" WHERE "deleted_at" IS NULL"#);
    assert_eq!(q.prepared_sql(), r#"SELECT * FROM "t" WHERE "deleted_at" IS NULL"#);
    assert!(q.params().is_empty());

    let mut q = select("t").ne("deleted_at", SqlValue::Null);
    assert_eq!(
        q.literal_sql(),
        r#"SELECT * FROM "t" WHERE "deleted_at" IS NOT NULL"#
    );
}

#[test]
fn is_null_helpers() {
    let mut q = select("t").is_null("a").is_not_null("b");
    assert_eq!(
        q.literal_sql(),
        r#"SELECT * FROM "t" WHERE "a" IS NULL AND "b" IS NOT NULL"#
    );
}

#[test]
fn where_in_renders_value_set() {
    let mut q = select("users").in_list("id", vec![1i64, 2, 3]);
    assert_eq!(q.literal_sql(), r#"SELECT * FROM "users" WHERE "id" IN (1,2,3)"#);
    assert_eq!(
        q.prepared_sql(),
        r#"SELECT * FROM "users" WHERE "id" IN (@p0,@p1,@p2)"#
    );
    assert_eq!(q.params().len(), 3);
}

#[test]
fn or_connective_interleaves_in_insertion_order() {
    let mut q = select("t").eq("a", 1).or_eq("b", 2).eq("c", 3);
    assert_eq!(
        q.literal_sql(),
        r#"SELECT * FROM "t" WHERE "a"=1 OR "b"=2 AND "c"=3"#
    );
}

#[test]
fn field_to_field_comparison() {
    let mut q = select("orders").eq_field("orders.user_id", "users.id");
    assert_eq!(
        q.literal_sql(),
        r#"SELECT * FROM "orders" WHERE "orders"."user_id"="users"."id""#
    );
}

#[test]
fn raw_where_passes_through() {
    let mut q = select("t").raw_where("length(name) > 3");
    assert_eq!(q.literal_sql(), r#"SELECT * FROM "t" WHERE length(name) > 3"#);
    assert!(q.params().is_empty());
}

#[test]
fn join_renders_on_condition() {
    let mut q = select("users")
        .join_eq("orders", "users.id", "orders.user_id")
        .eq("users.status", "active");
    assert_eq!(
        q.literal_sql(),
        r#"SELECT * FROM "users" JOIN "orders" ON "users"."id"="orders"."user_id" WHERE "users"."status"='active'"#
    );
}

#[test]
fn left_join_keyword() {
    let mut q = select("a").left_join("b", on("a.id", CmpOp::Equals, "b.a_id"));
    assert!(q.literal_sql().contains(r#"LEFT JOIN "b" ON"#));
}

#[test]
fn select_columns_and_aliased_from() {
    let mut q = select("users")
        .column("id")
        .column("users.name")
        .column("COUNT(*)");
    assert_eq!(
        q.literal_sql(),
        r#"SELECT "id","users"."name",COUNT(*) FROM "users""#
    );
}

#[test]
fn group_by_having_order_limit() {
    let mut q = select_count("orders")
        .group_by("user_id")
        .having("COUNT(*)", CmpOp::Greater, 5);
    assert_eq!(
        q.literal_sql(),
        r#"SELECT COUNT(*) FROM "orders" GROUP BY "user_id" HAVING COUNT(*)>5"#
    );

    let mut q = select("users").order_by_asc("name").order_by_desc("id").limit(10).offset(20);
    assert_eq!(
        q.literal_sql(),
        r#"SELECT * FROM "users" ORDER BY "name" ASC,"id" DESC LIMIT 10 OFFSET 20"#
    );
}

#[test]
fn negative_offset_is_omitted() {
    let mut q = select("t").limit(1);
    assert_eq!(q.literal_sql(), r#"SELECT * FROM "t" LIMIT 1"#);
}

#[test]
fn paginate_sets_limit_and_offset() {
    let mut q = select("t").paginate(3, 10);
    assert_eq!(q.literal_sql(), r#"SELECT * FROM "t" LIMIT 10 OFFSET 20"#);
}

#[test]
fn subquery_shares_label_counter() {
    let inner = select("orders").column("user_id").eq("status", "open");
    let mut q = select("users").in_subquery("id", inner).eq("active", true);
    let prepared = q.prepared_sql().to_string();
    assert_eq!(
        prepared,
        r#"SELECT * FROM "users" WHERE "id" IN (SELECT "user_id" FROM "orders" WHERE "status"=@p0) AND "active"=@p1"#
    );
    let mut labels: Vec<&str> = q.params().iter().map(|p| p.label.as_str()).collect();
    labels.sort_unstable();
    labels.dedup();
    assert_eq!(labels.len(), q.params().len());
}

#[test]
fn from_subquery_renders_derived_source() {
    let inner = select("events").eq("kind", "click");
    let mut q = select_from_subquery(inner, "e");
    assert_eq!(
        q.literal_sql(),
        r#"SELECT * FROM (SELECT * FROM "events" WHERE "kind"='click') AS "e""#
    );
}

#[test]
fn union_branches_join_with_tokens() {
    let mut q = union()
        .branch(select("a").column("id"))
        .branch_all(select("b").column("id"));
    assert_eq!(
        q.literal_sql(),
        r#"SELECT "id" FROM "a" UNION ALL SELECT "id" FROM "b""#
    );
}

#[test]
fn union_alias_wraps_as_derived_source() {
    let mut q = union()
        .branch(select("a").column("id"))
        .branch(select("b").column("id"))
        .union_alias("u");
    assert_eq!(
        q.literal_sql(),
        r#"SELECT * FROM (SELECT "id" FROM "a" UNION SELECT "id" FROM "b") AS "u""#
    );
}

#[test]
fn union_branches_share_label_counter() {
    let mut q = union()
        .branch(select("a").eq("x", 1))
        .branch(select("b").eq("y", 2));
    assert_eq!(
        q.prepared_sql(),
        r#"SELECT * FROM "a" WHERE "x"=@p0 UNION SELECT * FROM "b" WHERE "y"=@p1"#
    );
    assert_eq!(q.params().len(), 2);
}

#[test]
fn insert_single_row() {
    let mut q = insert("users").set("username", "alice").set("email", "a@example.com");
    assert_eq!(
        q.literal_sql(),
        r#"INSERT INTO "users" ("username","email") VALUES ('alice','a@example.com')"#
    );
    assert_eq!(
        q.prepared_sql(),
        r#"INSERT INTO "users" ("username","email") VALUES (@p0,@p1)"#
    );
}

#[test]
fn insert_sparse_rows_pad_with_null() {
    let mut q = insert("t").set("x", 1).end_row().set("y", 2);
    assert_eq!(
        q.literal_sql(),
        r#"INSERT INTO "t" ("x","y") VALUES (1,NULL),(NULL,2)"#
    );
}

#[test]
fn insert_declared_columns_order_rows() {
    let mut q = insert("t").columns(&["x", "y"]).set("y", 7);
    assert_eq!(q.literal_sql(), r#"INSERT INTO "t" ("x","y") VALUES (NULL,7)"#);
}

#[test]
fn insert_without_columns_renders_default_values() {
    let mut q = insert("audit_log");
    assert_eq!(q.literal_sql(), r#"INSERT INTO "audit_log" DEFAULT VALUES"#);
}

#[test]
fn insert_record_omits_null_primary_key() {
    let mut q = insert_into::<Item>().record::<Item>(&[
        ("id", SqlValue::Null),
        ("name", SqlValue::from("widget")),
    ]);
    assert_eq!(
        q.prepared_sql(),
        r#"INSERT INTO "items" ("name") VALUES (@p0)"#
    );
    let params = q.params();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].column.as_deref(), Some("name"));
}

#[test]
fn insert_record_resolves_types_from_schema() {
    let mut q = insert_into::<Item>().record::<Item>(&[
        ("name", SqlValue::from("widget")),
        ("qty", SqlValue::from(3)),
        ("mood", SqlValue::from_enum(&Mood::Happy)),
    ]);
    q.prepared_sql();
    let params = q.params();
    assert_eq!(params[0].ty, Some(TypeTag::Sql(SqlType::VarChar)));
    assert_eq!(params[1].ty, Some(TypeTag::Sql(SqlType::Integer)));
    assert_eq!(params[2].ty, Some(TypeTag::Custom("mood")));
}

#[test]
fn insert_enum_renders_label() {
    let mut q = insert("items").set("mood", SqlValue::from_enum(&Mood::Happy));
    assert_eq!(
        q.literal_sql(),
        r#"INSERT INTO "items" ("mood") VALUES ('happy')"#
    );
}

#[test]
fn insert_raw_value_bypasses_binding() {
    let mut q = insert("users").set("username", "alice").set_raw("created_at", "NOW()");
    assert_eq!(
        q.prepared_sql(),
        r#"INSERT INTO "users" ("username","created_at") VALUES (@p0,NOW())"#
    );
    assert_eq!(q.params().len(), 1);
}

#[test]
fn on_conflict_do_nothing() {
    let mut q = insert("users")
        .set("username", "alice")
        .on_conflict_do_nothing("username");
    assert_eq!(
        q.literal_sql(),
        r#"INSERT INTO "users" ("username") VALUES ('alice') ON CONFLICT ("username") DO NOTHING"#
    );
}

#[test]
fn on_conflict_upsert_reassigns_declared_columns() {
    let mut q = insert("users")
        .set("username", "alice")
        .set("email", "a@example.com")
        .on_conflict_upsert("username");
    assert_eq!(
        q.literal_sql(),
        r#"INSERT INTO "users" ("username","email") VALUES ('alice','a@example.com') ON CONFLICT ("username") DO UPDATE SET "username"=EXCLUDED."username","email"=EXCLUDED."email""#
    );
}

#[test]
fn returning_key_uses_captured_primary_key() {
    let mut q = insert_into::<Item>()
        .set("name", "widget")
        .returning_key();
    assert!(q.literal_sql().ends_with(r#" RETURNING "id""#));
}

#[test]
fn returning_columns() {
    let mut q = insert("users").set("username", "alice").returning(&["id", "created_at"]);
    assert!(q.literal_sql().ends_with(r#" RETURNING "id","created_at""#));
}

#[test]
fn update_binds_sets_before_wheres() {
    let mut q = update("users").set("status", "inactive").eq("id", 9);
    assert_eq!(
        q.literal_sql(),
        r#"UPDATE "users" SET "status"='inactive' WHERE "id"=9"#
    );
    assert_eq!(
        q.prepared_sql(),
        r#"UPDATE "users" SET "status"=@p0 WHERE "id"=@p1"#
    );
    let params = q.params();
    assert_eq!(params[0].value, SqlValue::from("inactive"));
    assert_eq!(params[1].value, SqlValue::Int(9));
}

#[test]
fn update_set_raw_expression() {
    let mut q = update("users").set_raw("updated_at", "NOW()").eq("id", 1);
    assert_eq!(
        q.literal_sql(),
        r#"UPDATE "users" SET "updated_at"=NOW() WHERE "id"=1"#
    );
}

#[test]
fn update_record_coerces_against_schema() {
    let mut q = update_record::<Item>(&[
        ("name", SqlValue::from("gadget")),
        ("qty", SqlValue::from(5)),
    ])
    .eq("id", 1);
    assert_eq!(
        q.literal_sql(),
        r#"UPDATE "items" SET "name"='gadget',"qty"=5 WHERE "id"=1"#
    );
}

#[test]
fn delete_with_where() {
    let mut q = delete("users").eq("id", 5);
    assert_eq!(q.literal_sql(), r#"DELETE FROM "users" WHERE "id"=5"#);
}

#[test]
fn optional_helpers_skip_none() {
    let mut q = select("users")
        .eq_opt("status", Some("active"))
        .eq_opt("name", Option::<&str>::None)
        .in_opt("id", Option::<Vec<i64>>::None);
    assert_eq!(q.literal_sql(), r#"SELECT * FROM "users" WHERE "status"='active'"#);
}

#[test]
fn round_trip_prepared_substitution_matches_literal() {
    let inner = select("orders").column("user_id").eq("note", "it's fine");
    let mut q = select("users")
        .eq("active", true)
        .like("name", "%o'brien%")
        .in_list("role", vec!["admin", "user"])
        .in_subquery("id", inner)
        .limit(5);

    let literal = q.literal_sql().to_string();
    let prepared = q.prepared_sql().to_string();
    let expanded = substitute_labels(&prepared, q.params());
    assert_eq!(expanded, literal);
}

#[test]
fn round_trip_with_more_than_ten_labels() {
    // Exercises the prefix case: @p1 must survive @p10's substitution.
    let values: Vec<i64> = (0..12).collect();
    let mut q = select("t").in_list("n", values);
    let literal = q.literal_sql().to_string();
    let prepared = q.prepared_sql().to_string();
    assert!(prepared.contains("@p10"));
    assert_eq!(substitute_labels(&prepared, q.params()), literal);
}
