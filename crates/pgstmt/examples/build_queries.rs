//! Statement-building example: render queries without a database.
//!
//! Run with: cargo run --example build_queries -p pgstmt

use pgstmt::prelude::*;

/// Search parameters - all optional
struct TaskFilter {
    status: Option<String>,
    min_priority: Option<i64>,
    assignees: Option<Vec<String>>,
    title_contains: Option<String>,
}

/// Build a dynamic query based on filter parameters
fn search_tasks(filter: &TaskFilter) -> Query {
    select("tasks")
        .columns_list(&["id", "title", "status", "priority", "assignee"])
        .eq_opt("status", filter.status.clone())
        .in_opt("assignee", filter.assignees.clone())
        .eq_opt("priority", filter.min_priority)
        .like_opt(
            "title",
            filter.title_contains.as_ref().map(|t| format!("%{t}%")),
        )
        .order_by_desc("priority")
        .order_by("id")
        .limit(50)
}

fn main() {
    let filter = TaskFilter {
        status: Some("open".to_string()),
        min_priority: None,
        assignees: Some(vec!["alice".to_string(), "bob".to_string()]),
        title_contains: Some("urgent".to_string()),
    };

    let mut q = search_tasks(&filter);
    println!("literal:  {}", q.literal_sql());
    println!("prepared: {}", q.prepared_sql());
    for param in q.params() {
        println!("  @{} = {:?}", param.label, param.value);
    }

    // Subqueries share the parent's label counter, so placeholders stay
    // unique across the whole statement tree.
    let open_orders = select("orders").column("user_id").eq("status", "open");
    let mut q = select("users")
        .in_subquery("id", open_orders)
        .eq("active", true);
    println!("\nsubquery: {}", q.prepared_sql());

    // Multi-row inserts pad missing columns with NULL.
    let mut q = insert("metrics")
        .set("name", "requests")
        .set("value", 17)
        .end_row()
        .set("name", "errors");
    println!("\ninsert:   {}", q.literal_sql());

    // Upserts reassign every declared column to the incoming row.
    let mut q = insert("users")
        .set("username", "alice")
        .set("email", "alice@example.com")
        .on_conflict_upsert("username")
        .returning(&["id"]);
    println!("upsert:   {}", q.literal_sql());
}
