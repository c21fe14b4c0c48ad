//! PostgreSQL statements for one entity.
//!
//! Every table carries a `uuid` primary key and `created` / `updated` /
//! `deleted` timestamps in addition to the declared columns. Placeholders
//! are numbered `$1` (the uuid) followed by the columns in declared order,
//! which is also the parameter order of the generated data layer.

use super::plan::{EntityPlan, LookupPlan};

/// Idempotent `CREATE TABLE IF NOT EXISTS` statement.
pub fn create_table(plan: &EntityPlan) -> String {
    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    uuid UUID PRIMARY KEY,\n",
        plan.table
    );
    for f in &plan.fields {
        let null = if f.nullable { "NULL" } else { "NOT NULL" };
        sql.push_str(&format!("    {} {} {},\n", f.column, f.sql_type, null));
    }
    sql.push_str(
        "    created TIMESTAMP WITH TIME ZONE NULL,\n    \
         updated TIMESTAMP WITH TIME ZONE NULL,\n    \
         deleted TIMESTAMP WITH TIME ZONE NULL\n);",
    );
    sql
}

/// Column list shared by every `SELECT`, identifier first.
pub fn select_list(plan: &EntityPlan) -> String {
    std::iter::once("uuid")
        .chain(plan.fields.iter().map(|f| f.column.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Insert that turns into an update when the uuid already exists.
pub fn upsert(plan: &EntityPlan) -> String {
    let mut columns = String::from("\"uuid\"");
    let mut values = String::from("$1");
    let mut set = String::from("updated=now()");
    for (i, f) in plan.fields.iter().enumerate() {
        let n = i + 2;
        columns.push_str(&format!(",{}", f.column));
        values.push_str(&format!(",${n}"));
        set.push_str(&format!(", {}=${n}", f.column));
    }
    format!(
        "INSERT INTO {} ({columns}, created)\n  VALUES({values}, now())\n  \
         ON CONFLICT(\"uuid\") DO UPDATE SET\n  {set}",
        plan.table
    )
}

pub fn get_by_uuid(plan: &EntityPlan) -> String {
    format!(
        "SELECT {} FROM {} WHERE uuid = $1",
        select_list(plan),
        plan.table
    )
}

pub fn delete_by_uuid(plan: &EntityPlan) -> String {
    format!("DELETE FROM {} WHERE uuid = $1", plan.table)
}

pub fn lookup(plan: &EntityPlan, lookup: &LookupPlan) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_list(plan),
        plan.table,
        lookup.column
    )
}
