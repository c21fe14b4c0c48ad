use askama::Template;

use super::plan::{EntityPlan, LookupPlan, NIL_UUID};
use super::sql;
use crate::schema::Schema;

/// Quote a string as a Rust string literal for generated code.
fn rust_str(s: &str) -> String {
    format!("{s:?}")
}

/// Schema text placed in a line comment; line breaks would end the comment.
fn comment_text(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

/// Route table row of the generated service
///
/// Handler slots hold `Some(fn_name)` or `None` as Rust source text.
#[derive(Debug, Clone)]
pub struct RouteRow {
    /// URL path as a Rust string literal
    pub path_lit: String,
    pub post: String,
    pub get: String,
    pub delete: String,
}

impl RouteRow {
    fn primary(plan: &EntityPlan) -> Self {
        RouteRow {
            path_lit: rust_str(&plan.path),
            post: format!("Some({}_upsert)", plan.handler),
            get: format!("Some({}_get)", plan.handler),
            delete: format!("Some({}_delete)", plan.handler),
        }
    }

    fn lookup(lookup: &LookupPlan) -> Self {
        RouteRow {
            path_lit: rust_str(&lookup.path),
            post: "None".to_string(),
            get: format!("Some({})", lookup.handler),
            delete: "None".to_string(),
        }
    }
}

/// Lookup handler row for the handler template
#[derive(Debug, Clone)]
pub struct LookupHandlerRow {
    pub handler: String,
    pub path: String,
    pub column: String,
}

/// Record field row for the data template
#[derive(Debug, Clone)]
pub struct FieldRow {
    pub ident: String,
    pub field_type: &'static str,
    /// JSON key as a Rust string literal
    pub column_lit: String,
    /// The field identifier does not spell the JSON key
    pub needs_rename: bool,
    /// Position in the select list
    pub index: usize,
}

/// Alternate-key lookup row for the data template
#[derive(Debug, Clone)]
pub struct LookupRow {
    pub handler: String,
    pub sql_const: String,
    pub sql_lit: String,
}

/// Handler functions of one entity
#[derive(Template)]
#[template(path = "entity_handlers.rs.txt", escape = "html")]
pub struct EntityHandlersTemplate<'a> {
    pub plan: &'a EntityPlan,
    /// Entity name for the header comment
    pub title: String,
    /// Event topic prefix as a Rust string literal
    pub topic_lit: String,
    /// Event data type as a Rust string literal
    pub type_lit: String,
    pub post_action_lit: String,
    pub get_action_lit: String,
    pub delete_action_lit: String,
    pub lookups: Vec<LookupHandlerRow>,
}

/// Record struct, SQL constants and data-layer methods of one entity
#[derive(Template)]
#[template(path = "entity_data.rs.txt", escape = "html")]
pub struct EntityDataTemplate<'a> {
    pub plan: &'a EntityPlan,
    pub title: String,
    pub fields: Vec<FieldRow>,
    /// Identifiers of fields that get the nil UUID when empty
    pub identifiers: Vec<String>,
    pub create_lit: String,
    pub select_lit: String,
    pub upsert_lit: String,
    pub get_lit: String,
    pub delete_lit: String,
    pub lookups: Vec<LookupRow>,
}

/// Entry point of the generated service: route table plus every handler
#[derive(Template)]
#[template(path = "main.rs.txt", escape = "html")]
pub struct MainTemplate {
    pub name: String,
    pub email: String,
    pub url_lit: String,
    pub ms_timeout: u64,
    pub routes: Vec<RouteRow>,
    /// Pre-rendered handler blocks, one per entity
    pub handlers: Vec<String>,
}

/// Data module of the generated service: connection plus every entity block
#[derive(Template)]
#[template(path = "data.rs.txt", escape = "html")]
pub struct DataTemplate {
    pub name: String,
    pub nil_uuid_lit: String,
    /// SQL module of every entity, for migrations
    pub modules: Vec<String>,
    /// Pre-rendered entity blocks
    pub entities: Vec<String>,
}

/// Render the upsert/get/delete handler and one lookup handler per
/// routing entry for a single entity.
pub fn render_entity_handlers(plan: &EntityPlan) -> askama::Result<String> {
    let lookups = plan
        .lookups()
        .map(|l| LookupHandlerRow {
            handler: l.handler.clone(),
            path: comment_text(&l.path),
            column: comment_text(&l.column),
        })
        .collect();
    let action = |verb: &str| rust_str(&format!("{verb} request - {}", plan.table));
    EntityHandlersTemplate {
        plan,
        title: comment_text(&plan.name),
        topic_lit: rust_str(&plan.table),
        type_lit: rust_str(&plan.type_name),
        post_action_lit: action("post"),
        get_action_lit: action("get"),
        delete_action_lit: action("delete"),
        lookups,
    }
    .render()
}

/// Render the record struct, its identifier defaults, the SQL statements and
/// the data-layer methods for a single entity.
pub fn render_entity_data(plan: &EntityPlan) -> askama::Result<String> {
    let fields = plan
        .fields
        .iter()
        .enumerate()
        .map(|(i, f)| FieldRow {
            ident: f.ident.clone(),
            field_type: f.field_type,
            column_lit: rust_str(&f.column),
            needs_rename: f.ident.trim_start_matches("r#") != f.column,
            index: i + 1,
        })
        .collect();
    let lookups = plan
        .lookups()
        .map(|l| LookupRow {
            handler: l.handler.clone(),
            sql_const: l.sql_const.clone(),
            sql_lit: rust_str(&sql::lookup(plan, l)),
        })
        .collect();
    EntityDataTemplate {
        plan,
        title: comment_text(&plan.name),
        fields,
        identifiers: plan.identifier_fields().map(|f| f.ident.clone()).collect(),
        create_lit: rust_str(&sql::create_table(plan)),
        select_lit: rust_str(&sql::select_list(plan)),
        upsert_lit: rust_str(&sql::upsert(plan)),
        get_lit: rust_str(&sql::get_by_uuid(plan)),
        delete_lit: rust_str(&sql::delete_by_uuid(plan)),
        lookups,
    }
    .render()
}

/// Route table of the generated service: the primary path of every entity
/// followed by its lookup paths.
pub fn route_rows(plans: &[EntityPlan]) -> Vec<RouteRow> {
    plans
        .iter()
        .flat_map(|plan| {
            std::iter::once(RouteRow::primary(plan)).chain(plan.lookups().map(RouteRow::lookup))
        })
        .collect()
}

pub fn render_main(
    schema: &Schema,
    plans: &[EntityPlan],
    handlers: Vec<String>,
) -> askama::Result<String> {
    MainTemplate {
        name: comment_text(&schema.name),
        email: comment_text(&schema.email),
        url_lit: rust_str(&schema.url),
        ms_timeout: schema.ms_timeout,
        routes: route_rows(plans),
        handlers,
    }
    .render()
}

pub fn render_data(
    schema: &Schema,
    plans: &[EntityPlan],
    entities: Vec<String>,
) -> askama::Result<String> {
    DataTemplate {
        name: comment_text(&schema.name),
        nil_uuid_lit: rust_str(NIL_UUID),
        modules: plans.iter().map(|p| p.module.clone()).collect(),
        entities,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::plan::GeneratorOptions;
    use crate::package::unescape_html;
    use crate::schema::{Column, Entity, Routing};

    fn plan(routing: &[(&str, &str)]) -> EntityPlan {
        let entity = Entity {
            name: "Customer".to_string(),
            columns: vec![
                Column {
                    name: "Email".to_string(),
                    ty: "TEXT".to_string(),
                    nullable: false,
                },
                Column {
                    name: "AccountID".to_string(),
                    ty: "UUID".to_string(),
                    nullable: true,
                },
            ],
            routing: routing.iter().copied().collect::<Routing>(),
        };
        EntityPlan::from_entity(&entity, GeneratorOptions::default()).unwrap()
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_handlers_without_routing() {
        let out = unescape_html(&render_entity_handlers(&plan(&[])).unwrap()).into_owned();
        assert_eq!(count(&out, "pub fn "), 3);
        assert!(out.contains("pub fn customer_upsert("));
        assert!(out.contains("pub fn customer_get("));
        assert!(out.contains("pub fn customer_delete("));
        assert!(!out.contains("_by_"));
    }

    #[test]
    fn test_lookup_handler_per_route() {
        let out = unescape_html(
            &render_entity_handlers(&plan(&[("mail", "Email"), ("account", "AccountID")]))
                .unwrap(),
        )
        .into_owned();
        assert_eq!(count(&out, "pub fn "), 5);
        assert!(out.contains("pub fn customer_by_email("));
        assert!(out.contains("app.db.get_customer_by_email(key)"));
        assert!(out.contains("pub fn customer_by_account_id("));
        assert!(out.contains("`/customer/account`"));
    }

    #[test]
    fn test_entity_data_struct_and_sql() {
        let out = unescape_html(&render_entity_data(&plan(&[("mail", "Email")])).unwrap())
            .into_owned();
        assert!(out.contains("pub struct Customer {"));
        assert!(out.contains("    pub uuid: String,"));
        assert!(out.contains("    pub email: String,"));
        assert!(out.contains("    pub account_id: String,"));
        assert!(out.contains("if self.account_id.is_empty() {"));
        assert!(!out.contains("if self.email.is_empty()"));
        assert!(out.contains("pub const CREATE: &str = \"CREATE TABLE IF NOT EXISTS customer ("));
        assert!(out.contains("ON CONFLICT(\\\"uuid\\\") DO UPDATE SET"));
        assert!(out.contains(
            "pub const CUSTOMER_BY_EMAIL: &str = \"SELECT uuid,email,account_id FROM customer WHERE email = $1\";"
        ));
        assert!(out.contains("pub fn get_customer_by_email(&self, key: &str)"));
    }

    #[test]
    fn test_templating_escapes_until_unescaped() {
        let rendered = render_entity_data(&plan(&[])).unwrap();
        assert!(!rendered.contains("\"CREATE TABLE"));
        let out = unescape_html(&rendered);
        assert!(out.contains("\"CREATE TABLE"));
    }

    #[test]
    fn test_handler_literals_quote_schema_names() {
        let entity = Entity {
            name: "Say\"Hi".to_string(),
            columns: vec![],
            routing: Routing::new(),
        };
        let plan = EntityPlan::from_entity(&entity, GeneratorOptions::default()).unwrap();
        let out = unescape_html(&render_entity_handlers(&plan).unwrap()).into_owned();
        assert!(out.contains(r#"app.publish_error("post request - say\"_hi", &e,"#));
        assert!(out.contains(r#"app.publish_error("delete request - say\"_hi", e.as_ref(), key);"#));
        assert!(out.contains(r#"&format!("{}.{}", "say\"_hi", status)"#));
        assert!(out.contains(r#"status, "Say_Hi", &data);"#));
        assert!(!out.contains(r#""post request - say"_hi""#));
    }

    #[test]
    fn test_braces_in_names_never_reach_format_strings() {
        let entity = Entity {
            name: "A{B}".to_string(),
            columns: vec![],
            routing: Routing::new(),
        };
        let plan = EntityPlan::from_entity(&entity, GeneratorOptions::default()).unwrap();
        let out = unescape_html(&render_entity_handlers(&plan).unwrap()).into_owned();
        assert!(out.contains(r#"&format!("{}.{}", "a{_b}", status)"#));
        assert!(out.contains(r#"&format!("{}.{}", "a{_b}", "deleted")"#));
        assert!(!out.contains("{_b}.{status}"));
    }

    #[test]
    fn test_line_breaks_stay_inside_comments() {
        let entity = Entity {
            name: "Multi\nLine".to_string(),
            columns: vec![],
            routing: Routing::new(),
        };
        let plan = EntityPlan::from_entity(&entity, GeneratorOptions::default()).unwrap();
        let out = render_entity_handlers(&plan).unwrap();
        assert!(out.starts_with("// Multi Line\n"));
    }

    #[test]
    fn test_route_rows_order() {
        let plans = vec![plan(&[("mail", "Email")])];
        let rows = route_rows(&plans);
        let paths: Vec<_> = rows.iter().map(|r| r.path_lit.as_str()).collect();
        assert_eq!(paths, ["\"/customer\"", "\"/customer/mail\""]);
        assert_eq!(rows[0].post, "Some(customer_upsert)");
        assert_eq!(rows[1].post, "None");
        assert_eq!(rows[1].get, "Some(customer_by_email)");
    }
}
