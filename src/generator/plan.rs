use std::collections::HashSet;

use tracing::{debug, warn};

use super::types;
use crate::error::{GenerateError, Result};
use crate::naming::{normalize, rust_ident};
use crate::schema::{Column, Entity, Schema};

/// Sentinel written into empty identifier fields before they reach storage
pub const NIL_UUID: &str = "00000000-0000-0000-0000-000000000000";

/// Options that change what the generator accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Reject columns whose type tag is not in the registry instead of
    /// rendering them with empty types
    pub strict_types: bool,
}

/// One record field / table column, fully resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    /// Column name as declared in the schema
    pub name: String,
    /// Normalized name; used as SQL column and JSON key
    pub column: String,
    /// Rust identifier of the record field
    pub ident: String,
    /// Type tag as declared
    pub tag: String,
    pub field_type: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
    /// Identifier-typed column that gets [`NIL_UUID`] when empty
    pub identifier: bool,
}

impl FieldPlan {
    fn from_column(column: &Column) -> Self {
        let mapping = types::lookup(&column.ty);
        let normalized = normalize(&column.name);
        FieldPlan {
            name: column.name.clone(),
            ident: rust_ident(&normalized),
            column: normalized,
            tag: column.ty.clone(),
            field_type: mapping.field_type,
            sql_type: mapping.sql_type,
            nullable: column.nullable,
            identifier: types::is_identifier(&column.ty),
        }
    }
}

/// A read-only lookup by an alternate key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPlan {
    /// Route key; becomes the last URL path segment
    pub key: String,
    /// Target column as declared in the routing table
    pub target: String,
    /// Normalized target column used in SQL
    pub column: String,
    /// Generated handler function name
    pub handler: String,
    /// URL path served by the handler
    pub path: String,
    /// Name of the generated SQL constant inside the entity's module
    pub sql_const: String,
}

/// Operations generated for one entity, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create when the identifier is empty, update otherwise
    Upsert,
    /// Read by primary identifier
    Get,
    /// Delete by primary identifier
    Delete,
    /// Read by alternate key
    Lookup(LookupPlan),
}

impl Operation {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Operation::Get | Operation::Lookup(_))
    }
}

/// Everything the templates need to know about one entity
///
/// Built once from the schema; templates never look at the raw schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPlan {
    /// Entity name as declared; used as the record type name
    pub name: String,
    /// Rust type name of the record
    pub type_name: String,
    /// Normalized table name
    pub table: String,
    /// Prefix of every generated handler and data-layer function name
    pub handler: String,
    /// Name of the generated module holding the SQL constants
    pub module: String,
    /// URL path of the primary handler
    pub path: String,
    pub fields: Vec<FieldPlan>,
    pub operations: Vec<Operation>,
}

impl EntityPlan {
    pub fn from_entity(entity: &Entity, options: GeneratorOptions) -> Result<Self> {
        for column in &entity.columns {
            if !types::is_known(&column.ty) {
                if options.strict_types {
                    return Err(GenerateError::schema(format!(
                        "column {}.{} has unknown type tag {:?}",
                        entity.name, column.name, column.ty
                    )));
                }
                warn!(
                    entity = %entity.name,
                    column = %column.name,
                    tag = %column.ty,
                    "unknown type tag, column will render with empty types"
                );
            }
        }

        let table = normalize(&entity.name);
        let module = rust_ident(&table);
        let handler = module.trim_start_matches("r#").to_string();
        let path = format!("/{table}");

        let mut operations = vec![Operation::Upsert, Operation::Get, Operation::Delete];
        let mut seen = HashSet::new();
        for route in &entity.routing {
            let column = normalize(&route.column);
            let base = rust_ident(&format!("{handler}_by_{column}"));
            let name = unique_handler_name(&mut seen, &base);
            operations.push(Operation::Lookup(LookupPlan {
                key: route.key.clone(),
                target: route.column.clone(),
                sql_const: const_ident(&name),
                handler: name,
                path: format!("{path}/{}", route.key),
                column,
            }));
        }

        let plan = EntityPlan {
            name: entity.name.clone(),
            type_name: rust_ident(&entity.name),
            fields: entity.columns.iter().map(FieldPlan::from_column).collect(),
            table,
            handler,
            module,
            path,
            operations,
        };
        debug!(
            entity = %plan.name,
            fields = plan.fields.len(),
            operations = plan.operations.len(),
            "planned entity"
        );
        Ok(plan)
    }

    pub fn lookups(&self) -> impl Iterator<Item = &LookupPlan> {
        self.operations.iter().filter_map(|op| match op {
            Operation::Lookup(l) => Some(l),
            _ => None,
        })
    }

    pub fn identifier_fields(&self) -> impl Iterator<Item = &FieldPlan> {
        self.fields.iter().filter(|f| f.identifier)
    }
}

/// Plan every entity of a schema, in declared order.
pub fn plan_schema(schema: &Schema, options: GeneratorOptions) -> Result<Vec<EntityPlan>> {
    schema
        .entities
        .iter()
        .map(|e| EntityPlan::from_entity(e, options))
        .collect()
}

/// Upper-case identifier for generated constants
pub fn const_ident(s: &str) -> String {
    rust_ident(s.trim_start_matches('_'))
        .trim_start_matches("r#")
        .to_ascii_uppercase()
}

pub(crate) fn unique_handler_name(seen: &mut HashSet<String>, name: &str) -> String {
    if seen.insert(name.to_string()) {
        return name.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{name}_{counter}");
        if seen.insert(candidate.clone()) {
            warn!(handler = %name, renamed = %candidate, "duplicate lookup handler name");
            return candidate;
        }
        counter += 1;
    }
}
