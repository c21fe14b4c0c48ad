//! # Generator Module
//!
//! Turns a [`Schema`](crate::schema::Schema) into the two source artifacts of
//! a generated service.
//!
//! ## Architecture
//!
//! ```text
//! Schema → EntityPlan (per entity) → Askama templates → SourceSet { main, data }
//! ```
//!
//! 1. **Planning** ([`plan`]) - resolves names through the normalizer and
//!    types through the [`types`] registry, and lists the operations to emit
//! 2. **SQL** ([`sql`]) - builds the statements for each plan
//! 3. **Template Rendering** ([`templates`]) - renders handler and data blocks
//!    per entity, then wraps them in the two file templates
//! 4. **Assembly** ([`assemble`]) - produces exactly one artifact per
//!    [`Destination`]
//!
//! Templates are rendered with HTML escaping on; the packager reverts it
//! before anything is written, so identifiers reach the output byte for byte.
//!
//! ## Generated Structure
//!
//! ```text
//! <root>/
//! ├── main.rs        # route table, handlers, server start-up
//! └── data/
//!     └── sql.rs     # records, SQL constants, data layer
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entitygen::generator::{generate, GeneratorOptions};
//! use entitygen::schema::load_schema;
//!
//! let schema = load_schema("shop.json".as_ref())?;
//! let sources = generate(&schema, GeneratorOptions::default())?;
//! ```

pub mod assemble;
pub mod plan;
pub mod sql;
pub mod templates;
pub mod types;

pub use assemble::{generate, Artifact, Destination, SourceSet};
pub use plan::{EntityPlan, FieldPlan, GeneratorOptions, LookupPlan, Operation, NIL_UUID};
pub use types::TypeMapping;
