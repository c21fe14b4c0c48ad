//! # entitygen
//!
//! **entitygen** turns a declarative schema document (entities, typed
//! columns and alternate-key routes) into the source of a small CRUD web
//! service backed by PostgreSQL.
//!
//! ## Architecture
//!
//! - **[`schema`]** - the input document and its JSON/YAML loaders
//! - **[`naming`]** - identifier normalization shared by every artifact
//! - **[`generator`]** - type registry, per-entity planning, SQL and Askama templates
//! - **[`package`]** - directory output and `tar.gz` archives
//! - **[`server`]** - HTTP service built on `may_minihttp`
//! - **[`cli`]** - the `entitygen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI / HTTP
//!     participant Schema as schema::load_schema
//!     participant Plan as generator::plan
//!     participant Templates as generator::templates
//!     participant Package as package
//!
//!     CLI->>Schema: JSON or YAML document
//!     Schema-->>CLI: Schema
//!     CLI->>Plan: plan_schema(&schema)
//!     Plan-->>Templates: Vec<EntityPlan>
//!     Templates-->>CLI: SourceSet { main, data }
//!     CLI->>Package: write_to_dir / write_archive
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use entitygen::{generate, load_schema, write_to_dir, GeneratorOptions};
//!
//! let schema = load_schema("shop.yaml".as_ref())?;
//! let sources = generate(&schema, GeneratorOptions::default())?;
//! write_to_dir("gen_src".as_ref(), &sources)?;
//! ```

pub mod cli;
pub mod error;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod package;
pub mod runtime_config;
pub mod schema;
pub mod server;

pub use error::{GenerateError, Result};
pub use generator::{generate, Artifact, Destination, GeneratorOptions, SourceSet};
pub use package::{write_archive, write_to_dir};
pub use schema::{load_schema, parse_schema, Schema};
