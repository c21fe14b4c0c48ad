use tracing::info;
use uuid::Uuid;

use super::plan::{plan_schema, GeneratorOptions};
use super::templates::{render_data, render_entity_data, render_entity_handlers, render_main};
use crate::error::Result;
use crate::schema::Schema;

/// Output grouping of an artifact
///
/// A run always produces exactly one artifact per destination, whatever
/// the number of entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Service entry point and handlers
    Main,
    /// Records, SQL and data layer
    Data,
}

impl Destination {
    pub const ALL: [Destination; 2] = [Destination::Main, Destination::Data];

    /// Namespace the artifact identity is derived from
    pub fn namespace(self) -> &'static str {
        match self {
            Destination::Main => "main",
            Destination::Data => "data",
        }
    }

    /// Subdirectory under the output root, if any
    pub fn subdir(self) -> Option<&'static str> {
        match self {
            Destination::Main => None,
            Destination::Data => Some("data"),
        }
    }

    /// Logical artifact name; the file name without extension
    pub fn artifact_name(self) -> &'static str {
        match self {
            Destination::Main => "main",
            Destination::Data => "sql",
        }
    }
}

/// One rendered output file, before packaging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Derived from namespace and name only, never from the body
    pub id: Uuid,
    pub name: &'static str,
    pub destination: Destination,
    /// Rendered text; may still carry entity escapes from templating
    pub body: String,
}

impl Artifact {
    pub fn new(destination: Destination, body: String) -> Self {
        let name = destination.artifact_name();
        Artifact {
            id: artifact_id(destination.namespace(), name),
            name,
            destination,
            body,
        }
    }

    /// Path of the artifact relative to the output root, `/`-separated.
    pub fn relative_path(&self) -> String {
        match self.destination.subdir() {
            Some(dir) => format!("{dir}/{}.rs", self.name),
            None => format!("{}.rs", self.name),
        }
    }
}

/// UUIDv5 of `name` inside a namespace that is itself derived from `namespace`.
pub fn artifact_id(namespace: &str, name: &str) -> Uuid {
    let ns = Uuid::new_v5(&Uuid::NAMESPACE_OID, namespace.as_bytes());
    Uuid::new_v5(&ns, name.as_bytes())
}

/// The two artifacts of one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    pub main: Artifact,
    pub data: Artifact,
}

impl SourceSet {
    /// Artifacts in packaging order: main first, then data.
    pub fn artifacts(&self) -> [&Artifact; 2] {
        [&self.main, &self.data]
    }

    pub fn get(&self, destination: Destination) -> &Artifact {
        match destination {
            Destination::Main => &self.main,
            Destination::Data => &self.data,
        }
    }
}

/// Render a whole schema into its two artifacts.
///
/// Any planning or template failure aborts the run; nothing is returned
/// for the entities that did render.
pub fn generate(schema: &Schema, options: GeneratorOptions) -> Result<SourceSet> {
    let plans = plan_schema(schema, options)?;

    let mut handlers = Vec::with_capacity(plans.len());
    let mut records = Vec::with_capacity(plans.len());
    for plan in &plans {
        handlers.push(render_entity_handlers(plan)?);
        records.push(render_entity_data(plan)?);
    }

    let main = render_main(schema, &plans, handlers)?;
    let data = render_data(schema, &plans, records)?;
    info!(
        name = %schema.name,
        entities = plans.len(),
        main_bytes = main.len(),
        data_bytes = data.len(),
        "rendered sources"
    );
    Ok(SourceSet {
        main: Artifact::new(Destination::Main, main),
        data: Artifact::new(Destination::Data, data),
    })
}
