use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;

/// Root schema document: project metadata plus the entities to generate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Project name; prefixes every archive entry
    #[serde(default)]
    pub name: String,
    /// Base URL of the generated service
    #[serde(default)]
    pub url: String,
    /// Contact email written into the generated sources
    #[serde(default)]
    pub email: String,
    /// Per-route request timeout of the generated service, in milliseconds
    #[serde(default)]
    pub ms_timeout: u64,
    /// Entities, in generation order
    #[serde(rename = "Data", alias = "data", default)]
    pub entities: Vec<Entity>,
}

/// A named table definition; the unit of generation
///
/// Entity names are expected to be unique across a schema but this is not
/// checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    #[serde(rename = "Columns", alias = "columns", default)]
    pub columns: Vec<Column>,
    #[serde(rename = "Routing", alias = "routing", default)]
    pub routing: Routing,
}

/// A typed, nullable-or-not column of an [`Entity`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    /// Registry tag, see [`crate::generator::types`]
    #[serde(rename = "Type", alias = "type", default)]
    pub ty: String,
    #[serde(rename = "Null", alias = "null", default)]
    pub nullable: bool,
}

/// One alternate-key lookup: `key` becomes the URL segment, `column` the
/// column matched against the request key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub key: String,
    pub column: String,
}

/// Alternate-key lookups of an entity, in document order
///
/// Written in the schema as an object (`{"byEmail": "Email"}`) but kept as
/// an ordered list so generated handlers come out in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routing(Vec<Route>);

impl Routing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route, or retarget an existing key in place.
    ///
    /// A repeated key keeps its first position and takes the new column;
    /// the replaced column is returned.
    pub fn push(
        &mut self,
        key: impl Into<String>,
        column: impl Into<String>,
    ) -> Option<String> {
        let key = key.into();
        let column = column.into();
        match self.0.iter_mut().find(|r| r.key == key) {
            Some(existing) => Some(std::mem::replace(&mut existing.column, column)),
            None => {
                self.0.push(Route { key, column });
                None
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, C: Into<String>> FromIterator<(K, C)> for Routing {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        let mut routing = Routing::new();
        for (key, column) in iter {
            routing.push(key, column);
        }
        routing
    }
}

impl<'a> IntoIterator for &'a Routing {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Routing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for route in &self.0 {
            map.serialize_entry(&route.key, &route.column)?;
        }
        map.end()
    }
}

struct RoutingVisitor;

impl<'de> Visitor<'de> for RoutingVisitor {
    type Value = Routing;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of route key to column name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Routing, A::Error> {
        let mut routing = Routing::new();
        while let Some((key, column)) = access.next_entry::<String, String>()? {
            if let Some(previous) = routing.push(key.clone(), column.clone()) {
                warn!(
                    key = %key,
                    previous = %previous,
                    column = %column,
                    "duplicate route key, last one wins"
                );
            }
        }
        Ok(routing)
    }

    // `"Routing": null` is treated like an absent routing table.
    fn visit_unit<E: serde::de::Error>(self) -> Result<Routing, E> {
        Ok(Routing::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Routing, E> {
        Ok(Routing::new())
    }
}

impl<'de> Deserialize<'de> for Routing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RoutingVisitor)
    }
}
