use super::types::Schema;
use crate::error::{GenerateError, Result};
use std::path::Path;
use tracing::debug;

/// Parse a schema document held in memory.
///
/// `yaml` selects the YAML parser; JSON otherwise.
pub fn parse_schema(content: &str, yaml: bool) -> Result<Schema> {
    let schema: Schema = if yaml {
        serde_yaml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };
    debug!(
        name = %schema.name,
        entities = schema.entities.len(),
        "parsed schema"
    );
    Ok(schema)
}

/// Load a schema document from disk.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
/// JSON. An empty path is rejected up front.
pub fn load_schema(path: &Path) -> Result<Schema> {
    if path.as_os_str().is_empty() {
        return Err(GenerateError::schema("no schema file given"));
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        GenerateError::schema(format!("cannot read {}: {e}", path.display()))
    })?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_schema(&content, yaml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file_is_schema_error() {
        let err = load_schema(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GenerateError::Schema { .. }));
    }

    #[test]
    fn test_load_empty_path() {
        let err = load_schema(Path::new("")).unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "name: shop\nms_timeout: 250\nData:\n  - Name: Customer\n    Columns:\n      - {{Name: Email, Type: TEXT}}\n    Routing:\n      byEmail: Email\n"
        )
        .unwrap();
        let schema = load_schema(file.path()).unwrap();
        assert_eq!(schema.ms_timeout, 250);
        assert_eq!(schema.entities[0].routing.len(), 1);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_schema("{\"name\": ", false).is_err());
    }
}
