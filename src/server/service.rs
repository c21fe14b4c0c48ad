use std::io;

use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use tracing::{error, info, warn};

use super::request::{parse_request, ParsedRequest};
use super::response::{write_reply, Reply, CONTENT_TYPE_GZIP};
use crate::error::{GenerateError, Result};
use crate::generator::{generate, GeneratorOptions};
use crate::package::write_archive;
use crate::schema::parse_schema;

pub const GENERATE_PATH: &str = "/generate.tar.gz";
pub const HEALTH_PATH: &str = "/health";

/// Query parameter carrying the JSON schema document
pub const CONFIG_PARAM: &str = "config";

/// HTTP front end of the generator
///
/// Stateless apart from its options; every request parses, renders and
/// archives on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateService {
    pub options: GeneratorOptions,
}

impl GenerateService {
    pub fn new(options: GeneratorOptions) -> Self {
        GenerateService { options }
    }

    pub fn handle(&self, req: &ParsedRequest) -> Reply {
        match (req.method.as_str(), req.path.as_str()) {
            ("GET", GENERATE_PATH) => self.generate_endpoint(req),
            ("GET", HEALTH_PATH) => health_endpoint(),
            _ => Reply::empty(404),
        }
    }

    fn generate_endpoint(&self, req: &ParsedRequest) -> Reply {
        match self.build_archive(req.query(CONFIG_PARAM)) {
            Ok((name, archive)) => {
                info!(name = %name, bytes = archive.len(), "served archive");
                Reply::ok(CONTENT_TYPE_GZIP, archive)
            }
            Err(e) => {
                let status = e.status();
                if status >= 500 {
                    error!(error = %e, "archive generation failed");
                } else {
                    warn!(error = %e, "rejected generate request");
                }
                Reply::empty(status)
            }
        }
    }

    fn build_archive(&self, config: Option<&str>) -> Result<(String, Vec<u8>)> {
        let config = config
            .ok_or_else(|| GenerateError::schema(format!("missing {CONFIG_PARAM} parameter")))?;
        let schema = parse_schema(config, false)?;
        let sources = generate(&schema, self.options)?;
        let archive = write_archive(Vec::new(), &schema.name, &sources)?;
        Ok((schema.name, archive))
    }
}

/// Liveness probe returning `{ "status": "ok" }`.
pub fn health_endpoint() -> Reply {
    Reply::json(200, &json!({ "status": "ok" }))
}

impl HttpService for GenerateService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(&req);
        write_reply(res, self.handle(&parsed));
        Ok(())
    }
}
