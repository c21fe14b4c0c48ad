//! Service mode: `GET /generate.tar.gz?config=<json>` streams the archive of
//! the posted schema, `GET /health` answers liveness probes.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_query_params, parse_request, ParsedRequest};
pub use response::{write_reply, Reply};
pub use service::{health_endpoint, GenerateService, GENERATE_PATH, HEALTH_PATH};
