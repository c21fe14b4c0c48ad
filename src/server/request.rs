use may_minihttp::Request;
use std::collections::HashMap;
use tracing::debug;

/// The parts of a request the service routes on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Decoded query string parameters
    pub query_params: HashMap<String, String>,
}

impl ParsedRequest {
    /// Split a request target such as `/generate.tar.gz?config=...`.
    pub fn from_target(method: &str, target: &str) -> Self {
        let path = target.split('?').next().unwrap_or("/");
        ParsedRequest {
            method: method.to_ascii_uppercase(),
            path: if path.is_empty() { "/" } else { path }.to_string(),
            query_params: parse_query_params(target),
        }
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }
}

/// Parse query string parameters from a request target.
///
/// Everything after the first `?` is form-url-decoded; a repeated name keeps
/// its last value.
pub fn parse_query_params(target: &str) -> HashMap<String, String> {
    match target.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        None => HashMap::new(),
    }
}

pub fn parse_request(req: &Request) -> ParsedRequest {
    let parsed = ParsedRequest::from_target(req.method(), req.path());
    debug!(
        method = %parsed.method,
        path = %parsed.path,
        param_count = parsed.query_params.len(),
        "request parsed"
    );
    parsed
}
