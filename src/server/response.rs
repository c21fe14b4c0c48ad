use may_minihttp::Response;

pub const CONTENT_TYPE_GZIP: &str = "application/gzip";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A response before it is written to the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Reply {
            status: 200,
            content_type: Some(content_type),
            body,
        }
    }

    /// Status line only, empty body
    pub fn empty(status: u16) -> Self {
        Reply {
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Reply {
            status,
            content_type: Some(CONTENT_TYPE_JSON),
            body: body.to_string().into_bytes(),
        }
    }
}

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

pub fn write_reply(res: &mut Response, reply: Reply) {
    res.status_code(reply.status as usize, status_reason(reply.status));
    match reply.content_type {
        Some(CONTENT_TYPE_GZIP) => {
            res.header("Content-Type: application/gzip");
        }
        Some(CONTENT_TYPE_JSON) => {
            res.header("Content-Type: application/json");
        }
        _ => {}
    }
    res.body_vec(reply.body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(400), "Bad Request");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(500), "Internal Server Error");
        assert_eq!(status_reason(418), "Unknown");
    }

    #[test]
    fn test_empty_reply_has_no_body() {
        let r = Reply::empty(500);
        assert_eq!(r.status, 500);
        assert!(r.body.is_empty());
        assert!(r.content_type.is_none());
    }
}
