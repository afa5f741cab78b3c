//! HTTP response messages carrying rendered XML.
//!
//! Thin value types only: a status code from the fixed set the API layer
//! uses, the XML content-type headers, and an optional body. Transport is
//! someone else's job.

/// Content-type header value attached to every XML response.
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Cache-control header value attached to every XML response.
pub const CACHE_CONTROL: &str = "private, max-age=0, must-revalidate";

/// A rendered XML document plus response metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlResponse {
    status: u16,
    body: Option<String>,
}

impl XmlResponse {
    /// 200: plain successful representation.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: Some(body.into()),
        }
    }

    /// 201: resource created.
    pub fn resource_created(body: impl Into<String>) -> Self {
        Self {
            status: 201,
            body: Some(body.into()),
        }
    }

    /// 202: accepted, still processing.
    pub fn resource_processing(body: impl Into<String>) -> Self {
        Self {
            status: 202,
            body: Some(body.into()),
        }
    }

    /// 204: resource deleted; the body is deliberately absent.
    pub fn resource_deleted() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    /// 403: action not supported on this resource.
    pub fn unsupported_action(body: impl Into<String>) -> Self {
        Self {
            status: 403,
            body: Some(body.into()),
        }
    }

    /// 404: resource not found.
    pub fn resource_not_found(body: impl Into<String>) -> Self {
        Self {
            status: 404,
            body: Some(body.into()),
        }
    }

    /// 409: patch could not be applied.
    pub fn resource_patch_error(body: impl Into<String>) -> Self {
        Self {
            status: 409,
            body: Some(body.into()),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> [(&'static str, &'static str); 2] {
        [
            ("Content-type", CONTENT_TYPE),
            ("Cache-Control", CACHE_CONTROL),
        ]
    }
}
