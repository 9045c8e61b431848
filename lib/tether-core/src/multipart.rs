//! Multipart form data encoding for part arguments.
//!
//! Part and part map arguments collect their values in the request's files
//! mapping; when the request is assembled those entries, together with any
//! fields of a mapping-shaped body, are encoded as `multipart/form-data`.

use bytes::{BufMut, Bytes, BytesMut};
use serde_json::{Map, Value};

use crate::Result;

/// A single part in a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl Part {
    /// Create a text part.
    ///
    /// Sets the content type to `text/plain; charset=utf-8`.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: Some("text/plain; charset=utf-8".to_string()),
            data: Bytes::from(value.into()),
        }
    }

    /// Create a part from an argument value.
    ///
    /// Strings become text parts. A mapping with a string `content` entry is
    /// read as a file description (`filename`, `content_type` are optional).
    /// Anything else is sent as JSON.
    pub fn from_value(name: impl Into<String>, value: &Value) -> Result<Self> {
        let name = name.into();
        match value {
            Value::String(text) => Ok(Self::text(name, text.clone())),
            Value::Object(file) if file.get("content").is_some_and(Value::is_string) => {
                let text = |key: &str| file.get(key).and_then(Value::as_str).map(str::to_string);
                Ok(Self {
                    filename: text("filename"),
                    content_type: text("content_type")
                        .or_else(|| Some("application/octet-stream".to_string())),
                    data: Bytes::from(text("content").unwrap_or_default()),
                    name,
                })
            }
            other => Ok(Self {
                name,
                filename: None,
                content_type: Some("application/json".to_string()),
                data: crate::to_json(other)?,
            }),
        }
    }

    /// Get the part name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the filename, if set.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Get the content type, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the part data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// A multipart form containing multiple parts.
#[derive(Debug, Clone)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create a new empty form with a generated boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(generate_boundary())
    }

    /// Create a new form with a custom boundary.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    /// Add a part to the form.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add one part per entry of a mapping.
    ///
    /// A sequence value adds one part per element, all under the entry name.
    /// `null` values are skipped.
    pub fn entries(mut self, entries: &Map<String, Value>) -> Result<Self> {
        for (name, value) in entries {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items.iter().filter(|item| !item.is_null()) {
                        self.parts.push(Part::from_value(name.as_str(), item)?);
                    }
                }
                value => self.parts.push(Part::from_value(name.as_str(), value)?),
            }
        }
        Ok(self)
    }

    /// Get the parts in this form.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Get the Content-Type header value for this form.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Convert the form into `(content-type header value, body bytes)`.
    #[must_use]
    pub fn into_body(self) -> (String, Bytes) {
        let content_type = self.content_type();
        let body = self.encode();
        (content_type, body)
    }

    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();

        for part in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");

            buf.put_slice(b"Content-Disposition: form-data; name=\"");
            buf.put_slice(part.name.as_bytes());
            buf.put_slice(b"\"");
            if let Some(filename) = &part.filename {
                buf.put_slice(b"; filename=\"");
                buf.put_slice(filename.as_bytes());
                buf.put_slice(b"\"");
            }
            buf.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                buf.put_slice(b"Content-Type: ");
                buf.put_slice(content_type.as_bytes());
                buf.put_slice(b"\r\n");
            }

            buf.put_slice(b"\r\n");
            buf.put_slice(&part.data);
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        buf.freeze()
    }
}

fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    format!("----TetherBoundary{timestamp:x}")
}
