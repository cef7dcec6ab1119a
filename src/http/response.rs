//! Response envelopes and JSON rendering.
//!
//! # Responsibilities
//! - Turn a handler's `Reply` into a status code plus JSON body
//! - Turn a caught failure into a structured `error` payload
//! - Escape HTML-unsafe characters inside JSON strings for safe embedding
//!
//! # Design Decisions
//! - Exactly one envelope per request; the router owns the slot and
//!   ignores late writers
//! - `Reply::None` produces no envelope at all, so later routes may still
//!   answer the request
//! - A failure without a usable code maps to 500 while the body keeps
//!   the code as given

use std::io;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter, PrettyFormatter};
use serde_json::{Serializer, Value};
use thiserror::Error;

use crate::record::{FieldMap, RecordError};

/// What a route handler produced.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Nothing; the request stays open for later routes.
    None,
    /// An arbitrary JSON value, emitted as-is.
    Value(Value),
    /// One record's visible field values.
    Record(FieldMap),
    /// A freshly created record's visible field values, emitted with 201.
    Created(FieldMap),
    /// A whole collection export.
    Collection(Vec<FieldMap>),
    /// Delete confirmation; `true` means the record is gone.
    Removed(bool),
}

/// Failure payload carried across the dispatch boundary.
///
/// Serialized as `{"error": {"code", "message", "args"}}`. The HTTP status
/// is the code when it names a valid status, otherwise 500.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    code: u16,
    message: String,
    args: FieldMap,
}

impl ApiError {
    /// A failure with no machine code (emitted with status 500).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: message.into(),
            args: FieldMap::new(),
        }
    }

    /// Attach a machine code, also used as the HTTP status.
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Attach one structured argument.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        if self.code > 0 {
            StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn to_body(&self) -> Value {
        serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "args": self.args,
            }
        })
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        let message = err.to_string();
        match err {
            RecordError::NotFound { field, value } => ApiError::new(message)
                .with_code(404)
                .with_arg("field", field)
                .with_arg("value", value),
            RecordError::UnknownField(field) => {
                ApiError::new(message).with_code(400).with_arg("field", field)
            }
            RecordError::Validation {
                field,
                message: detail,
            } => ApiError::new(message).with_code(422).with_arg(field, detail),
            RecordError::Storage(_) => ApiError::new(message).with_code(500),
        }
    }
}

/// One request's final response: status plus rendered JSON body.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub body: String,
}

impl ResponseEnvelope {
    /// Render a reply. `Ok(None)` means the handler declined to answer.
    pub fn from_reply(reply: Reply, pretty: bool) -> Result<Option<Self>, ApiError> {
        let (status, value) = match reply {
            Reply::None => return Ok(None),
            Reply::Value(value) => (StatusCode::OK, value),
            Reply::Record(map) => (StatusCode::OK, Value::Object(map)),
            Reply::Created(map) => (StatusCode::CREATED, Value::Object(map)),
            Reply::Collection(rows) => (
                StatusCode::OK,
                Value::Array(rows.into_iter().map(Value::Object).collect()),
            ),
            Reply::Removed(true) => (StatusCode::OK, Value::Object(FieldMap::new())),
            Reply::Removed(false) => (StatusCode::OK, Value::Bool(false)),
        };
        let body = render(&value, pretty)
            .map_err(|e| ApiError::new(format!("response serialization failed: {e}")))?;
        Ok(Some(Self { status, body }))
    }

    /// Render a failure as the structured error payload.
    pub fn from_error(err: &ApiError, pretty: bool) -> Self {
        let body = render(&err.to_body(), pretty).unwrap_or_else(|_| {
            // last resort: a body that needs no escaping
            "{\"error\":{\"code\":500,\"message\":\"unserializable error\",\"args\":{}}}"
                .to_string()
        });
        Self {
            status: err.status(),
            body,
        }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            self.body,
        )
            .into_response()
    }
}

fn render(value: &Value, pretty: bool) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    if pretty {
        let mut ser = Serializer::with_formatter(&mut buf, HtmlSafe::new(PrettyFormatter::new()));
        value.serialize(&mut ser)?;
    } else {
        let mut ser = Serializer::with_formatter(&mut buf, HtmlSafe::new(CompactFormatter));
        value.serialize(&mut ser)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Formatter that additionally escapes `<`, `>`, `&`, `'` and `"` as
/// `\uXXXX` sequences inside string values, for safe embedding of the
/// payload in HTML contexts.
struct HtmlSafe<F> {
    inner: F,
}

impl<F> HtmlSafe<F> {
    fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: Formatter> Formatter for HtmlSafe<F> {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, byte) in fragment.bytes().enumerate() {
            let escape: &[u8] = match byte {
                b'<' => b"\\u003C",
                b'>' => b"\\u003E",
                b'&' => b"\\u0026",
                b'\'' => b"\\u0027",
                _ => continue,
            };
            if start < i {
                writer.write_all(fragment[start..i].as_bytes())?;
            }
            writer.write_all(escape)?;
            start = i + 1;
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let escape: &[u8] = match char_escape {
            CharEscape::Quote => b"\\u0022",
            CharEscape::ReverseSolidus => b"\\\\",
            CharEscape::Solidus => b"\\/",
            CharEscape::Backspace => b"\\b",
            CharEscape::FormFeed => b"\\f",
            CharEscape::LineFeed => b"\\n",
            CharEscape::CarriageReturn => b"\\r",
            CharEscape::Tab => b"\\t",
            CharEscape::AsciiControl(byte) => {
                const HEX: &[u8; 16] = b"0123456789abcdef";
                let buf = [
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX[(byte >> 4) as usize],
                    HEX[(byte & 0x0F) as usize],
                ];
                return writer.write_all(&buf);
            }
        };
        writer.write_all(escape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_reply_renders_pretty_object() {
        let mut map = FieldMap::new();
        map.insert("name".to_string(), json!("Italy"));
        let envelope = ResponseEnvelope::from_reply(Reply::Record(map), true)
            .unwrap()
            .unwrap();
        assert_eq!(envelope.status, StatusCode::OK);
        assert_eq!(envelope.body, "{\n  \"name\": \"Italy\"\n}");
    }

    #[test]
    fn test_created_reply_uses_201() {
        let envelope = ResponseEnvelope::from_reply(Reply::Created(FieldMap::new()), false)
            .unwrap()
            .unwrap();
        assert_eq!(envelope.status, StatusCode::CREATED);
        assert_eq!(envelope.body, "{}");
    }

    #[test]
    fn test_none_reply_produces_no_envelope() {
        assert!(ResponseEnvelope::from_reply(Reply::None, true)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_removed_true_is_empty_object() {
        let envelope = ResponseEnvelope::from_reply(Reply::Removed(true), false)
            .unwrap()
            .unwrap();
        assert_eq!(envelope.body, "{}");

        let envelope = ResponseEnvelope::from_reply(Reply::Removed(false), false)
            .unwrap()
            .unwrap();
        assert_eq!(envelope.body, "false");
    }

    #[test]
    fn test_html_unsafe_characters_are_escaped() {
        let envelope = ResponseEnvelope::from_reply(Reply::Value(json!("<b>\"&'</b>")), false)
            .unwrap()
            .unwrap();
        assert_eq!(
            envelope.body,
            "\"\\u003Cb\\u003E\\u0022\\u0026\\u0027\\u003C/b\\u003E\""
        );
    }

    #[test]
    fn test_escaped_body_round_trips() {
        let envelope = ResponseEnvelope::from_reply(Reply::Value(json!("<script>")), true)
            .unwrap()
            .unwrap();
        let back: Value = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(back, json!("<script>"));
    }

    #[test]
    fn test_error_without_code_maps_to_500() {
        let err = ApiError::new("boom");
        let envelope = ResponseEnvelope::from_error(&err, false);
        assert_eq!(envelope.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(body["error"]["code"], json!(0));
        assert_eq!(body["error"]["message"], json!("boom"));
    }

    #[test]
    fn test_record_error_maps_to_wire_codes() {
        let err = ApiError::from(RecordError::NotFound {
            field: "id".to_string(),
            value: "7".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from(RecordError::Validation {
            field: "iso".to_string(),
            message: "must be exactly 2 characters".to_string(),
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value =
            serde_json::from_str(&ResponseEnvelope::from_error(&err, false).body).unwrap();
        assert_eq!(
            body["error"]["args"]["iso"],
            json!("must be exactly 2 characters")
        );
    }
}
