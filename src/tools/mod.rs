use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value, json};
use std::fs;
use std::path::Path;

use crate::mcp::contracts::MAX_OUTPUT_BYTES;
use crate::mcp::errors;

pub mod extract_text;
pub mod images_to_pdf;
pub mod inspect;
pub mod merge;
pub mod placeholder;
pub mod remove_pages;
pub mod reorder_pages;
pub mod split;
pub mod watermark;

pub fn error_result(
    kind: &'static str,
    message: impl Into<String>,
    source: Option<&str>,
) -> serde_json::Value {
    let message = message.into();
    let mut error = json!({
        "kind": kind,
        "message": message,
    });

    if let Some(source) = source
        && let Some(obj) = error.as_object_mut()
    {
        obj.insert("source".to_string(), json!(source));
    }

    json!({
        "content": [{"type": "text", "text": format!("Error: {message}")}],
        "structuredContent": {"error": error},
        "isError": true
    })
}

pub(crate) struct ToolError {
    pub kind: &'static str,
    pub message: String,
}

impl ToolError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: errors::INVALID_INPUT,
            message: message.into(),
        }
    }
}

impl From<crate::pdf::PdfError> for ToolError {
    fn from(error: crate::pdf::PdfError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

pub(crate) fn parse_output_path(value: Option<&Value>) -> Result<Option<String>, ToolError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let Some(path) = value.as_str() else {
        return Err(ToolError::invalid_input("output_path must be a string"));
    };
    if path.trim().is_empty() {
        return Err(ToolError::invalid_input("output_path must not be empty"));
    }
    Ok(Some(path.to_string()))
}

/// Wrap output PDF bytes in the result envelope: written to `output_path`
/// and surfaced as a resource link when one is given, inline base64
/// otherwise (subject to the output size limit). `structured` carries any
/// tool-specific fields alongside the payload.
pub(crate) fn bytes_result(
    output_bytes: Vec<u8>,
    summary: String,
    mut structured: Map<String, Value>,
    output_path: Option<String>,
) -> Value {
    let bytes_len = output_bytes.len() as u64;
    structured.insert("bytes_len".to_string(), json!(bytes_len));

    match output_path {
        Some(path) => {
            if let Err(err) = fs::write(&path, &output_bytes) {
                return error_result(
                    errors::INTERNAL_ERROR,
                    format!("failed to write output: {err}"),
                    None,
                );
            }
            let uri = format!("file://{path}");
            let name = Path::new(&path)
                .file_name()
                .and_then(|value| value.to_str())
                .unwrap_or("output.pdf")
                .to_string();
            structured.insert("path".to_string(), json!(path));
            structured.insert("uri".to_string(), json!(uri));
            json!({
                "content": [
                    {"type": "text", "text": format!("{summary}; written to {path}")},
                    {
                        "type": "resource_link",
                        "uri": uri,
                        "name": name,
                        "mimeType": "application/pdf"
                    }
                ],
                "structuredContent": structured,
                "isError": false
            })
        }
        None => {
            if bytes_len > MAX_OUTPUT_BYTES {
                return error_result(
                    errors::TOO_LARGE,
                    format!("output exceeds limit: {bytes_len} bytes (max {MAX_OUTPUT_BYTES})"),
                    None,
                );
            }
            structured.insert("base64".to_string(), json!(STANDARD.encode(&output_bytes)));
            json!({
                "content": [{"type": "text", "text": format!("{summary} ({bytes_len} bytes)")}],
                "structuredContent": structured,
                "isError": false
            })
        }
    }
}
