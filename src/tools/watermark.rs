use serde_json::{Map, Value, json};

use crate::input::load_input;
use crate::pdf::PdfFile;
use crate::tools::{ToolError, bytes_result, error_result, parse_output_path};

pub fn call(args: &Value) -> Value {
    let payload = match load_input(args) {
        Ok(payload) => payload,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let text = match parse_text(args.get("text")) {
        Ok(text) => text,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let output_path = match parse_output_path(args.get("output_path")) {
        Ok(path) => path,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let pdf = match PdfFile::from_bytes(&payload.bytes) {
        Ok(pdf) => pdf,
        Err(err) => return error_result(err.kind(), err.to_string(), Some(payload.source.as_str())),
    };

    let pages = pdf.page_count();
    let output_bytes = match pdf.watermarked(&text) {
        Ok(bytes) => bytes,
        Err(err) => return error_result(err.kind(), err.to_string(), None),
    };

    let mut structured = Map::new();
    structured.insert("text".to_string(), json!(text));
    structured.insert("pages".to_string(), json!(pages));

    bytes_result(
        output_bytes,
        format!("watermarked {pages} pages"),
        structured,
        output_path,
    )
}

fn parse_text(value: Option<&Value>) -> Result<String, ToolError> {
    let Some(value) = value else {
        return Err(ToolError::invalid_input("text is required"));
    };
    let Some(text) = value.as_str() else {
        return Err(ToolError::invalid_input("text must be a string"));
    };
    if text.trim().is_empty() {
        return Err(ToolError::invalid_input("text must not be empty"));
    }
    Ok(text.to_string())
}
