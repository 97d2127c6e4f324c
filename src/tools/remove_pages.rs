use serde_json::{Map, Value, json};

use crate::input::load_input;
use crate::pdf::PdfFile;
use crate::tools::{ToolError, bytes_result, error_result, parse_output_path};

pub fn call(args: &Value) -> Value {
    let payload = match load_input(args) {
        Ok(payload) => payload,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let pages = match parse_pages(args.get("pages")) {
        Ok(pages) => pages,
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

    let before = pdf.page_count();
    let output_bytes = match pdf.without_pages(&pages) {
        Ok(bytes) => bytes,
        Err(err) => return error_result(err.kind(), err.to_string(), None),
    };

    let after = match PdfFile::from_bytes(&output_bytes) {
        Ok(out) => out.page_count(),
        Err(err) => return error_result(err.kind(), err.to_string(), None),
    };

    let mut structured = Map::new();
    structured.insert("pages_before".to_string(), json!(before));
    structured.insert("pages_after".to_string(), json!(after));

    bytes_result(
        output_bytes,
        format!("removed {} pages", before - after),
        structured,
        output_path,
    )
}

fn parse_pages(value: Option<&Value>) -> Result<Vec<usize>, ToolError> {
    let Some(value) = value else {
        return Err(ToolError::invalid_input("pages is required"));
    };
    let Some(items) = value.as_array() else {
        return Err(ToolError::invalid_input("pages must be an array"));
    };
    if items.is_empty() {
        return Err(ToolError::invalid_input("pages must not be empty"));
    }
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|page| usize::try_from(page).ok())
                .ok_or_else(|| {
                    ToolError::invalid_input("pages entries must be non-negative integers")
                })
        })
        .collect()
}
