use serde_json::{Map, Value, json};

use crate::input::load_input;
use crate::pdf::PdfFile;
use crate::tools::{ToolError, bytes_result, error_result, parse_output_path};

pub fn call(args: &Value) -> Value {
    let payload = match load_input(args) {
        Ok(payload) => payload,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let order = match parse_order(args.get("order")) {
        Ok(order) => order,
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

    // Without an explicit order the document comes back reversed.
    let result = match &order {
        Some(order) => pdf.reordered(order),
        None => pdf.reversed(),
    };
    let output_bytes = match result {
        Ok(bytes) => bytes,
        Err(err) => return error_result(err.kind(), err.to_string(), None),
    };

    let pages = match PdfFile::from_bytes(&output_bytes) {
        Ok(out) => out.page_count(),
        Err(err) => return error_result(err.kind(), err.to_string(), None),
    };

    let summary = match &order {
        Some(order) => format!("reordered {} pages", order.len()),
        None => format!("reversed {pages} pages"),
    };

    let mut structured = Map::new();
    structured.insert("pages".to_string(), json!(pages));
    structured.insert("reversed".to_string(), json!(order.is_none()));

    bytes_result(output_bytes, summary, structured, output_path)
}

fn parse_order(value: Option<&Value>) -> Result<Option<Vec<usize>>, ToolError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let Some(items) = value.as_array() else {
        return Err(ToolError::invalid_input("order must be an array"));
    };
    if items.is_empty() {
        return Err(ToolError::invalid_input("order must not be empty"));
    }
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|page| usize::try_from(page).ok())
                .ok_or_else(|| {
                    ToolError::invalid_input("order entries must be non-negative integers")
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
