use serde_json::{Map, Value, json};
use std::fs;
use std::path::Path;

use crate::input::load_input;
use crate::mcp::errors;
use crate::pdf::PdfFile;
use crate::tools::{ToolError, bytes_result, error_result, parse_output_path};

pub fn call(args: &Value) -> Value {
    let payload = match load_input(args) {
        Ok(payload) => payload,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let page = match parse_page(args.get("page")) {
        Ok(page) => page,
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

    let total = pdf.page_count();

    // Optional: write every single-page part to a directory.
    if let Some(dir) = args.get("output_dir") {
        let Some(dir) = dir.as_str() else {
            return error_result(errors::INVALID_INPUT, "output_dir must be a string", None);
        };
        return split_to_dir(&pdf, dir, total);
    }

    let output_bytes = match pdf.extract_page(page) {
        Ok(bytes) => bytes,
        Err(err) => return error_result(err.kind(), err.to_string(), None),
    };

    let mut structured = Map::new();
    structured.insert("page".to_string(), json!(page));
    structured.insert("total_pages".to_string(), json!(total));

    bytes_result(
        output_bytes,
        format!("split page {page} of {total}"),
        structured,
        output_path,
    )
}

fn split_to_dir(pdf: &PdfFile, dir: &str, total: usize) -> Value {
    let parts = match pdf.split_all() {
        Ok(parts) => parts,
        Err(err) => return error_result(err.kind(), err.to_string(), None),
    };

    let mut paths = Vec::with_capacity(parts.len());
    for (index, part) in parts.iter().enumerate() {
        let path = Path::new(dir).join(format!("part-{:04}.pdf", index + 1));
        if let Err(err) = fs::write(&path, part) {
            return error_result(
                errors::INTERNAL_ERROR,
                format!("failed to write {}: {err}", path.display()),
                None,
            );
        }
        paths.push(path.display().to_string());
    }

    json!({
        "content": [{
            "type": "text",
            "text": format!("split {total} pages into {dir}")
        }],
        "structuredContent": {
            "total_pages": total,
            "paths": paths
        },
        "isError": false
    })
}

fn parse_page(value: Option<&Value>) -> Result<usize, ToolError> {
    let Some(value) = value else {
        return Ok(0);
    };
    let Some(page) = value.as_u64() else {
        return Err(ToolError::invalid_input(
            "page must be a non-negative integer",
        ));
    };
    usize::try_from(page).map_err(|_| ToolError::invalid_input("page out of range"))
}
