use serde_json::{Map, Value, json};

use crate::input::load_inputs;
use crate::pdf::{self, PdfFile};
use crate::tools::{bytes_result, error_result, parse_output_path};

pub fn call(args: &Value) -> Value {
    let payloads = match load_inputs(args) {
        Ok(payloads) => payloads,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let output_path = match parse_output_path(args.get("output_path")) {
        Ok(path) => path,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let mut files = Vec::with_capacity(payloads.len());
    for payload in &payloads {
        match PdfFile::from_bytes(&payload.bytes) {
            Ok(file) => files.push(file),
            Err(err) => {
                return error_result(err.kind(), err.to_string(), Some(payload.source.as_str()));
            }
        }
    }

    let page_count: usize = files.iter().map(PdfFile::page_count).sum();
    let output_bytes = match pdf::merge(&files) {
        Ok(bytes) => bytes,
        Err(err) => return error_result(err.kind(), err.to_string(), None),
    };

    let mut structured = Map::new();
    structured.insert("documents".to_string(), json!(files.len()));
    structured.insert("pages".to_string(), json!(page_count));

    bytes_result(
        output_bytes,
        format!("merged {} documents into {page_count} pages", files.len()),
        structured,
        output_path,
    )
}
