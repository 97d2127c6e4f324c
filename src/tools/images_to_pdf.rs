use serde_json::{Map, Value, json};

use crate::input::load_inputs;
use crate::pdf::create;
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

    let images: Vec<Vec<u8>> = payloads.iter().map(|payload| payload.bytes.clone()).collect();
    let output_bytes = match create::images_to_pdf(&images) {
        Ok(bytes) => bytes,
        Err(err) => return error_result(err.kind(), err.to_string(), None),
    };

    let mut structured = Map::new();
    structured.insert("images".to_string(), json!(images.len()));

    bytes_result(
        output_bytes,
        format!("converted {} images to PDF", images.len()),
        structured,
        output_path,
    )
}
