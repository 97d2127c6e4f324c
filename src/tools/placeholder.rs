use serde_json::{Map, Value, json};

use crate::input::load_input;
use crate::pdf::create;
use crate::tools::{ToolError, bytes_result, error_result, parse_output_path};

/// Shared handler for every cataloged tool without a local implementation
/// (compress, office conversions, protect, unlock). Fabricates a valid
/// single-page PDF naming the operation and the original file.
pub fn call(operation: &str, args: &Value) -> Value {
    let payload = match load_input(args) {
        Ok(payload) => payload,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let filename = match parse_filename(args.get("filename")) {
        Ok(filename) => filename.unwrap_or(payload.name),
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let output_path = match parse_output_path(args.get("output_path")) {
        Ok(path) => path,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let output_bytes = create::placeholder(operation, &filename);

    let mut structured = Map::new();
    structured.insert("operation".to_string(), json!(operation));
    structured.insert("filename".to_string(), json!(filename));
    structured.insert("placeholder".to_string(), json!(true));

    bytes_result(
        output_bytes,
        format!("{operation} is not processed locally; produced placeholder document"),
        structured,
        output_path,
    )
}

fn parse_filename(value: Option<&Value>) -> Result<Option<String>, ToolError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let Some(filename) = value.as_str() else {
        return Err(ToolError::invalid_input("filename must be a string"));
    };
    if filename.trim().is_empty() {
        return Err(ToolError::invalid_input("filename must not be empty"));
    }
    Ok(Some(filename.to_string()))
}
