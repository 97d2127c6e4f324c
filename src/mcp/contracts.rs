use serde_json::json;

pub const TOOL_MERGE: &str = "pdf.merge";
pub const TOOL_SPLIT: &str = "pdf.split";
pub const TOOL_WATERMARK: &str = "pdf.watermark";
pub const TOOL_REMOVE_PAGES: &str = "pdf.remove_pages";
pub const TOOL_REORDER_PAGES: &str = "pdf.reorder_pages";
pub const TOOL_IMAGES_TO_PDF: &str = "pdf.images_to_pdf";
pub const TOOL_EXTRACT_TEXT: &str = "pdf.extract_text";
pub const TOOL_INSPECT: &str = "pdf.inspect";

pub const MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;
pub const MAX_INPUT_FILES: usize = 32;
pub const MAX_OUTPUT_BYTES: u64 = 20 * 1024 * 1024;

fn single_input_properties() -> serde_json::Value {
    json!({
        "path": { "type": "string" },
        "base64": { "type": "string" }
    })
}

fn single_input_one_of() -> serde_json::Value {
    json!([
        { "required": ["path"] },
        { "required": ["base64"] }
    ])
}

pub fn merge_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "paths": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
            "base64s": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
            "output_path": { "type": "string" }
        },
        "oneOf": [
            { "required": ["paths"] },
            { "required": ["base64s"] }
        ],
        "additionalProperties": false
    })
}

pub fn split_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "base64": { "type": "string" },
            "page": { "type": "integer", "minimum": 0 },
            "output_dir": { "type": "string" },
            "output_path": { "type": "string" }
        },
        "oneOf": single_input_one_of(),
        "additionalProperties": false
    })
}

pub fn watermark_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "base64": { "type": "string" },
            "text": { "type": "string", "minLength": 1 },
            "output_path": { "type": "string" }
        },
        "required": ["text"],
        "oneOf": single_input_one_of(),
        "additionalProperties": false
    })
}

pub fn remove_pages_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "base64": { "type": "string" },
            "pages": {
                "type": "array",
                "items": { "type": "integer", "minimum": 0 },
                "minItems": 1
            },
            "output_path": { "type": "string" }
        },
        "required": ["pages"],
        "oneOf": single_input_one_of(),
        "additionalProperties": false
    })
}

pub fn reorder_pages_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "base64": { "type": "string" },
            "order": {
                "type": "array",
                "items": { "type": "integer", "minimum": 0 },
                "minItems": 1
            },
            "output_path": { "type": "string" }
        },
        "oneOf": single_input_one_of(),
        "additionalProperties": false
    })
}

pub fn images_to_pdf_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "paths": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
            "base64s": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
            "output_path": { "type": "string" }
        },
        "oneOf": [
            { "required": ["paths"] },
            { "required": ["base64s"] }
        ],
        "additionalProperties": false
    })
}

pub fn extract_text_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "base64": { "type": "string" },
            "max_chars": { "type": "integer", "minimum": 0 },
            "include_newlines": { "type": "boolean" },
            "normalize_whitespace": { "type": "boolean" }
        },
        "oneOf": single_input_one_of(),
        "additionalProperties": false
    })
}

pub fn inspect_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": single_input_properties(),
        "oneOf": single_input_one_of(),
        "additionalProperties": false
    })
}

/// Schema shared by every cataloged tool that routes to the placeholder
/// document path (compress, office conversions, protect, unlock, ...).
pub fn placeholder_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "base64": { "type": "string" },
            "filename": { "type": "string" },
            "output_path": { "type": "string" }
        },
        "oneOf": single_input_one_of(),
        "additionalProperties": false
    })
}
