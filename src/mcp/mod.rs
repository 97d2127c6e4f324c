use serde_json::json;

pub mod contracts;
pub mod errors;

use crate::catalog;

/// Tool definitions for `tools/list`: the full catalog (placeholder-backed
/// tools included) plus the inspect utility.
pub fn tool_definitions() -> Vec<serde_json::Value> {
    let mut definitions: Vec<serde_json::Value> = catalog::TOOLS
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "inputSchema": schema_for(tool.name),
                "annotations": {
                    "title": tool.title,
                    "local": tool.local,
                    "accept": tool.accept.filter(),
                    "multiple": tool.multiple
                }
            })
        })
        .collect();

    definitions.push(json!({
        "name": contracts::TOOL_INSPECT,
        "description": "Report page count and format details for a PDF.",
        "inputSchema": contracts::inspect_schema()
    }));

    definitions
}

fn schema_for(name: &str) -> serde_json::Value {
    match name {
        contracts::TOOL_MERGE => contracts::merge_schema(),
        contracts::TOOL_SPLIT => contracts::split_schema(),
        contracts::TOOL_WATERMARK => contracts::watermark_schema(),
        contracts::TOOL_REMOVE_PAGES => contracts::remove_pages_schema(),
        contracts::TOOL_REORDER_PAGES => contracts::reorder_pages_schema(),
        contracts::TOOL_IMAGES_TO_PDF => contracts::images_to_pdf_schema(),
        contracts::TOOL_EXTRACT_TEXT => contracts::extract_text_schema(),
        contracts::TOOL_INSPECT => contracts::inspect_schema(),
        _ => contracts::placeholder_schema(),
    }
}
