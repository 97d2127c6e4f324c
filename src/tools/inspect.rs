use serde_json::{Value, json};

use crate::input::load_input;
use crate::pdf::PdfFile;
use crate::tools::error_result;

pub fn call(args: &Value) -> Value {
    let payload = match load_input(args) {
        Ok(payload) => payload,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let pdf = match PdfFile::from_bytes(&payload.bytes) {
        Ok(pdf) => pdf,
        Err(err) => return error_result(err.kind(), err.to_string(), Some(payload.source.as_str())),
    };

    let pages = pdf.page_count();
    let version = pdf.version();
    let summary = format!("PDF {version}, {pages} pages");

    json!({
        "content": [{"type": "text", "text": summary}],
        "structuredContent": {
            "pages": pages,
            "version": version,
            "name": payload.name,
            "bytes_len": payload.bytes.len()
        },
        "isError": false
    })
}
