use serde_json::{Value, json};

use crate::input::load_input;
use crate::pdf::PdfFile;
use crate::tools::error_result;

pub fn call(args: &Value) -> Value {
    let payload = match load_input(args) {
        Ok(payload) => payload,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    let include_newlines = args
        .get("include_newlines")
        .and_then(|value| value.as_bool())
        .unwrap_or(true);
    let normalize_whitespace = args
        .get("normalize_whitespace")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);
    let max_chars = args.get("max_chars").and_then(|value| value.as_u64());

    let pdf = match PdfFile::from_bytes(&payload.bytes) {
        Ok(pdf) => pdf,
        Err(err) => return error_result(err.kind(), err.to_string(), Some(payload.source.as_str())),
    };

    let text = match pdf.extract_text() {
        Ok(text) => text,
        Err(err) => return error_result(err.kind(), err.to_string(), Some(payload.source.as_str())),
    };

    let normalized = normalize_text(&text, include_newlines, normalize_whitespace);
    let truncated = apply_max_chars(normalized, max_chars);

    json!({
        "content": [{"type": "text", "text": truncated}],
        "structuredContent": {"text": truncated, "pages": pdf.page_count()},
        "isError": false
    })
}

fn normalize_text(text: &str, include_newlines: bool, normalize_whitespace: bool) -> String {
    let mut output = text.replace("\r\n", "\n").replace('\r', "\n");

    if !include_newlines {
        output = output.replace('\n', " ");
    }

    if normalize_whitespace {
        if include_newlines {
            let lines: Vec<String> = output
                .lines()
                .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
                .collect();
            output = lines.join("\n");
        } else {
            output = output.split_whitespace().collect::<Vec<_>>().join(" ");
        }
    }

    output
}

fn apply_max_chars(text: String, max_chars: Option<u64>) -> String {
    let Some(max_chars) = max_chars else {
        return text;
    };
    let limit = usize::try_from(max_chars).unwrap_or(usize::MAX);
    text.chars().take(limit).collect()
}
