use crate::mcp::contracts::{MAX_INPUT_BYTES, MAX_INPUT_FILES};
use crate::mcp::errors;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

/// One user-supplied file held in memory for the duration of a tool call.
#[derive(Debug, Clone)]
pub struct InputPayload {
    pub bytes: Vec<u8>,
    /// Display name: the file name for path inputs, "upload" for base64.
    pub name: String,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct InputError {
    pub kind: &'static str,
    pub message: String,
}

impl InputError {
    fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(errors::INVALID_INPUT, message)
    }

    fn too_large(message: impl Into<String>) -> Self {
        Self::new(errors::TOO_LARGE, message)
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for InputError {}

/// Load a single input from `path` or `base64` (exactly one must be set).
pub fn load_input(args: &Value) -> Result<InputPayload, InputError> {
    let obj = args
        .as_object()
        .ok_or_else(|| InputError::invalid_input("arguments must be an object"))?;

    let path_value = obj.get("path");
    let base64_value = obj.get("base64");

    match (path_value, base64_value) {
        (None, None) => {
            return Err(InputError::invalid_input(
                "either path or base64 is required",
            ));
        }
        (Some(_), Some(_)) => {
            return Err(InputError::invalid_input(
                "path and base64 cannot both be set",
            ));
        }
        _ => {}
    }

    if let Some(value) = path_value {
        let path = value
            .as_str()
            .ok_or_else(|| InputError::invalid_input("path must be a string"))?;
        return load_path(path);
    }

    let value = base64_value.expect("base64 must be present here");
    let base64_str = value
        .as_str()
        .ok_or_else(|| InputError::invalid_input("base64 must be a string"))?;
    load_base64(base64_str)
}

/// Load a list of inputs from `paths` or `base64s` (exactly one must be set).
///
/// Only merge and images-to-pdf accept more than one file; every other tool
/// goes through [`load_input`].
pub fn load_inputs(args: &Value) -> Result<Vec<InputPayload>, InputError> {
    let obj = args
        .as_object()
        .ok_or_else(|| InputError::invalid_input("arguments must be an object"))?;

    let paths_value = obj.get("paths");
    let base64s_value = obj.get("base64s");

    let (values, is_path) = match (paths_value, base64s_value) {
        (None, None) => {
            return Err(InputError::invalid_input(
                "either paths or base64s is required",
            ));
        }
        (Some(_), Some(_)) => {
            return Err(InputError::invalid_input(
                "paths and base64s cannot both be set",
            ));
        }
        (Some(values), None) => (values, true),
        (None, Some(values)) => (values, false),
    };

    let key = if is_path { "paths" } else { "base64s" };
    let values = values
        .as_array()
        .ok_or_else(|| InputError::invalid_input(format!("{key} must be an array")))?;
    if values.is_empty() {
        return Err(InputError::invalid_input(format!(
            "{key} must not be empty"
        )));
    }
    if values.len() > MAX_INPUT_FILES {
        return Err(InputError::too_large(format!(
            "too many inputs: {} (max {MAX_INPUT_FILES})",
            values.len()
        )));
    }

    let mut payloads = Vec::with_capacity(values.len());
    for value in values {
        let entry = value
            .as_str()
            .ok_or_else(|| InputError::invalid_input(format!("{key} entries must be strings")))?;
        let payload = if is_path {
            load_path(entry)?
        } else {
            load_base64(entry)?
        };
        payloads.push(payload);
    }
    Ok(payloads)
}

fn load_path(path: &str) -> Result<InputPayload, InputError> {
    let path_ref = Path::new(path);
    let metadata = fs::metadata(path_ref)
        .map_err(|_| InputError::invalid_input("path must exist and be a file"))?;
    if !metadata.is_file() {
        return Err(InputError::invalid_input("path must be a file"));
    }
    let len = metadata.len();
    if len > MAX_INPUT_BYTES {
        return Err(InputError::too_large(format!(
            "input exceeds limit: {len} bytes (max {MAX_INPUT_BYTES})"
        )));
    }
    let bytes =
        fs::read(path_ref).map_err(|_| InputError::invalid_input("failed to read path contents"))?;
    let name = path_ref
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(InputPayload {
        bytes,
        name,
        source: format!("path:{path}"),
    })
}

fn load_base64(encoded: &str) -> Result<InputPayload, InputError> {
    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|_| InputError::invalid_input("base64 must be valid"))?;
    if bytes.len() as u64 > MAX_INPUT_BYTES {
        return Err(InputError::too_large(format!(
            "input exceeds limit: {} bytes (max {MAX_INPUT_BYTES})",
            bytes.len()
        )));
    }
    Ok(InputPayload {
        bytes,
        name: "upload".to_string(),
        source: "base64".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn base64_ok() {
        let encoded = STANDARD.encode(b"hello");
        let args = json!({"base64": encoded});
        let payload = load_input(&args).expect("payload");
        assert_eq!(payload.bytes, b"hello");
        assert_eq!(payload.name, "upload");
        assert_eq!(payload.source, "base64");
    }

    #[test]
    fn base64_invalid() {
        let args = json!({"base64": "not@@@"});
        let err = load_input(&args).expect_err("error");
        assert_eq!(err.kind, errors::INVALID_INPUT);
    }

    #[test]
    fn missing_input() {
        let args = json!({});
        let err = load_input(&args).expect_err("error");
        assert_eq!(err.kind, errors::INVALID_INPUT);
    }

    #[test]
    fn both_present() {
        let encoded = STANDARD.encode(b"hello");
        let args = json!({"path": "./example.pdf", "base64": encoded});
        let err = load_input(&args).expect_err("error");
        assert_eq!(err.kind, errors::INVALID_INPUT);
    }

    #[test]
    fn path_not_found() {
        let args = json!({"path": "/tmp/definitely-missing-input.pdf"});
        let err = load_input(&args).expect_err("error");
        assert_eq!(err.kind, errors::INVALID_INPUT);
    }

    #[test]
    fn path_is_dir() {
        let dir = tempdir().expect("tempdir");
        let args = json!({"path": dir.path().to_string_lossy()});
        let err = load_input(&args).expect_err("error");
        assert_eq!(err.kind, errors::INVALID_INPUT);
    }

    #[test]
    fn path_name_is_file_name() {
        let dir = tempdir().expect("tempdir");
        let file_path = dir.path().join("report.pdf");
        std::fs::write(&file_path, b"%PDF-").expect("write");
        let args = json!({"path": file_path.to_string_lossy()});
        let payload = load_input(&args).expect("payload");
        assert_eq!(payload.name, "report.pdf");
    }

    #[test]
    fn too_large() {
        let dir = tempdir().expect("tempdir");
        let file_path = dir.path().join("large.pdf");
        let file = File::create(&file_path).expect("file");
        file.set_len(MAX_INPUT_BYTES + 1).expect("set_len");
        let args = json!({"path": file_path.to_string_lossy()});
        let err = load_input(&args).expect_err("error");
        assert_eq!(err.kind, errors::TOO_LARGE);
    }

    #[test]
    fn multi_base64_ok() {
        let args = json!({"base64s": [STANDARD.encode(b"one"), STANDARD.encode(b"two")]});
        let payloads = load_inputs(&args).expect("payloads");
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].bytes, b"one");
        assert_eq!(payloads[1].bytes, b"two");
    }

    #[test]
    fn multi_empty_list() {
        let args = json!({"paths": []});
        let err = load_inputs(&args).expect_err("error");
        assert_eq!(err.kind, errors::INVALID_INPUT);
    }

    #[test]
    fn multi_both_present() {
        let args = json!({"paths": ["a.pdf"], "base64s": ["aGk="]});
        let err = load_inputs(&args).expect_err("error");
        assert_eq!(err.kind, errors::INVALID_INPUT);
    }

    #[test]
    fn multi_too_many() {
        let encoded = STANDARD.encode(b"x");
        let entries: Vec<String> = (0..=MAX_INPUT_FILES).map(|_| encoded.clone()).collect();
        let args = json!({"base64s": entries});
        let err = load_inputs(&args).expect_err("error");
        assert_eq!(err.kind, errors::TOO_LARGE);
    }
}
