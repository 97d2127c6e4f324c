use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lopdf::Document;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

fn make_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = PdfDocument::new("Fixture");
    let pdf_pages: Vec<PdfPage> = pages
        .iter()
        .map(|text| {
            let ops = vec![
                Op::StartTextSection,
                Op::SetTextCursor {
                    pos: Point {
                        x: Pt(72.0),
                        y: Pt(720.0),
                    },
                },
                Op::SetFontSizeBuiltinFont {
                    size: Pt(12.0),
                    font: BuiltinFont::Helvetica,
                },
                Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(text.to_string())],
                    font: BuiltinFont::Helvetica,
                },
                Op::EndTextSection,
            ];
            PdfPage::new(Mm(210.0), Mm(297.0), ops)
        })
        .collect();
    doc.with_pages(pdf_pages);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

fn send_request(
    stdin: &mut std::process::ChildStdin,
    stdout: &mut BufReader<std::process::ChildStdout>,
    request: serde_json::Value,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let serialized = serde_json::to_string(&request)?;
    writeln!(stdin, "{serialized}")?;
    stdin.flush()?;

    let mut line = String::new();
    stdout.read_line(&mut line)?;
    let response: serde_json::Value = serde_json::from_str(line.trim())?;
    Ok(response)
}

fn decode_output(result: &serde_json::Value) -> Result<Document, Box<dyn std::error::Error>> {
    let encoded = result
        .get("structuredContent")
        .and_then(|value| value.get("base64"))
        .and_then(|value| value.as_str())
        .expect("base64 present");
    let bytes = STANDARD.decode(encoded)?;
    Ok(Document::load_mem(&bytes)?)
}

#[test]
fn reorder_without_order_reverses_pages() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = make_pdf(&["alpha", "bravo", "charlie"]);

    let mut child = Command::new(env!("CARGO_BIN_EXE_mcp-pdf"))
        .args(["serve", "--stdio"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let mut stdin = child.stdin.take().expect("stdin available");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout available"));

    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 21,
        "method": "tools/call",
        "params": {
            "name": "pdf.reorder_pages",
            "arguments": {"base64": STANDARD.encode(&fixture)}
        }
    });
    let response = send_request(&mut stdin, &mut stdout, request)?;
    let result = response.get("result").expect("result present");
    assert_eq!(result.get("isError").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        result
            .get("structuredContent")
            .and_then(|value| value.get("reversed"))
            .and_then(|v| v.as_bool()),
        Some(true)
    );

    let doc = decode_output(result)?;
    assert_eq!(doc.get_pages().len(), 3);
    assert!(doc.extract_text(&[1])?.contains("charlie"));
    assert!(doc.extract_text(&[3])?.contains("alpha"));

    let _ = child.kill();
    Ok(())
}

#[test]
fn reorder_with_explicit_order() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = make_pdf(&["alpha", "bravo", "charlie"]);

    let mut child = Command::new(env!("CARGO_BIN_EXE_mcp-pdf"))
        .args(["serve", "--stdio"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let mut stdin = child.stdin.take().expect("stdin available");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout available"));

    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 22,
        "method": "tools/call",
        "params": {
            "name": "pdf.reorder_pages",
            "arguments": {
                "base64": STANDARD.encode(&fixture),
                "order": [1, 0]
            }
        }
    });
    let response = send_request(&mut stdin, &mut stdout, request)?;
    let result = response.get("result").expect("result present");
    assert_eq!(result.get("isError").and_then(|v| v.as_bool()), Some(false));

    let doc = decode_output(result)?;
    assert_eq!(doc.get_pages().len(), 2);
    assert!(doc.extract_text(&[1])?.contains("bravo"));
    assert!(doc.extract_text(&[2])?.contains("alpha"));

    let _ = child.kill();
    Ok(())
}

// One-page document whose link annotation carries a /P back-reference to
// its page, as everyday PDFs with links do.
fn make_linked_pdf(text: &str) -> Vec<u8> {
    use lopdf::{Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let content_id = doc.add_object(Object::Stream(Stream::new(
        dictionary! {},
        content.into_bytes(),
    )));
    let page_id = doc.new_object_id();
    let annot_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(100),
            Object::Integer(100),
        ]),
        "P" => Object::Reference(page_id),
    });
    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
            "Resources" => Object::Dictionary(dictionary! {
                "Font" => Object::Dictionary(dictionary! {
                    "F1" => Object::Reference(font_id),
                }),
            }),
            "Contents" => Object::Reference(content_id),
            "Annots" => Object::Array(vec![Object::Reference(annot_id)]),
        }),
    );
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(1),
            "Kids" => Object::Array(vec![Object::Reference(page_id)]),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("serialize");
    out
}

#[test]
fn reorder_handles_link_annotations() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = make_linked_pdf("alpha");

    let mut child = Command::new(env!("CARGO_BIN_EXE_mcp-pdf"))
        .args(["serve", "--stdio"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let mut stdin = child.stdin.take().expect("stdin available");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout available"));

    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 24,
        "method": "tools/call",
        "params": {
            "name": "pdf.reorder_pages",
            "arguments": {"base64": STANDARD.encode(&fixture)}
        }
    });
    let response = send_request(&mut stdin, &mut stdout, request)?;
    let result = response.get("result").expect("result present");
    assert_eq!(result.get("isError").and_then(|v| v.as_bool()), Some(false));

    let doc = decode_output(result)?;
    assert_eq!(doc.get_pages().len(), 1);
    assert!(doc.extract_text(&[1])?.contains("alpha"));

    let _ = child.kill();
    Ok(())
}

#[test]
fn reorder_rejects_out_of_range_index() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = make_pdf(&["alpha"]);

    let mut child = Command::new(env!("CARGO_BIN_EXE_mcp-pdf"))
        .args(["serve", "--stdio"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let mut stdin = child.stdin.take().expect("stdin available");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout available"));

    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 23,
        "method": "tools/call",
        "params": {
            "name": "pdf.reorder_pages",
            "arguments": {
                "base64": STANDARD.encode(&fixture),
                "order": [4]
            }
        }
    });
    let response = send_request(&mut stdin, &mut stdout, request)?;
    let result = response.get("result").expect("result present");
    assert_eq!(result.get("isError").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(
        result
            .get("structuredContent")
            .and_then(|value| value.get("error"))
            .and_then(|value| value.get("kind"))
            .and_then(|v| v.as_str()),
        Some("invalid_input")
    );

    let _ = child.kill();
    Ok(())
}
