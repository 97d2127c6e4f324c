use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use std::fs;
use std::process::Command;

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

#[test]
fn extract_text_prints_page_contents() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.pdf");
    fs::write(&input, make_pdf(&["alpha", "bravo"]))?;

    let output = Command::new(env!("CARGO_BIN_EXE_mcp-pdf"))
        .args(["extract-text", "--path", input.to_str().unwrap()])
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("alpha"));
    assert!(stdout.contains("bravo"));

    Ok(())
}

#[test]
fn extract_text_json_reports_page_count() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.pdf");
    fs::write(&input, make_pdf(&["alpha", "bravo", "charlie"]))?;

    let output = Command::new(env!("CARGO_BIN_EXE_mcp-pdf"))
        .args(["extract-text", "--path", input.to_str().unwrap(), "--json"])
        .output()?;
    assert!(output.status.success());

    let structured: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(structured.get("pages").and_then(|v| v.as_u64()), Some(3));
    assert!(
        structured
            .get("text")
            .and_then(|v| v.as_str())
            .is_some_and(|text| text.contains("charlie"))
    );

    Ok(())
}
