use lopdf::Document;
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
fn merge_writes_combined_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");
    let output = dir.path().join("merged.pdf");
    fs::write(&first, make_pdf(&["alpha", "bravo"]))?;
    fs::write(&second, make_pdf(&["charlie"]))?;

    let status = Command::new(env!("CARGO_BIN_EXE_mcp-pdf"))
        .args([
            "merge",
            "--path",
            first.to_str().unwrap(),
            "--path",
            second.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .status()?;
    assert!(status.success());

    let doc = Document::load(&output)?;
    assert_eq!(doc.get_pages().len(), 3);
    assert!(doc.extract_text(&[1])?.contains("alpha"));
    assert!(doc.extract_text(&[3])?.contains("charlie"));

    Ok(())
}

#[test]
fn merge_fails_on_missing_input() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing.pdf");

    let status = Command::new(env!("CARGO_BIN_EXE_mcp-pdf"))
        .args(["merge", "--path", missing.to_str().unwrap()])
        .status()?;
    assert!(!status.success());

    Ok(())
}
