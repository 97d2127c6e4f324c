//! Document generation with `printpdf` 0.8: the placeholder page fabricated
//! for tools without a local handler, and image-to-PDF conversion.
//!
//! printpdf 0.8 is data-oriented: pages are `PdfPage` structs holding `Vec<Op>`
//! operation lists, serialised via `PdfDocument::save()`.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::debug;

use super::PdfError;

// US Letter, matching the default page of the placeholder output.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;

const PT_PER_PX: f32 = 1.0;
const MM_PER_PT: f32 = 0.352_778;

/// Fabricate a valid single-page PDF naming the requested operation and the
/// original file, used for every tool without a dedicated handler.
pub fn placeholder(operation: &str, filename: &str) -> Vec<u8> {
    let page_h_pt = Mm(PAGE_HEIGHT_MM).into_pt().0;

    let lines = [
        (format!("Processed with {}", env!("CARGO_PKG_NAME")), 30.0),
        (format!("Operation: {operation}"), 20.0),
        (format!("Original file: {filename}"), 15.0),
    ];

    let mut ops: Vec<Op> = Vec::new();
    for (index, (line, size)) in lines.iter().enumerate() {
        let y_pt = page_h_pt - 100.0 - 50.0 * index as f32;
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(50.0),
                y: Pt(y_pt),
            },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(*size),
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line.clone())],
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::EndTextSection);
    }

    let mut doc = PdfDocument::new(operation);
    doc.with_pages(vec![PdfPage::new(
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        ops,
    )]);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

/// Build a PDF with one page per input image (PNG or JPEG).
///
/// Each page is sized to the image's pixel dimensions at one point per pixel,
/// so the image fills the page exactly.
pub fn images_to_pdf(images: &[Vec<u8>]) -> Result<Vec<u8>, PdfError> {
    if images.is_empty() {
        return Err(PdfError::Page("at least one image is required".to_string()));
    }

    let mut doc = PdfDocument::new("Images");
    let mut pages: Vec<PdfPage> = Vec::new();

    for (index, bytes) in images.iter().enumerate() {
        let dynamic_image = ::image::load_from_memory(bytes)
            .map_err(|err| PdfError::Image(format!("image #{}: {err}", index + 1)))?;

        let img_width = dynamic_image.width() as usize;
        let img_height = dynamic_image.height() as usize;

        let rgb_image = dynamic_image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        let page_w = Mm(img_width as f32 * PT_PER_PX * MM_PER_PT);
        let page_h = Mm(img_height as f32 * PT_PER_PX * MM_PER_PT);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(72.0),
                rotate: None,
            },
        }];

        debug!(img_width, img_height, "image placed on page");
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}
