//! PDF engine: loading, page-sequence rebuilds (merge, split, remove,
//! reorder), watermark stamping, and text extraction on top of `lopdf`.

pub mod compose;
pub mod create;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use thiserror::Error;
use tracing::{debug, info};

use crate::mcp::errors;

const WATERMARK_FONT: &str = "WmF";
const WATERMARK_GS: &str = "WmGS";
const WATERMARK_FONT_SIZE: f32 = 50.0;

// US Letter fallback when no MediaBox can be resolved.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("not a PDF: missing %PDF- header")]
    NotPdf,
    #[error("document is encrypted")]
    Encrypted,
    #[error("failed to parse PDF: {0}")]
    Parse(String),
    #[error("{0}")]
    Page(String),
    #[error("failed to decode image: {0}")]
    Image(String),
    #[error("failed to serialize PDF: {0}")]
    Serialize(String),
}

impl PdfError {
    /// Error kind constant for the tool result envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            PdfError::NotPdf => errors::UNSUPPORTED_FORMAT,
            PdfError::Encrypted => errors::ENCRYPTED,
            PdfError::Parse(_) => errors::PARSE_FAILED,
            PdfError::Page(_) => errors::INVALID_INPUT,
            PdfError::Image(_) => errors::UNSUPPORTED_FORMAT,
            PdfError::Serialize(_) => errors::INTERNAL_ERROR,
        }
    }
}

/// A parsed PDF document held in memory for the duration of one tool call.
#[derive(Debug)]
pub struct PdfFile {
    document: Document,
}

impl PdfFile {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        if !bytes.starts_with(b"%PDF-") {
            return Err(PdfError::NotPdf);
        }
        let document =
            Document::load_mem(bytes).map_err(|err| PdfError::Parse(err.to_string()))?;
        if document.is_encrypted() {
            return Err(PdfError::Encrypted);
        }
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    pub fn version(&self) -> String {
        self.document.version.clone()
    }

    /// Extract a single page (0-indexed) into a standalone one-page PDF.
    pub fn extract_page(&self, index: usize) -> Result<Vec<u8>, PdfError> {
        let count = self.page_count();
        if index >= count {
            return Err(PdfError::Page(format!(
                "page {index} out of range (document has {count} pages)"
            )));
        }
        self.select(&[index as u32 + 1])
    }

    /// Split into one single-page PDF per page, in source order.
    pub fn split_all(&self) -> Result<Vec<Vec<u8>>, PdfError> {
        let count = self.page_count();
        info!(count, "splitting PDF");
        (0..count).map(|index| self.extract_page(index)).collect()
    }

    /// Rebuild the document with pages in strictly reversed order.
    pub fn reversed(&self) -> Result<Vec<u8>, PdfError> {
        let count = self.page_count() as u32;
        let numbers: Vec<u32> = (1..=count).rev().collect();
        self.select(&numbers)
    }

    /// Rebuild the document with pages in the caller-specified order
    /// (0-indexed). Any out-of-range index is an error.
    pub fn reordered(&self, order: &[usize]) -> Result<Vec<u8>, PdfError> {
        let count = self.page_count();
        if order.is_empty() {
            return Err(PdfError::Page("order must not be empty".to_string()));
        }
        let mut numbers = Vec::with_capacity(order.len());
        for &index in order {
            if index >= count {
                return Err(PdfError::Page(format!(
                    "page {index} out of range (document has {count} pages)"
                )));
            }
            numbers.push(index as u32 + 1);
        }
        self.select(&numbers)
    }

    /// Remove the given 0-indexed pages. Duplicates collapse and indices
    /// beyond the page count are silently skipped; the kept pages retain
    /// their relative order.
    pub fn without_pages(&self, indices: &[usize]) -> Result<Vec<u8>, PdfError> {
        let count = self.page_count();
        let removed: std::collections::BTreeSet<usize> = indices
            .iter()
            .copied()
            .filter(|&index| index < count)
            .collect();

        let kept: Vec<u32> = (0..count)
            .filter(|index| !removed.contains(index))
            .map(|index| index as u32 + 1)
            .collect();
        if kept.is_empty() {
            return Err(PdfError::Page(
                "removing every page would leave an empty document".to_string(),
            ));
        }

        info!(removed = removed.len(), kept = kept.len(), "removing pages");
        self.select(&kept)
    }

    /// Stamp `text` diagonally across the center of every page at 50%
    /// opacity, Helvetica-Bold 50pt, rotated 45 degrees.
    pub fn watermarked(&self, text: &str) -> Result<Vec<u8>, PdfError> {
        let mut doc = self.document.clone();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let gs_id = doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => Object::Real(0.5),
            "CA" => Object::Real(0.5),
        });

        let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
        info!(pages = page_ids.len(), "stamping watermark");

        for page_id in page_ids {
            let (width, height) = media_box(&doc, page_id);
            let content = watermark_content(text, width, height);
            let stream_id = doc.add_object(Object::Stream(Stream::new(
                dictionary! {},
                content.into_bytes(),
            )));

            let resources = stamped_resources(&doc, page_id, font_id, gs_id);
            let contents = appended_contents(&doc, page_id, stream_id)?;

            let page_dict = doc
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|err| PdfError::Parse(format!("page {page_id:?}: {err}")))?;
            page_dict.set("Resources", Object::Dictionary(resources));
            page_dict.set("Contents", contents);
        }

        to_bytes(doc)
    }

    /// Plain-text extraction over every page.
    pub fn extract_text(&self) -> Result<String, PdfError> {
        let numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();
        self.document
            .extract_text(&numbers)
            .map_err(|err| PdfError::Parse(format!("text extraction failed: {err}")))
    }

    /// Rebuild a document from the given 1-indexed page sequence.
    fn select(&self, numbers: &[u32]) -> Result<Vec<u8>, PdfError> {
        let pages = self.document.get_pages();
        let (mut target, pages_id) = compose::empty_document();

        let mut cloned_ids = std::collections::HashMap::new();
        for number in numbers {
            let page_id = *pages.get(number).ok_or_else(|| {
                PdfError::Page(format!("page {number} not found in page tree"))
            })?;
            compose::append_page(
                &self.document,
                &mut target,
                pages_id,
                page_id,
                &mut cloned_ids,
            )?;
        }

        to_bytes(target)
    }
}

/// Merge the given documents into one, pages in source order.
pub fn merge(inputs: &[PdfFile]) -> Result<Vec<u8>, PdfError> {
    if inputs.is_empty() {
        return Err(PdfError::Page(
            "at least one document is required".to_string(),
        ));
    }

    let (mut target, pages_id) = compose::empty_document();
    for input in inputs {
        // The clone map is per source document: ids from different inputs
        // overlap and must not alias each other.
        let mut cloned_ids = std::collections::HashMap::new();
        for page_id in input.document.get_pages().values() {
            compose::append_page(&input.document, &mut target, pages_id, *page_id, &mut cloned_ids)?;
        }
    }

    info!(
        documents = inputs.len(),
        pages = inputs.iter().map(PdfFile::page_count).sum::<usize>(),
        "merged PDFs"
    );
    to_bytes(target)
}

fn to_bytes(mut document: Document) -> Result<Vec<u8>, PdfError> {
    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|err| PdfError::Serialize(err.to_string()))?;
    Ok(output)
}

/// Resolve the effective MediaBox of a page, walking the /Parent chain for
/// inherited values. Falls back to US Letter.
fn media_box(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let mut current = page_id;
    for _ in 0..16 {
        let Ok(dict) = doc.get_object(current).and_then(Object::as_dict) else {
            break;
        };
        if let Ok(value) = dict.get(b"MediaBox") {
            if let Some(size) = media_box_size(doc, value) {
                return size;
            }
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => current = *parent_id,
            _ => break,
        }
    }
    DEFAULT_PAGE_SIZE
}

fn media_box_size(doc: &Document, value: &Object) -> Option<(f32, f32)> {
    let resolved = match value {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let items = resolved.as_array().ok()?;
    if items.len() != 4 {
        return None;
    }
    let edges: Vec<f32> = items.iter().filter_map(number).collect();
    if edges.len() != 4 {
        return None;
    }
    Some((edges[2] - edges[0], edges[3] - edges[1]))
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    }
}

/// Page resources with the watermark font and ExtGState spliced in.
///
/// The resulting dictionary is set inline on the page, overriding any
/// inherited /Resources (which the page's own content keeps referencing by
/// name, since names are merged, not replaced).
fn stamped_resources(
    doc: &Document,
    page_id: ObjectId,
    font_id: ObjectId,
    gs_id: ObjectId,
) -> Dictionary {
    let mut resources = existing_resources(doc, page_id).unwrap_or_default();

    let mut fonts = resolved_sub_dictionary(doc, &resources, b"Font");
    fonts.set(WATERMARK_FONT, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let mut states = resolved_sub_dictionary(doc, &resources, b"ExtGState");
    states.set(WATERMARK_GS, Object::Reference(gs_id));
    resources.set("ExtGState", Object::Dictionary(states));

    resources
}

fn existing_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let mut current = page_id;
    for _ in 0..16 {
        let dict = doc.get_object(current).and_then(Object::as_dict).ok()?;
        if let Ok(value) = dict.get(b"Resources") {
            let resolved = match value {
                Object::Reference(id) => doc.get_object(*id).ok()?,
                other => other,
            };
            return resolved.as_dict().ok().cloned();
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => current = *parent_id,
            _ => return None,
        }
    }
    None
}

fn resolved_sub_dictionary(doc: &Document, resources: &Dictionary, key: &[u8]) -> Dictionary {
    match resources.get(key) {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .cloned()
            .unwrap_or_default(),
        _ => Dictionary::new(),
    }
}

/// Content stream drawing the diagonal stamp, appended after the page's
/// existing content so it renders on top.
fn watermark_content(text: &str, width: f32, height: f32) -> String {
    // Average Helvetica-Bold advance is roughly 0.55 em; close enough for
    // centering a stamp.
    let text_width = 0.55 * WATERMARK_FONT_SIZE * text.chars().count() as f32;
    let x = width / 2.0 - text_width / 2.0;
    let y = height / 2.0;
    let r = std::f32::consts::FRAC_1_SQRT_2;
    format!(
        "q /{WATERMARK_GS} gs BT /{WATERMARK_FONT} {WATERMARK_FONT_SIZE} Tf 0.5 0.5 0.5 rg \
         {r:.5} {r:.5} {neg_r:.5} {r:.5} {x:.2} {y:.2} Tm ({escaped}) Tj ET Q",
        neg_r = -r,
        escaped = escape_pdf_string(text),
    )
}

fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn appended_contents(
    doc: &Document,
    page_id: ObjectId,
    stream_id: ObjectId,
) -> Result<Object, PdfError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|err| PdfError::Parse(format!("page {page_id:?}: {err}")))?;

    let Some(existing) = page_dict.get(b"Contents").ok().cloned() else {
        return Ok(Object::Reference(stream_id));
    };

    // /Contents may be an indirect reference to an array of streams; resolve
    // before deciding whether to push or wrap, since an array nested inside
    // a Contents array is not valid.
    let resolved_items = match &existing {
        Object::Array(items) => Some(items.clone()),
        Object::Reference(id) => doc
            .get_object(*id)
            .ok()
            .and_then(|object| object.as_array().ok())
            .cloned(),
        _ => None,
    };

    Ok(match resolved_items {
        Some(mut items) => {
            items.push(Object::Reference(stream_id));
            Object::Array(items)
        }
        None => Object::Array(vec![existing, Object::Reference(stream_id)]),
    })
}
