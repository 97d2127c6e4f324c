//! Page-graph composition: building fresh documents out of pages cloned from
//! existing ones. Merge, split, remove, and reorder are all renderings of
//! "clone this page sequence into an empty document".

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::HashMap;
use tracing::warn;

use super::PdfError;

/// Create an empty document with a catalog and a page tree root, ready for
/// [`append_page`] calls.
pub fn empty_document() -> (Document, ObjectId) {
    let mut document = Document::with_version("1.5");
    let pages_id = document.add_object(dictionary! {
        "Type" => "Pages",
        "Count" => Object::Integer(0),
        "Kids" => Object::Array(Vec::new()),
    });
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    document.trailer.set("Root", Object::Reference(catalog_id));
    (document, pages_id)
}

/// Deep-clone one page (with its transitively referenced resources) from
/// `source` into `target`, appending it as the last page under `pages_id`.
///
/// `cloned_ids` maps source object ids to their target counterparts. It must
/// live as long as the source document is being copied from: back-references
/// into the page graph (an annotation's /P, say) resolve through it instead
/// of recursing, and resources shared between pages stay shared in the
/// output.
pub fn append_page(
    source: &Document,
    target: &mut Document,
    pages_id: ObjectId,
    page_id: ObjectId,
    cloned_ids: &mut HashMap<ObjectId, ObjectId>,
) -> Result<(), PdfError> {
    let page_object = source
        .get_object(page_id)
        .map_err(|err| PdfError::Parse(format!("cannot read page object {page_id:?}: {err}")))?;

    // Reserve the target id first so back-references to this page land on it.
    let cloned_id = target.add_object(Object::Null);
    cloned_ids.insert(page_id, cloned_id);
    let cloned = deep_clone(source, target, page_object, cloned_ids);
    target.objects.insert(cloned_id, cloned);

    if let Ok(Object::Dictionary(pages_dict)) = target.get_object_mut(pages_id) {
        if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
            kids.push(Object::Reference(cloned_id));
        }
        if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
            *count += 1;
        }
    }

    if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}

/// Recursively clone an object graph from `source` into `target`.
///
/// Each source reference is cloned at most once: its target id is reserved in
/// `cloned_ids` before descending, so a re-encounter (shared resource or a
/// cycle through the page graph) resolves to the reserved id instead of
/// cloning again. The /Parent back-reference is skipped; [`append_page`]
/// patches it afterwards. Dangling references degrade to Null rather than
/// failing the whole operation.
fn deep_clone(
    source: &Document,
    target: &mut Document,
    object: &Object,
    cloned_ids: &mut HashMap<ObjectId, ObjectId>,
) -> Object {
    match object {
        Object::Dictionary(dict) => {
            Object::Dictionary(clone_dictionary(source, target, dict, cloned_ids))
        }
        Object::Array(items) => Object::Array(
            items
                .iter()
                .map(|item| deep_clone(source, target, item, cloned_ids))
                .collect(),
        ),
        Object::Reference(ref_id) => {
            if let Some(mapped) = cloned_ids.get(ref_id) {
                return Object::Reference(*mapped);
            }
            match source.get_object(*ref_id) {
                Ok(referenced) => {
                    let new_id = target.add_object(Object::Null);
                    cloned_ids.insert(*ref_id, new_id);
                    let cloned = deep_clone(source, target, referenced, cloned_ids);
                    target.objects.insert(new_id, cloned);
                    Object::Reference(new_id)
                }
                Err(err) => {
                    warn!(?ref_id, %err, "cannot resolve reference while cloning, using Null");
                    Object::Null
                }
            }
        }
        Object::Stream(stream) => {
            let dict = clone_dictionary(source, target, &stream.dict, cloned_ids);
            Object::Stream(Stream::new(dict, stream.content.clone()))
        }
        other => other.clone(),
    }
}

fn clone_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
    cloned_ids: &mut HashMap<ObjectId, ObjectId>,
) -> Dictionary {
    let mut cloned = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        let value = deep_clone(source, target, value, cloned_ids);
        cloned.set(key.clone(), value);
    }
    cloned
}
