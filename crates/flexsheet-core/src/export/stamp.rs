//! Stamping the customer signature onto the first page of a timesheet PDF.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::error::FlexsheetError;
use crate::export::Approval;
use crate::extraction::TextFragment;
use crate::layout::fragment_after;
use crate::model::Anchor;

pub const SIGNATURE_LABEL: &str = "Signature customer";

/// The image sits this many points below `anchor.y + height`.
const IMAGE_DROP: f32 = 20.0;
/// Baseline of the date/manager line above the anchor.
const CAPTION_RISE: f32 = 19.0;
const CAPTION_FONT_SIZE: f32 = 8.0;
/// Guards against cyclic `Parent` chains when resolving inherited resources.
const MAX_TREE_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub struct StampOptions {
    /// Date and manager printed in the caption under the signature.
    pub approval: Approval,
    /// Height of the signature image in points; width keeps the aspect ratio.
    pub signature_height: f32,
}

/// Where the signature goes: the fragment following "Signature customer".
pub fn find_signature_anchor(fragments: &[TextFragment]) -> Option<Anchor> {
    fragment_after(SIGNATURE_LABEL, fragments).map(|f| Anchor { x: f.x(), y: f.y() })
}

/// Draw `signature_image` and a "yyyy-MM-dd manager" caption at `anchor` on page 1.
///
/// Returns the bytes of the updated PDF.
pub fn stamp_signature(
    pdf_bytes: &[u8],
    signature_image: &[u8],
    anchor: Anchor,
    options: &StampOptions,
) -> Result<Vec<u8>, FlexsheetError> {
    let image =
        image::load_from_memory(signature_image).map_err(|e| FlexsheetError::Image(e.to_string()))?;
    let (jpeg, px_width, px_height) = encode_jpeg_on_white(&image)?;

    let mut doc = Document::load_mem(pdf_bytes).map_err(stamp_error)?;
    let page_id = doc
        .get_pages()
        .values()
        .next()
        .copied()
        .ok_or_else(|| FlexsheetError::Stamp("PDF has no pages".into()))?;

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => px_width as i64,
            "Height" => px_height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut resources = page_resources(&doc, page_id)?;
    let image_name = insert_resource(&doc, &mut resources, b"XObject", "FlexSig", image_id)?;
    let font_name = insert_resource(&doc, &mut resources, b"Font", "FlexHelv", font_id)?;

    let height = options.signature_height;
    let width = px_width as f32 * height / px_height as f32;
    let caption = options.approval.caption();

    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                anchor.x.into(),
                (anchor.y + height - IMAGE_DROP).into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(image_name)]),
        Operation::new("Q", vec![]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(font_name), CAPTION_FONT_SIZE.into()]),
        Operation::new("Td", vec![anchor.x.into(), (anchor.y + CAPTION_RISE).into()]),
        Operation::new("Tj", vec![Object::string_literal(win_ansi(&caption))]),
        Operation::new("ET", vec![]),
    ];

    {
        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(stamp_error)?;
        page.set("Resources", resources);
    }
    append_isolated_content(&mut doc, page_id, operations)?;

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| FlexsheetError::Stamp(e.to_string()))?;
    tracing::debug!(
        x = anchor.x,
        y = anchor.y,
        bytes = out.len(),
        "signature stamped"
    );
    Ok(out)
}

fn stamp_error(e: lopdf::Error) -> FlexsheetError {
    FlexsheetError::Stamp(e.to_string())
}

/// Flatten transparency onto white and encode as baseline JPEG for a DCTDecode XObject.
fn encode_jpeg_on_white(image: &DynamicImage) -> Result<(Vec<u8>, u32, u32), FlexsheetError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(FlexsheetError::Image("signature image is empty".into()));
    }

    let mut rgb = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .map_err(|e| FlexsheetError::Image(e.to_string()))?;
    Ok((jpeg, width, height))
}

/// The page's resource dictionary, following `Parent` links for inherited resources.
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary, FlexsheetError> {
    let mut node = doc.get_dictionary(page_id).map_err(stamp_error)?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(resources) = node.get(b"Resources") {
            return resolve_dictionary(doc, resources);
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => node = doc.get_dictionary(parent).map_err(stamp_error)?,
            Err(_) => break,
        }
    }
    Ok(Dictionary::new())
}

fn resolve_dictionary(doc: &Document, object: &Object) -> Result<Dictionary, FlexsheetError> {
    match object {
        Object::Reference(id) => doc.get_dictionary(*id).cloned().map_err(stamp_error),
        other => other.as_dict().cloned().map_err(stamp_error),
    }
}

/// Register `id` under a fresh name in `resources[category]` and return the name.
fn insert_resource(
    doc: &Document,
    resources: &mut Dictionary,
    category: &[u8],
    prefix: &str,
    id: ObjectId,
) -> Result<Vec<u8>, FlexsheetError> {
    let mut entries = match resources.get(category) {
        Ok(existing) => resolve_dictionary(doc, existing)?,
        Err(_) => Dictionary::new(),
    };

    let mut name = prefix.as_bytes().to_vec();
    let mut n = 1;
    while entries.has(&name) {
        name = format!("{prefix}{n}").into_bytes();
        n += 1;
    }

    entries.set(name.clone(), Object::Reference(id));
    resources.set(category.to_vec(), entries);
    Ok(name)
}

/// Wrap the existing page content in q/Q and append `operations` after it,
/// starting from the page's initial graphics state.
fn append_isolated_content(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<(), FlexsheetError> {
    let mut existing: Vec<Object> = match doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Contents"))
    {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    let body = Content { operations }.encode().map_err(stamp_error)?;
    let mut suffix = b"Q\n".to_vec();
    suffix.extend(body);

    let prefix_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let suffix_id = doc.add_object(Stream::new(Dictionary::new(), suffix));
    existing.insert(0, Object::Reference(prefix_id));
    existing.push(Object::Reference(suffix_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(stamp_error)?;
    page.set("Contents", existing);
    Ok(())
}

/// Encode for a WinAnsi Type1 font; characters outside Latin-1 become '?'.
fn win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
