//! Invoice PDF rendering

use super::model::{GeneratedPdf, InvoiceFormData};
use crate::signature::{data_url_bytes, SignatureError};
use chrono::{DateTime, Local};
use image::ImageFormat;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use thiserror::Error;

/// A4 in points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;

/// Largest box the signature is scaled into
const SIGNATURE_MAX_WIDTH: f32 = 240.0;
const SIGNATURE_MAX_HEIGHT: f32 = 80.0;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("invalid signature: {0}")]
    Signature(#[from] SignatureError),
    #[error("signature image could not be decoded: {0}")]
    Image(#[from] image::ImageError),
    #[error("pdf encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("pdf write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// File name used for an invoice's PDF
pub fn pdf_file_name(invoice_number: &str) -> String {
    format!("invoice-{invoice_number}.pdf")
}

/// Render the invoice as a single-page PDF
pub fn generate_invoice_pdf(data: &InvoiceFormData) -> Result<GeneratedPdf, PdfError> {
    generate_invoice_pdf_at(data, Local::now())
}

pub fn generate_invoice_pdf_at(
    data: &InvoiceFormData,
    generated_at: DateTime<Local>,
) -> Result<GeneratedPdf, PdfError> {
    let signature = image::load_from_memory_with_format(
        &data_url_bytes(&data.signature)?,
        ImageFormat::Png,
    )?;
    let (sig_w, sig_h) = (signature.width(), signature.height());
    // PDF images carry no alpha here; the pad is opaque white already
    let signature_rgb = signature.to_rgb8().into_raw();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => sig_w as i64,
            "Height" => sig_h as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        signature_rgb,
    ));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
        "XObject" => dictionary! {
            "ImSig" => image_id,
        },
    });

    let content = Content {
        operations: page_operations(data, (sig_w, sig_h), generated_at),
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(format!(
            "Invoice {}",
            data.invoice_details.invoice_number
        )),
        "Producer" => Object::string_literal("invoice-tui"),
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    tracing::debug!(
        "Generated invoice PDF for {} ({} bytes)",
        data.invoice_details.invoice_number,
        bytes.len()
    );

    Ok(GeneratedPdf {
        file_name: pdf_file_name(&data.invoice_details.invoice_number),
        bytes,
    })
}

fn text(font: &str, size: f32, x: f32, y: f32, value: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(win_ansi_bytes(value), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Transcode text for the WinAnsi-encoded base fonts, `?` for anything unmapped
fn win_ansi_bytes(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|ch| match ch {
            '\u{0000}'..='\u{007F}' | '\u{00A0}'..='\u{00FF}' => ch as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            _ => b'?',
        })
        .collect()
}

fn rule(y: f32) -> Vec<Operation> {
    vec![
        Operation::new("w", vec![0.5_f32.into()]),
        Operation::new("m", vec![MARGIN.into(), y.into()]),
        Operation::new("l", vec![(PAGE_WIDTH - MARGIN).into(), y.into()]),
        Operation::new("S", vec![]),
    ]
}

/// Scale `(w, h)` down to fit the signature box, keeping aspect ratio
fn fit_signature(w: u32, h: u32) -> (f32, f32) {
    if w == 0 || h == 0 {
        return (SIGNATURE_MAX_WIDTH, SIGNATURE_MAX_HEIGHT);
    }
    let scale = (SIGNATURE_MAX_WIDTH / w as f32)
        .min(SIGNATURE_MAX_HEIGHT / h as f32)
        .min(1.0);
    (w as f32 * scale, h as f32 * scale)
}

fn page_operations(
    data: &InvoiceFormData,
    signature_size: (u32, u32),
    generated_at: DateTime<Local>,
) -> Vec<Operation> {
    let personal = &data.personal_details;
    let invoice = &data.invoice_details;
    let mut ops = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN - 24.0;

    ops.extend(text("F2", 28.0, MARGIN, y, "INVOICE"));
    ops.extend(text(
        "F1",
        11.0,
        PAGE_WIDTH - MARGIN - 180.0,
        y + 8.0,
        &format!("Invoice #: {}", invoice.invoice_number),
    ));
    ops.extend(text(
        "F1",
        11.0,
        PAGE_WIDTH - MARGIN - 180.0,
        y - 8.0,
        &format!("Date: {}", invoice.invoice_date.format("%Y-%m-%d")),
    ));
    y -= 24.0;
    ops.extend(rule(y));

    y -= 32.0;
    ops.extend(text("F2", 12.0, MARGIN, y, "Billed by"));
    y -= 18.0;
    ops.extend(text("F1", 11.0, MARGIN, y, &personal.full_name));
    y -= 15.0;
    ops.extend(text("F1", 11.0, MARGIN, y, &personal.email_address));
    if let Some(phone) = &personal.phone_number {
        y -= 15.0;
        ops.extend(text("F1", 11.0, MARGIN, y, phone));
    }

    y -= 40.0;
    ops.extend(text("F2", 12.0, MARGIN, y, "Description"));
    ops.extend(text("F2", 12.0, PAGE_WIDTH - MARGIN - 120.0, y, "Amount"));
    y -= 8.0;
    ops.extend(rule(y));
    y -= 18.0;
    ops.extend(text(
        "F1",
        11.0,
        MARGIN,
        y,
        &format!("Invoice {}", invoice.invoice_number),
    ));
    ops.extend(text(
        "F1",
        11.0,
        PAGE_WIDTH - MARGIN - 120.0,
        y,
        &format!("${:.2}", invoice.amount),
    ));
    y -= 12.0;
    ops.extend(rule(y));
    y -= 20.0;
    ops.extend(text("F2", 12.0, PAGE_WIDTH - MARGIN - 200.0, y, "Total"));
    ops.extend(text(
        "F2",
        12.0,
        PAGE_WIDTH - MARGIN - 120.0,
        y,
        &format!("${:.2}", invoice.amount),
    ));

    y -= 60.0;
    ops.extend(text("F2", 12.0, MARGIN, y, "Signature"));
    let (w, h) = fit_signature(signature_size.0, signature_size.1);
    y -= 8.0 + h;
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![w.into(), 0.into(), 0.into(), h.into(), MARGIN.into(), y.into()],
    ));
    ops.push(Operation::new("Do", vec!["ImSig".into()]));
    ops.push(Operation::new("Q", vec![]));
    ops.extend(rule(y - 4.0));

    ops.extend(text(
        "F1",
        8.0,
        MARGIN,
        MARGIN,
        &format!("Generated on {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
    ));
    ops
}
