mod common;

use std::io::Cursor;

use coa_pdf::fields::IDENTITY;
use coa_pdf::{AssetPaths, Error, FOOTER_FILE, FieldMap, LOGO_FILE, assemble, generate_pdf, render};
use rayon::prelude::*;

#[test]
fn renders_a_pdf() {
    let _ = env_logger::try_init();
    let assets = common::fixture_assets("renders_a_pdf");
    let fields = common::fields(&[("product_name", "Acme Extract")]);

    let bytes = generate_pdf(&fields, &assets).expect("generate");

    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes.ends_with(b"%%EOF\n") || bytes.ends_with(b"%%EOF"));
    assert_eq!(common::page_count(&bytes), Some(1));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Helvetica-Bold"));
    assert!(text.contains("/WinAnsiEncoding"));
    assert!(text.contains("/MediaBox"));
    // Footer fixture carries alpha.
    assert!(text.contains("/SMask"));
}

#[test]
fn identical_input_gives_identical_bytes() {
    let assets = common::fixture_assets("idempotent");
    let fields = FieldMap::with_form_defaults();

    let first = generate_pdf(&fields, &assets).expect("first");
    let second = generate_pdf(&fields, &assets).expect("second");
    assert_eq!(first, second);

    let doc = assemble(&fields, &assets).expect("assemble");
    assert_eq!(render(&doc).expect("render"), first);
}

#[test]
fn concurrent_generation_is_deterministic() {
    let assets = common::fixture_assets("concurrent");
    let fields = FieldMap::with_form_defaults();
    let reference = generate_pdf(&fields, &assets).expect("reference");

    let outputs: Vec<Vec<u8>> = (0..8)
        .into_par_iter()
        .map(|_| generate_pdf(&fields, &assets).expect("parallel generate"))
        .collect();
    assert!(outputs.iter().all(|o| *o == reference));
}

#[test]
fn long_values_flow_onto_more_pages() {
    let assets = common::fixture_assets("pagination");
    let long = "lorem ipsum dolor sit amet consectetur adipiscing ".repeat(20);
    let fields: FieldMap = IDENTITY.iter().map(|a| (a.key, long.as_str())).collect();

    let bytes = generate_pdf(&fields, &assets).expect("generate");
    let pages = common::page_count(&bytes).expect("page count");
    assert!(pages >= 2, "expected overflow, got {pages} page(s)");
}

#[test]
fn form_defaults_span_several_pages() {
    let assets = common::fixture_assets("defaults_pages");
    let bytes = generate_pdf(&FieldMap::with_form_defaults(), &assets).expect("generate");
    assert!(common::page_count(&bytes).expect("page count") >= 2);
}

#[test]
fn non_latin_text_is_dropped_not_fatal() {
    let assets = common::fixture_assets("non_latin");
    let fields = common::fields(&[
        ("product_name", "Ashwagandha \u{0905}\u{0936}\u{094d}\u{0935}"),
        ("origin", "Côte d\u{2019}Ivoire"),
    ]);
    let bytes = generate_pdf(&fields, &assets).expect("generate");
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn jpeg_assets_are_embedded_as_dct() {
    let dir = common::output_dir("jpeg_assets");
    let rgb = image::RgbImage::from_fn(40, 16, |x, y| image::Rgb([x as u8 * 6, y as u8 * 15, 200]));
    let mut jpeg = Vec::new();
    image::DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    // The image is sniffed from its bytes, not its extension.
    std::fs::write(dir.join(LOGO_FILE), &jpeg).expect("write logo");
    common::write_png(&dir.join(FOOTER_FILE), 20, 4, false);

    let bytes = generate_pdf(&FieldMap::new(), &AssetPaths::in_dir(&dir)).expect("generate");
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/DCTDecode"));
    assert!(!text.contains("/DeviceGray"));
    assert!(!text.contains("/SMask"));
}

#[test]
fn write_pdf_creates_file() {
    let dir = common::output_dir("write_pdf");
    let assets = common::fixture_assets("write_pdf");
    let output = dir.join("COA.pdf");
    let _ = std::fs::remove_file(&output);

    coa_pdf::write_pdf(&common::fields(&[("batch_no", "B-42")]), &assets, &output)
        .expect("write");
    let bytes = std::fs::read(&output).expect("read back");
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn missing_asset_writes_nothing() {
    let dir = common::output_dir("missing_asset_no_output");
    common::write_png(&dir.join(FOOTER_FILE), 10, 10, false);
    let _ = std::fs::remove_file(dir.join(LOGO_FILE));
    let output = dir.join("COA.pdf");
    let _ = std::fs::remove_file(&output);

    let result = coa_pdf::write_pdf(
        &FieldMap::with_form_defaults(),
        &AssetPaths::in_dir(&dir),
        &output,
    );
    assert!(matches!(result, Err(Error::MissingAsset { .. })));
    assert!(!output.exists());
}

#[test]
fn row_taller_than_a_page_is_an_error() {
    let dir = common::output_dir("oversized_row");
    let assets = common::fixture_assets("oversized_row");
    let output = dir.join("COA.pdf");
    let _ = std::fs::remove_file(&output);
    let huge = "word ".repeat(4000);
    let fields = common::fields(&[("product_name", "Acme Extract"), ("origin", huge.as_str())]);

    match generate_pdf(&fields, &assets) {
        Err(Error::Pdf(msg)) => assert!(msg.contains("Country of Origin"), "{msg}"),
        other => panic!("expected Pdf error, got {:?}", other.map(|b| b.len())),
    }
    assert!(coa_pdf::write_pdf(&fields, &assets, &output).is_err());
    assert!(!output.exists());
}

#[test]
fn grayscale_jpeg_keeps_its_colour_space() {
    let dir = common::output_dir("gray_jpeg");
    let gray = image::GrayImage::from_fn(32, 12, |x, y| image::Luma([(x * 7 + y * 3) as u8]));
    let mut jpeg = Vec::new();
    image::DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    std::fs::write(dir.join(LOGO_FILE), &jpeg).expect("write logo");
    common::write_png(&dir.join(FOOTER_FILE), 20, 4, false);
    let assets = AssetPaths::in_dir(&dir);

    let doc = assemble(&FieldMap::new(), &assets).expect("assemble");
    let logo = doc.images().next().expect("logo");
    assert_eq!(logo.format, coa_pdf::model::ImageFormat::Jpeg);
    assert_eq!(logo.color_components, 1);
    assert_eq!((logo.pixel_width, logo.pixel_height), (32, 12));

    let bytes = render(&doc).expect("render");
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/DCTDecode"));
    assert!(text.contains("/DeviceGray"));
}
