#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use coa_pdf::model::{Document, RowRole, Table};
use coa_pdf::{AssetPaths, FOOTER_FILE, FieldMap, LOGO_FILE};

/// Output directory: tests/output/<case>/
pub fn output_dir(case: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(case);
    fs::create_dir_all(&dir).expect("create output dir");
    dir
}

pub fn write_png(path: &Path, width: u32, height: u32, with_alpha: bool) {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        let a = if with_alpha && (x + y) % 3 == 0 { 128 } else { 255 };
        image::Rgba([(x * 5 % 256) as u8, (y * 7 % 256) as u8, 90, a])
    });
    img.save(path).expect("write png fixture");
}

/// Logo and footer fixtures for one test case, each case in its own folder.
pub fn fixture_assets(case: &str) -> AssetPaths {
    let dir = output_dir(case);
    write_png(&dir.join(LOGO_FILE), 50, 20, false);
    write_png(&dir.join(FOOTER_FILE), 125, 20, true);
    AssetPaths::in_dir(&dir)
}

pub fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs.iter().copied().collect()
}

/// Fill spec, result and method of one parameter.
pub fn with_triple(map: &mut FieldMap, stem: &str, value: &str) {
    map.insert(format!("{stem}_spec"), value);
    map.insert(format!("{stem}_result"), value);
    map.insert(format!("{stem}_method"), value);
}

pub fn identity_table(doc: &Document) -> Option<&Table> {
    doc.tables()
        .find(|t| t.rows.iter().all(|r| r.role == RowRole::Attribute))
}

pub fn spec_table(doc: &Document) -> &Table {
    doc.tables()
        .find(|t| t.rows.first().is_some_and(|r| r.role == RowRole::ColumnHeader))
        .expect("specification table present")
}

pub fn declaration_table(doc: &Document) -> &Table {
    doc.tables()
        .find(|t| t.rows.first().is_some_and(|r| r.role == RowRole::Declaration))
        .expect("declaration table present")
}

pub fn section_headers(table: &Table) -> Vec<&str> {
    table
        .rows_with_role(RowRole::SectionHeader)
        .map(|r| r.cells[0].paragraph.text.as_str())
        .collect()
}

/// Page count as written in the page tree (`/Count n`).
pub fn page_count(pdf: &[u8]) -> Option<usize> {
    let needle = b"/Count ";
    let pos = pdf.windows(needle.len()).position(|w| w == needle)?;
    let digits: String = pdf[pos + needle.len()..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| b as char)
        .collect();
    digits.parse().ok()
}
