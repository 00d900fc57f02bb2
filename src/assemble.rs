//! Field map to document model: conditional rows, grouped sections and the
//! fixed boilerplate around them.

use crate::assets::{AssetPaths, load_image};
use crate::error::Error;
use crate::fields::{FieldMap, IDENTITY, ParameterDef, SECTIONS, SectionDef};
use crate::model::{
    AssetKind, Block, CellMargins, CellSpan, Document, PageSetup, Paragraph, RowRole, Table,
    TableCell, TableRow,
};

pub const TITLE: &str = "CERTIFICATE OF ANALYSIS";
pub const SPEC_HEADERS: [&str; 4] = ["Parameter", "Specification", "Result", "Method"];
pub const DISCLAIMER: &str = "Since the product is derived from natural origin, there is likely to be minor color variation because of the geographical and seasonal variations of the raw material";
pub const COMPLIANCE: &str = "REMARKS: COMPLIES WITH IN HOUSE SPECIFICATIONS";
pub const DECLARATION_HEADING: &str = "Declaration";

const GRID_WIDTH: f32 = 0.5;
const HEADER_SHADING: [u8; 3] = [211, 211, 211];
const IDENTITY_COLUMNS: [f32; 2] = [140.0, 360.0];
const SPEC_TABLE_WIDTH: f32 = 500.0;
const SPEC_COLUMN_SHARES: [f32; 4] = [0.24, 0.28, 0.24, 0.24];
const DECLARATION_COLUMNS: [f32; 5] = [80.0, 150.0, 75.0, 100.0, 95.0];
const LOGO_SIZE: (f32, f32) = (100.0, 40.0);
const FOOTER_SIZE: (f32, f32) = (500.0, 80.0);

/// (label, value) pairs printed in the declaration block, two per row.
const DECLARATIONS: [[(&str, &str); 2]; 3] = [
    [("GMO Status:", "Free from GMO"), ("Allergen statement:", "Free from allergen")],
    [("Irradiation status:", "Non \u{2013} Irradiated"), ("Storage condition:", "At room temperature")],
    [("Prepared by", "Executive \u{2013} QC"), ("Approved by", "Head-QC/QA")],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeRow<'a> {
    pub label: &'static str,
    pub value: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterRow<'a> {
    pub label: &'static str,
    pub spec: &'a str,
    pub result: &'a str,
    pub method: &'a str,
}

enum Triple<'a> {
    Complete(ParameterRow<'a>),
    /// Number of the three values that were filled in (1 or 2).
    Partial(usize),
    Empty,
}

fn read_triple<'a>(fields: &'a FieldMap, param: &ParameterDef) -> Triple<'a> {
    let spec = fields.get(&param.spec_key());
    let result = fields.get(&param.result_key());
    let method = fields.get(&param.method_key());
    let filled = [spec, result, method].iter().filter(|v| !v.is_empty()).count();
    match filled {
        3 => Triple::Complete(ParameterRow {
            label: param.label,
            spec,
            result,
            method,
        }),
        0 => Triple::Empty,
        n => Triple::Partial(n),
    }
}

/// Identity rows with a value, in declared order.
pub fn attribute_rows(fields: &FieldMap) -> Vec<AttributeRow<'_>> {
    IDENTITY
        .iter()
        .map(|attr| AttributeRow {
            label: attr.label,
            value: fields.get(attr.key),
        })
        .filter(|row| !row.value.is_empty())
        .collect()
}

/// Parameter rows of one section whose spec, result and method are all filled.
pub fn section_rows<'a>(fields: &'a FieldMap, section: &SectionDef) -> Vec<ParameterRow<'a>> {
    section
        .parameters
        .iter()
        .filter_map(|param| match read_triple(fields, param) {
            Triple::Complete(row) => Some(row),
            Triple::Partial(filled) => {
                log::warn!(
                    "{} / {}: only {filled} of specification, result, method filled in; row left out",
                    section.name,
                    param.label
                );
                None
            }
            Triple::Empty => None,
        })
        .collect()
}

fn cell_row(role: RowRole, texts: &[&str]) -> TableRow {
    TableRow::new(role, texts.iter().map(|t| TableCell::text(*t)).collect())
}

fn centered_cell(text: &str) -> TableCell {
    TableCell::from(Paragraph::new(text).centered())
}

/// Builds the specification table. `offset` is the index the next appended
/// row will get; every span is recorded against it before it advances.
struct SpecTableBuilder {
    col_widths: Vec<f32>,
    rows: Vec<TableRow>,
    spans: Vec<CellSpan>,
    offset: usize,
}

impl SpecTableBuilder {
    fn new() -> Self {
        let col_widths: Vec<f32> = SPEC_COLUMN_SHARES
            .iter()
            .map(|share| SPEC_TABLE_WIDTH * share)
            .collect();
        let mut header = cell_row(RowRole::ColumnHeader, &SPEC_HEADERS);
        header.shading = Some(HEADER_SHADING);
        Self {
            col_widths,
            rows: vec![header],
            spans: Vec::new(),
            offset: 1,
        }
    }

    fn ncols(&self) -> usize {
        self.col_widths.len()
    }

    fn push_full_width(&mut self, role: RowRole, paragraph: Paragraph) {
        let mut cells = vec![TableCell::from(paragraph)];
        cells.resize_with(self.ncols(), TableCell::empty);
        self.spans.push(CellSpan::full_row(self.offset, self.ncols()));
        self.rows.push(TableRow::new(role, cells));
        self.offset += 1;
    }

    fn push_section(&mut self, name: &str, params: &[ParameterRow<'_>]) {
        if params.is_empty() {
            return;
        }
        self.push_full_width(RowRole::SectionHeader, Paragraph::new(name).bold());
        for p in params {
            let cells = [p.label, p.spec, p.result, p.method]
                .into_iter()
                .map(centered_cell)
                .collect();
            self.rows.push(TableRow::new(RowRole::Parameter, cells));
        }
        self.offset += params.len();
        debug_assert_eq!(self.offset, self.rows.len());
    }

    fn finish(self) -> Table {
        Table {
            col_widths: self.col_widths,
            rows: self.rows,
            spans: self.spans,
            grid: Some(GRID_WIDTH),
            cell_margins: CellMargins::default(),
        }
    }
}

fn identity_table(fields: &FieldMap) -> Option<Table> {
    let rows = attribute_rows(fields);
    if rows.is_empty() {
        return None;
    }
    Some(Table {
        col_widths: IDENTITY_COLUMNS.to_vec(),
        rows: rows
            .iter()
            .map(|r| cell_row(RowRole::Attribute, &[r.label, r.value]))
            .collect(),
        spans: Vec::new(),
        grid: Some(GRID_WIDTH),
        cell_margins: CellMargins::default(),
    })
}

fn specification_table(fields: &FieldMap) -> Table {
    let mut builder = SpecTableBuilder::new();
    for section in &SECTIONS {
        let params = section_rows(fields, section);
        log::debug!("section {}: {} row(s)", section.name, params.len());
        builder.push_section(section.name, &params);
    }
    builder.push_full_width(RowRole::Remark, Paragraph::new(DISCLAIMER));
    builder.push_full_width(RowRole::Remark, Paragraph::new(COMPLIANCE).bold().centered());
    builder.finish()
}

fn declaration_table() -> Table {
    let rows = DECLARATIONS
        .iter()
        .map(|&[(l1, v1), (l2, v2)]| {
            let cells = vec![
                TableCell::text(l1),
                centered_cell(v1),
                TableCell::empty(),
                TableCell::text(l2),
                centered_cell(v2),
            ];
            TableRow::new(RowRole::Declaration, cells)
        })
        .collect::<Vec<_>>();
    let last_row = rows.len() - 1;
    Table {
        col_widths: DECLARATION_COLUMNS.to_vec(),
        rows,
        spans: vec![CellSpan::column(2, 0, last_row)],
        grid: None,
        cell_margins: CellMargins::zero(),
    }
}

fn title_line(text: &str) -> Paragraph {
    Paragraph::new(text).size(13.0).bold().centered().space_after(1.0)
}

/// Build the certificate for one submission. Both images must be present;
/// otherwise nothing is built.
pub fn assemble(fields: &FieldMap, assets: &AssetPaths) -> Result<Document, Error> {
    assets.ensure_present()?;
    let logo = load_image(assets, AssetKind::Logo, LOGO_SIZE.0, LOGO_SIZE.1)?;
    let footer = load_image(assets, AssetKind::Footer, FOOTER_SIZE.0, FOOTER_SIZE.1)?;

    let mut blocks = vec![
        Block::Image(logo),
        Block::Spacer(3.0),
        Block::Paragraph(title_line(TITLE)),
        Block::Paragraph(title_line(fields.get("product_name"))),
        Block::Spacer(3.0),
    ];

    if let Some(table) = identity_table(fields) {
        blocks.push(Block::Table(table));
    }

    blocks.push(Block::Table(specification_table(fields)));
    blocks.push(Block::Spacer(2.0));
    blocks.push(Block::Paragraph(
        Paragraph::new(DECLARATION_HEADING).bold().centered(),
    ));
    blocks.push(Block::Table(declaration_table()));
    blocks.push(Block::Spacer(3.0));
    blocks.push(Block::Image(footer));

    Ok(Document {
        page: PageSetup::A4,
        blocks,
    })
}
