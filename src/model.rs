use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
}

/// Page geometry in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSetup {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageSetup {
    pub const A4: PageSetup = PageSetup {
        page_width: 595.2756,
        page_height: 841.8898,
        margin_top: 10.0,
        margin_bottom: 10.0,
        margin_left: 72.0,
        margin_right: 72.0,
    };

    pub fn frame_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub fn frame_top(&self) -> f32 {
        self.page_height - self.margin_top
    }

    /// Height available between the top and bottom margins.
    pub fn frame_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssetKind {
    Logo,
    Footer,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Logo => f.write_str("logo"),
            AssetKind::Footer => f.write_str("footer banner"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

#[derive(Clone)]
pub struct EmbeddedImage {
    pub kind: AssetKind,
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Colour channels of the source, alpha excluded: 1 for gray, 3 for RGB.
    pub color_components: u8,
    pub display_width: f32,  // points
    pub display_height: f32, // points
}

impl fmt::Debug for EmbeddedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedImage")
            .field("kind", &self.kind)
            .field("format", &self.format)
            .field("pixels", &(self.pixel_width, self.pixel_height))
            .field("color_components", &self.color_components)
            .field("display", &(self.display_width, self.display_height))
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
    pub alignment: Alignment,
    pub space_after: f32,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 10.0,
            bold: false,
            alignment: Alignment::Left,
            space_after: 0.0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }

    pub fn size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn space_after(mut self, space_after: f32) -> Self {
        self.space_after = space_after;
        self
    }

    /// True when there is nothing visible to draw.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * 1.2
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CellMargins {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl CellMargins {
    pub fn zero() -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            bottom: 0.0,
            right: 0.0,
        }
    }
}

impl Default for CellMargins {
    fn default() -> Self {
        Self {
            top: 3.0,
            left: 6.0,
            bottom: 3.0,
            right: 6.0,
        }
    }
}

/// A rectangular merge region, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSpan {
    pub first_row: usize,
    pub last_row: usize,
    pub first_col: usize,
    pub last_col: usize,
}

impl CellSpan {
    pub fn full_row(row: usize, ncols: usize) -> Self {
        Self {
            first_row: row,
            last_row: row,
            first_col: 0,
            last_col: ncols.saturating_sub(1),
        }
    }

    pub fn column(col: usize, first_row: usize, last_row: usize) -> Self {
        Self {
            first_row,
            last_row,
            first_col: col,
            last_col: col,
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    pub fn is_anchor(&self, row: usize, col: usize) -> bool {
        row == self.first_row && col == self.first_col
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowRole {
    Attribute,
    ColumnHeader,
    SectionHeader,
    Parameter,
    Remark,
    Declaration,
}

#[derive(Clone, Debug)]
pub struct TableCell {
    pub paragraph: Paragraph,
}

impl TableCell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            paragraph: Paragraph::new(text),
        }
    }

    pub fn empty() -> Self {
        Self::text("")
    }
}

impl From<Paragraph> for TableCell {
    fn from(paragraph: Paragraph) -> Self {
        Self { paragraph }
    }
}

#[derive(Clone, Debug)]
pub struct TableRow {
    pub role: RowRole,
    pub cells: Vec<TableCell>,
    pub shading: Option<[u8; 3]>,
}

impl TableRow {
    pub fn new(role: RowRole, cells: Vec<TableCell>) -> Self {
        Self {
            role,
            cells,
            shading: None,
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.paragraph.text.as_str()).collect()
    }
}

#[derive(Clone, Debug)]
pub struct Table {
    pub col_widths: Vec<f32>, // points
    pub rows: Vec<TableRow>,
    pub spans: Vec<CellSpan>,
    /// Grid line width; `None` draws no borders.
    pub grid: Option<f32>,
    pub cell_margins: CellMargins,
}

impl Table {
    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    pub fn span_at(&self, row: usize, col: usize) -> Option<&CellSpan> {
        self.spans.iter().find(|s| s.contains(row, col))
    }

    pub fn rows_with_role(&self, role: RowRole) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(move |r| r.role == role)
    }
}

#[derive(Clone, Debug)]
pub enum Block {
    Image(EmbeddedImage),
    Paragraph(Paragraph),
    Table(Table),
    Spacer(f32),
}

#[derive(Clone, Debug)]
pub struct Document {
    pub page: PageSetup,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &EmbeddedImage> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Image(img) => Some(img),
            _ => None,
        })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }
}
