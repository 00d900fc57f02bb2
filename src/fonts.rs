use pdf_writer::{Name, Pdf, Ref};

/// Standard Type1 faces used by the certificate. Nothing is embedded; every
/// PDF reader ships these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Face {
    Helvetica,
    HelveticaBold,
}

impl Face {
    pub(crate) const ALL: [Face; 2] = [Face::Helvetica, Face::HelveticaBold];

    pub(crate) fn for_weight(bold: bool) -> Self {
        if bold { Face::HelveticaBold } else { Face::Helvetica }
    }

    fn base_font(self) -> &'static [u8] {
        match self {
            Face::Helvetica => b"Helvetica",
            Face::HelveticaBold => b"Helvetica-Bold",
        }
    }

    fn resource_name(self) -> &'static str {
        match self {
            Face::Helvetica => "F1",
            Face::HelveticaBold => "F2",
        }
    }
}

pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    /// Advance widths at 1000 units/em for WinAnsi bytes 32..=255.
    pub(crate) widths_1000: Vec<f32>,
    pub(crate) ascender_ratio: f32,
}

impl FontEntry {
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub(crate) fn word_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }
}

/// The two faces, indexed by `Face`.
pub(crate) struct FontSet {
    entries: Vec<FontEntry>,
}

impl FontSet {
    pub(crate) fn get(&self, face: Face) -> &FontEntry {
        &self.entries[face as usize]
    }

    pub(crate) fn entries(&self) -> &[FontEntry] {
        &self.entries
    }
}

pub(crate) fn register_fonts(pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> FontSet {
    let entries = Face::ALL
        .iter()
        .map(|&face| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(face.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            log::debug!(
                "register_font: {} as /{}",
                String::from_utf8_lossy(face.base_font()),
                face.resource_name()
            );
            FontEntry {
                pdf_name: face.resource_name().to_string(),
                font_ref,
                widths_1000: helvetica_widths(face),
                ascender_ratio: 0.718,
            }
        })
        .collect();
    FontSet { entries }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters outside the code page are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .collect()
}

// Helvetica AFM widths for ASCII 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // : - @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [ - `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // { - ~
];

const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // sp - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // : - @
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [ - `
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // { - ~
];

/// Widths at 1000 units/em for WinAnsi bytes 32..=255. Outside ASCII only the
/// punctuation the certificate text can contain is exact.
fn helvetica_widths(face: Face) -> Vec<f32> {
    let ascii = match face {
        Face::Helvetica => &HELVETICA_ASCII,
        Face::HelveticaBold => &HELVETICA_BOLD_ASCII,
    };
    let bold = face == Face::HelveticaBold;
    (32u8..=255u8)
        .map(|b| match b {
            32..=126 => ascii[(b - 32) as usize] as f32,
            0x91 | 0x92 => if bold { 278.0 } else { 222.0 },
            0x93 | 0x94 => if bold { 500.0 } else { 333.0 },
            0x95 => 350.0,
            0x96 => 556.0,
            0x97 => 1000.0,
            0xA0 => 278.0,
            _ => 556.0,
        })
        .collect()
}
