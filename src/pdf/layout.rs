use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontEntry, FontSet, to_winansi_bytes};
use crate::model::{Alignment, Paragraph};

pub(super) struct WordChunk {
    pub(super) text: String,
    pub(super) x_offset: f32, // x relative to line start
    pub(super) width: f32,
}

pub(super) struct TextLine {
    pub(super) chunks: Vec<WordChunk>,
    pub(super) total_width: f32,
}

impl TextLine {
    fn text(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn finish_line(chunks: &mut Vec<WordChunk>) -> TextLine {
    let total_width = chunks.last().map(|c| c.x_offset + c.width).unwrap_or(0.0);
    TextLine {
        chunks: std::mem::take(chunks),
        total_width,
    }
}

pub(super) fn font_for<'a>(para: &Paragraph, fonts: &'a FontSet) -> &'a FontEntry {
    fonts.get(crate::fonts::Face::for_weight(para.bold))
}

/// Greedy word wrap. A word wider than `max_width` gets a line of its own and
/// overflows rather than being split.
pub(super) fn build_paragraph_lines(
    para: &Paragraph,
    fonts: &FontSet,
    max_width: f32,
) -> Vec<TextLine> {
    let entry = font_for(para, fonts);
    let space_w = entry.space_width(para.font_size);
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_chunks: Vec<WordChunk> = Vec::new();
    let mut current_x: f32 = 0.0;

    for word in para.text.split_whitespace() {
        let ww = entry.word_width(word, para.font_size);
        let proposed_x = if current_chunks.is_empty() {
            0.0
        } else {
            current_x + space_w
        };
        if !current_chunks.is_empty() && proposed_x + ww > max_width {
            lines.push(finish_line(&mut current_chunks));
            current_x = 0.0;
        } else {
            current_x = proposed_x;
        }
        current_chunks.push(WordChunk {
            text: word.to_string(),
            x_offset: current_x,
            width: ww,
        });
        current_x += ww;
    }

    if !current_chunks.is_empty() {
        lines.push(finish_line(&mut current_chunks));
    }
    lines
}

pub(super) fn lines_height(para: &Paragraph, lines: &[TextLine]) -> f32 {
    lines.len() as f32 * para.line_height()
}

/// Draw wrapped lines; `top` is the upper edge of the first line box.
pub(super) fn render_paragraph_lines(
    content: &mut Content,
    para: &Paragraph,
    lines: &[TextLine],
    fonts: &FontSet,
    x: f32,
    width: f32,
    top: f32,
) {
    if lines.is_empty() {
        return;
    }
    let entry = font_for(para, fonts);
    let line_h = para.line_height();
    let first_baseline = top - para.font_size * entry.ascender_ratio;

    content.begin_text();
    content.set_font(Name(entry.pdf_name.as_bytes()), para.font_size);
    let mut prev = (0.0f32, 0.0f32);
    for (i, line) in lines.iter().enumerate() {
        let line_x = match para.alignment {
            Alignment::Left => x,
            Alignment::Center => x + (width - line.total_width) / 2.0,
        };
        let baseline = first_baseline - i as f32 * line_h;
        // Td is relative to the start of the previous line.
        content.next_line(line_x - prev.0, baseline - prev.1);
        prev = (line_x, baseline);
        content.show(Str(&to_winansi_bytes(&line.text())));
    }
    content.end_text();
}
