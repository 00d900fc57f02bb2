use pdf_writer::Content;

use crate::error::Error;
use crate::fonts::FontSet;
use crate::model::{CellSpan, Table};

use super::Pager;
use super::layout::{TextLine, build_paragraph_lines, lines_height, render_paragraph_lines};

/// Grid region a cell belongs to: its span, or the cell itself.
fn region_of(table: &Table, row: usize, col: usize) -> CellSpan {
    table.span_at(row, col).copied().unwrap_or(CellSpan {
        first_row: row,
        last_row: row,
        first_col: col,
        last_col: col,
    })
}

fn col_x(table: &Table, table_left: f32, col: usize) -> f32 {
    table_left + table.col_widths[..col.min(table.col_widths.len())].iter().sum::<f32>()
}

fn region_width(table: &Table, region: &CellSpan) -> f32 {
    let end = (region.last_col + 1).min(table.col_widths.len());
    table.col_widths[region.first_col.min(end)..end].iter().sum()
}

struct CellLayout {
    col: usize,
    width: f32,
    lines: Vec<TextLine>,
}

struct RowLayout {
    height: f32,
    cells: Vec<CellLayout>, // anchor cells only
}

fn compute_row_layouts(table: &Table, fonts: &FontSet) -> Vec<RowLayout> {
    let cm = &table.cell_margins;
    table
        .rows
        .iter()
        .enumerate()
        .map(|(ri, row)| {
            let mut max_h: f32 = 0.0;
            let mut cells = Vec::new();
            for (ci, cell) in row.cells.iter().enumerate() {
                let region = region_of(table, ri, ci);
                if !region.is_anchor(ri, ci) {
                    continue;
                }
                let width = region_width(table, &region);
                let text_w = (width - cm.left - cm.right).max(0.0);
                let lines = build_paragraph_lines(&cell.paragraph, fonts, text_w);
                // Cells merged downwards spread their text over several rows
                // and do not push this row's height.
                if region.last_row == ri {
                    let content_h = lines_height(&cell.paragraph, &lines)
                        .max(cell.paragraph.line_height());
                    max_h = max_h.max(cm.top + content_h + cm.bottom);
                }
                cells.push(CellLayout {
                    col: ci,
                    width,
                    lines,
                });
            }
            RowLayout {
                height: max_h,
                cells,
            }
        })
        .collect()
}

fn stroke(content: &mut Content, width: f32, x1: f32, y1: f32, x2: f32, y2: f32) {
    content.save_state();
    content.set_line_width(width);
    content.move_to(x1, y1);
    content.line_to(x2, y2);
    content.stroke();
    content.restore_state();
}

/// Lay the table out row by row. Rows never split; a row that does not fit
/// the space left on the page starts a new page, and a row taller than a
/// whole page is an error.
pub(super) fn render_table(table: &Table, fonts: &FontSet, pager: &mut Pager) -> Result<(), Error> {
    let layouts = compute_row_layouts(table, fonts);
    let cm = &table.cell_margins;
    let table_left = (pager.page.page_width - table.width()) / 2.0;
    let frame_h = pager.page.frame_height();

    for (ri, (row, layout)) in table.rows.iter().zip(layouts.iter()).enumerate() {
        let row_h = layout.height;
        if row_h > frame_h {
            let name = row.cells.first().map(|c| c.paragraph.text.as_str()).unwrap_or("");
            return Err(Error::Pdf(format!(
                "table row {ri} ('{name}') is {row_h:.0}pt tall, page frame holds {frame_h:.0}pt"
            )));
        }
        if !pager.fits(row_h) {
            pager.new_page();
        }
        log::debug!(
            "TABLE row={} role={:?} row_h={:.2} slot_top={:.2}",
            ri,
            row.role,
            row_h,
            pager.slot_top
        );

        let row_top = pager.slot_top;
        let row_bottom = row_top - row_h;
        let first_on_page = pager.at_page_top();
        let next_breaks = layouts
            .get(ri + 1)
            .is_some_and(|next| row_bottom - next.height < pager.page.margin_bottom);
        let content = &mut pager.content;

        if let Some([r, g, b]) = row.shading {
            content.save_state();
            content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
            content.rect(table_left, row_bottom, table.width(), row_h);
            content.fill_nonzero();
            content.restore_state();
        }

        for cell in &layout.cells {
            let x = col_x(table, table_left, cell.col);
            render_paragraph_lines(
                content,
                &row.cells[cell.col].paragraph,
                &cell.lines,
                fonts,
                x + cm.left,
                (cell.width - cm.left - cm.right).max(0.0),
                row_top - cm.top,
            );
        }

        if let Some(grid) = table.grid {
            for ci in 0..table.col_widths.len() {
                let region = region_of(table, ri, ci);
                let x1 = col_x(table, table_left, ci);
                let x2 = x1 + table.col_widths[ci];
                if region.first_row == ri || first_on_page {
                    stroke(content, grid, x1, row_top, x2, row_top);
                }
                if region.last_row == ri || next_breaks {
                    stroke(content, grid, x1, row_bottom, x2, row_bottom);
                }
                if region.first_col == ci {
                    stroke(content, grid, x1, row_top, x1, row_bottom);
                }
                if region.last_col == ci {
                    stroke(content, grid, x2, row_top, x2, row_bottom);
                }
            }
        }

        pager.slot_top = row_bottom;
    }
    Ok(())
}
