mod layout;
mod table;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};

use crate::error::Error;
use crate::fonts::register_fonts;
use crate::model::{Block, Document, EmbeddedImage, ImageFormat, PageSetup};

use layout::{build_paragraph_lines, lines_height, render_paragraph_lines};
use table::render_table;

/// Vertical cursor over a growing list of page content streams.
pub(super) struct Pager {
    page: PageSetup,
    content: Content,
    finished: Vec<Content>,
    slot_top: f32,
}

impl Pager {
    fn new(page: PageSetup) -> Self {
        Self {
            page,
            content: Content::new(),
            finished: Vec::new(),
            slot_top: page.frame_top(),
        }
    }

    fn at_page_top(&self) -> bool {
        (self.slot_top - self.page.frame_top()).abs() < 1.0
    }

    /// Whether `height` more points fit; anything fits on an empty page.
    fn fits(&self, height: f32) -> bool {
        self.at_page_top() || self.slot_top - height >= self.page.margin_bottom
    }

    fn new_page(&mut self) {
        self.finished
            .push(std::mem::replace(&mut self.content, Content::new()));
        self.slot_top = self.page.frame_top();
        log::debug!("page break -> page {}", self.finished.len() + 1);
    }

    fn finish(mut self) -> Vec<Content> {
        self.finished.push(self.content);
        self.finished
    }
}

fn embed_image(
    img: &EmbeddedImage,
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<Ref, Error> {
    let xobj_ref = alloc();
    match img.format {
        ImageFormat::Jpeg => {
            let mut xobj = pdf.image_xobject(xobj_ref, &img.data);
            xobj.filter(Filter::DctDecode);
            xobj.width(img.pixel_width as i32);
            xobj.height(img.pixel_height as i32);
            if img.color_components == 1 {
                xobj.color_space().device_gray();
            } else {
                xobj.color_space().device_rgb();
            }
            xobj.bits_per_component(8);
        }
        ImageFormat::Png => {
            let decoded = image::load_from_memory_with_format(&img.data, image::ImageFormat::Png)
                .map_err(|e| Error::InvalidAsset(format!("{} PNG: {e}", img.kind)))?;
            let rgba: image::RgbaImage = decoded.to_rgba8();
            let (w, h) = (rgba.width(), rgba.height());
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb_data: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

            let smask_ref = if has_alpha {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w as i32);
                mask.height(h as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
    Ok(xobj_ref)
}

fn render_image(pager: &mut Pager, img: &EmbeddedImage, pdf_name: &str) {
    if !pager.fits(img.display_height) {
        pager.new_page();
    }
    let x = (pager.page.page_width - img.display_width) / 2.0;
    let y_bottom = pager.slot_top - img.display_height;
    pager.content.save_state();
    pager.content.transform([
        img.display_width,
        0.0,
        0.0,
        img.display_height,
        x,
        y_bottom,
    ]);
    pager.content.x_object(Name(pdf_name.as_bytes()));
    pager.content.restore_state();
    pager.slot_top = y_bottom;
}

pub fn render(doc: &Document) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Phase 1: resources
    let fonts = register_fonts(&mut pdf, &mut alloc);

    // (block index, xobject name, ref); each image is embedded once
    let mut image_xobjects: Vec<(usize, String, Ref)> = Vec::new();
    for (bi, block) in doc.blocks.iter().enumerate() {
        if let Block::Image(img) = block {
            let xobj_ref = embed_image(img, &mut pdf, &mut alloc)?;
            let pdf_name = format!("Im{}", image_xobjects.len() + 1);
            image_xobjects.push((bi, pdf_name, xobj_ref));
        }
    }

    let t_resources = t0.elapsed();

    // Phase 2: lay out blocks top-down
    let mut pager = Pager::new(doc.page);
    let frame_x = doc.page.margin_left;
    let frame_w = doc.page.frame_width();

    for (bi, block) in doc.blocks.iter().enumerate() {
        match block {
            Block::Image(img) => {
                let name = image_xobjects
                    .iter()
                    .find(|(idx, _, _)| *idx == bi)
                    .map(|(_, name, _)| name.as_str())
                    .ok_or_else(|| Error::Pdf(format!("image block {bi} was not embedded")))?;
                render_image(&mut pager, img, name);
            }
            Block::Paragraph(para) => {
                if para.is_empty() {
                    continue;
                }
                let lines = build_paragraph_lines(para, &fonts, frame_w);
                let needed = lines_height(para, &lines);
                if needed > doc.page.frame_height() {
                    return Err(Error::Pdf(format!(
                        "paragraph '{}' is {needed:.0}pt tall, page frame holds {:.0}pt",
                        para.text.chars().take(40).collect::<String>(),
                        doc.page.frame_height()
                    )));
                }
                if !pager.fits(needed) {
                    pager.new_page();
                }
                render_paragraph_lines(
                    &mut pager.content,
                    para,
                    &lines,
                    &fonts,
                    frame_x,
                    frame_w,
                    pager.slot_top,
                );
                pager.slot_top -= needed + para.space_after;
            }
            Block::Table(table) => render_table(table, &fonts, &mut pager)?,
            Block::Spacer(h) => {
                if pager.fits(*h) {
                    pager.slot_top -= h;
                }
            }
        }
    }

    let all_contents = pager.finish();
    let t_layout = t0.elapsed();

    // Phase 3: allocate page and content IDs now that page count is known
    let n = all_contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in all_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, doc.page.page_width, doc.page.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for entry in fonts.entries() {
                font_dict.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (_, name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    log::info!(
        "Render phases: resources={:.1}ms, layout={:.1}ms, assembly={:.1}ms ({} page(s))",
        t_resources.as_secs_f64() * 1000.0,
        (t_layout - t_resources).as_secs_f64() * 1000.0,
        (t0.elapsed() - t_layout).as_secs_f64() * 1000.0,
        n,
    );

    Ok(pdf.finish())
}
