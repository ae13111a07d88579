//! Draw commands → content stream operators
//!
//! Layout coordinates are top-down: text `y` is the baseline from the top
//! edge and image bounds are measured from the top edge. PDF space is
//! bottom-up, so every y is flipped against the page height here.

use super::content::ContentStream;
use super::fonts::{EncodedText, FontTable};
use super::images::ImageTable;
use super::objects::{ObjectId, PdfDictionary, PdfObject};
use render_model::{Alignment, DrawCommand, ImageCommand, Page, RuleCommand, TextCommand};
use resources::ResourceSet;
use std::collections::{BTreeMap, BTreeSet};

/// Font and image resources referenced by one page
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageResources {
    pub fonts: BTreeSet<String>,
    pub images: BTreeSet<String>,
}

impl PageResources {
    /// Page `/Resources` dictionary pointing at the shared objects
    pub fn to_dictionary(
        &self,
        font_ids: &BTreeMap<String, ObjectId>,
        image_ids: &BTreeMap<String, ObjectId>,
    ) -> PdfDictionary {
        let mut dict = PdfDictionary::new().with(
            "ProcSet",
            PdfObject::Array(vec![
                PdfObject::name("PDF"),
                PdfObject::name("Text"),
                PdfObject::name("ImageC"),
            ]),
        );

        let fonts = subset(&self.fonts, font_ids);
        if !fonts.is_empty() {
            dict.insert("Font", fonts.into());
        }
        let images = subset(&self.images, image_ids);
        if !images.is_empty() {
            dict.insert("XObject", images.into());
        }
        dict
    }
}

fn subset(names: &BTreeSet<String>, ids: &BTreeMap<String, ObjectId>) -> PdfDictionary {
    let mut dict = PdfDictionary::new();
    for name in names {
        if let Some(id) = ids.get(name) {
            dict.insert(name.clone(), PdfObject::reference(*id));
        }
    }
    dict
}

/// Renders pages against one document's font and image tables
pub struct PdfRenderer<'a> {
    resources: &'a ResourceSet,
    fonts: &'a mut FontTable,
    images: &'a mut ImageTable,
}

impl<'a> PdfRenderer<'a> {
    pub fn new(resources: &'a ResourceSet, fonts: &'a mut FontTable, images: &'a mut ImageTable) -> Self {
        Self {
            resources,
            fonts,
            images,
        }
    }

    pub fn render_page(&mut self, page: &Page) -> (ContentStream, PageResources) {
        let mut content = ContentStream::new();
        let mut used = PageResources::default();

        for command in &page.commands {
            match command {
                DrawCommand::Text(text) => self.render_text(&mut content, &mut used, text, page.height),
                DrawCommand::Image(image) => {
                    self.render_image(&mut content, &mut used, image, page.height)
                }
                DrawCommand::Rule(rule) => render_rule(&mut content, rule, page.height),
            }
        }

        (content, used)
    }

    fn render_text(
        &mut self,
        content: &mut ContentStream,
        used: &mut PageResources,
        text: &TextCommand,
        page_height: f64,
    ) {
        if text.content.is_empty() {
            return;
        }

        let font = self
            .resources
            .lookup_font(&text.style.font_family, text.style.bold);
        let size = text.style.font_size;
        let x = match text.alignment {
            Alignment::Left => text.x,
            Alignment::Center => text.x - font.text_width(&text.content, size) / 2.0,
            Alignment::Right => text.x - font.text_width(&text.content, size),
        };

        let (resource, encoded) = self.fonts.encode(&font, &text.content);
        content
            .set_fill_rgb(text.color.r, text.color.g, text.color.b)
            .begin_text()
            .set_font(&resource, size)
            .move_text(x, page_height - text.y);
        match encoded {
            EncodedText::WinAnsi(codes) => content.show_text(&codes),
            EncodedText::Glyphs(glyphs) => content.show_glyphs(&glyphs),
        };
        content.end_text();
        used.fonts.insert(resource);
    }

    fn render_image(
        &mut self,
        content: &mut ContentStream,
        used: &mut PageResources,
        image: &ImageCommand,
        page_height: f64,
    ) {
        let Some(decoded) = self.resources.image(&image.resource) else {
            tracing::warn!("Image {} was never resolved, skipping", image.resource);
            return;
        };

        let resource = self.images.register(&image.resource, decoded);
        let bounds = image.bounds;
        content
            .save_state()
            .transform(
                bounds.width,
                0.0,
                0.0,
                bounds.height,
                bounds.x,
                page_height - bounds.y - bounds.height,
            )
            .draw_xobject(&resource)
            .restore_state();
        used.images.insert(resource);
    }
}

fn render_rule(content: &mut ContentStream, rule: &RuleCommand, page_height: f64) {
    content
        .save_state()
        .set_stroke_rgb(rule.color.r, rule.color.g, rule.color.b)
        .set_line_width(rule.width)
        .move_to(rule.x1, page_height - rule.y1)
        .line_to(rule.x2, page_height - rule.y2)
        .stroke()
        .restore_state();
}
