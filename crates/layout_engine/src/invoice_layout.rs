//! Invoice layout state machine
//!
//! A single vertical cursor walks down the current page. Rows are placed
//! greedily: before each row the cursor is tested against the break
//! threshold and, if it is past it, a new page is opened with the store
//! header and table captions repeated. Party and invoice metadata appear on
//! the first page only; the signature on the last page only.

use crate::{CancelToken, InvoiceLabels, LayoutError, PageMetrics, Result};
use invoice_model::{format_date, InvoiceDocument, InvoiceTotals, LineItem, RowTotals};
use render_model::{DrawCommandBuilder, Page, Rect};
use resources::ResourceSet;

/// Resource name of the store logo
pub const LOGO_RESOURCE: &str = "logo";
/// Resource name of the signature or hologram
pub const SIGNATURE_RESOURCE: &str = "signature";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    NoPage,
    PageOpen,
    Finished,
}

impl LayoutState {
    fn describe(&self) -> &'static str {
        match self {
            LayoutState::NoPage => "no page is open",
            LayoutState::PageOpen => "a page is open",
            LayoutState::Finished => "layout is finished",
        }
    }
}

/// Lays out one invoice into pages of draw commands
pub struct InvoiceLayout<'a> {
    document: &'a InvoiceDocument,
    resources: &'a ResourceSet,
    metrics: PageMetrics,
    labels: InvoiceLabels,
    builder: DrawCommandBuilder,
    cancel: CancelToken,
    state: LayoutState,
    pages: Vec<Page>,
    current: Option<Page>,
    cursor: f64,
    meta_drawn: bool,
}

impl<'a> InvoiceLayout<'a> {
    pub fn new(
        document: &'a InvoiceDocument,
        resources: &'a ResourceSet,
        metrics: PageMetrics,
        labels: InvoiceLabels,
    ) -> Self {
        Self {
            document,
            resources,
            metrics,
            labels,
            builder: DrawCommandBuilder::default(),
            cancel: CancelToken::new(),
            state: LayoutState::NoPage,
            pages: Vec::new(),
            current: None,
            cursor: 0.0,
            meta_drawn: false,
        }
    }

    pub fn with_builder(mut self, builder: DrawCommandBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Current cursor position (baseline of the next line)
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Pages opened so far, including the current one
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    /// Run the whole layout sequence for the document.
    pub fn run(mut self, totals: &InvoiceTotals) -> Result<Vec<Page>> {
        let document = self.document;
        self.start_document()?;
        self.draw_party_and_invoice_meta()?;
        self.draw_table_header()?;
        for (item, row) in document.items.iter().zip(&totals.rows) {
            self.emit_row(item, row)?;
        }
        self.finish(document.grand_total)
    }

    /// Open the first page and draw the store header.
    pub fn start_document(&mut self) -> Result<()> {
        self.expect_state(LayoutState::NoPage, "start the document")?;
        self.open_page();
        Ok(())
    }

    /// Draw seller, buyer, invoice number and date. First page only.
    pub fn draw_party_and_invoice_meta(&mut self) -> Result<()> {
        self.expect_state(LayoutState::PageOpen, "draw party details")?;
        if self.meta_drawn {
            return Err(LayoutError::InvalidState {
                operation: "draw party details",
                state: "they are already drawn",
            });
        }

        let doc = self.document;
        let left = self.metrics.margin;
        let right = self.metrics.value_column;
        let lines = [
            (
                (&self.labels.seller, doc.seller.name.clone()),
                (&self.labels.tax_id, doc.seller.tax_id.clone()),
                self.metrics.party_line_height,
            ),
            (
                (&self.labels.buyer, doc.buyer.name.clone()),
                (&self.labels.tax_id, doc.buyer.tax_id.clone()),
                self.metrics.party_block_gap,
            ),
            (
                (&self.labels.invoice_number, doc.invoice_number.clone()),
                (&self.labels.date, format_date(doc.invoice_date)),
                self.metrics.meta_advance,
            ),
        ];

        let mut commands = Vec::with_capacity(lines.len() * 2);
        let mut y = self.cursor;
        for ((left_label, left_value), (right_label, right_value), advance) in lines {
            commands.push(self.builder.labelled(left_label, &left_value, left, y));
            commands.push(self.builder.labelled(right_label, &right_value, right, y));
            y += advance;
        }

        self.page_mut()?.extend(commands);
        self.cursor = y;
        self.meta_drawn = true;
        Ok(())
    }

    /// Draw the six column captions at the cursor.
    pub fn draw_table_header(&mut self) -> Result<()> {
        self.expect_state(LayoutState::PageOpen, "draw the table header")?;
        let commands =
            self.builder
                .table_header(&self.labels.columns, &self.metrics.columns, self.cursor);
        self.page_mut()?.extend(commands);
        self.cursor += self.metrics.header_row_height;
        Ok(())
    }

    /// Place one item row, breaking to a new page first if the cursor is
    /// past the threshold.
    pub fn emit_row(&mut self, item: &LineItem, totals: &RowTotals) -> Result<()> {
        self.expect_state(LayoutState::PageOpen, "emit a row")?;
        self.cancel.check()?;

        if self.metrics.needs_break(self.cursor) {
            tracing::debug!(
                "Page break before row {:?} at y={}",
                item.description,
                self.cursor
            );
            self.close_page();
            self.open_page();
            self.draw_table_header()?;
        }

        let commands = self
            .builder
            .row(item, totals, &self.metrics.columns, self.cursor);
        self.page_mut()?.extend(commands);
        self.cursor += self.metrics.row_height;
        Ok(())
    }

    /// Draw the grand total and signature and return the finished pages.
    pub fn finish(&mut self, grand_total: f64) -> Result<Vec<Page>> {
        self.expect_state(LayoutState::PageOpen, "finish the layout")?;

        if self.metrics.needs_break(self.cursor) {
            tracing::debug!("Grand total moved to a new page");
            self.close_page();
            self.open_page();
        }

        let total = self.builder.grand_total(
            &self.labels.grand_total,
            grand_total,
            self.metrics.margin,
            self.cursor + self.metrics.total_gap,
        );
        self.page_mut()?.push(total);

        if let Some(signature) = self.resources.image(SIGNATURE_RESOURCE) {
            let width = self.metrics.signature_width;
            let height = signature.scaled_height(width);
            let bounds = Rect::new(
                self.metrics.page_width - self.metrics.margin - width,
                self.metrics.page_height - self.metrics.margin - height,
                width,
                height,
            );
            let command = self.builder.image(SIGNATURE_RESOURCE, bounds);
            self.page_mut()?.push(command);
        }

        self.close_page();
        self.state = LayoutState::Finished;
        Ok(std::mem::take(&mut self.pages))
    }

    fn expect_state(&self, expected: LayoutState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(LayoutError::InvalidState {
                operation,
                state: self.state.describe(),
            })
        }
    }

    fn page_mut(&mut self) -> Result<&mut Page> {
        let state = self.state.describe();
        self.current.as_mut().ok_or(LayoutError::InvalidState {
            operation: "draw",
            state,
        })
    }

    fn close_page(&mut self) {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
    }

    /// Open a page and draw the store header on it
    fn open_page(&mut self) {
        let m = &self.metrics;
        let mut page = Page::new(self.pages.len() as u32, m.page_width, m.page_height);
        let mut y = m.margin + m.header_top_offset;

        let name = self.document.store_name();
        if let Some(name) = name {
            page.push(self.builder.store_name(name, m.margin, y));
            y += m.store_name_advance;
        }
        for line in &self.document.store_address {
            page.push(self.builder.body_text(line.as_str(), m.margin, y));
            y += m.address_line_height;
        }
        if name.is_some() || !self.document.store_address.is_empty() {
            y += m.address_gap;
        }

        if let Some(logo) = self.resources.image(LOGO_RESOURCE) {
            let width = m.logo_width;
            let bounds = Rect::new(
                m.page_width - m.margin - width,
                m.margin,
                width,
                logo.scaled_height(width),
            );
            page.push(self.builder.image(LOGO_RESOURCE, bounds));
        }

        y += m.header_gap;
        self.cursor = y;
        self.current = Some(page);
        self.state = LayoutState::PageOpen;
    }
}

/// Lay out `document` with default captions and typography.
pub fn layout_invoice(
    document: &InvoiceDocument,
    totals: &InvoiceTotals,
    resources: &ResourceSet,
    metrics: &PageMetrics,
    cancel: &CancelToken,
) -> Result<Vec<Page>> {
    InvoiceLayout::new(document, resources, metrics.clone(), InvoiceLabels::default())
        .with_cancel(cancel.clone())
        .run(totals)
}
