//! Draw-command builder
//!
//! Turns layout decisions into draw commands. Every text field passes
//! through the invoice formatting rules here, so callers only deal in
//! model values and positions.

use crate::{Alignment, Color, DrawCommand, ImageCommand, Rect, RuleCommand, TextCommand, TextStyle};
use invoice_model::{format_money, format_quantity, LineItem, RowTotals};

/// Number of columns in the item table
pub const TABLE_COLUMNS: usize = 6;

/// Typography used by the builder
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderConfig {
    pub font_family: String,
    /// Document header (store name)
    pub header_size: f64,
    /// Section headers (table captions, grand total)
    pub section_size: f64,
    pub body_size: f64,
    pub text_color: Color,
    pub caption_color: Color,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            font_family: "NotoSans".to_string(),
            header_size: 20.0,
            section_size: 12.0,
            body_size: 10.0,
            text_color: Color::BLACK,
            caption_color: Color::DARK_GREEN,
        }
    }
}

/// Builds draw commands for the parts of an invoice
#[derive(Debug, Clone, Default)]
pub struct DrawCommandBuilder {
    config: BuilderConfig,
}

impl DrawCommandBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn header_style(&self) -> TextStyle {
        TextStyle::new(self.config.font_family.clone(), self.config.header_size, true)
    }

    pub fn section_style(&self) -> TextStyle {
        TextStyle::new(self.config.font_family.clone(), self.config.section_size, true)
    }

    pub fn body_style(&self) -> TextStyle {
        TextStyle::new(self.config.font_family.clone(), self.config.body_size, false)
    }

    /// A text run with explicit style, color and alignment
    pub fn text(
        &self,
        content: impl Into<String>,
        style: TextStyle,
        color: Color,
        x: f64,
        y: f64,
        alignment: Alignment,
    ) -> DrawCommand {
        DrawCommand::Text(TextCommand {
            content: content.into(),
            style,
            color,
            x,
            y,
            alignment,
        })
    }

    /// Store name in the document header font
    pub fn store_name(&self, name: &str, x: f64, y: f64) -> DrawCommand {
        self.text(name, self.header_style(), self.config.text_color, x, y, Alignment::Left)
    }

    /// Body-font text, left aligned
    pub fn body_text(&self, content: impl Into<String>, x: f64, y: f64) -> DrawCommand {
        self.text(content, self.body_style(), self.config.text_color, x, y, Alignment::Left)
    }

    /// `label value` in the body font, e.g. `GSTIN: 29ABCDE1234F1Z5`
    pub fn labelled(&self, label: &str, value: &str, x: f64, y: f64) -> DrawCommand {
        self.body_text(format!("{} {}", label, value), x, y)
    }

    /// The six table captions at their column offsets
    pub fn table_header(
        &self,
        captions: &[String; TABLE_COLUMNS],
        columns: &[f64; TABLE_COLUMNS],
        y: f64,
    ) -> Vec<DrawCommand> {
        captions
            .iter()
            .zip(columns)
            .map(|(caption, x)| {
                self.text(
                    caption.as_str(),
                    self.section_style(),
                    self.config.caption_color,
                    *x,
                    y,
                    Alignment::Left,
                )
            })
            .collect()
    }

    /// One item row: description, quantity, unit price, discount amount,
    /// tax amount and line total
    pub fn row(
        &self,
        item: &LineItem,
        totals: &RowTotals,
        columns: &[f64; TABLE_COLUMNS],
        y: f64,
    ) -> Vec<DrawCommand> {
        row_cells(item, totals)
            .into_iter()
            .zip(columns)
            .map(|(cell, x)| self.body_text(cell, *x, y))
            .collect()
    }

    /// `Grand Total: ₹x.xx` in the section font
    pub fn grand_total(&self, label: &str, total: f64, x: f64, y: f64) -> DrawCommand {
        self.text(
            format!("{} {}", label, format_money(total)),
            self.section_style(),
            self.config.text_color,
            x,
            y,
            Alignment::Left,
        )
    }

    pub fn image(&self, resource: &str, bounds: Rect) -> DrawCommand {
        DrawCommand::Image(ImageCommand {
            resource: resource.to_string(),
            bounds,
        })
    }

    /// A thin horizontal rule
    pub fn rule(&self, x1: f64, x2: f64, y: f64) -> DrawCommand {
        DrawCommand::Rule(RuleCommand {
            x1,
            y1: y,
            x2,
            y2: y,
            color: Color::GRAY,
            width: 0.5,
        })
    }
}

/// Formatted cell texts for one item row
pub fn row_cells(item: &LineItem, totals: &RowTotals) -> [String; TABLE_COLUMNS] {
    [
        item.description.clone(),
        format_quantity(item.quantity),
        format_money(item.unit_price),
        format_money(totals.discount_amount),
        format_money(totals.tax_amount),
        format_money(totals.line_total),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [f64; TABLE_COLUMNS] = [20.0, 200.0, 250.0, 340.0, 410.0, 490.0];

    fn widget() -> LineItem {
        LineItem::new("Widget", 2, 100.0)
            .with_discount_rate(10.0)
            .with_tax_rate(18.0)
    }

    fn as_text(command: &DrawCommand) -> &TextCommand {
        match command {
            DrawCommand::Text(text) => text,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_row_cells() {
        let item = widget();
        let cells = row_cells(&item, &RowTotals::of(&item));
        assert_eq!(
            cells,
            ["Widget", "2", "₹100.00", "₹20.00", "₹32.40", "₹212.40"].map(String::from)
        );
    }

    #[test]
    fn test_row_positions() {
        let builder = DrawCommandBuilder::default();
        let item = widget();
        let commands = builder.row(&item, &RowTotals::of(&item), &COLUMNS, 150.0);

        assert_eq!(commands.len(), TABLE_COLUMNS);
        for (command, x) in commands.iter().zip(COLUMNS) {
            let text = as_text(command);
            assert_eq!(text.x, x);
            assert_eq!(text.y, 150.0);
            assert_eq!(text.style.font_size, 10.0);
            assert!(!text.style.bold);
        }
    }

    #[test]
    fn test_table_header_style() {
        let builder = DrawCommandBuilder::default();
        let captions = ["Description", "Qty", "Unit Price", "Discount", "GST", "Total"]
            .map(String::from);
        let commands = builder.table_header(&captions, &COLUMNS, 100.0);

        assert_eq!(commands.len(), TABLE_COLUMNS);
        let first = as_text(&commands[0]);
        assert_eq!(first.content, "Description");
        assert_eq!(first.color, Color::DARK_GREEN);
        assert_eq!(first.style.font_size, 12.0);
        assert!(first.style.bold);
        assert_eq!(as_text(&commands[5]).x, 490.0);
    }

    #[test]
    fn test_grand_total() {
        let builder = DrawCommandBuilder::default();
        let command = builder.grand_total("Grand Total:", 212.4, 20.0, 300.0);
        let text = as_text(&command);
        assert_eq!(text.content, "Grand Total: ₹212.40");
        assert!(text.style.bold);
    }

    #[test]
    fn test_store_name_uses_header_font() {
        let builder = DrawCommandBuilder::default();
        let text = as_text(&builder.store_name("Acme", 20.0, 45.0)).clone();
        assert_eq!(text.style.font_size, 20.0);
        assert!(text.style.bold);
    }

    #[test]
    fn test_labelled() {
        let builder = DrawCommandBuilder::default();
        let command = builder.labelled("GSTIN:", "29ABCDE1234F1Z5", 300.0, 90.0);
        assert_eq!(as_text(&command).content, "GSTIN: 29ABCDE1234F1Z5");
    }

    #[test]
    fn test_rule_is_horizontal() {
        let builder = DrawCommandBuilder::default();
        match builder.rule(20.0, 575.0, 120.0) {
            DrawCommand::Rule(rule) => {
                assert_eq!((rule.y1, rule.y2), (120.0, 120.0));
                assert_eq!(rule.x2 - rule.x1, 555.0);
            }
            other => panic!("expected rule, got {:?}", other),
        }
    }
}
