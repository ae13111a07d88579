//! Draw command types
//!
//! Coordinates are in points, measured from the top-left corner of the
//! page. Text `y` is the baseline; image `y` is the top edge.

use serde::{Deserialize, Serialize};

/// A rectangle in page coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const DARK_GREEN: Color = Color::rgb(0, 100, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Horizontal anchoring of a text run relative to its `x`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    /// `x` is the start of the run
    #[default]
    Left,
    /// `x` is the midpoint of the run
    Center,
    /// `x` is the end of the run
    Right,
}

/// Font selection for a text run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Logical font family, resolved at serialization time
    pub font_family: String,
    /// Font size in points
    pub font_size: f64,
    pub bold: bool,
}

impl TextStyle {
    pub fn new(font_family: impl Into<String>, font_size: f64, bold: bool) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            bold,
        }
    }
}

/// A positioned run of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCommand {
    pub content: String,
    pub style: TextStyle,
    pub color: Color,
    pub x: f64,
    /// Baseline
    pub y: f64,
    pub alignment: Alignment,
}

/// A placed image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCommand {
    /// Logical name of the image in the document's resource set
    pub resource: String,
    pub bounds: Rect,
}

/// A straight stroked line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCommand {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: Color,
    pub width: f64,
}

/// A primitive drawing operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    Text(TextCommand),
    Image(ImageCommand),
    Rule(RuleCommand),
}

/// One output page: its size and the commands drawn on it, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub index: u32,
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl Page {
    pub fn new(index: u32, width: f64, height: f64) -> Self {
        Self {
            index,
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = DrawCommand>) {
        self.commands.extend(commands);
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextCommand> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageCommand> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Whether any text run on the page reads exactly `content`
    pub fn has_text(&self, content: &str) -> bool {
        self.texts().any(|t| t.content == content)
    }
}
