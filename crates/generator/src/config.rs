//! Generator configuration
//!
//! Loaded from a JSON file with camelCase keys. Every field has a default,
//! so a partial file only overrides what it names.

use crate::{GenerationError, Result};
use chrono::Utc;
use invoice_model::InvoiceDocument;
use layout_engine::{InvoiceLabels, PageMetrics};
use render_model::BuilderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use store::pdf::PdfExportOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Directory holding the bundled font assets
    pub fonts_dir: Option<PathBuf>,
    /// Logical family for every text run
    pub font_family: String,
    /// Flate-compress streams
    pub compress: bool,
    /// Defaults to `Invoice <number>`
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    /// Stamp `/CreationDate` with the current time
    pub timestamp: bool,
    pub page_metrics: PageMetrics,
    pub labels: InvoiceLabels,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fonts_dir: None,
            font_family: BuilderConfig::default().font_family,
            compress: true,
            title: None,
            author: None,
            subject: None,
            creator: None,
            timestamp: true,
            page_metrics: PageMetrics::default(),
            labels: InvoiceLabels::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file gives the defaults. A file that cannot be parsed is
    /// logged and also gives the defaults; only a read failure on an
    /// existing file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No generator config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GenerationError::Config(format!("{}: {}", path.display(), e)))?;
        match serde_json::from_str::<GeneratorConfig>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Failed to parse generator config, using defaults: {}", e);
                Ok(Self::default())
            }
        }
    }

    pub fn with_fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = Some(dir.into());
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_page_metrics(mut self, metrics: PageMetrics) -> Self {
        self.page_metrics = metrics;
        self
    }

    pub fn with_labels(mut self, labels: InvoiceLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Typography for the draw-command builder
    pub fn builder_config(&self) -> BuilderConfig {
        BuilderConfig {
            font_family: self.font_family.clone(),
            ..BuilderConfig::default()
        }
    }

    /// Serializer options for one document
    pub fn export_options(&self, document: &InvoiceDocument) -> PdfExportOptions {
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!("Invoice {}", document.invoice_number));
        let mut options = PdfExportOptions::new()
            .with_title(title)
            .with_compression(self.compress);
        options.author = self.author.clone();
        options.subject = self.subject.clone();
        options.creator = self.creator.clone();
        if self.timestamp {
            options = options.with_creation_date(Utc::now());
        }
        options
    }
}
