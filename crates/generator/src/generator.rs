//! The invoice PDF generator
//!
//! One call runs the whole pipeline in order: acquire the output, compute
//! totals, resolve branding images, lay out pages, register fonts, serialize
//! and publish. Any fatal error ends the call with a single
//! [`GenerationError`]; resource problems only add warnings to the report.

use crate::{GenerationError, GeneratorConfig, Result};
use invoice_model::{compute, InvoiceDocument};
use layout_engine::{CancelToken, InvoiceLayout, LOGO_RESOURCE, SIGNATURE_RESOURCE};
use render_model::{DrawCommandBuilder, Page};
use resources::registry;
use resources::{FontRegistry, ResourceSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store::pdf::export_pdf;
use store::{Destination, OutputSink};

/// Largest difference between the supplied and computed grand totals that
/// is still considered consistent (half a paisa)
pub const TOTAL_TOLERANCE: f64 = 0.005;

/// Outcome of a successful generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub page_count: usize,
    pub bytes_written: u64,
    /// Path or `<stream>`
    pub destination: String,
    /// Non-fatal problems: font fallbacks, omitted images, total mismatch
    pub warnings: Vec<String>,
}

/// Pages plus everything the serializer needs for them
struct LaidOut {
    pages: Vec<Page>,
    resources: ResourceSet,
    warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct InvoicePdfGenerator {
    config: GeneratorConfig,
    registry: Arc<FontRegistry>,
}

impl InvoicePdfGenerator {
    /// Create a generator. With `config.fonts_dir` set, fonts come from
    /// that directory (loaded once per process); otherwise the process-wide
    /// registry is used.
    pub fn new(config: GeneratorConfig) -> Self {
        let registry = match &config.fonts_dir {
            Some(dir) => registry::init_global(dir),
            None => registry::global(),
        };
        Self { config, registry }
    }

    /// Use a specific registry instead of the process-wide one
    pub fn with_registry(mut self, registry: Arc<FontRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate `document` into `destination`
    pub fn generate(
        &self,
        document: &InvoiceDocument,
        destination: Destination,
    ) -> Result<GenerationReport> {
        self.generate_with_cancel(document, destination, &CancelToken::new())
    }

    /// Generate with a cancellation token checked between rows and pages.
    /// A cancelled or failed build publishes nothing.
    pub fn generate_with_cancel(
        &self,
        document: &InvoiceDocument,
        destination: Destination,
        cancel: &CancelToken,
    ) -> Result<GenerationReport> {
        let target = destination.describe();
        tracing::info!(
            "Generating invoice {} ({} items) to {}",
            document.invoice_number,
            document.items.len(),
            target
        );

        let result = self.run(document, destination, cancel);
        match &result {
            Ok(report) => tracing::info!(
                "Invoice {} written: {} pages, {} bytes",
                document.invoice_number,
                report.page_count,
                report.bytes_written
            ),
            Err(e) => log_failure(document, e),
        }
        result
    }

    fn run(
        &self,
        document: &InvoiceDocument,
        destination: Destination,
        cancel: &CancelToken,
    ) -> Result<GenerationReport> {
        let mut sink = OutputSink::acquire(destination).map_err(GenerationError::SinkAcquisition)?;
        let laid_out = self.lay_out(document, cancel)?;

        let options = self.config.export_options(document);
        export_pdf(&laid_out.pages, &laid_out.resources, &options, &mut sink, cancel)?;

        let destination = sink.describe();
        let bytes_written = sink.publish().map_err(GenerationError::Publish)?;

        Ok(GenerationReport {
            page_count: laid_out.pages.len(),
            bytes_written,
            destination,
            warnings: laid_out.warnings,
        })
    }

    /// Generate `document` into memory
    pub fn generate_to_bytes(&self, document: &InvoiceDocument) -> Result<Vec<u8>> {
        let result = self.render_bytes(document);
        if let Err(e) = &result {
            log_failure(document, e);
        }
        result
    }

    fn render_bytes(&self, document: &InvoiceDocument) -> Result<Vec<u8>> {
        let cancel = CancelToken::new();
        let laid_out = self.lay_out(document, &cancel)?;

        let mut buffer = Vec::new();
        let options = self.config.export_options(document);
        export_pdf(&laid_out.pages, &laid_out.resources, &options, &mut buffer, &cancel)?;
        Ok(buffer)
    }

    /// Run [`InvoicePdfGenerator::generate`] on a blocking worker
    pub async fn generate_in_background(
        &self,
        document: InvoiceDocument,
        destination: Destination,
    ) -> Result<GenerationReport> {
        self.generate_in_background_with_cancel(document, destination, CancelToken::new())
            .await
    }

    /// Background generation that can be cancelled through a clone of `cancel`
    pub async fn generate_in_background_with_cancel(
        &self,
        document: InvoiceDocument,
        destination: Destination,
        cancel: CancelToken,
    ) -> Result<GenerationReport> {
        let generator = self.clone();
        tokio::task::spawn_blocking(move || {
            generator.generate_with_cancel(&document, destination, &cancel)
        })
        .await
        .map_err(|e| GenerationError::Worker(e.to_string()))?
    }

    fn lay_out(&self, document: &InvoiceDocument, cancel: &CancelToken) -> Result<LaidOut> {
        document.validate()?;

        let totals = compute(&document.items);
        let mut warnings = Vec::new();
        if (totals.grand_total - document.grand_total).abs() > TOTAL_TOLERANCE {
            tracing::warn!(
                "Invoice {} grand total {:.2} differs from computed {:.2}",
                document.invoice_number,
                document.grand_total,
                totals.grand_total
            );
            warnings.push(format!(
                "grand total {:.2} differs from computed {:.2}",
                document.grand_total, totals.grand_total
            ));
        }

        let mut resources = ResourceSet::new(self.registry.clone());
        if let Some(logo) = document.logo_bytes() {
            resources.load_image(LOGO_RESOURCE, logo);
        }
        if let Some(signature) = document.signature_bytes() {
            resources.load_image(SIGNATURE_RESOURCE, signature);
        }

        let pages = InvoiceLayout::new(
            document,
            &resources,
            self.config.page_metrics.clone(),
            self.config.labels.clone(),
        )
        .with_builder(DrawCommandBuilder::new(self.config.builder_config()))
        .with_cancel(cancel.clone())
        .run(&totals)?;

        // Resolve every style once so fallbacks are reported before encoding.
        for page in &pages {
            for text in page.texts() {
                resources.font(&text.style.font_family, text.style.bold);
            }
        }
        warnings.extend(resources.take_warnings());

        Ok(LaidOut {
            pages,
            resources,
            warnings,
        })
    }
}

fn log_failure(document: &InvoiceDocument, error: &GenerationError) {
    match error {
        GenerationError::Cancelled => {
            tracing::info!("Invoice {} generation cancelled", document.invoice_number)
        }
        e => tracing::error!("Invoice {} failed: {}", document.invoice_number, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoice_model::{LineItem, Party};
    use layout_engine::PageMetrics;
    use std::io::{self, Write};
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn generator() -> InvoicePdfGenerator {
        InvoicePdfGenerator::new(GeneratorConfig::default().with_timestamp(false))
            .with_registry(Arc::new(FontRegistry::empty()))
    }

    fn document() -> InvoiceDocument {
        InvoiceDocument::new(
            Party::new("Acme Traders", "29ABCDE1234F1Z5"),
            Party::new("Bharat Stores", "27PQRSX6789K1Z2"),
            "INV-001",
            InvoiceDocument::date_from_ymd(2024, 3, 5).unwrap(),
        )
        .with_item(
            LineItem::new("Widget", 2, 100.0)
                .with_discount_rate(10.0)
                .with_tax_rate(18.0),
        )
        .with_computed_total()
    }

    #[test]
    fn test_lay_out_reports_font_fallback_once() {
        let laid_out = generator().lay_out(&document(), &CancelToken::new()).unwrap();
        assert_eq!(laid_out.pages.len(), 1);
        // Regular and bold NotoSans both fall back.
        assert_eq!(laid_out.warnings.len(), 2);
        assert!(laid_out.warnings.iter().all(|w| w.contains("NotoSans")));
    }

    #[test]
    fn test_total_mismatch_is_a_warning() {
        let doc = document().with_grand_total(999.0);
        let laid_out = generator().lay_out(&doc, &CancelToken::new()).unwrap();
        assert!(laid_out
            .warnings
            .iter()
            .any(|w| w.contains("999.00") && w.contains("212.40")));
        assert!(laid_out.pages[0].has_text("Grand Total: ₹999.00"));
    }

    #[test]
    fn test_invalid_item_rejected() {
        let doc = document().with_item(LineItem::new("Broken", 1, f64::NAN));
        assert!(matches!(
            generator().lay_out(&doc, &CancelToken::new()),
            Err(GenerationError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_cancelled_layout() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            generator().lay_out(&document(), &cancel),
            Err(GenerationError::Cancelled)
        ));
    }

    #[test]
    fn test_serialization_failure_in_memory_is_logged() {
        let metrics = PageMetrics {
            page_width: 0.0,
            ..PageMetrics::default()
        };
        let generator = InvoicePdfGenerator::new(
            GeneratorConfig::default()
                .with_timestamp(false)
                .with_page_metrics(metrics),
        )
        .with_registry(Arc::new(FontRegistry::empty()));

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || {
            generator.generate_to_bytes(&document())
        });

        assert!(matches!(result, Err(GenerationError::Serialization(_))));
        let text = logs.text();
        assert!(text.contains("ERROR"));
        assert!(text.contains("Invoice INV-001 failed"));
    }

    #[test]
    fn test_bytes_are_deterministic_without_timestamp() {
        let generator = generator();
        let first = generator.generate_to_bytes(&document()).unwrap();
        let second = generator.generate_to_bytes(&document()).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(b"%PDF-"));
    }
}
