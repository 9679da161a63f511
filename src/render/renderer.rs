use std::sync::Arc;

use super::basic::BasicInvoiceTemplate;
use super::context::RenderContext;
use crate::core::{Node, Settings, SzamlaError};
use crate::i18n::{LocaleTables, MissingKeyRecorder, Resolver};
use crate::xml::{ArrayWhitelist, XmlDecoder};

/// A compiled template: turns a document tree into output text.
///
/// Any `Fn(&Node, &RenderContext<'_>) -> Result<String, SzamlaError>` is a
/// template.
pub trait Template {
    fn evaluate(&self, tree: &Node, ctx: &RenderContext<'_>) -> Result<String, SzamlaError>;
}

impl<F> Template for F
where
    F: Fn(&Node, &RenderContext<'_>) -> Result<String, SzamlaError>,
{
    fn evaluate(&self, tree: &Node, ctx: &RenderContext<'_>) -> Result<String, SzamlaError> {
        self(tree, ctx)
    }
}

/// Decodes invoices and renders them through a template.
///
/// One renderer serves any number of conversions in any locale; nothing is
/// cached between calls except the shared locale tables and missing-key
/// recorder.
#[derive(Debug, Clone)]
pub struct Renderer<T> {
    template: T,
    resolver: Resolver,
    decoder: XmlDecoder,
}

impl<T: Template> Renderer<T> {
    pub fn new(template: T, resolver: Resolver) -> Self {
        Self {
            template,
            resolver,
            decoder: XmlDecoder::default(),
        }
    }

    /// Wire a renderer from `settings`: built-in plus configured locale
    /// tables, the configured whitelist and a JSON-file missing-key
    /// recorder.
    pub fn from_settings(template: T, settings: &Settings) -> Result<Self, SzamlaError> {
        let tables = LocaleTables::load(settings)?;
        let whitelist = match &settings.whitelist_path {
            Some(path) => ArrayWhitelist::from_file(path)?,
            None => ArrayWhitelist::osa_3_0(),
        };
        let recorder = MissingKeyRecorder::from_settings(settings);
        let resolver = Resolver::new(Arc::new(tables)).with_recorder(recorder);
        Ok(Self::new(template, resolver).with_decoder(XmlDecoder::new(whitelist)))
    }

    pub fn with_decoder(mut self, decoder: XmlDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn decoder(&self) -> &XmlDecoder {
        &self.decoder
    }

    /// Evaluate the template over `tree` in `locale`.
    ///
    /// The template's output is returned verbatim.
    pub fn render(&self, tree: &Node, locale: &str) -> Result<String, SzamlaError> {
        let ctx = RenderContext::new(self.resolver.bind(locale));
        tracing::debug!(locale = ctx.locale(), "Rendering document");
        self.template.evaluate(tree, &ctx)
    }

    /// Decode `xml` and render it. Malformed XML aborts before the template
    /// runs.
    pub fn convert(&self, xml: &str, locale: &str) -> Result<String, SzamlaError> {
        let tree = self.decoder.decode(xml)?;
        self.render(&tree, locale)
    }

    /// Flush the missing-key ledger, if a recorder is attached.
    pub fn shutdown(&self) {
        if let Some(recorder) = self.resolver.recorder() {
            recorder.shutdown();
        }
    }
}

impl Renderer<BasicInvoiceTemplate> {
    /// Renderer using the built-in invoice layout.
    pub fn basic(resolver: Resolver) -> Self {
        Self::new(BasicInvoiceTemplate, resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LocaleTable;

    fn resolver() -> Resolver {
        let mut tables = LocaleTables::new();
        tables.insert("hu", LocaleTable::from_iter([("invoice", "Számla")]));
        Resolver::new(Arc::new(tables))
    }

    #[test]
    fn closure_templates_see_tree_and_context() {
        let template = |tree: &Node, ctx: &RenderContext<'_>| -> Result<String, SzamlaError> {
            Ok(format!(
                "{}: {}",
                ctx.t("invoice"),
                tree.text_at(&["InvoiceData", "invoiceNumber"]).unwrap_or_default()
            ))
        };
        let renderer = Renderer::new(template, resolver());
        let out = renderer
            .convert(
                "<InvoiceData><invoiceNumber>A-1</invoiceNumber></InvoiceData>",
                "HU",
            )
            .unwrap();
        assert_eq!(out, "Számla: A-1");
    }

    #[test]
    fn parse_error_skips_template() {
        let template = |_: &Node, _: &RenderContext<'_>| -> Result<String, SzamlaError> {
            panic!("template must not run");
        };
        let renderer = Renderer::new(template, resolver());
        assert!(matches!(
            renderer.convert("<InvoiceData>", "hu"),
            Err(SzamlaError::Parse(_))
        ));
    }

    #[test]
    fn template_errors_propagate() {
        let template = |_: &Node, _: &RenderContext<'_>| -> Result<String, SzamlaError> {
            Err(SzamlaError::template("boom"))
        };
        let renderer = Renderer::new(template, resolver());
        let err = renderer.render(&Node::empty(), "hu").unwrap_err();
        assert_eq!(err.to_string(), "template error: boom");
    }
}
