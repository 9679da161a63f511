use std::borrow::Cow;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::format::LocaleFormat;
use super::helpers::{self, Scope};
use crate::core::{Address, Node};
use crate::i18n::Translator;

/// Everything a template can call while evaluating one document: the
/// translator bound to the conversion's locale, the helper library and the
/// locale formatters.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    translator: Translator<'a>,
    format: LocaleFormat,
}

impl<'a> RenderContext<'a> {
    pub fn new(translator: Translator<'a>) -> Self {
        let format = LocaleFormat::for_locale(translator.locale());
        Self { translator, format }
    }

    /// Lowercase locale of this conversion.
    pub fn locale(&self) -> &str {
        self.translator.locale()
    }

    pub fn translator(&self) -> &Translator<'a> {
        &self.translator
    }

    pub fn format(&self) -> &LocaleFormat {
        &self.format
    }

    /// Translated label for `key`, or `key` itself.
    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }

    pub fn format_number(&self, value: Option<&str>) -> String {
        self.format.number(value)
    }

    pub fn format_currency(&self, value: Option<&str>, currency_code: &str) -> String {
        self.format.currency(value, currency_code)
    }

    pub fn format_date(&self, value: Option<&str>) -> String {
        self.format.date(value)
    }

    /// Postal address of a decoded `...Address` element.
    pub fn format_address(&self, address: Option<&Node>) -> String {
        helpers::format_address(&Address::from_node(address), &self.translator)
    }

    pub fn let_scope<R>(
        &self,
        parent: &Scope<'_>,
        value: &Value,
        hash: &Map<String, Value>,
        block_param_names: &[&str],
        body: impl FnOnce(&Value, &Scope<'_>) -> R,
    ) -> R {
        helpers::let_scope(parent, value, hash, block_param_names, body)
    }

    pub fn concat<'v>(&self, values: impl IntoIterator<Item = &'v Value>) -> String {
        helpers::concat(values)
    }

    pub fn join(&self, sequence: Option<&Value>, separator: &str) -> String {
        helpers::join(sequence, separator)
    }

    pub fn multiply(&self, a: &Value, b: &Value) -> Option<Decimal> {
        helpers::multiply(a, b)
    }

    pub fn eq(&self, a: &Value, b: &Value) -> bool {
        helpers::eq(a, b)
    }

    pub fn escape_html<'t>(&self, text: &'t str) -> Cow<'t, str> {
        helpers::escape_html(text)
    }
}
