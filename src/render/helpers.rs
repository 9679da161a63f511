//! Helper functions available to templates.
//!
//! Values use the JSON data model ([`serde_json::Value`]); decoded tree nodes
//! convert with [`Node::to_json`](crate::core::Node::to_json).

use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::core::Address;
use crate::i18n::Translator;

/// Variable bindings of one template evaluation level.
///
/// Lookups fall through to the enclosing scope, so inner bindings shadow
/// outer ones without copying them.
#[derive(Debug, Clone, Default)]
pub struct Scope<'p> {
    parent: Option<&'p Scope<'p>>,
    bindings: Map<String, Value>,
    block_params: Vec<Value>,
}

impl<'p> Scope<'p> {
    /// Top-level scope without bindings.
    pub fn root() -> Self {
        Self::default()
    }

    /// Empty scope nested in `self`.
    pub fn child(&'p self) -> Self {
        Self {
            parent: Some(self),
            bindings: Map::new(),
            block_params: Vec::new(),
        }
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Find a binding here or in any enclosing scope.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings
            .get(name)
            .or_else(|| self.parent.and_then(|parent| parent.lookup(name)))
    }

    /// Positional block parameters of this level.
    pub fn block_params(&self) -> &[Value] {
        &self.block_params
    }

    pub fn block_param(&self, index: usize) -> Option<&Value> {
        self.block_params.get(index)
    }
}

/// Evaluate `body` in a child scope of `parent` that binds every entry of
/// `hash`.
///
/// With declared block parameters, the first one is `value` and every further
/// declared name found in `hash` follows in declared order; names missing
/// from `hash` are skipped. Without declared block parameters none are bound.
pub fn let_scope<R>(
    parent: &Scope<'_>,
    value: &Value,
    hash: &Map<String, Value>,
    block_param_names: &[&str],
    body: impl FnOnce(&Value, &Scope<'_>) -> R,
) -> R {
    let mut scope = parent.child();
    for (name, bound) in hash {
        scope.bind(name.clone(), bound.clone());
    }
    if let Some((_, rest)) = block_param_names.split_first() {
        scope.block_params.push(value.clone());
        scope
            .block_params
            .extend(rest.iter().filter_map(|name| hash.get(*name).cloned()));
    }
    body(value, &scope)
}

/// Concatenate values without a separator.
pub fn concat<'v>(values: impl IntoIterator<Item = &'v Value>) -> String {
    values.into_iter().map(to_text).collect()
}

/// Join a sequence with `separator`; anything that is not a sequence yields
/// an empty string.
pub fn join(sequence: Option<&Value>, separator: &str) -> String {
    match sequence {
        Some(Value::Array(items)) => items.iter().map(to_text).collect::<Vec<_>>().join(separator),
        _ => String::new(),
    }
}

/// Product of two values coerced to numbers; `None` if either is not numeric.
pub fn multiply(a: &Value, b: &Value) -> Option<Decimal> {
    to_number(a)?.checked_mul(to_number(b)?)
}

/// Strict equality: same type and same value, so `"1"` differs from `1`.
pub fn eq(a: &Value, b: &Value) -> bool {
    a == b
}

/// One-line postal address with building details labelled in the
/// translator's locale. Absent addresses render empty.
pub fn format_address(address: &Address, tr: &Translator<'_>) -> String {
    match address {
        Address::Detailed(d) => {
            let mut out = format!("{}, {} {}", d.country_code, d.postal_code, d.city);
            if let Some(street) = &d.street_name {
                out.push(' ');
                out.push_str(street);
                if let Some(category) = &d.public_place_category {
                    out.push(' ');
                    out.push_str(category);
                }
            }
            if let Some(number) = &d.number {
                out.push(' ');
                out.push_str(number);
            }
            let details = [
                ("building", &d.building),
                ("staircase", &d.staircase),
                ("floor", &d.floor),
                ("door", &d.door),
                ("lotNumber", &d.lot_number),
            ];
            for (label, value) in details {
                if let Some(value) = value {
                    out.push_str(&format!(", {} {value}", tr.t(label)));
                }
            }
            out
        }
        Address::Simple(s) => format!(
            "{} {}, {}",
            s.postal_code, s.city, s.additional_address_detail
        ),
        Address::Absent => String::new(),
    }
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Textual form of a value as templates print it.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Numeric coercion shared by the helpers and formatters.
pub(crate) fn parse_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn to_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_number(&n.to_string()),
        Value::String(s) => parse_number(s),
        Value::Bool(b) => Some(Decimal::from(u8::from(*b))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{LocaleTable, LocaleTables, Resolver};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn resolver() -> Resolver {
        let mut tables = LocaleTables::new();
        tables.insert(
            "hu",
            LocaleTable::from_iter([("building", "Épület"), ("floor", "Emelet")]),
        );
        Resolver::new(Arc::new(tables))
    }

    #[test]
    fn let_binds_hash_and_block_params() {
        let root = Scope::root();
        let hash = json!({ "net": "100", "vat": "27" });
        let hash = hash.as_object().unwrap();
        let result = let_scope(
            &root,
            &json!(true),
            hash,
            &["simplified", "vat", "missing", "net"],
            |value, scope| {
                assert_eq!(value, &json!(true));
                assert_eq!(scope.lookup("net"), Some(&json!("100")));
                scope.block_params().to_vec()
            },
        );
        assert_eq!(result, vec![json!(true), json!("27"), json!("100")]);
    }

    #[test]
    fn let_without_block_params_binds_none() {
        let mut root = Scope::root();
        root.bind("outer", json!("x"));
        let hash = Map::new();
        let (outer, params) = let_scope(&root, &json!(1), &hash, &[], |_, scope| {
            (scope.lookup("outer").cloned(), scope.block_params().len())
        });
        assert_eq!(outer, Some(json!("x")));
        assert_eq!(params, 0);
    }

    #[test]
    fn inner_bindings_shadow_outer() {
        let mut root = Scope::root();
        root.bind("name", json!("outer"));
        let hash = json!({ "name": "inner" });
        let seen = let_scope(&root, &Value::Null, hash.as_object().unwrap(), &[], |_, scope| {
            scope.lookup("name").cloned()
        });
        assert_eq!(seen, Some(json!("inner")));
        assert_eq!(root.lookup("name"), Some(&json!("outer")));
    }

    #[test]
    fn concat_and_join() {
        assert_eq!(concat(&[json!("a"), json!(1), Value::Null, json!("b")]), "a1b");
        assert_eq!(join(Some(&json!(["a", "b", "c"])), "-"), "a-b-c");
        assert_eq!(join(None, "-"), "");
        assert_eq!(join(Some(&json!("abc")), "-"), "");
    }

    #[test]
    fn multiply_coerces() {
        assert_eq!(multiply(&json!("1.5"), &json!(4)), Some(dec!(6.0)));
        assert_eq!(multiply(&json!("0.1"), &json!("0.2")), Some(dec!(0.02)));
        assert_eq!(multiply(&json!("abc"), &json!(2)), None);
        assert_eq!(multiply(&Value::Null, &json!(2)), None);
    }

    #[test]
    fn eq_is_strict() {
        assert!(eq(&json!("1"), &json!("1")));
        assert!(!eq(&json!("1"), &json!(1)));
        assert!(!eq(&json!(true), &json!("true")));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("Kovács & Fia <Kft.>"), "Kovács &amp; Fia &lt;Kft.&gt;");
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn detailed_address_with_labels() {
        let resolver = resolver();
        let tr = resolver.bind("hu");
        let address = Address::Detailed(crate::core::DetailedAddress {
            country_code: "HU".into(),
            postal_code: "1011".into(),
            city: "Budapest".into(),
            street_name: Some("Fő".into()),
            public_place_category: Some("utca".into()),
            number: Some("1".into()),
            building: Some("A".into()),
            floor: Some("2".into()),
            lot_number: Some("123/4".into()),
            ..Default::default()
        });
        assert_eq!(
            format_address(&address, &tr),
            "HU, 1011 Budapest Fő utca 1, Épület A, Emelet 2, lotNumber 123/4"
        );
    }

    #[test]
    fn absent_address_is_empty() {
        let resolver = resolver();
        assert_eq!(format_address(&Address::Absent, &resolver.bind("hu")), "");
    }
}
