#![cfg(feature = "xml")]

use szamla::core::*;
use szamla::xml::{ArrayWhitelist, OSA_3_0, XmlDecoder, decode};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn wrap(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<InvoiceData xmlns="http://schemas.nav.gov.hu/OSA/3.0/data"
             xmlns:common="http://schemas.nav.gov.hu/NTCA/1.0/common"
             xmlns:base="http://schemas.nav.gov.hu/OSA/3.0/base">{inner}</InvoiceData>"#
    )
}

fn root(tree: &Node) -> &Node {
    tree.get("InvoiceData").expect("InvoiceData root")
}

const SAMPLE: &str = include_str!("data/invoice_normal.xml");

// ---------------------------------------------------------------------------
// Cardinality
// ---------------------------------------------------------------------------

#[test]
fn every_whitelisted_tag_is_a_list_even_when_single() {
    let whitelist = ArrayWhitelist::osa_3_0();
    for tag in whitelist.tags() {
        let tree = decode(&wrap(&format!("<{tag}>x</{tag}>"))).unwrap();
        let node = root(&tree).get(tag).unwrap();
        assert_eq!(node.as_list().map(<[Node]>::len), Some(1), "tag {tag}");
        assert_eq!(node.items()[0].as_str(), Some("x"));
    }
}

#[test]
fn non_whitelisted_single_is_bare() {
    let tree = decode(&wrap("<invoiceNumber>A-1</invoiceNumber>")).unwrap();
    assert_eq!(
        root(&tree).get("invoiceNumber"),
        Some(&Node::Scalar("A-1".into()))
    );
}

#[test]
fn non_whitelisted_repeats_become_list_in_order() {
    let tree = decode(&wrap(
        "<note>first</note><invoiceNumber>A-1</invoiceNumber><note>second</note><note>third</note>",
    ))
    .unwrap();
    let notes: Vec<_> = root(&tree)
        .get("note")
        .unwrap()
        .items()
        .iter()
        .filter_map(Node::as_str)
        .collect();
    assert_eq!(notes, ["first", "second", "third"]);
}

#[test]
fn custom_whitelist_changes_shape() {
    let decoder = XmlDecoder::new(ArrayWhitelist::new("custom", ["note"]));
    let tree = decoder.decode(&wrap("<note>a</note><line>b</line>")).unwrap();
    assert!(root(&tree).get("note").unwrap().is_list());
    assert!(!root(&tree).get("line").unwrap().is_list());
}

#[test]
fn whitelist_document_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("whitelist.json");
    std::fs::write(&path, r#"{"schemaVersion":"OSA 3.1","tags":["line","extraTag"]}"#).unwrap();
    let whitelist = ArrayWhitelist::from_file(&path).unwrap();
    assert_eq!(whitelist.schema_version(), "OSA 3.1");
    assert!(whitelist.contains("extraTag"));
    assert_eq!(whitelist.len(), 2);
}

#[test]
fn default_whitelist_is_osa_3_0() {
    assert_eq!(XmlDecoder::default().whitelist().schema_version(), OSA_3_0);
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[test]
fn attributes_and_text_share_the_mapping() {
    let tree = decode(&wrap(r#"<amount currency="HUF">1000</amount>"#)).unwrap();
    let amount = root(&tree).get("amount").unwrap();
    assert_eq!(amount.attr("currency"), Some("HUF"));
    assert_eq!(amount.text(), Some("1000"));
    assert_eq!(amount.get("@_currency").and_then(Node::as_str), Some("HUF"));
}

#[test]
fn namespace_declarations_are_not_attributes() {
    let tree = decode(&wrap("<invoiceNumber>A-1</invoiceNumber>")).unwrap();
    let data = root(&tree).as_mapping().unwrap();
    assert!(data.keys().all(|k| !k.starts_with(ATTRIBUTE_PREFIX)));
}

#[test]
fn entities_and_cdata() {
    let tree = decode(&wrap(
        "<supplierName>Kovács &amp; Fia</supplierName><lineDescription><![CDATA[<b>bold</b>]]></lineDescription>",
    ))
    .unwrap();
    let data = root(&tree);
    assert_eq!(data.text_at(&["supplierName"]), Some("Kovács & Fia"));
    assert_eq!(data.text_at(&["lineDescription"]), Some("<b>bold</b>"));
}

#[test]
fn decode_bytes_rejects_invalid_utf8() {
    let err = XmlDecoder::default().decode_bytes(&[b'<', 0xff, b'/', b'>']).unwrap_err();
    assert!(matches!(err, SzamlaError::Parse(_)));
}

#[test]
fn malformed_documents_fail() {
    for xml in [
        "",
        "   ",
        "<InvoiceData>",
        "<InvoiceData><a></b></InvoiceData>",
        "</InvoiceData>",
        "just text",
        "<InvoiceData/><InvoiceData/>",
        "<InvoiceData><a>1</a></InvoiceData><extra>2</extra>",
    ] {
        assert!(
            matches!(decode(xml), Err(SzamlaError::Parse(_))),
            "expected parse error for {xml:?}"
        );
    }
}

// ---------------------------------------------------------------------------
// Full document
// ---------------------------------------------------------------------------

#[test]
fn sample_invoice_shape() {
    let tree = decode(SAMPLE).unwrap();
    let data = root(&tree);
    assert_eq!(data.text_at(&["invoiceNumber"]), Some("SZ-2024/000123"));

    let invoice = data.path(&["invoiceMain", "invoice"]).unwrap();
    let lines = invoice.path(&["invoiceLines", "line"]).unwrap();
    assert_eq!(lines.as_list().unwrap().len(), 2);

    let rates = invoice
        .path(&["invoiceSummary", "summaryNormal", "summaryByVatRate"])
        .unwrap();
    assert_eq!(rates.as_list().unwrap().len(), 2);

    let supplier = Address::from_node(invoice.path(&["invoiceHead", "supplierInfo", "supplierAddress"]));
    match supplier {
        Address::Detailed(d) => {
            assert_eq!(d.city, "Budapest");
            assert_eq!(d.public_place_category.as_deref(), Some("utca"));
        }
        other => panic!("expected detailed address, got {other:?}"),
    }

    let customer = Address::from_node(invoice.path(&["invoiceHead", "customerInfo", "customerAddress"]));
    assert!(matches!(customer, Address::Simple(_)));

    let orders = invoice
        .path(&["invoiceHead", "invoiceDetail", "conventionalInvoiceInfo", "orderNumbers", "orderNumber"])
        .unwrap();
    assert_eq!(orders.as_list().unwrap().len(), 1);
}

#[test]
fn tree_serializes_as_plain_json() {
    let tree = decode(&wrap(r#"<line><lineNumber>1</lineNumber></line><total currency="EUR">5</total>"#)).unwrap();
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "InvoiceData": {
                "line": [{ "lineNumber": "1" }],
                "total": { "@_currency": "EUR", "#text": "5" }
            }
        })
    );
    assert_eq!(tree.to_json(), json);
}
