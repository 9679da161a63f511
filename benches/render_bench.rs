use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use szamla::i18n::{LocaleTables, Resolver};
use szamla::render::{LocaleFormat, Renderer};
use szamla::xml::decode;

const SAMPLE: &str = include_str!("../tests/data/invoice_normal.xml");

/// Invoice with `lines` identical item lines.
fn build_invoice_xml(lines: usize) -> String {
    let mut items = String::new();
    for i in 1..=lines {
        items.push_str(&format!(
            "<line><lineNumber>{i}</lineNumber><lineDescription>Item {i}</lineDescription>\
             <quantity>2</quantity><unitOfMeasure>PIECE</unitOfMeasure><unitPrice>999.5</unitPrice>\
             <lineAmountsNormal><lineNetAmountData><lineNetAmount>1999</lineNetAmount></lineNetAmountData>\
             <lineVatRate><vatPercentage>0.27</vatPercentage></lineVatRate>\
             <lineVatData><lineVatAmount>539.73</lineVatAmount></lineVatData>\
             <lineGrossAmountData><lineGrossAmountNormal>2538.73</lineGrossAmountNormal></lineGrossAmountData>\
             </lineAmountsNormal></line>"
        ));
    }
    format!(
        "<InvoiceData><invoiceNumber>BENCH-1</invoiceNumber><invoiceIssueDate>2024-06-15</invoiceIssueDate>\
         <invoiceMain><invoice><invoiceHead><invoiceDetail><invoiceCategory>NORMAL</invoiceCategory>\
         <currencyCode>HUF</currencyCode></invoiceDetail></invoiceHead>\
         <invoiceLines>{items}</invoiceLines></invoice></invoiceMain></InvoiceData>"
    )
}

fn renderer() -> Renderer<szamla::render::BasicInvoiceTemplate> {
    Renderer::basic(Resolver::new(Arc::new(LocaleTables::builtin().unwrap())))
}

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode_sample", |b| {
        b.iter(|| black_box(decode(black_box(SAMPLE))));
    });
}

fn bench_convert(c: &mut Criterion) {
    let renderer = renderer();
    c.bench_function("convert_sample_hu", |b| {
        b.iter(|| black_box(renderer.convert(black_box(SAMPLE), "hu")));
    });
}

fn bench_convert_1000_lines(c: &mut Criterion) {
    let renderer = renderer();
    let xml = build_invoice_xml(1000);
    c.bench_function("convert_1000_lines", |b| {
        b.iter(|| black_box(renderer.convert(black_box(&xml), "en")));
    });
}

fn bench_currency_format(c: &mut Criterion) {
    let format = LocaleFormat::HUNGARIAN;
    c.bench_function("format_currency", |b| {
        b.iter(|| black_box(format.currency(black_box(Some("1234567.891")), "EUR")));
    });
}

criterion_group!(
    benches,
    bench_decode,
    bench_convert,
    bench_convert_1000_lines,
    bench_currency_format,
);
criterion_main!(benches);
