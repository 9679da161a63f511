use serde_json::{Value, json};

use super::context::RenderContext;
use super::helpers::escape_html as escape;
use super::renderer::Template;
use crate::core::{Node, SzamlaError, items_of};

/// Plain HTML layout of an `InvoiceData` document: header, parties, lines,
/// VAT summary and totals. Batch modification documents render one block per
/// batch entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicInvoiceTemplate;

impl Template for BasicInvoiceTemplate {
    fn evaluate(&self, tree: &Node, ctx: &RenderContext<'_>) -> Result<String, SzamlaError> {
        let data = tree
            .get("InvoiceData")
            .ok_or_else(|| SzamlaError::template("document root is not InvoiceData"))?;
        let number = data.text_at(&["invoiceNumber"]).unwrap_or_default();

        let mut html = String::with_capacity(8 * 1024);
        html.push_str("<!DOCTYPE html>\n");
        html.push_str(&format!(
            "<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{} {}</title>\n</head>\n<body>\n",
            escape(ctx.locale()),
            escape(&ctx.t("invoice")),
            escape(number)
        ));
        html.push_str(&format!("<h1>{}</h1>\n", escape(&ctx.t("invoice"))));

        section(&mut html, "header", &ctx.t("header"));
        html.push_str("<dl>\n");
        row(&mut html, &ctx.t("invoiceNumber"), number);
        row(
            &mut html,
            &ctx.t("invoiceIssueDate"),
            &ctx.format_date(data.text_at(&["invoiceIssueDate"])),
        );
        html.push_str("</dl>\n</section>\n");

        let main = data.get("invoiceMain");
        if let Some(invoice) = main.and_then(|m| m.get("invoice")) {
            render_invoice(&mut html, invoice, ctx);
        }
        for batch in items_of(main.and_then(|m| m.get("batchInvoice"))) {
            section(&mut html, "batch", &ctx.t("batchInvoice"));
            html.push_str("<dl>\n");
            row(
                &mut html,
                &ctx.t("batchIndex"),
                batch.text_at(&["batchIndex"]).unwrap_or_default(),
            );
            html.push_str("</dl>\n</section>\n");
            if let Some(invoice) = batch.get("invoice") {
                render_invoice(&mut html, invoice, ctx);
            }
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}

fn render_invoice(html: &mut String, invoice: &Node, ctx: &RenderContext<'_>) {
    let detail = invoice.path(&["invoiceHead", "invoiceDetail"]);
    let detail_text = |key: &str| detail.and_then(|d| d.text_at(&[key]));
    let currency = detail_text("currencyCode").unwrap_or("HUF");
    let simplified = ctx.eq(
        &json!(detail_text("invoiceCategory")),
        &json!("SIMPLIFIED"),
    );

    if let Some(reference) = invoice.get("invoiceReference") {
        section(html, "reference", &ctx.t("invoiceReference"));
        html.push_str("<dl>\n");
        row(
            html,
            &ctx.t("originalInvoiceNumber"),
            reference.text_at(&["originalInvoiceNumber"]).unwrap_or_default(),
        );
        row(
            html,
            &ctx.t("modificationIndex"),
            reference.text_at(&["modificationIndex"]).unwrap_or_default(),
        );
        html.push_str("</dl>\n</section>\n");
    }

    section(html, "general", &ctx.t("general"));
    html.push_str("<dl>\n");
    if let Some(category) = detail_text("invoiceCategory") {
        row(html, &ctx.t("invoiceCategory"), &ctx.t(&format!("InvoiceCategoryType_{category}")));
    }
    row(html, &ctx.t("invoiceDeliveryDate"), &ctx.format_date(detail_text("invoiceDeliveryDate")));
    if let Some(method) = detail_text("paymentMethod") {
        row(html, &ctx.t("paymentMethod"), &ctx.t(&format!("PaymentMethodType_{method}")));
    }
    row(html, &ctx.t("paymentDate"), &ctx.format_date(detail_text("paymentDate")));
    row(html, &ctx.t("currencyCode"), currency);
    row(html, &ctx.t("exchangeRate"), &ctx.format_number(detail_text("exchangeRate")));
    if let Some(appearance) = detail_text("invoiceAppearance") {
        row(html, &ctx.t("invoiceAppearance"), &ctx.t(appearance));
    }
    let orders = detail
        .and_then(|d| d.path(&["conventionalInvoiceInfo", "orderNumbers", "orderNumber"]))
        .map(Node::to_json);
    row(html, &ctx.t("orderNumbers"), &ctx.join(orders.as_ref(), ", "));
    html.push_str("</dl>\n</section>\n");

    if let Some(supplier) = invoice.path(&["invoiceHead", "supplierInfo"]) {
        party(
            html,
            ctx,
            "supplier",
            supplier.text_at(&["supplierName"]),
            supplier.get("supplierAddress"),
            supplier.get("supplierTaxNumber"),
            supplier.text_at(&["supplierBankAccountNumber"]),
        );
    }
    if let Some(customer) = invoice.path(&["invoiceHead", "customerInfo"]) {
        party(
            html,
            ctx,
            "customer",
            customer.text_at(&["customerName"]),
            customer.get("customerAddress"),
            customer.path(&["customerVatData", "customerTaxNumber"]),
            customer.text_at(&["customerBankAccountNumber"]),
        );
    }

    render_lines(html, invoice, ctx, currency, simplified);
    render_summary(html, invoice, ctx, currency);
}

fn party(
    html: &mut String,
    ctx: &RenderContext<'_>,
    role: &str,
    name: Option<&str>,
    address: Option<&Node>,
    tax_number: Option<&Node>,
    bank_account: Option<&str>,
) {
    section(html, role, &ctx.t(role));
    html.push_str("<dl>\n");
    row(html, &ctx.t("name"), name.unwrap_or_default());
    row(html, &ctx.t("address"), &ctx.format_address(address));
    row(html, &ctx.t("taxNumber"), &tax_number_text(ctx, tax_number));
    row(html, &ctx.t("bankAccount"), bank_account.unwrap_or_default());
    html.push_str("</dl>\n</section>\n");
}

/// `12345678-2-41` from taxpayer id, VAT code and county code.
fn tax_number_text(ctx: &RenderContext<'_>, tax_number: Option<&Node>) -> String {
    let Some(tax_number) = tax_number else {
        return String::new();
    };
    let parts: Vec<Value> = ["taxpayerId", "vatCode", "countyCode"]
        .iter()
        .filter_map(|key| tax_number.text_at(&[*key]))
        .map(|part| json!(part))
        .collect();
    ctx.join(Some(&Value::Array(parts)), "-")
}

fn render_lines(
    html: &mut String,
    invoice: &Node,
    ctx: &RenderContext<'_>,
    currency: &str,
    simplified: bool,
) {
    let lines = items_of(invoice.path(&["invoiceLines", "line"]));
    if lines.is_empty() {
        return;
    }
    section(html, "items", &ctx.t("items"));
    html.push_str("<table>\n<thead><tr>");
    let mut columns = vec!["lineNumber", "description", "quantity", "unitOfMeasure", "unitPrice"];
    if simplified {
        columns.extend(["vatContent", "gross"]);
    } else {
        columns.extend(["net", "vatRate", "vat", "gross"]);
    }
    for column in columns {
        html.push_str(&format!("<th>{}</th>", escape(&ctx.t(column))));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for line in lines {
        let text = |path: &[&str]| line.text_at(path);
        let unit = match text(&["unitOfMeasure"]) {
            Some("OWN") => text(&["unitOfMeasureOwn"]).unwrap_or_default().to_string(),
            Some(unit) => ctx.t(unit),
            None => String::new(),
        };
        let mut cells = vec![
            text(&["lineNumber"]).unwrap_or_default().to_string(),
            text(&["lineDescription"]).unwrap_or_default().to_string(),
            ctx.format_number(text(&["quantity"])),
            unit,
            ctx.format_currency(text(&["unitPrice"]), currency),
        ];
        if simplified {
            let amounts = line.get("lineAmountsSimplified");
            let at = |path: &[&str]| amounts.and_then(|a| a.text_at(path));
            cells.push(percentage(ctx, at(&["lineVatRate", "vatContent"])));
            cells.push(ctx.format_currency(at(&["lineGrossAmountSimplified"]), currency));
        } else {
            let amounts = line.get("lineAmountsNormal");
            let at = |path: &[&str]| amounts.and_then(|a| a.text_at(path));
            let net = match at(&["lineNetAmountData", "lineNetAmount"]) {
                Some(net) => ctx.format_currency(Some(net), currency),
                None => line_net_from_price(ctx, line, currency),
            };
            cells.push(net);
            cells.push(percentage(ctx, at(&["lineVatRate", "vatPercentage"])));
            cells.push(ctx.format_currency(at(&["lineVatData", "lineVatAmount"]), currency));
            cells.push(ctx.format_currency(
                at(&["lineGrossAmountData", "lineGrossAmountNormal"]),
                currency,
            ));
        }
        html.push_str("<tr>");
        for cell in cells {
            html.push_str(&format!("<td>{}</td>", escape(&cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
}

/// Net amount computed from quantity and unit price when the line has none.
fn line_net_from_price(ctx: &RenderContext<'_>, line: &Node, currency: &str) -> String {
    let quantity = json!(line.text_at(&["quantity"]));
    let price = json!(line.text_at(&["unitPrice"]));
    match ctx.multiply(&quantity, &price) {
        Some(net) => ctx.format_currency(Some(&net.to_string()), currency),
        None => String::new(),
    }
}

/// VAT rates are fractions in the document (`0.27`), shown as `27%`.
fn percentage(ctx: &RenderContext<'_>, rate: Option<&str>) -> String {
    let Some(rate) = rate else {
        return String::new();
    };
    match ctx.multiply(&json!(rate), &json!(100)) {
        Some(percent) => ctx.concat(&[json!(ctx.format_number(Some(&percent.to_string()))), json!("%")]),
        None => rate.to_string(),
    }
}

fn render_summary(html: &mut String, invoice: &Node, ctx: &RenderContext<'_>, currency: &str) {
    let summary = invoice.get("invoiceSummary");
    let normal = summary.and_then(|s| s.get("summaryNormal"));
    let rates = items_of(normal.and_then(|n| n.get("summaryByVatRate")));

    if !rates.is_empty() {
        section(html, "vat-summary", &ctx.t("vatSummary"));
        html.push_str("<table>\n<thead><tr>");
        for column in ["vatRate", "net", "vat", "gross"] {
            html.push_str(&format!("<th>{}</th>", escape(&ctx.t(column))));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for rate in rates {
            let cells = [
                percentage(ctx, rate.text_at(&["vatRate", "vatPercentage"])),
                ctx.format_currency(rate.text_at(&["vatRateNetData", "vatRateNetAmount"]), currency),
                ctx.format_currency(rate.text_at(&["vatRateVatData", "vatRateVatAmount"]), currency),
                ctx.format_currency(
                    rate.text_at(&["vatRateGrossData", "vatRateGrossAmount"]),
                    currency,
                ),
            ];
            html.push_str("<tr>");
            for cell in cells {
                html.push_str(&format!("<td>{}</td>", escape(&cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n</section>\n");
    }

    section(html, "summary", &ctx.t("summary"));
    html.push_str("<dl>\n");
    let total = |path: &[&str]| summary.and_then(|s| s.text_at(path));
    row(
        html,
        &ctx.t("netTotal"),
        &ctx.format_currency(total(&["summaryNormal", "invoiceNetAmount"]), currency),
    );
    row(
        html,
        &ctx.t("vatTotal"),
        &ctx.format_currency(total(&["summaryNormal", "invoiceVatAmount"]), currency),
    );
    row(
        html,
        &ctx.t("grossTotal"),
        &ctx.format_currency(total(&["summaryGrossData", "invoiceGrossAmount"]), currency),
    );
    html.push_str("</dl>\n</section>\n");
}

fn section(html: &mut String, class: &str, title: &str) {
    html.push_str(&format!(
        "<section class=\"{}\">\n<h2>{}</h2>\n",
        escape(class),
        escape(title)
    ));
}

// Rows without a value are left out.
fn row(html: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    html.push_str(&format!(
        "<dt>{}</dt><dd>{}</dd>\n",
        escape(label),
        escape(value)
    ));
}
