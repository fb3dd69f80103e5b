//! Invoice display formatting
//!
//! Invoice lists are rendered with `tabled`; a single invoice is printed as a
//! header followed by its charges.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::engine::InvoiceBucket;

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "Invoice")]
    period: String,
    #[tabled(rename = "Closes")]
    closing: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl InvoiceRow {
    fn new(bucket: &InvoiceBucket, settings: &Settings) -> Self {
        Self {
            period: bucket.key(),
            closing: settings.format_date(bucket.closing_date),
            due: settings.format_date(bucket.due_date),
            items: bucket.item_count(),
            total: settings.format_money(bucket.total),
            status: status_label(bucket, settings),
        }
    }
}

fn status_label(bucket: &InvoiceBucket, settings: &Settings) -> String {
    match (bucket.paid, bucket.paid_date) {
        (true, Some(date)) => format!("paid {}", settings.format_date(date)),
        (true, None) => "paid".to_string(),
        (false, _) => "open".to_string(),
    }
}

/// Format a card's invoices, in the order given
pub fn format_invoice_list(card_name: &str, buckets: &[InvoiceBucket], settings: &Settings) -> String {
    if buckets.is_empty() {
        return format!("No invoices for {}.\n", card_name);
    }

    let rows: Vec<_> = buckets.iter().map(|b| InvoiceRow::new(b, settings)).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());

    format!("Invoices for {}\n{}\n", card_name, table)
}

/// Format one invoice with its purchases and installments
pub fn format_invoice_details(card_name: &str, bucket: &InvoiceBucket, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice {} - {}\n", bucket.key(), card_name));
    output.push_str(&format!("  Closes:  {}\n", settings.format_date(bucket.closing_date)));
    output.push_str(&format!("  Due:     {}\n", settings.format_date(bucket.due_date)));
    output.push_str(&format!("  Total:   {}\n", settings.format_money(bucket.total)));
    output.push_str(&format!("  Status:  {}\n", status_label(bucket, settings)));

    if !bucket.purchases.is_empty() {
        output.push_str("\n  Purchases\n");
        for purchase in &bucket.purchases {
            output.push_str(&format!(
                "    {}  {:>14}  {}\n",
                settings.format_date(purchase.date),
                settings.format_money(purchase.amount),
                purchase.description,
            ));
        }
    }

    if !bucket.installments.is_empty() {
        output.push_str("\n  Installments\n");
        for installment in &bucket.installments {
            output.push_str(&format!(
                "    {}  {:>14}  {:>5}  {}\n",
                settings.format_date(installment.due_date),
                settings.format_money(installment.amount),
                installment.position_label(),
                installment.description,
            ));
        }
    }

    output
}
