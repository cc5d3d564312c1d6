//! Plain-text views of invoices and the order list.

use std::fmt::Write as _;

use client_core::{ControllerSnapshot, PageToken};
use shared::invoice::{ContactBlock, Document, VendorBlock};

fn joined(parts: &[&str]) -> String {
    let parts: Vec<&str> = parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn contact(block: &ContactBlock) -> String {
    joined(&[
        block.name.as_str(),
        block.company.as_str(),
        block.address.as_str(),
        block.city_state_zip.as_str(),
        block.phone.as_str(),
    ])
}

fn vendor(block: &VendorBlock) -> String {
    let mut line = joined(&[
        block.name.as_str(),
        block.company.as_str(),
        block.address.as_str(),
        block.city_state_zip.as_str(),
        block.phone.as_str(),
    ]);
    if !block.fax.trim().is_empty() {
        let _ = write!(line, " (fax {})", block.fax.trim());
    }
    if !block.website.trim().is_empty() {
        let _ = write!(line, " <{}>", block.website.trim());
    }
    line
}

pub fn document(document: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Invoice {}  dated {}  due {}",
        or_dash(&document.invoice_number),
        or_dash(&document.invoice_date),
        or_dash(&document.due_date)
    );
    let _ = writeln!(out, "Vendor:   {}", vendor(&document.vendor));
    let _ = writeln!(out, "Customer: {}", contact(&document.customer));
    let _ = writeln!(out, "Ship to:  {}", contact(&document.ship_to));

    let shipping = &document.shipping;
    let _ = writeln!(
        out,
        "Shipping: salesperson {}, PO {}, shipped {}, via {}, FOB {}, terms {}",
        or_dash(&shipping.sales_person),
        or_dash(&shipping.po_number),
        or_dash(&shipping.ship_date),
        or_dash(&shipping.ship_via),
        or_dash(&shipping.fob),
        or_dash(&shipping.terms)
    );

    let _ = writeln!(
        out,
        "\n{:>3}  {:<12} {:<30} {:>8} {:>12} {:>12}",
        "#", "Item", "Description", "Qty", "Unit price", "Line total"
    );
    for (index, item) in document.line_items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<12} {:<30} {:>8} {:>12.2} {:>12.2}",
            index, item.item_number, item.description, item.quantity, item.unit_price, item.line_total
        );
    }
    if document.line_items.is_empty() {
        let _ = writeln!(out, "     (no line items)");
    }

    let totals = &document.totals;
    let _ = writeln!(out);
    let _ = writeln!(out, "{:>20} {:>12.2}", "Subtotal", totals.subtotal);
    let _ = writeln!(
        out,
        "{:>20} {:>12.2}",
        format!("Tax ({}%)", totals.tax_rate),
        totals.tax
    );
    let _ = writeln!(out, "{:>20} {:>12.2}", "Shipping/handling", totals.shipping_handling);
    let _ = writeln!(out, "{:>20} {:>12.2}", "Other", totals.other);
    let _ = write!(out, "{:>20} {:>12.2}", "Total", totals.total);
    out
}

/// `1 … 4 [5] 6 … 12`, with the current page bracketed.
pub fn page_strip(tokens: &[PageToken], current: usize) -> String {
    tokens
        .iter()
        .map(|token| match token {
            PageToken::Page(page) if *page == current => format!("[{page}]"),
            PageToken::Page(page) => page.to_string(),
            PageToken::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn orders(snapshot: &ControllerSnapshot) -> String {
    if snapshot.order_count == 0 {
        return "No orders yet.".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<14} {:<12} {:<28} {:>12}  {}",
        "ID", "Order", "Date", "Customer", "Total", "Created"
    );
    for order in &snapshot.visible_orders {
        let _ = writeln!(
            out,
            "{:>6}  {:<14} {:<12} {:<28} {:>12.2}  {}",
            order.order_id.0,
            order.order_number,
            order.order_date,
            order.customer_label(),
            order.total_due,
            order.created_at_display()
        );
    }
    let _ = write!(
        out,
        "\nPage {} of {} ({} orders): {}",
        snapshot.current_page,
        snapshot.total_pages,
        snapshot.order_count,
        page_strip(&snapshot.page_numbers, snapshot.current_page)
    );
    out
}
