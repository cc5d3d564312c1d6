use super::*;
use crate::domain::LineItemField;

fn item(quantity: f64, unit_price: f64) -> LineItem {
    LineItem {
        item_number: String::new(),
        description: String::new(),
        quantity,
        unit_price,
        line_total: quantity * unit_price,
    }
}

fn document_with(items: Vec<LineItem>, tax_rate: f64) -> Document {
    let mut document = Document {
        line_items: items,
        ..Document::default()
    };
    document.totals.tax_rate = tax_rate;
    document.recompute_totals();
    document
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn assert_totals_consistent(document: &Document) {
    let sum: f64 = document.line_items.iter().map(|item| item.line_total).sum();
    let totals = &document.totals;
    assert_close(totals.subtotal, sum);
    assert_close(totals.tax, totals.subtotal * totals.tax_rate / 100.0);
    assert_close(
        totals.total,
        totals.subtotal + totals.tax + totals.shipping_handling + totals.other,
    );
}

#[test]
fn worked_example_totals() {
    let document = document_with(vec![item(2.0, 10.0), item(1.0, 5.0)], 10.0);
    assert_close(document.totals.subtotal, 25.0);
    assert_close(document.totals.tax, 2.5);
    assert_close(document.totals.total, 27.5);
}

#[test]
fn quantity_and_price_edits_recompute_line_total() {
    let mut document = document_with(vec![item(2.0, 10.0), item(1.0, 5.0)], 10.0);

    document
        .edit_line_item(0, LineItemEdit::Quantity(3.0))
        .expect("edit quantity");
    assert_close(document.line_items[0].line_total, 30.0);

    document
        .edit_line_item(1, LineItemEdit::UnitPrice(7.5))
        .expect("edit price");
    assert_close(document.line_items[1].line_total, 7.5);

    assert_close(document.totals.subtotal, 37.5);
    assert_totals_consistent(&document);
}

#[test]
fn text_edits_still_recompute_totals_from_line_items() {
    let mut document = document_with(vec![item(2.0, 10.0)], 0.0);
    document.totals.subtotal = 999.0;

    document
        .edit_line_item(0, LineItemEdit::Description("Widget".into()))
        .expect("edit description");

    assert_eq!(document.line_items[0].description, "Widget");
    assert_close(document.line_items[0].line_total, 20.0);
    assert_close(document.totals.subtotal, 20.0);
}

#[test]
fn subtotal_tracks_any_sequence_of_edits() {
    let mut document = document_with(vec![item(1.0, 1.0)], 8.25);
    document.set_shipping_handling(4.0);
    document.totals.other = 1.5;

    let edits = [
        (0, LineItemEdit::Quantity(4.0)),
        (0, LineItemEdit::UnitPrice(2.25)),
        (1, LineItemEdit::Quantity(3.0)),
        (1, LineItemEdit::UnitPrice(19.99)),
        (2, LineItemEdit::UnitPrice(0.5)),
        (0, LineItemEdit::ItemNumber("A-1".into())),
    ];
    document.add_line_item();
    document.add_line_item();
    for (index, edit) in edits {
        document.edit_line_item(index, edit).expect("edit");
        assert_totals_consistent(&document);
    }

    document.remove_line_item(1).expect("remove");
    assert_totals_consistent(&document);
}

#[test]
fn tax_rate_change_recomputes_tax_and_total() {
    let mut document = document_with(vec![item(4.0, 25.0)], 0.0);
    document.totals.other = 2.0;
    document.set_shipping_handling(10.0);

    document.set_tax_rate(6.875);

    assert_close(document.totals.tax, 100.0 * 6.875 / 100.0);
    assert_close(document.totals.total, 100.0 + 6.875 + 10.0 + 2.0);
}

#[test]
fn removing_every_line_item_zeroes_totals() {
    let mut document = document_with(vec![item(2.0, 10.0), item(1.0, 5.0)], 10.0);

    document.remove_line_item(1).expect("remove second");
    document.remove_line_item(0).expect("remove first");

    assert!(document.line_items.is_empty());
    assert_eq!(document.totals.subtotal, 0.0);
    assert_eq!(document.totals.tax, 0.0);
    assert_eq!(document.totals.total, 0.0);
}

#[test]
fn add_line_item_appends_blank_row_without_touching_totals() {
    let mut document = document_with(vec![item(2.0, 10.0)], 10.0);
    document.totals.total = 123.0;

    document.add_line_item();

    assert_eq!(document.line_items.len(), 2);
    assert_eq!(document.line_items[1], LineItem::default());
    assert_eq!(document.totals.total, 123.0);
}

#[test]
fn out_of_range_edits_are_rejected() {
    let mut document = document_with(vec![item(1.0, 1.0)], 0.0);
    let before = document.clone();

    let err = document
        .edit_line_item(3, LineItemEdit::Quantity(2.0))
        .expect_err("index 3 is out of range");
    assert_eq!(err, DocumentError::LineItemOutOfRange { index: 3, len: 1 });

    let err = document.remove_line_item(1).expect_err("index 1 is out of range");
    assert_eq!(err, DocumentError::LineItemOutOfRange { index: 1, len: 1 });
    assert_eq!(document, before);
}

#[test]
fn set_field_replaces_only_the_addressed_leaf() {
    let mut document = document_with(vec![item(1.0, 3.0)], 5.0);
    document.customer.phone = "555-0100".into();
    let before = document.clone();

    let path: FieldPath = "vendor.phone".parse().expect("path");
    document.set_field(path, "555-0199");

    assert_eq!(document.vendor.phone, "555-0199");
    assert_eq!(document.field(path), "555-0199");
    assert_eq!(document.field(FieldPath::Totals(TotalsField::TaxRate)), "5");
    assert_eq!(document.customer, before.customer);
    assert_eq!(document.ship_to, before.ship_to);
    assert_eq!(document.line_items, before.line_items);
    assert_eq!(document.totals, before.totals);
    assert_eq!(
        Document {
            vendor: before.vendor.clone(),
            ..document.clone()
        },
        before
    );
}

#[test]
fn field_paths_parse_wire_and_snake_case_names() {
    assert_eq!(
        "shipTo.cityStateZip".parse::<FieldPath>(),
        Ok(FieldPath::ShipTo(PartyField::CityStateZip))
    );
    assert_eq!(
        "ship_to.city_state_zip".parse::<FieldPath>(),
        Ok(FieldPath::ShipTo(PartyField::CityStateZip))
    );
    assert_eq!(
        "vendor.website".parse::<FieldPath>(),
        Ok(FieldPath::Vendor(VendorField::Website))
    );
    assert_eq!(
        "shipping.carrier".parse::<FieldPath>(),
        Ok(FieldPath::Shipping(ShippingField::ShipVia))
    );
    assert_eq!(
        "totals.taxRate".parse::<FieldPath>(),
        Ok(FieldPath::Totals(TotalsField::TaxRate))
    );
    assert_eq!("invoiceNumber".parse::<FieldPath>(), Ok(FieldPath::InvoiceNumber));
}

#[test]
fn fax_and_website_exist_only_on_the_vendor() {
    assert_eq!(
        "customer.fax".parse::<FieldPath>(),
        Err(DocumentError::UnknownField("customer.fax".into()))
    );
    assert!("shipTo.website".parse::<FieldPath>().is_err());
    assert!("lineItems.0.quantity".parse::<FieldPath>().is_err());
}

#[test]
fn totals_paths_parse_numbers_leniently() {
    let mut document = document_with(vec![item(2.0, 50.0)], 0.0);

    document.set_field(FieldPath::Totals(TotalsField::TaxRate), "7.5");
    assert_close(document.totals.tax, 7.5);

    document.set_field(FieldPath::Totals(TotalsField::ShippingHandling), "$1,000");
    assert_close(document.totals.total, 100.0 + 7.5 + 1000.0);

    document.set_field(FieldPath::Totals(TotalsField::TaxRate), "abc");
    assert_eq!(document.totals.tax_rate, 0.0);
    assert_close(document.totals.total, 1100.0);
}

#[test]
fn other_charge_path_is_a_plain_leaf_edit() {
    let mut document = document_with(vec![item(1.0, 10.0)], 0.0);

    document.set_field(FieldPath::Totals(TotalsField::Other), "5");
    assert_eq!(document.totals.other, 5.0);
    assert_close(document.totals.total, 10.0);

    document.set_tax_rate(0.0);
    assert_close(document.totals.total, 15.0);
}

#[test]
fn line_total_is_not_an_editable_field() {
    assert_eq!(
        "lineTotal".parse::<LineItemField>(),
        Err(DocumentError::DerivedLineTotal)
    );
    assert_eq!(
        LineItemEdit::new("qty".parse().expect("field"), "2.5"),
        LineItemEdit::Quantity(2.5)
    );
    assert_eq!(
        LineItemEdit::new(LineItemField::UnitPrice, "not a number"),
        LineItemEdit::UnitPrice(0.0)
    );
}

#[test]
fn extraction_payload_with_nulls_decodes_to_defaults() {
    let payload = serde_json::json!({
        "invoiceNumber": "INV-7",
        "invoiceDate": "2024-03-01",
        "dueDate": null,
        "vendor": { "name": "Acme", "fax": null },
        "customer": null,
        "shipping": { "shipDate": null, "terms": "Net 30" },
        "lineItems": [
            { "itemNumber": 42, "description": "Bolt", "quantity": "3", "unitPrice": 1.5, "lineTotal": 4.5 },
            { "description": "Nut", "quantity": null }
        ],
        "totals": { "subtotal": 4.5, "taxRate": null }
    });

    let document: Document = serde_json::from_value(payload).expect("decode");

    assert_eq!(document.invoice_number, "INV-7");
    assert_eq!(document.due_date, "");
    assert_eq!(document.vendor.name, "Acme");
    assert_eq!(document.vendor.fax, "");
    assert_eq!(document.customer, ContactBlock::default());
    assert_eq!(document.ship_to, ContactBlock::default());
    assert_eq!(document.shipping.terms, "Net 30");
    assert_eq!(document.line_items.len(), 2);
    assert_eq!(document.line_items[0].item_number, "42");
    assert_eq!(document.line_items[0].quantity, 3.0);
    assert_eq!(document.line_items[1].quantity, 0.0);
    assert_eq!(document.totals.tax_rate, 0.0);
    assert_eq!(document.totals.shipping_handling, 0.0);
}

#[test]
fn document_serializes_with_camel_case_keys() {
    let mut document = document_with(vec![item(1.0, 2.0)], 0.0);
    document.ship_to.city_state_zip = "Springfield, IL 62701".into();

    let value = serde_json::to_value(&document).expect("encode");

    assert_eq!(value["shipTo"]["cityStateZip"], "Springfield, IL 62701");
    assert_eq!(value["lineItems"][0]["unitPrice"], 2.0);
    assert_eq!(value["totals"]["shippingHandling"], 0.0);
    assert!(value["shipping"].get("poNumber").is_some());
}
