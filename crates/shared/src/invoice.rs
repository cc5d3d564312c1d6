//! The editable invoice document and its derived-state rules.
//!
//! Line totals and the totals block are derived: `line_total = quantity *
//! unit_price`, `subtotal = sum(line_total)`, `tax = subtotal * tax_rate / 100`
//! and `total = subtotal + tax + shipping_handling + other`. Every mutation
//! that touches their inputs recomputes them in full.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{FieldPath, LineItemEdit, PartyField, ShippingField, TotalsField, VendorField},
    error::DocumentError,
    lenient, parse_amount,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    #[serde(deserialize_with = "lenient::string")]
    pub invoice_number: String,
    #[serde(deserialize_with = "lenient::string")]
    pub invoice_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub due_date: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub vendor: VendorBlock,
    #[serde(deserialize_with = "lenient::or_default")]
    pub customer: ContactBlock,
    #[serde(deserialize_with = "lenient::or_default")]
    pub ship_to: ContactBlock,
    #[serde(deserialize_with = "lenient::or_default")]
    pub shipping: ShippingBlock,
    #[serde(deserialize_with = "lenient::list")]
    pub line_items: Vec<LineItem>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub totals: Totals,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VendorBlock {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(deserialize_with = "lenient::string")]
    pub city_state_zip: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub fax: String,
    #[serde(deserialize_with = "lenient::string")]
    pub website: String,
}

/// Customer and ship-to address block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactBlock {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(deserialize_with = "lenient::string")]
    pub city_state_zip: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShippingBlock {
    #[serde(deserialize_with = "lenient::string")]
    pub sales_person: String,
    #[serde(deserialize_with = "lenient::string")]
    pub po_number: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ship_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ship_via: String,
    #[serde(deserialize_with = "lenient::string")]
    pub fob: String,
    #[serde(deserialize_with = "lenient::string")]
    pub terms: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItem {
    #[serde(deserialize_with = "lenient::string")]
    pub item_number: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::number")]
    pub quantity: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub unit_price: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub line_total: f64,
}

impl LineItem {
    pub fn recompute_line_total(&mut self) {
        self.line_total = self.quantity * self.unit_price;
    }

    fn apply(&mut self, edit: LineItemEdit) {
        let recompute = edit.affects_line_total();
        match edit {
            LineItemEdit::ItemNumber(value) => self.item_number = value,
            LineItemEdit::Description(value) => self.description = value,
            LineItemEdit::Quantity(value) => self.quantity = value,
            LineItemEdit::UnitPrice(value) => self.unit_price = value,
        }
        if recompute {
            self.recompute_line_total();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Totals {
    #[serde(deserialize_with = "lenient::number")]
    pub subtotal: f64,
    /// Percentage, e.g. `6.875` for 6.875%.
    #[serde(deserialize_with = "lenient::number")]
    pub tax_rate: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub tax: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub shipping_handling: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub other: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total: f64,
}

impl Totals {
    /// Full recompute of every derived total from `items`.
    pub fn recompute(&mut self, items: &[LineItem]) {
        self.subtotal = items.iter().map(|item| item.line_total).sum();
        self.tax = self.subtotal * (self.tax_rate / 100.0);
        self.total = self.subtotal + self.tax + self.shipping_handling + self.other;
    }
}

impl Document {
    pub fn recompute_totals(&mut self) {
        self.totals.recompute(&self.line_items);
    }

    /// Recomputes every line total and then the totals block.
    pub fn recompute_all(&mut self) {
        for item in &mut self.line_items {
            item.recompute_line_total();
        }
        self.recompute_totals();
    }

    /// Replaces the leaf at `path` with `value`.
    ///
    /// Totals leaves parse `value` as a number (unparseable text becomes 0).
    /// Tax rate and shipping/handling edits recompute the totals block; the
    /// other totals leaves are stored as given.
    pub fn set_field(&mut self, path: FieldPath, value: &str) {
        let value = value.to_string();
        match path {
            FieldPath::InvoiceNumber => self.invoice_number = value,
            FieldPath::InvoiceDate => self.invoice_date = value,
            FieldPath::DueDate => self.due_date = value,
            FieldPath::Vendor(field) => *self.vendor.field_mut(field) = value,
            FieldPath::Customer(field) => *self.customer.field_mut(field) = value,
            FieldPath::ShipTo(field) => *self.ship_to.field_mut(field) = value,
            FieldPath::Shipping(field) => *self.shipping.field_mut(field) = value,
            FieldPath::Totals(field) => {
                let amount = parse_amount(&value);
                match field {
                    TotalsField::TaxRate => self.set_tax_rate(amount),
                    TotalsField::ShippingHandling => self.set_shipping_handling(amount),
                    TotalsField::Subtotal => self.totals.subtotal = amount,
                    TotalsField::Tax => self.totals.tax = amount,
                    TotalsField::Other => self.totals.other = amount,
                    TotalsField::Total => self.totals.total = amount,
                }
            }
        }
    }

    /// Reads the leaf at `path` as display text.
    pub fn field(&self, path: FieldPath) -> String {
        match path {
            FieldPath::InvoiceNumber => self.invoice_number.clone(),
            FieldPath::InvoiceDate => self.invoice_date.clone(),
            FieldPath::DueDate => self.due_date.clone(),
            FieldPath::Vendor(field) => self.vendor.field(field).to_string(),
            FieldPath::Customer(field) => self.customer.field(field).to_string(),
            FieldPath::ShipTo(field) => self.ship_to.field(field).to_string(),
            FieldPath::Shipping(field) => self.shipping.field(field).to_string(),
            FieldPath::Totals(field) => match field {
                TotalsField::Subtotal => self.totals.subtotal,
                TotalsField::TaxRate => self.totals.tax_rate,
                TotalsField::Tax => self.totals.tax,
                TotalsField::ShippingHandling => self.totals.shipping_handling,
                TotalsField::Other => self.totals.other,
                TotalsField::Total => self.totals.total,
            }
            .to_string(),
        }
    }

    pub fn edit_line_item(&mut self, index: usize, edit: LineItemEdit) -> Result<(), DocumentError> {
        let len = self.line_items.len();
        let item = self
            .line_items
            .get_mut(index)
            .ok_or(DocumentError::LineItemOutOfRange { index, len })?;
        item.apply(edit);
        self.recompute_totals();
        Ok(())
    }

    /// Appends a blank row. A zeroed row contributes nothing, so totals are
    /// left as they are.
    pub fn add_line_item(&mut self) {
        self.line_items.push(LineItem::default());
    }

    pub fn remove_line_item(&mut self, index: usize) -> Result<LineItem, DocumentError> {
        let len = self.line_items.len();
        if index >= len {
            return Err(DocumentError::LineItemOutOfRange { index, len });
        }
        let removed = self.line_items.remove(index);
        self.recompute_totals();
        Ok(removed)
    }

    pub fn set_tax_rate(&mut self, tax_rate: f64) {
        self.totals.tax_rate = tax_rate;
        self.recompute_totals();
    }

    pub fn set_shipping_handling(&mut self, amount: f64) {
        self.totals.shipping_handling = amount;
        self.recompute_totals();
    }
}

impl VendorBlock {
    fn field_mut(&mut self, field: VendorField) -> &mut String {
        match field {
            VendorField::Party(PartyField::Name) => &mut self.name,
            VendorField::Party(PartyField::Company) => &mut self.company,
            VendorField::Party(PartyField::Address) => &mut self.address,
            VendorField::Party(PartyField::CityStateZip) => &mut self.city_state_zip,
            VendorField::Party(PartyField::Phone) => &mut self.phone,
            VendorField::Fax => &mut self.fax,
            VendorField::Website => &mut self.website,
        }
    }

    fn field(&self, field: VendorField) -> &str {
        match field {
            VendorField::Party(PartyField::Name) => &self.name,
            VendorField::Party(PartyField::Company) => &self.company,
            VendorField::Party(PartyField::Address) => &self.address,
            VendorField::Party(PartyField::CityStateZip) => &self.city_state_zip,
            VendorField::Party(PartyField::Phone) => &self.phone,
            VendorField::Fax => &self.fax,
            VendorField::Website => &self.website,
        }
    }
}

impl ContactBlock {
    fn field_mut(&mut self, field: PartyField) -> &mut String {
        match field {
            PartyField::Name => &mut self.name,
            PartyField::Company => &mut self.company,
            PartyField::Address => &mut self.address,
            PartyField::CityStateZip => &mut self.city_state_zip,
            PartyField::Phone => &mut self.phone,
        }
    }

    fn field(&self, field: PartyField) -> &str {
        match field {
            PartyField::Name => &self.name,
            PartyField::Company => &self.company,
            PartyField::Address => &self.address,
            PartyField::CityStateZip => &self.city_state_zip,
            PartyField::Phone => &self.phone,
        }
    }
}

impl ShippingBlock {
    fn field_mut(&mut self, field: ShippingField) -> &mut String {
        match field {
            ShippingField::SalesPerson => &mut self.sales_person,
            ShippingField::PoNumber => &mut self.po_number,
            ShippingField::ShipDate => &mut self.ship_date,
            ShippingField::ShipVia => &mut self.ship_via,
            ShippingField::Fob => &mut self.fob,
            ShippingField::Terms => &mut self.terms,
        }
    }

    fn field(&self, field: ShippingField) -> &str {
        match field {
            ShippingField::SalesPerson => &self.sales_person,
            ShippingField::PoNumber => &self.po_number,
            ShippingField::ShipDate => &self.ship_date,
            ShippingField::ShipVia => &self.ship_via,
            ShippingField::Fob => &self.fob,
            ShippingField::Terms => &self.terms,
        }
    }
}

#[cfg(test)]
#[path = "tests/invoice_tests.rs"]
mod tests;
