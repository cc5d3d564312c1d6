use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(OrderId);

/// Fields shared by every address block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyField {
    Name,
    Company,
    Address,
    CityStateZip,
    Phone,
}

/// Vendor blocks additionally carry fax and website.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorField {
    Party(PartyField),
    Fax,
    Website,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingField {
    SalesPerson,
    PoNumber,
    ShipDate,
    ShipVia,
    Fob,
    Terms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalsField {
    Subtotal,
    TaxRate,
    Tax,
    ShippingHandling,
    Other,
    Total,
}

/// Address of a single scalar leaf in a [`crate::invoice::Document`].
///
/// Line items are edited through [`LineItemEdit`] instead so their derived
/// totals stay in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    InvoiceNumber,
    InvoiceDate,
    DueDate,
    Vendor(VendorField),
    Customer(PartyField),
    ShipTo(PartyField),
    Shipping(ShippingField),
    Totals(TotalsField),
}

fn normalize(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for PartyField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "name" => Ok(Self::Name),
            "company" => Ok(Self::Company),
            "address" => Ok(Self::Address),
            "citystatezip" | "locality" => Ok(Self::CityStateZip),
            "phone" => Ok(Self::Phone),
            _ => Err(()),
        }
    }
}

impl FromStr for FieldPath {
    type Err = DocumentError;

    /// Parses dotted paths such as `vendor.phone` or `totals.taxRate`.
    /// Segment matching ignores case, `_` and `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || DocumentError::UnknownField(s.to_string());
        let segments: Vec<String> = s.trim().split('.').map(normalize).collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let path = match segments.as_slice() {
            ["invoicenumber"] => Self::InvoiceNumber,
            ["invoicedate"] => Self::InvoiceDate,
            ["duedate"] => Self::DueDate,
            ["vendor", "fax"] => Self::Vendor(VendorField::Fax),
            ["vendor", "website"] => Self::Vendor(VendorField::Website),
            ["vendor", field] => Self::Vendor(VendorField::Party(
                field.parse().map_err(|_| unknown())?,
            )),
            ["customer", field] => Self::Customer(field.parse().map_err(|_| unknown())?),
            ["shipto", field] => Self::ShipTo(field.parse().map_err(|_| unknown())?),
            ["shipping", field] => Self::Shipping(match *field {
                "salesperson" => ShippingField::SalesPerson,
                "ponumber" => ShippingField::PoNumber,
                "shipdate" => ShippingField::ShipDate,
                "shipvia" | "carrier" => ShippingField::ShipVia,
                "fob" => ShippingField::Fob,
                "terms" => ShippingField::Terms,
                _ => return Err(unknown()),
            }),
            ["totals", field] => Self::Totals(match *field {
                "subtotal" => TotalsField::Subtotal,
                "taxrate" => TotalsField::TaxRate,
                "tax" => TotalsField::Tax,
                "shippinghandling" => TotalsField::ShippingHandling,
                "other" => TotalsField::Other,
                "total" => TotalsField::Total,
                _ => return Err(unknown()),
            }),
            _ => return Err(unknown()),
        };
        Ok(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemField {
    ItemNumber,
    Description,
    Quantity,
    UnitPrice,
}

impl FromStr for LineItemField {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "itemnumber" | "item" | "sku" => Ok(Self::ItemNumber),
            "description" => Ok(Self::Description),
            "quantity" | "qty" => Ok(Self::Quantity),
            "unitprice" | "price" => Ok(Self::UnitPrice),
            "linetotal" => Err(DocumentError::DerivedLineTotal),
            _ => Err(DocumentError::UnknownLineItemField(s.to_string())),
        }
    }
}

/// A single edit to one line item field.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItemEdit {
    ItemNumber(String),
    Description(String),
    Quantity(f64),
    UnitPrice(f64),
}

impl LineItemEdit {
    /// Builds an edit from raw text; numeric fields parse leniently.
    pub fn new(field: LineItemField, value: &str) -> Self {
        match field {
            LineItemField::ItemNumber => Self::ItemNumber(value.to_string()),
            LineItemField::Description => Self::Description(value.to_string()),
            LineItemField::Quantity => Self::Quantity(crate::parse_amount(value)),
            LineItemField::UnitPrice => Self::UnitPrice(crate::parse_amount(value)),
        }
    }

    pub fn affects_line_total(&self) -> bool {
        matches!(self, Self::Quantity(_) | Self::UnitPrice(_))
    }
}
