use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    domain::OrderId,
    invoice::{ContactBlock, Document, LineItem, ShippingBlock, Totals, VendorBlock},
    lenient,
};

/// Row of the order list, as returned by `GET /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(rename = "SalesOrderID", deserialize_with = "lenient::order_id")]
    pub order_id: OrderId,
    #[serde(rename = "SalesOrderNumber", default, deserialize_with = "lenient::string")]
    pub order_number: String,
    #[serde(rename = "OrderDate", default, deserialize_with = "lenient::string")]
    pub order_date: String,
    #[serde(rename = "CustomerName", default, deserialize_with = "lenient::string")]
    pub customer_name: String,
    #[serde(rename = "CustomerCompany", default, deserialize_with = "lenient::string")]
    pub customer_company: String,
    #[serde(rename = "TotalDue", default, deserialize_with = "lenient::number")]
    pub total_due: f64,
    #[serde(rename = "CreatedAt", default, deserialize_with = "lenient::string")]
    pub created_at: String,
}

impl OrderSummary {
    /// Decodes a `GET /orders` body, skipping rows without a usable id.
    pub fn list_from_value(value: serde_json::Value) -> Vec<Self> {
        lenient::entries(value)
    }

    /// Customer name, falling back to the company when the name is blank.
    pub fn customer_label(&self) -> &str {
        if self.customer_name.trim().is_empty() {
            &self.customer_company
        } else {
            &self.customer_name
        }
    }

    /// `CreatedAt` rendered as `YYYY-MM-DD HH:MM`. Accepts the SQLite
    /// timestamp form and RFC 3339; anything else is shown verbatim.
    pub fn created_at_display(&self) -> String {
        let raw = self.created_at.trim();
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return parsed.format("%Y-%m-%d %H:%M").to_string();
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return parsed.format("%Y-%m-%d %H:%M").to_string();
        }
        raw.to_string()
    }
}

/// Persisted order, as returned by `GET /orders/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredOrder {
    #[serde(deserialize_with = "lenient::or_default")]
    pub header: StoredOrderHeader,
    #[serde(rename = "lineItems", deserialize_with = "lenient::list")]
    pub line_items: Vec<StoredLineItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StoredOrderHeader {
    #[serde(rename = "SalesOrderID", deserialize_with = "lenient::optional_order_id")]
    pub sales_order_id: Option<OrderId>,
    #[serde(deserialize_with = "lenient::string")]
    pub sales_order_number: String,
    #[serde(deserialize_with = "lenient::string")]
    pub order_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub due_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ship_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub purchase_order_number: String,
    #[serde(deserialize_with = "lenient::string")]
    pub customer_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub customer_company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub customer_address: String,
    #[serde(deserialize_with = "lenient::string")]
    pub customer_city_state_zip: String,
    #[serde(deserialize_with = "lenient::string")]
    pub customer_phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vendor_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vendor_company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vendor_address: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vendor_city_state_zip: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vendor_phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vendor_fax: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vendor_website: String,
    #[serde(deserialize_with = "lenient::string")]
    pub sales_person: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ship_to_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ship_to_company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ship_to_address: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ship_to_city_state_zip: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ship_to_phone: String,
    #[serde(deserialize_with = "lenient::number")]
    pub sub_total: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub tax_rate: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub tax_amt: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub shipping_handling: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub other: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_due: f64,
    #[serde(deserialize_with = "lenient::string")]
    pub terms: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ship_via: String,
    #[serde(rename = "FOB", deserialize_with = "lenient::string")]
    pub fob: String,
    #[serde(deserialize_with = "lenient::string")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StoredLineItem {
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

impl From<StoredLineItem> for LineItem {
    fn from(item: StoredLineItem) -> Self {
        Self {
            item_number: item.item_number,
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total,
        }
    }
}

/// Projects a stored order into the editable shape. Stored totals are taken
/// as persisted, not recomputed.
impl From<StoredOrder> for Document {
    fn from(order: StoredOrder) -> Self {
        let header = order.header;
        Self {
            invoice_number: header.sales_order_number,
            invoice_date: header.order_date,
            due_date: header.due_date,
            vendor: VendorBlock {
                name: header.vendor_name,
                company: header.vendor_company,
                address: header.vendor_address,
                city_state_zip: header.vendor_city_state_zip,
                phone: header.vendor_phone,
                fax: header.vendor_fax,
                website: header.vendor_website,
            },
            customer: ContactBlock {
                name: header.customer_name,
                company: header.customer_company,
                address: header.customer_address,
                city_state_zip: header.customer_city_state_zip,
                phone: header.customer_phone,
            },
            ship_to: ContactBlock {
                name: header.ship_to_name,
                company: header.ship_to_company,
                address: header.ship_to_address,
                city_state_zip: header.ship_to_city_state_zip,
                phone: header.ship_to_phone,
            },
            shipping: ShippingBlock {
                sales_person: header.sales_person,
                po_number: header.purchase_order_number,
                ship_date: header.ship_date,
                ship_via: header.ship_via,
                fob: header.fob,
                terms: header.terms,
            },
            line_items: order.line_items.into_iter().map(LineItem::from).collect(),
            totals: Totals {
                subtotal: header.sub_total,
                tax_rate: header.tax_rate,
                tax: header.tax_amt,
                shipping_handling: header.shipping_handling,
                other: header.other,
                total: header.total_due,
            },
        }
    }
}

/// Flattened body for `PUT /orders/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: String,
    pub purchase_order_number: String,
    pub customer_name: String,
    pub customer_company: String,
    pub customer_address: String,
    pub customer_city_state_zip: String,
    pub customer_phone: String,
    pub vendor_name: String,
    pub vendor_company: String,
    pub vendor_address: String,
    pub vendor_city_state_zip: String,
    pub vendor_phone: String,
    pub vendor_fax: String,
    pub vendor_website: String,
    pub sales_person: String,
    pub ship_to_name: String,
    pub ship_to_company: String,
    pub ship_to_address: String,
    pub ship_to_city_state_zip: String,
    pub ship_to_phone: String,
    pub sub_total: f64,
    pub tax_rate: f64,
    pub tax_amt: f64,
    pub shipping_handling: f64,
    pub other: f64,
    pub total_due: f64,
    pub terms: String,
    pub ship_via: String,
    pub fob: String,
    pub ship_date: String,
    pub line_items: Vec<LineItem>,
}

impl From<&Document> for UpdateOrderRequest {
    fn from(document: &Document) -> Self {
        let Document {
            vendor,
            customer,
            ship_to,
            shipping,
            totals,
            ..
        } = document;
        Self {
            invoice_number: document.invoice_number.clone(),
            invoice_date: document.invoice_date.clone(),
            due_date: document.due_date.clone(),
            purchase_order_number: shipping.po_number.clone(),
            customer_name: customer.name.clone(),
            customer_company: customer.company.clone(),
            customer_address: customer.address.clone(),
            customer_city_state_zip: customer.city_state_zip.clone(),
            customer_phone: customer.phone.clone(),
            vendor_name: vendor.name.clone(),
            vendor_company: vendor.company.clone(),
            vendor_address: vendor.address.clone(),
            vendor_city_state_zip: vendor.city_state_zip.clone(),
            vendor_phone: vendor.phone.clone(),
            vendor_fax: vendor.fax.clone(),
            vendor_website: vendor.website.clone(),
            sales_person: shipping.sales_person.clone(),
            ship_to_name: ship_to.name.clone(),
            ship_to_company: ship_to.company.clone(),
            ship_to_address: ship_to.address.clone(),
            ship_to_city_state_zip: ship_to.city_state_zip.clone(),
            ship_to_phone: ship_to.phone.clone(),
            sub_total: totals.subtotal,
            tax_rate: totals.tax_rate,
            tax_amt: totals.tax,
            shipping_handling: totals.shipping_handling,
            other: totals.other,
            total_due: totals.total,
            terms: shipping.terms.clone(),
            ship_via: shipping.ship_via.clone(),
            fob: shipping.fob.clone(),
            ship_date: shipping.ship_date.clone(),
            line_items: document.line_items.clone(),
        }
    }
}

/// `POST /upload` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub data: Document,
    #[serde(deserialize_with = "lenient::string")]
    pub filename: String,
}

/// `POST /orders` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(rename = "orderId")]
    pub order_id: Option<OrderId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
