//! Parsers for the `edit` subcommand's `--set` and `--item` arguments.

use std::str::FromStr;

use anyhow::{anyhow, Context};
use shared::domain::{FieldPath, LineItemEdit, LineItemField};

/// `path=value`, e.g. `vendor.phone=555-0100` or `totals.taxRate=8.25`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAssignment {
    pub path: FieldPath,
    pub value: String,
}

impl FromStr for FieldAssignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected PATH=VALUE, got '{s}'"))?;
        Ok(Self {
            path: path.parse()?,
            value: value.to_string(),
        })
    }
}

/// `index.field=value`, e.g. `0.quantity=3` or `2.description=Bolts`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAssignment {
    pub index: usize,
    pub edit: LineItemEdit,
}

impl FromStr for ItemAssignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, value) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected INDEX.FIELD=VALUE, got '{s}'"))?;
        let (index, field) = target
            .split_once('.')
            .ok_or_else(|| anyhow!("expected INDEX.FIELD=VALUE, got '{s}'"))?;
        let index = index
            .trim()
            .parse()
            .with_context(|| format!("'{index}' is not a line item index"))?;
        let field: LineItemField = field.parse()?;
        Ok(Self {
            index,
            edit: LineItemEdit::new(field, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{PartyField, TotalsField, VendorField};

    use super::*;

    #[test]
    fn parses_field_assignments() {
        let assignment: FieldAssignment = "vendor.phone=555-0100".parse().expect("assignment");
        assert_eq!(
            assignment,
            FieldAssignment {
                path: FieldPath::Vendor(VendorField::Party(PartyField::Phone)),
                value: "555-0100".into(),
            }
        );

        let rate: FieldAssignment = "totals.tax_rate=8.25".parse().expect("rate");
        assert_eq!(rate.path, FieldPath::Totals(TotalsField::TaxRate));
        assert_eq!(rate.value, "8.25");

        let blank: FieldAssignment = "dueDate=".parse().expect("blank");
        assert_eq!(blank.value, "");
    }

    #[test]
    fn rejects_malformed_field_assignments() {
        assert!("vendor.phone".parse::<FieldAssignment>().is_err());
        assert!("customer.fax=1".parse::<FieldAssignment>().is_err());
    }

    #[test]
    fn parses_item_assignments() {
        let quantity: ItemAssignment = "1.qty=3".parse().expect("quantity");
        assert_eq!(quantity.index, 1);
        assert_eq!(quantity.edit, LineItemEdit::Quantity(3.0));

        let description: ItemAssignment = "0.description=Bolts, hex=M8".parse().expect("desc");
        assert_eq!(description.index, 0);
        assert_eq!(
            description.edit,
            LineItemEdit::Description("Bolts, hex=M8".into())
        );
    }

    #[test]
    fn rejects_malformed_item_assignments() {
        assert!("quantity=3".parse::<ItemAssignment>().is_err());
        assert!("x.quantity=3".parse::<ItemAssignment>().is_err());
        assert!("0.lineTotal=3".parse::<ItemAssignment>().is_err());
    }
}
