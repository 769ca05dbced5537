use super::{cell_number, cell_text, ColumnSpec, SheetEntity};
use crate::domain::validate::{
    collect_fields, normalize_description, normalize_name, normalize_price_value, RawPrice,
    ValidationErrors,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::text("Name"),
    ColumnSpec::number("Price"),
    ColumnSpec::text("Description"),
];

/// A catalog item row of the `Product` sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,
}

/// Product fields as submitted: `price` is a number or the text typed in the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[schema(value_type = String, example = "10,50")]
    pub price: RawPrice,
}

impl ProductInput {
    pub fn new(name: &str, description: &str, price: impl Into<RawPrice>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            price: price.into(),
        }
    }
}

impl From<&Product> for ProductInput {
    fn from(p: &Product) -> Self {
        Self::new(&p.name, &p.description, p.price)
    }
}

impl SheetEntity for Product {
    type Input = ProductInput;

    const LABEL: &'static str = "product";

    fn columns() -> &'static [ColumnSpec] {
        COLUMNS
    }

    fn from_input(input: &ProductInput) -> Result<Self, ValidationErrors> {
        let (name, price, description) = collect_fields(
            normalize_name(&input.name),
            normalize_price_value(&input.price),
            normalize_description(&input.description),
        )?;
        Ok(Product {
            name,
            description,
            price,
            row_index: None,
        })
    }

    fn to_cells(&self) -> Vec<JsonValue> {
        vec![
            JsonValue::from(self.name.clone()),
            JsonValue::from(self.price),
            JsonValue::from(self.description.clone()),
        ]
    }

    fn from_cells(row_index: u32, cells: &[JsonValue]) -> Self {
        Product {
            name: cell_text(cells, 0),
            price: cell_number(cells, 1),
            description: cell_text(cells, 2),
            row_index: Some(row_index),
        }
    }

    fn row_index(&self) -> Option<u32> {
        self.row_index
    }

    fn with_row_index(mut self, row_index: u32) -> Self {
        self.row_index = Some(row_index);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_text_is_unmasked() {
        let p = Product::from_input(&ProductInput::new("Mesa", "Mesa de jantar", "10,50")).unwrap();
        assert_eq!(p.price, 10.5);
    }

    #[test]
    fn price_accepts_wire_number_or_string() {
        let input: ProductInput =
            serde_json::from_value(json!({"name": "Mesa", "description": "Mesa de jantar", "price": 99.9}))
                .unwrap();
        assert_eq!(input.price, RawPrice::Number(99.9));
        let input: ProductInput =
            serde_json::from_value(json!({"name": "Mesa", "description": "Mesa de jantar", "price": "abc"}))
                .unwrap();
        let errs = Product::from_input(&input).unwrap_err();
        assert_eq!(errs.fields().len(), 1);
        assert!(errs.has_field("price"));
    }

    #[test]
    fn stored_price_reads_back_as_number() {
        let p = Product::from_cells(2, &[json!("Mesa"), json!("12,5"), json!("Mesa de jantar")]);
        assert_eq!(p.price, 12.5);
        assert_eq!(p.row_index, Some(2));
    }
}
