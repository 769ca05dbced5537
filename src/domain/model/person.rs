use super::{cell_text, ColumnSpec, SheetEntity};
use crate::domain::validate::{
    collect_fields, normalize_cpf, normalize_email, normalize_name, ValidationErrors,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::text("Name"),
    ColumnSpec::text("CPF"),
    ColumnSpec::text("Email"),
];

/// A person row of the `User` sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Person {
    pub name: String,
    pub email: String,
    /// Eleven digits, no mask.
    pub cpf: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,
}

/// Person fields as typed into the form. The CPF may carry its display mask.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PersonInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cpf: String,
}

impl PersonInput {
    pub fn new(name: &str, email: &str, cpf: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            cpf: cpf.to_string(),
        }
    }
}

impl From<&Person> for PersonInput {
    fn from(p: &Person) -> Self {
        Self::new(&p.name, &p.email, &p.cpf)
    }
}

impl SheetEntity for Person {
    type Input = PersonInput;

    const LABEL: &'static str = "user";

    fn columns() -> &'static [ColumnSpec] {
        COLUMNS
    }

    fn from_input(input: &PersonInput) -> Result<Self, ValidationErrors> {
        let (name, email, cpf) = collect_fields(
            normalize_name(&input.name),
            normalize_email(&input.email),
            normalize_cpf(&input.cpf),
        )?;
        Ok(Person {
            name,
            email,
            cpf,
            row_index: None,
        })
    }

    fn to_cells(&self) -> Vec<JsonValue> {
        vec![
            JsonValue::from(self.name.clone()),
            JsonValue::from(self.cpf.clone()),
            JsonValue::from(self.email.clone()),
        ]
    }

    fn from_cells(row_index: u32, cells: &[JsonValue]) -> Self {
        Person {
            name: cell_text(cells, 0),
            cpf: cell_text(cells, 1),
            email: cell_text(cells, 2),
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
