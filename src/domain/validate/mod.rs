//! Field normalization and validation shared by every entity.

pub mod fields;

pub use fields::{
    collect_fields, format_price_input, mask_cpf, normalize_cpf, normalize_description,
    normalize_email, normalize_name, normalize_price, normalize_price_value, FieldError, RawPrice,
    ValidationErrors,
};
