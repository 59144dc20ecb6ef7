use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{dedupe_ids, normalize_amount, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 255;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The price is negative or exceeds the stored precision.
    #[error("invalid price `{value}`")]
    InvalidPrice { value: Decimal },
}

/// Payload emitted when creating a product.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Base price.
    pub price: Decimal,
    /// Discounts to attach, in application order.
    #[serde(default)]
    pub discounts: Option<Vec<i32>>,
}

/// Sanitized product payload plus the discounts to attach to it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProductSubmission {
    pub product: NewProduct,
    pub discount_ids: Vec<i32>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProductSubmission> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price = normalize_amount(self.price)
            .ok_or(ProductFormError::InvalidPrice { value: self.price })?;

        let mut product = NewProduct::new(sanitized_name, price);

        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            product = product.with_description(description);
        }

        Ok(NewProductSubmission {
            product,
            discount_ids: dedupe_ids(self.discounts.unwrap_or_default()),
        })
    }
}

/// Payload emitted when editing an existing product.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditProductForm {
    /// Optional new name.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
    /// Optional description update (empty string clears the existing description).
    pub description: Option<String>,
    /// Optional price update.
    pub price: Option<Decimal>,
    /// When present, replaces the attached discounts in this order.
    pub discounts: Option<Vec<i32>>,
}

/// Sanitized product patch plus an optional discount replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdateSubmission {
    pub updates: UpdateProduct,
    pub discount_ids: Option<Vec<i32>>,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<ProductUpdateSubmission> {
        self.validate()?;

        let mut updates = UpdateProduct::new();

        if let Some(name) = self.name {
            let sanitized = sanitize_inline_text(&name);
            if sanitized.is_empty() {
                return Err(ProductFormError::EmptyName);
            }
            updates = updates.name(sanitized);
        }

        if let Some(description) = self.description {
            let sanitized = sanitize_multiline_text(&description);
            if sanitized.is_empty() {
                updates = updates.description(None::<String>);
            } else {
                updates = updates.description(Some(sanitized));
            }
        }

        if let Some(price) = self.price {
            let normalized =
                normalize_amount(price).ok_or(ProductFormError::InvalidPrice { value: price })?;
            updates = updates.price(normalized);
        }

        Ok(ProductUpdateSubmission {
            updates,
            discount_ids: self.discounts.map(dedupe_ids),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn add_product_form_converts_successfully() {
        let form = AddProductForm {
            name: "  Deluxe  Product  ".to_string(),
            description: Some(" First line.\n\n Second line.  ".to_string()),
            price: dec!(19.999),
            discounts: Some(vec![4, 2, 4]),
        };

        let submission = form.into_new_product().expect("expected success");

        assert_eq!(submission.product.name, "Deluxe Product");
        assert_eq!(
            submission.product.description.as_deref(),
            Some("First line.\n\nSecond line.")
        );
        assert_eq!(submission.product.price, dec!(20.00));
        assert_eq!(submission.discount_ids, vec![4, 2]);
    }

    #[test]
    fn add_product_form_rejects_empty_name() {
        let form = AddProductForm {
            name: "   ".to_string(),
            description: None,
            price: dec!(1),
            discounts: None,
        };

        let result = form.into_new_product();

        assert!(matches!(result, Err(ProductFormError::EmptyName)));
    }

    #[test]
    fn add_product_form_rejects_negative_price() {
        let form = AddProductForm {
            name: "Widget".to_string(),
            description: None,
            price: dec!(-5),
            discounts: None,
        };

        let result = form.into_new_product();

        assert!(matches!(
            result,
            Err(ProductFormError::InvalidPrice { value }) if value == dec!(-5)
        ));
    }

    #[test]
    fn add_product_form_parses_json_numbers() {
        let form: AddProductForm =
            serde_json::from_str(r#"{"name":"Lamp","price":1000.5,"discounts":[1,2]}"#)
                .expect("valid json");

        let submission = form.into_new_product().expect("expected success");

        assert_eq!(submission.product.price, dec!(1000.50));
        assert!(submission.product.description.is_none());
        assert_eq!(submission.discount_ids, vec![1, 2]);
    }

    #[test]
    fn edit_product_form_converts_updates() {
        let form = EditProductForm {
            name: Some("  Premium  Widget ".to_string()),
            description: Some(" \n\n ".to_string()),
            price: Some(dec!(5.5)),
            discounts: Some(vec![9, 9, 1]),
        };

        let submission = form.into_update_product().expect("expected success");

        assert_eq!(submission.updates.name.as_deref(), Some("Premium Widget"));
        assert!(matches!(submission.updates.description, Some(None)));
        assert_eq!(submission.updates.price, Some(dec!(5.50)));
        assert_eq!(submission.discount_ids, Some(vec![9, 1]));
    }

    #[test]
    fn edit_product_form_leaves_discounts_alone_when_absent() {
        let submission = EditProductForm::default()
            .into_update_product()
            .expect("expected success");

        assert!(submission.updates.name.is_none());
        assert!(submission.updates.description.is_none());
        assert!(submission.discount_ids.is_none());
    }
}
