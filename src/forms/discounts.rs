use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::discount::{DiscountType, NewDiscount, UpdateDiscount};
use crate::forms::{dedupe_ids, normalize_amount, sanitize_inline_text};

const TITLE_MAX_LEN: u64 = 255;

/// Result type returned by the discount form helpers.
pub type DiscountFormResult<T> = Result<T, DiscountFormError>;

/// Errors that can occur while processing discount forms.
#[derive(Debug, Error)]
pub enum DiscountFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("discount title cannot be empty")]
    EmptyTitle,
    #[error("unknown discount type `{value}`")]
    UnknownType { value: String },
    #[error("invalid discount value `{value}`")]
    InvalidValue { value: Decimal },
    #[error("percentage discount must be between 0 and 100, got `{value}`")]
    PercentageOutOfRange { value: Decimal },
}

/// Check that `value` is acceptable for a discount of `discount_type`.
///
/// Returns the value rounded to two fractional digits.
pub fn validate_discount_value(
    discount_type: DiscountType,
    value: Decimal,
) -> DiscountFormResult<Decimal> {
    let normalized = normalize_amount(value).ok_or(DiscountFormError::InvalidValue { value })?;

    if discount_type == DiscountType::Percentage && normalized > Decimal::ONE_HUNDRED {
        return Err(DiscountFormError::PercentageOutOfRange { value });
    }

    Ok(normalized)
}

fn parse_type(raw: &str) -> DiscountFormResult<DiscountType> {
    DiscountType::parse(raw).ok_or_else(|| DiscountFormError::UnknownType {
        value: raw.to_string(),
    })
}

fn sanitize_title(raw: &str) -> DiscountFormResult<String> {
    let title = sanitize_inline_text(raw);
    if title.is_empty() {
        return Err(DiscountFormError::EmptyTitle);
    }
    Ok(title)
}

/// Payload emitted when creating a discount.
#[derive(Debug, Deserialize, Validate)]
pub struct AddDiscountForm {
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: String,
    /// `percentage` or `fixed`.
    #[serde(rename = "type")]
    pub discount_type: String,
    pub value: Decimal,
    /// Defaults to active when omitted.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Products to attach the discount to.
    #[serde(default)]
    pub products: Option<Vec<i32>>,
}

/// Sanitized discount payload plus the products to attach it to.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiscountSubmission {
    pub discount: NewDiscount,
    pub product_ids: Vec<i32>,
}

impl AddDiscountForm {
    pub fn into_new_discount(self) -> DiscountFormResult<NewDiscountSubmission> {
        self.validate()?;

        let title = sanitize_title(&self.title)?;
        let discount_type = parse_type(&self.discount_type)?;
        let value = validate_discount_value(discount_type, self.value)?;

        let discount =
            NewDiscount::new(title, discount_type, value).active(self.is_active.unwrap_or(true));

        Ok(NewDiscountSubmission {
            discount,
            product_ids: dedupe_ids(self.products.unwrap_or_default()),
        })
    }
}

/// Payload emitted when editing a discount. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditDiscountForm {
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub discount_type: Option<String>,
    pub value: Option<Decimal>,
    pub is_active: Option<bool>,
    /// When present, the discount ends up attached to exactly these products.
    pub products: Option<Vec<i32>>,
}

/// Sanitized discount patch plus an optional product sync.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountUpdateSubmission {
    pub updates: UpdateDiscount,
    pub product_ids: Option<Vec<i32>>,
}

impl EditDiscountForm {
    /// Convert into a patch.
    ///
    /// A value is only range-checked here when the type is submitted with it;
    /// otherwise the caller checks it against the stored type.
    pub fn into_update_discount(self) -> DiscountFormResult<DiscountUpdateSubmission> {
        self.validate()?;

        let mut updates = UpdateDiscount::new();

        if let Some(title) = self.title.as_deref() {
            updates = updates.title(sanitize_title(title)?);
        }

        let discount_type = self.discount_type.as_deref().map(parse_type).transpose()?;
        if let Some(discount_type) = discount_type {
            updates = updates.discount_type(discount_type);
        }

        if let Some(value) = self.value {
            let normalized = match discount_type {
                Some(discount_type) => validate_discount_value(discount_type, value)?,
                None => normalize_amount(value).ok_or(DiscountFormError::InvalidValue { value })?,
            };
            updates = updates.value(normalized);
        }

        if let Some(is_active) = self.is_active {
            updates = updates.active(is_active);
        }

        Ok(DiscountUpdateSubmission {
            updates,
            product_ids: self.products.map(dedupe_ids),
        })
    }
}
