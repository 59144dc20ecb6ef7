pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod discounts;
pub mod products;

#[cfg(test)]
pub(crate) mod test_support;
