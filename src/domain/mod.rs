pub mod discount;
pub mod pagination;
pub mod pricing;
pub mod product;
pub mod sorting;
