//! Discount application and product enrichment.
//!
//! Discounts are applied one after another to a running price. The running
//! price is allowed to go negative between steps; only the final result is
//! floored at zero and rounded to cents. Because of that, the order of the
//! discounts matters for mixed percentage/fixed combinations.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::discount::{Discount, DiscountType};
use crate::domain::product::{EnrichedProduct, Product};

/// Number of fractional digits kept on prices.
pub const PRICE_SCALE: u32 = 2;

/// Final price of a product together with the amount saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub final_price: Decimal,
    pub savings: Decimal,
}

/// Apply `discounts` to `base_price` in the given order.
pub fn compute_final_price(base_price: Decimal, discounts: &[Discount]) -> Decimal {
    let mut result = base_price;

    for discount in discounts {
        match discount.discount_type {
            DiscountType::Percentage => {
                result -= result * (discount.value / Decimal::ONE_HUNDRED);
            }
            DiscountType::Fixed => {
                result -= discount.value;
            }
            DiscountType::Unknown => {
                log::warn!(
                    "Skipping discount {} with unsupported type while pricing",
                    discount.id
                );
            }
        }
    }

    round_price(result.max(Decimal::ZERO))
}

/// Final price and savings for `base_price` under `discounts`.
pub fn price_breakdown(base_price: Decimal, discounts: &[Discount]) -> PriceBreakdown {
    let final_price = compute_final_price(base_price, discounts);
    let savings = round_price(base_price - final_price);

    PriceBreakdown {
        final_price,
        savings,
    }
}

/// Attach `final_price` and `savings` to every product, keeping the input order.
pub fn enrich(products: Vec<Product>) -> Vec<EnrichedProduct> {
    products.into_iter().map(enrich_product).collect()
}

/// Enrich a single product with its derived prices.
pub fn enrich_product(product: Product) -> EnrichedProduct {
    let PriceBreakdown {
        final_price,
        savings,
    } = price_breakdown(product.price, &product.discounts);

    EnrichedProduct {
        product,
        final_price,
        savings,
    }
}

/// Round half-up to cents and pin the scale so `1000` renders as `1000.00`.
fn round_price(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn discount(id: i32, discount_type: DiscountType, value: Decimal) -> Discount {
        Discount {
            id,
            title: format!("Discount {id}"),
            discount_type,
            value,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn percentage(id: i32, value: Decimal) -> Discount {
        discount(id, DiscountType::Percentage, value)
    }

    fn fixed(id: i32, value: Decimal) -> Discount {
        discount(id, DiscountType::Fixed, value)
    }

    fn product(id: i32, price: Decimal, discounts: Vec<Discount>) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: None,
            price,
            discounts,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    #[test]
    fn no_discounts_keeps_base_price() {
        let breakdown = price_breakdown(dec!(49.99), &[]);

        assert_eq!(breakdown.final_price, dec!(49.99));
        assert_eq!(breakdown.savings, Decimal::ZERO);
    }

    #[test]
    fn full_percentage_discount_drives_price_to_zero() {
        let breakdown = price_breakdown(dec!(1234.56), &[percentage(1, dec!(100))]);

        assert_eq!(breakdown.final_price, Decimal::ZERO);
        assert_eq!(breakdown.savings, dec!(1234.56));
    }

    #[test]
    fn percentage_applies_to_running_price() {
        let discounts = [percentage(1, dec!(10)), percentage(2, dec!(10))];

        assert_eq!(compute_final_price(dec!(100), &discounts), dec!(81.00));
    }

    #[test]
    fn large_fixed_discount_clamps_only_at_the_end() {
        // 100 - 200 = -100, then -100 - (-10) = -90, floored to 0.
        let fixed_first = [fixed(1, dec!(200)), percentage(2, dec!(10))];
        // 100 - 10 = 90, then 90 - 200 = -110, floored to 0.
        let percentage_first = [percentage(2, dec!(10)), fixed(1, dec!(200))];

        let a = price_breakdown(dec!(100), &fixed_first);
        let b = price_breakdown(dec!(100), &percentage_first);

        assert_eq!(a.final_price, dec!(0.00));
        assert_eq!(a.savings, dec!(100.00));
        assert_eq!(b.final_price, dec!(0.00));
        assert_eq!(b.savings, dec!(100.00));
    }

    #[test]
    fn application_order_changes_mixed_results() {
        let fixed_first = [fixed(1, dec!(20)), percentage(2, dec!(10))];
        let percentage_first = [percentage(2, dec!(10)), fixed(1, dec!(20))];

        assert_eq!(compute_final_price(dec!(100), &fixed_first), dec!(72.00));
        assert_eq!(compute_final_price(dec!(100), &percentage_first), dec!(70.00));
    }

    #[test]
    fn rounds_half_up_to_cents() {
        // 10.05 * 0.5 = 5.025
        assert_eq!(
            compute_final_price(dec!(10.05), &[percentage(1, dec!(50))]),
            dec!(5.03)
        );
        // 0.99 * (1 - 0.3333) = 0.660033
        assert_eq!(
            compute_final_price(dec!(0.99), &[percentage(1, dec!(33.33))]),
            dec!(0.66)
        );
    }

    #[test]
    fn unknown_discount_type_is_ignored() {
        let discounts = [
            discount(1, DiscountType::Unknown, dec!(50)),
            fixed(2, dec!(5)),
        ];

        assert_eq!(compute_final_price(dec!(20), &discounts), dec!(15.00));
    }

    #[test]
    fn prices_never_go_negative() {
        let bases = [dec!(0), dec!(0.01), dec!(15.50), dec!(999.99)];
        let sequences = vec![
            vec![fixed(1, dec!(1000))],
            vec![percentage(1, dec!(100)), fixed(2, dec!(1))],
            vec![fixed(1, dec!(5000)), percentage(2, dec!(50)), fixed(3, dec!(1))],
            vec![percentage(1, dec!(0)), fixed(2, dec!(0))],
        ];

        for base in bases {
            for discounts in &sequences {
                let breakdown = price_breakdown(base, discounts);
                assert!(breakdown.final_price >= Decimal::ZERO);
                assert!(breakdown.savings >= Decimal::ZERO);
                assert_eq!(breakdown.savings, base - breakdown.final_price);
            }
        }
    }

    #[test]
    fn final_price_serializes_with_two_digits() {
        let price = compute_final_price(dec!(1000), &[]);

        assert_eq!(price.to_string(), "1000.00");
    }

    #[test]
    fn enrich_preserves_order_and_inputs() {
        let products = vec![
            product(3, dec!(1000), vec![percentage(1, dec!(10))]),
            product(1, dec!(1000), vec![percentage(2, dec!(20))]),
            product(2, dec!(1000), Vec::new()),
        ];
        let originals = products.clone();

        let enriched = enrich(products);

        let ids: Vec<i32> = enriched.iter().map(|item| item.product.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(enriched[0].final_price, dec!(900.00));
        assert_eq!(enriched[0].savings, dec!(100.00));
        assert_eq!(enriched[1].final_price, dec!(800.00));
        assert_eq!(enriched[2].final_price, dec!(1000.00));
        assert_eq!(enriched[2].savings, dec!(0.00));

        for (item, original) in enriched.iter().zip(originals) {
            assert_eq!(item.product, original);
        }
    }
}
