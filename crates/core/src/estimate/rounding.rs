use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::DomainError;

/// Whole currency units, half-up.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Nearest tenth of a square foot, half-up.
pub fn round_area(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

pub fn checked_product(left: Decimal, right: Decimal) -> Result<Decimal, DomainError> {
    left.checked_mul(right).ok_or_else(out_of_range)
}

pub fn checked_total(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal, DomainError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value).ok_or_else(out_of_range))
}

pub fn percent_of(value: Decimal, percent: Decimal) -> Result<Decimal, DomainError> {
    Ok(round_currency(checked_product(value, percent)? / Decimal::ONE_HUNDRED))
}

fn out_of_range() -> DomainError {
    DomainError::InvalidArgument("carpet area is too large to estimate".to_string())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{checked_product, checked_total, percent_of, round_area, round_currency};
    use crate::errors::DomainError;

    #[test]
    fn currency_rounds_half_up() {
        assert_eq!(round_currency(Decimal::new(287_005, 1)), Decimal::from(28_701));
        assert_eq!(round_currency(Decimal::new(287_004, 1)), Decimal::from(28_700));
        assert_eq!(round_currency(Decimal::new(98_155_62, 2)), Decimal::from(98_156));
    }

    #[test]
    fn area_rounds_to_one_decimal() {
        assert_eq!(round_area(Decimal::new(92_307, 4)), Decimal::new(92, 1));
        assert_eq!(round_area(Decimal::new(5_775, 3)), Decimal::new(58, 1));
    }

    #[test]
    fn percent_of_rounds_result() {
        assert_eq!(
            percent_of(Decimal::from(574_010), Decimal::from(5)),
            Ok(Decimal::from(28_701))
        );
        assert_eq!(
            percent_of(Decimal::from(643_465), Decimal::from(10)),
            Ok(Decimal::from(64_347))
        );
    }

    #[test]
    fn overflow_is_an_invalid_argument() {
        let too_large =
            DomainError::InvalidArgument("carpet area is too large to estimate".to_string());

        assert_eq!(checked_product(Decimal::MAX, Decimal::TWO), Err(too_large.clone()));
        assert_eq!(checked_total([Decimal::MAX, Decimal::ONE]), Err(too_large.clone()));
        assert_eq!(percent_of(Decimal::MAX, Decimal::from(18)), Err(too_large));
        assert_eq!(
            checked_total([Decimal::from(2), Decimal::from(3)]),
            Ok(Decimal::from(5))
        );
    }
}
