//! Unit price resolution shared by the yield and loot calculators.

use calc_core::{ItemId, MarketBook, MarketValue, PriceOverrides};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Share of a sale that reaches the seller after market tax.
pub const MARKET_TAX_COEFFICIENT: f64 = 0.98;

/// Coin value of an item from its market value alone.
///
/// Vendor price when neither side of the book is available, the available side
/// when only one is, otherwise the ask/bid mean rounded to the nearest coin.
///
/// Example:
/// ask=10, bid=20 gives 15; ask=10, bid unavailable gives 10.
pub fn market_price(value: &MarketValue) -> Decimal {
    match (value.ask, value.bid) {
        (None, None) => value.sell_price,
        (Some(ask), None) => ask,
        (None, Some(bid)) => bid,
        (Some(ask), Some(bid)) => ((ask + bid) / Decimal::TWO)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
    }
}

/// Coin value of `item`: override, then 1 for coin, then the market fallback chain.
/// Items unknown to the market book are worth 0.
pub fn unit_price(item: &ItemId, overrides: &PriceOverrides, market: &MarketBook) -> Decimal {
    if let Some(p) = overrides.get(item) {
        return *p;
    }
    if item.is_coin() {
        return Decimal::ONE;
    }
    match market.get(item) {
        Some(value) => market_price(value),
        None => {
            debug!(%item, "no market value, pricing at zero");
            Decimal::ZERO
        }
    }
}

/// Lossy conversion for throughput math.
pub fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Borrowed pricing inputs for one computation.
#[derive(Clone, Copy, Debug)]
pub struct PriceResolver<'a> {
    overrides: &'a PriceOverrides,
    market: &'a MarketBook,
}

impl<'a> PriceResolver<'a> {
    pub fn new(overrides: &'a PriceOverrides, market: &'a MarketBook) -> Self {
        Self { overrides, market }
    }

    pub fn price(&self, item: &ItemId) -> Decimal {
        unit_price(item, self.overrides, self.market)
    }

    pub fn price_f64(&self, item: &ItemId) -> f64 {
        to_f64(self.price(item))
    }

    pub fn market(&self) -> &'a MarketBook {
        self.market
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn book(item: &str, ask: Option<i64>, bid: Option<i64>, sell: i64) -> MarketBook {
        let mut b = MarketBook::default();
        b.insert(
            ItemId::from(item),
            MarketValue {
                ask: ask.map(|v| Decimal::new(v, 0)),
                bid: bid.map(|v| Decimal::new(v, 0)),
                sell_price: Decimal::new(sell, 0),
            },
        );
        b
    }

    #[test]
    fn fallback_chain() {
        let none = PriceOverrides::new();
        let item = ItemId::from("/items/egg");
        assert_eq!(unit_price(&item, &none, &book("/items/egg", None, None, 7)), Decimal::new(7, 0));
        assert_eq!(unit_price(&item, &none, &book("/items/egg", Some(10), None, 7)), Decimal::new(10, 0));
        assert_eq!(unit_price(&item, &none, &book("/items/egg", None, Some(12), 7)), Decimal::new(12, 0));
        assert_eq!(unit_price(&item, &none, &book("/items/egg", Some(10), Some(20), 7)), Decimal::new(15, 0));
    }

    #[test]
    fn mean_rounds_half_up() {
        let none = PriceOverrides::new();
        let item = ItemId::from("/items/egg");
        assert_eq!(unit_price(&item, &none, &book("/items/egg", Some(10), Some(15), 7)), Decimal::new(13, 0));
    }

    #[test]
    fn override_wins() {
        let mut overrides = PriceOverrides::new();
        overrides.insert(ItemId::from("/items/egg"), Decimal::new(99, 0));
        let item = ItemId::from("/items/egg");
        for b in [
            book("/items/egg", Some(10), Some(20), 7),
            book("/items/egg", None, None, 7),
            MarketBook::default(),
        ] {
            assert_eq!(unit_price(&item, &overrides, &b), Decimal::new(99, 0));
        }
    }

    #[test]
    fn explicit_zero_override_is_honored() {
        let mut overrides = PriceOverrides::new();
        overrides.insert(ItemId::from("/items/egg"), Decimal::ZERO);
        let b = book("/items/egg", Some(10), Some(20), 7);
        assert_eq!(unit_price(&ItemId::from("/items/egg"), &overrides, &b), Decimal::ZERO);
    }

    #[test]
    fn coin_and_unknown_items() {
        let none = PriceOverrides::new();
        let empty = MarketBook::default();
        assert_eq!(unit_price(&ItemId::coin(), &none, &empty), Decimal::ONE);
        assert_eq!(unit_price(&ItemId::from("/items/nothing"), &none, &empty), Decimal::ZERO);
        let r = PriceResolver::new(&none, &empty);
        assert_eq!(r.price_f64(&ItemId::coin()), 1.0);
    }

    proptest! {
        #[test]
        fn mean_lies_between_sides(ask in 0i64..1_000_000, bid in 0i64..1_000_000) {
            let p = market_price(&MarketValue {
                ask: Some(Decimal::new(ask, 0)),
                bid: Some(Decimal::new(bid, 0)),
                sell_price: Decimal::ZERO,
            });
            prop_assert!(p >= Decimal::new(ask.min(bid), 0));
            prop_assert!(p <= Decimal::new(ask.max(bid), 0));
        }
    }
}
