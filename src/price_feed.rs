// 8.0: price feed collaborator.
//
// The ledger never fetches prices. Callers hand in a feed (or plain prices)
// whenever a computation needs a mark. Any market-data pipeline can implement
// the trait; the in-memory table below is what tests and the simulator use.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Price, Symbol, Timestamp};

// A symbol snapshot as a feed would deliver it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub symbol: Symbol,
    pub price: Price,
    pub high_24h: Price,
    pub low_24h: Price,
    pub volume_24h: Decimal,
    pub change_24h_percent: Decimal,
    pub updated_at: Timestamp,
}

impl MarketQuote {
    // Flat snapshot when only a mark price is known
    pub fn flat(symbol: Symbol, price: Price, timestamp: Timestamp) -> Self {
        Self {
            symbol,
            price,
            high_24h: price,
            low_24h: price,
            volume_24h: Decimal::ZERO,
            change_24h_percent: Decimal::ZERO,
            updated_at: timestamp,
        }
    }
}

pub trait PriceFeed {
    fn quote(&self, symbol: Symbol) -> Option<MarketQuote>;

    fn price(&self, symbol: Symbol) -> Option<Price> {
        self.quote(symbol).map(|q| q.price)
    }
}

// In-memory feed backed by a symbol map
#[derive(Debug, Clone, Default)]
pub struct StaticPriceFeed {
    quotes: HashMap<Symbol, MarketQuote>,
}

impl StaticPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&mut self, symbol: Symbol, price: Price, timestamp: Timestamp) {
        self.quotes
            .insert(symbol, MarketQuote::flat(symbol, price, timestamp));
    }

    pub fn set_quote(&mut self, quote: MarketQuote) {
        self.quotes.insert(quote.symbol, quote);
    }
}

impl PriceFeed for StaticPriceFeed {
    fn quote(&self, symbol: Symbol) -> Option<MarketQuote> {
        self.quotes.get(&symbol).cloned()
    }
}
