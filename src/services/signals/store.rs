//! Signal store for computing and caching signals per series.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::services::signals::SignalEngine;
use crate::types::{BarSeries, Signal};

/// Cache entry for a computed signal.
struct CachedSignal {
    /// Series the signal was built from.
    series: BarSeries,
    signal: Signal,
}

/// Memoizes the latest signal per symbol and profile.
///
/// An entry is reused only while the series snapshot is unchanged, bar
/// for bar, so a revised in-progress bar is re-analyzed. Safe to share
/// across tasks.
pub struct SignalStore {
    engine: SignalEngine,
    /// Cache key format: "{SYMBOL}:{profile}"
    cache: DashMap<String, CachedSignal>,
}

impl SignalStore {
    pub fn new(engine: SignalEngine) -> Arc<Self> {
        Arc::new(Self {
            engine,
            cache: DashMap::new(),
        })
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    /// Signal for the latest bar of `series`, computed at most once per
    /// snapshot.
    pub fn get_signal(&self, symbol: &str, series: &BarSeries) -> Signal {
        let cache_key = self.cache_key(symbol);

        // Check cache
        if let Some(cached) = self.cache.get(&cache_key) {
            if cached.series == *series {
                debug!("Signal cache hit for {}", cache_key);
                return cached.signal.clone();
            }
        }

        let signal = self.engine.analyze(symbol, series);

        self.cache.insert(
            cache_key,
            CachedSignal {
                series: series.clone(),
                signal: signal.clone(),
            },
        );

        signal
    }

    /// Last cached signal for a symbol, if any.
    pub fn cached(&self, symbol: &str) -> Option<Signal> {
        self.cache.get(&self.cache_key(symbol)).map(|c| c.signal.clone())
    }

    pub fn invalidate(&self, symbol: &str) {
        self.cache.remove(&self.cache_key(symbol));
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn cache_key(&self, symbol: &str) -> String {
        format!("{}:{:?}", symbol.to_uppercase(), self.engine.config().profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::types::Bar;

    fn series(count: usize) -> BarSeries {
        let bars = (0..count)
            .map(|i| {
                let close = 100.0 + i as f64;
                Bar::new(i as i64 * 60_000, close, close + 1.0, close - 1.0, close, 1000.0)
            })
            .collect();
        BarSeries::new(bars).unwrap()
    }

    fn store() -> Arc<SignalStore> {
        SignalStore::new(SignalEngine::new(EngineConfig::default()).unwrap())
    }

    #[test]
    fn test_cache_reused_for_same_snapshot() {
        let store = store();
        let first = store.get_signal("btc", &series(60));
        let second = store.get_signal("BTC", &series(60));
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cache_refreshed_when_series_grows() {
        let store = store();
        let first = store.get_signal("btc", &series(60));
        let second = store.get_signal("btc", &series(61));
        assert_ne!(first.timestamp, second.timestamp);
        assert_eq!(store.cached("btc").unwrap().timestamp, second.timestamp);
    }

    #[test]
    fn test_cache_refreshed_when_last_bar_revised() {
        let store = store();
        let original = series(60);
        let first = store.get_signal("doge", &original);

        let mut bars = original.bars().to_vec();
        let last = bars.len() - 1;
        let close = bars[last - 1].close * 0.88;
        bars[last] = Bar::new(bars[last].time, close, close * 1.01, close * 0.99, close, 10_000.0);
        let revised = BarSeries::new(bars).unwrap();

        let second = store.get_signal("doge", &revised);
        assert_eq!(second.timestamp, first.timestamp);
        assert_eq!(second, store.engine().analyze("doge", &revised));
        assert_ne!(second, first);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalidate() {
        let store = store();
        store.get_signal("eth", &series(10));
        assert!(!store.is_empty());
        store.invalidate("ETH");
        assert!(store.is_empty());
        assert!(store.cached("eth").is_none());
    }
}
