// [libs/infra/provider/src/cache.rs]
/*!
 * APARATO: BALANCE CACHE
 * RESPONSABILIDAD: EVITA UNA CONSULTA DE SALDO POR CADA COMPRA (§4.3: "may be cached for ≤60s").
 */

use recharge_domain_models::ProviderName;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const BALANCE_TTL: Duration = Duration::from_secs(60);

pub struct BalanceCache {
    entries: Mutex<HashMap<ProviderName, (i64, Instant)>>,
}

impl Default for BalanceCache {
    fn default() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }
}

impl BalanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retorna el saldo cacheado si no ha excedido el TTL de 60s.
    pub fn get(&self, provider: ProviderName) -> Option<i64> {
        let entries = self.entries.lock().expect("balance cache poisoned");
        entries.get(&provider).and_then(|(value, fetched_at)| {
            if fetched_at.elapsed() < BALANCE_TTL {
                Some(*value)
            } else {
                None
            }
        })
    }

    pub fn set(&self, provider: ProviderName, value: i64) {
        let mut entries = self.entries.lock().expect("balance cache poisoned");
        entries.insert(provider, (value, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_empty_cache() {
        let cache = BalanceCache::new();
        assert_eq!(cache.get(ProviderName::Taecel), None);
    }

    #[test]
    fn hit_after_set() {
        let cache = BalanceCache::new();
        cache.set(ProviderName::Taecel, 1000);
        assert_eq!(cache.get(ProviderName::Taecel), Some(1000));
    }

    #[test]
    fn providers_are_cached_independently() {
        let cache = BalanceCache::new();
        cache.set(ProviderName::Taecel, 1000);
        assert_eq!(cache.get(ProviderName::Mst), None);
    }
}
