// [libs/core/retry/src/policy.rs]
/*!
 * APARATO: RETRY POLICY
 * RESPONSABILIDAD: EJECUTA UNA OPERACIÓN ASÍNCRONA APLICANDO LA POLÍTICA DE
 * REINTENTO POR CATEGORÍA DE §4.4.
 *
 * RETRIABLE: backoff exponencial con jitter, hasta 5 intentos, base=1s,
 * max=30s; tras `attempt > 2` invoca el callback de proveedor alterno.
 * FATAL: 0 reintentos, burbujea de inmediato.
 * BUSINESS: 1 reintento tras 5s fijos, luego se pone en cuarentena.
 */

use crate::category::{Classifiable, FailureCategory};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

const RETRIABLE_MAX_ATTEMPTS: u32 = 5;
const RETRIABLE_BASE_DELAY: Duration = Duration::from_secs(1);
const RETRIABLE_MAX_DELAY: Duration = Duration::from_secs(30);
const RETRIABLE_ALTERNATE_AFTER_ATTEMPT: u32 = 2;
const BUSINESS_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Backoff exponencial con "equal jitter": mitad fija, mitad aleatoria,
/// acotado por `max`.
pub fn backoff_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    let exp = base.saturating_mul(1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX));
    let capped = exp.min(max);
    let half = capped / 2;
    let jitter = rand::thread_rng().gen_range(0..=half.as_millis().max(1) as u64);
    half + Duration::from_millis(jitter)
}

/// Ejecuta `op` reintentando según la categoría que `E` reporte vía
/// `Classifiable`. `on_alternate` se invoca cuando un fallo RETRIABLE
/// sobrevive más de `RETRIABLE_ALTERNATE_AFTER_ATTEMPT` intentos, como señal
/// para que el llamador cambie de proveedor antes del siguiente intento.
pub async fn execute_with_category<T, E, F, Fut>(
    mut op: F,
    mut on_attempt_failed: impl FnMut(FailureCategory, u32, &E),
    mut on_alternate: impl FnMut(),
) -> Result<T, E>
where
    E: Classifiable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let category = err.category();
                on_attempt_failed(category, attempt, &err);

                match category {
                    FailureCategory::Fatal => return Err(err),
                    FailureCategory::Business => {
                        if attempt >= 2 {
                            return Err(err);
                        }
                        tokio::time::sleep(BUSINESS_RETRY_DELAY).await;
                        attempt += 1;
                    }
                    FailureCategory::Retriable => {
                        if attempt >= RETRIABLE_MAX_ATTEMPTS {
                            return Err(err);
                        }
                        if attempt > RETRIABLE_ALTERNATE_AFTER_ATTEMPT {
                            on_alternate();
                        }
                        let delay = backoff_delay(attempt, RETRIABLE_BASE_DELAY, RETRIABLE_MAX_DELAY);
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                }
            }
        }
    }
}

/// Reintento de intervalo fijo sin clasificación, para la sección crítica de
/// staging post-compra (§7: hasta 5 intentos, 500ms base) donde cualquier
/// fallo es igualmente urgente — el riesgo es pérdida de datos, no un
/// proveedor externo mal comportado.
pub async fn execute_fixed_retry<T, E, F, Fut>(
    attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= attempts {
                    return Err(err);
                }
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_delay_is_capped_at_max() {
        let d = backoff_delay(10, Duration::from_secs(1), Duration::from_secs(30));
        assert!(d <= Duration::from_secs(30));
    }

    #[test]
    fn backoff_delay_grows_with_attempt() {
        let low = backoff_delay(1, Duration::from_secs(1), Duration::from_secs(30));
        let high_cap = backoff_delay(6, Duration::from_secs(1), Duration::from_secs(30));
        assert!(low <= Duration::from_secs(1));
        assert!(high_cap <= Duration::from_secs(30));
    }

    #[derive(Debug)]
    struct FakeError(FailureCategory);

    impl Classifiable for FakeError {
        fn category(&self) -> FailureCategory {
            self.0
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_bubbles_up_without_retry() {
        let mut calls = 0;
        let result: Result<(), FakeError> = execute_with_category(
            || {
                calls += 1;
                async { Err(FakeError(FailureCategory::Fatal)) }
            },
            |_, _, _| {},
            || {},
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn business_retries_once_then_quarantines() {
        let mut calls = 0;
        let result: Result<(), FakeError> = execute_with_category(
            || {
                calls += 1;
                async { Err(FakeError(FailureCategory::Business)) }
            },
            |_, _, _| {},
            || {},
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retriable_invokes_alternate_after_second_attempt() {
        let mut calls = 0;
        let mut alternate_calls = 0;
        let result: Result<(), FakeError> = execute_with_category(
            || {
                calls += 1;
                async { Err(FakeError(FailureCategory::Retriable)) }
            },
            |_, _, _| {},
            || {
                alternate_calls += 1;
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls, RETRIABLE_MAX_ATTEMPTS);
        assert!(alternate_calls > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_without_further_retries_once_ok() {
        let mut calls = 0;
        let result: Result<u8, FakeError> = execute_with_category(
            || {
                calls += 1;
                async move {
                    if calls < 2 {
                        Err(FakeError(FailureCategory::Retriable))
                    } else {
                        Ok(42)
                    }
                }
            },
            |_, _, _| {},
            || {},
        )
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_retry_stops_after_given_attempts() {
        let mut calls = 0;
        let result: Result<(), &str> = execute_fixed_retry(5, Duration::from_millis(1), || {
            calls += 1;
            async { Err("boom") }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 5);
    }
}
