//! Timing of computations.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct Timed<V> {
    pub value: V,
    pub elapsed: Duration,
}
impl<V> Timed<V> {
    pub fn result<E>(f: impl FnOnce() -> Result<V, E>) -> Result<Timed<V>, E> {
        let start_time = Instant::now();
        f().map(|value| Timed {
            value,
            elapsed: start_time.elapsed(),
        })
    }

    pub async fn future(f: impl Future<Output = V>) -> Timed<V> {
        let start_time = Instant::now();
        let value = f.await;
        Timed {
            value,
            elapsed: start_time.elapsed(),
        }
    }
}
