use std::future::Future;

use crate::error::MeteoError;

/// Drive `work` to completion unless `cancel` resolves first.
///
/// On cancellation `work` is dropped, which aborts any in-flight request and
/// releases its connection. Anything that resolves to `()` can cancel: a
/// oneshot receiver, `tokio::signal::ctrl_c`, or a `tokio::time::sleep` deadline.
pub async fn until<T, W, C>(work: W, cancel: C) -> Result<T, MeteoError>
where
    W: Future<Output = Result<T, MeteoError>>,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;

        _ = cancel => Err(MeteoError::Cancelled),
        result = work => result,
    }
}
