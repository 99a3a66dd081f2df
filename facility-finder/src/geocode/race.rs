//! First-settled-of-N combinator.

use std::future::Future;

use futures::future::select_all;
use tracing::trace;

/// Await several futures and return the output of whichever completes
/// first. The others are dropped.
///
/// "Completes" includes completing with an error: a fast failure beats a
/// slow success. Returns `None` only for an empty input.
pub async fn first_settled<F>(futures: Vec<F>) -> Option<F::Output>
where
    F: Future,
{
    if futures.is_empty() {
        return None;
    }

    let contenders = futures.len();
    let pinned: Vec<_> = futures.into_iter().map(Box::pin).collect();
    let (output, winner, _losers) = select_all(pinned).await;
    trace!(winner = winner, contenders = contenders, "Race settled");
    Some(output)
}
