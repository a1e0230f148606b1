// src/formatting/dispatcher.rs
//! Order-preserving fan-out over sibling items.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

/// Runs `render` over every item concurrently and returns the results in
/// input order, whatever order they complete in.
///
/// Concurrency is bounded where the work actually waits: every network call
/// made under `render` takes a permit from the converter's shared semaphore,
/// so nested fan-outs at any depth draw from one pool. Permits are never
/// held across a fan-out, which keeps deep trees from deadlocking.
pub async fn map_ordered<'a, T, R, F, Fut>(items: &'a [T], render: F) -> Vec<R>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = R>,
{
    let mut slots: Vec<Option<R>> = Vec::with_capacity(items.len());
    slots.resize_with(items.len(), || None);

    let mut pending: FuturesUnordered<_> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let fut = render(item);
            async move { (index, fut.await) }
        })
        .collect();

    while let Some((index, result)) = pending.next().await {
        slots[index] = Some(result);
    }

    // Every slot was filled: FuturesUnordered yields each future exactly once.
    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::Rng;
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let items: Vec<u64> = (0..20).collect();
        let delays: Vec<u64> = {
            let mut rng = rand::rng();
            items.iter().map(|_| rng.random_range(0..15)).collect()
        };

        let results = map_ordered(&items, |n| {
            let delay = delays[*n as usize];
            async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                n * 10
            }
        })
        .await;

        assert_eq!(results, items.iter().map(|n| n * 10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_reverse_completion_order() {
        let items = vec![30u64, 20, 10, 0];
        let results = map_ordered(&items, |ms| async move {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
            *ms
        })
        .await;
        assert_eq!(results, items);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let items: Vec<u8> = Vec::new();
        let results = map_ordered(&items, |b| async move { *b }).await;
        assert!(results.is_empty());
    }
}
