use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    error::Error,
    helpers::mask_endpoint,
    model::{Subscription, SubscriptionSummary},
    types::SubscriptionData,
};

/// In-memory subscription registry.
///
/// Records keep insertion order. Every mutation goes through the single
/// mutex; callers never hold it across an `.await`.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    items: Vec<Subscription>,
    next_id: u64,
}

impl SubscriptionRegistry {
    pub fn new() -> SubscriptionRegistry {
        SubscriptionRegistry::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a subscription or replaces the record with the same endpoint
    /// in place. Returns the record id and the new total.
    pub fn upsert(
        &self,
        subscription: SubscriptionData,
        expiration: Option<DateTime<Utc>>,
    ) -> Result<(u64, usize), Error> {
        let endpoint = match subscription.endpoint {
            Some(endpoint) if !endpoint.trim().is_empty() => endpoint,
            _ => return Err(Error::InvalidSubscription),
        };

        let mut inner = self.lock();

        if let Some(item) =
            inner.items.iter_mut().find(|item| item.endpoint == endpoint)
        {
            item.keys = subscription.keys;
            item.expiration = expiration;
            let id = item.id;
            info!("Subscription updated: {}", endpoint);
            return Ok((id, inner.items.len()));
        }

        let id = inner.next_id;
        inner.next_id += 1;
        info!("New subscription added: {}", endpoint);
        inner.items.push(Subscription {
            id,
            endpoint,
            keys: subscription.keys,
            expiration,
        });

        Ok((id, inner.items.len()))
    }

    pub fn list(&self) -> Vec<SubscriptionSummary> {
        self.lock()
            .items
            .iter()
            .map(|item| SubscriptionSummary {
                id: item.id,
                endpoint: mask_endpoint(&item.endpoint),
                keys: item.keys.is_some(),
            })
            .collect()
    }

    /// Removes the record at `position`; later positions shift down.
    pub fn remove_at(&self, position: usize) -> Result<usize, Error> {
        let mut inner = self.lock();

        if position >= inner.items.len() {
            return Err(Error::NotFound(String::from(
                "Subscription not found",
            )));
        }

        let item = inner.items.remove(position);
        info!("Subscription removed: {}", item.endpoint);

        Ok(inner.items.len())
    }

    /// Removes the record with the given id.
    pub fn remove(&self, id: u64) -> Result<usize, Error> {
        let mut inner = self.lock();

        let position = inner
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| {
                Error::NotFound(String::from("Subscription not found"))
            })?;

        let item = inner.items.remove(position);
        info!("Subscription removed: {}", item.endpoint);

        Ok(inner.items.len())
    }

    pub fn snapshot(&self) -> Vec<Subscription> {
        self.lock().items.clone()
    }

    /// Drops the given records in one pass. A record is dropped only if it
    /// is still stored exactly as in `gone`; an entry updated after the
    /// snapshot was taken stays.
    pub fn prune(&self, gone: &[Subscription]) -> usize {
        if gone.is_empty() {
            return 0;
        }

        let mut inner = self.lock();
        let before = inner.items.len();
        inner.items.retain(|item| !gone.contains(item));

        before - inner.items.len()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn data(endpoint: &str, auth: &str) -> SubscriptionData {
        SubscriptionData {
            endpoint: Some(endpoint.to_string()),
            expiration_time: None,
            keys: Some(json!({"p256dh": "p256dh", "auth": auth})),
        }
    }

    fn endpoints(registry: &SubscriptionRegistry) -> Vec<String> {
        registry
            .snapshot()
            .into_iter()
            .map(|item| item.endpoint)
            .collect()
    }

    #[test]
    fn test_upsert_same_endpoint_updates_in_place() {
        let registry = SubscriptionRegistry::new();

        let (first_id, total) = registry.upsert(data("A", "old"), None).unwrap();
        assert_eq!(total, 1);
        registry.upsert(data("B", "b"), None).unwrap();

        let (id, total) = registry.upsert(data("A", "new"), None).unwrap();
        assert_eq!(total, 2);
        assert_eq!(id, first_id);

        let stored = registry.snapshot();
        assert_eq!(stored[0].endpoint, "A");
        assert_eq!(stored[0].keys.as_ref().unwrap()["auth"], "new");
    }

    #[test]
    fn test_upsert_distinct_endpoints_appends() {
        let registry = SubscriptionRegistry::new();

        registry.upsert(data("A", "a"), None).unwrap();
        let (_, total) = registry.upsert(data("B", "b"), None).unwrap();

        assert_eq!(total, 2);
        assert_eq!(endpoints(&registry), vec!["A", "B"]);
    }

    #[test]
    fn test_upsert_rejects_missing_or_empty_endpoint() {
        let registry = SubscriptionRegistry::new();

        let mut missing = data("A", "a");
        missing.endpoint = None;
        assert!(matches!(
            registry.upsert(missing, None),
            Err(Error::InvalidSubscription)
        ));
        assert!(matches!(
            registry.upsert(data("  ", "a"), None),
            Err(Error::InvalidSubscription)
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let registry = SubscriptionRegistry::new();
        registry.upsert(data("A", "a"), None).unwrap();

        assert!(matches!(registry.remove_at(1), Err(Error::NotFound(_))));
        assert!(matches!(registry.remove_at(usize::MAX), Err(Error::NotFound(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_at_shifts_positions() {
        let registry = SubscriptionRegistry::new();
        for endpoint in ["A", "B", "C"] {
            registry.upsert(data(endpoint, "k"), None).unwrap();
        }

        assert_eq!(registry.remove_at(0).unwrap(), 2);
        assert_eq!(endpoints(&registry), vec!["B", "C"]);
    }

    #[test]
    fn test_remove_by_id_is_stable() {
        let registry = SubscriptionRegistry::new();
        let (a, _) = registry.upsert(data("A", "k"), None).unwrap();
        let (b, _) = registry.upsert(data("B", "k"), None).unwrap();
        let (c, _) = registry.upsert(data("C", "k"), None).unwrap();

        assert_eq!(registry.remove(a).unwrap(), 2);
        assert_eq!(registry.remove(c).unwrap(), 1);
        assert!(matches!(registry.remove(a), Err(Error::NotFound(_))));
        assert_eq!(registry.snapshot()[0].id, b);
    }

    #[test]
    fn test_resubscribe_after_removal_gets_fresh_id() {
        let registry = SubscriptionRegistry::new();
        let (a, _) = registry.upsert(data("A", "k"), None).unwrap();
        registry.remove(a).unwrap();

        let (again, _) = registry.upsert(data("A", "k"), None).unwrap();
        assert_ne!(again, a);
    }

    #[test]
    fn test_list_masks_endpoint_and_reports_keys() {
        let registry = SubscriptionRegistry::new();
        let long = format!("https://push.example.com/{}", "x".repeat(80));
        registry.upsert(data(&long, "k"), None).unwrap();

        let mut without_keys = data("short", "k");
        without_keys.keys = None;
        registry.upsert(without_keys, None).unwrap();

        let list = registry.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].endpoint, format!("{}...", &long[..50]));
        assert!(list[0].keys);
        assert_eq!(list[1].endpoint, "short...");
        assert!(!list[1].keys);
    }

    #[test]
    fn test_prune_preserves_survivor_order() {
        let registry = SubscriptionRegistry::new();
        for endpoint in ["A", "B", "C", "D"] {
            registry.upsert(data(endpoint, "k"), None).unwrap();
        }

        let gone: Vec<Subscription> = registry
            .snapshot()
            .into_iter()
            .filter(|item| item.endpoint == "B" || item.endpoint == "D")
            .collect();

        assert_eq!(registry.prune(&gone), 2);
        assert_eq!(endpoints(&registry), vec!["A", "C"]);
    }

    #[test]
    fn test_prune_keeps_record_updated_after_snapshot() {
        let registry = SubscriptionRegistry::new();
        registry.upsert(data("A", "old"), None).unwrap();
        let snapshot = registry.snapshot();

        registry.upsert(data("A", "fresh"), None).unwrap();

        assert_eq!(registry.prune(&snapshot), 0);
        assert_eq!(registry.len(), 1);
    }
}
