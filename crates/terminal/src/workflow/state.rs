//! Workflow states and the stale-response guard.

use serde::Serialize;
use store_counter_core::ProductId;

/// Where the clerk is in composing an order.
///
/// States are ordered: later variants are further along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Nothing entered yet.
    #[default]
    Idle,
    /// Customer fields have input but no customer is registered.
    CustomerPending,
    /// A customer is registered.
    CustomerReady,
    /// A category is listed and products can be picked.
    CategorySelected,
    /// A product's detail is shown and a quantity can be confirmed.
    ProductSelected,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::CustomerPending => write!(f, "customer_pending"),
            Self::CustomerReady => write!(f, "customer_ready"),
            Self::CategorySelected => write!(f, "category_selected"),
            Self::ProductSelected => write!(f, "product_selected"),
        }
    }
}

/// Identifies one product-detail request.
///
/// Tags increase monotonically for the lifetime of a controller, resets
/// included, so a tag never matches a request from an earlier session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestTag(u64);

impl std::fmt::Display for RequestTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tracks the clerk's latest product pick.
///
/// Only the latest issued tag may settle; anything older is stale.
#[derive(Debug, Default)]
pub(crate) struct RequestTracker {
    issued: u64,
    latest: Option<(RequestTag, ProductId)>,
}

impl RequestTracker {
    /// Issue a tag for a new pick, superseding any outstanding one.
    pub(crate) fn issue(&mut self, product_id: ProductId) -> RequestTag {
        self.issued += 1;
        let tag = RequestTag(self.issued);
        self.latest = Some((tag, product_id));
        tag
    }

    /// Settle a response. Returns the requested product id if `tag` is the
    /// latest outstanding request, `None` if the response is stale.
    pub(crate) fn settle(&mut self, tag: RequestTag) -> Option<ProductId> {
        match self.latest {
            Some((latest, product_id)) if latest == tag => {
                self.latest = None;
                Some(product_id)
            }
            _ => None,
        }
    }

    /// The outstanding request, if any.
    pub(crate) const fn outstanding(&self) -> Option<(RequestTag, ProductId)> {
        self.latest
    }

    /// Make every outstanding request stale.
    pub(crate) fn invalidate(&mut self) {
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_are_ordered() {
        assert!(WorkflowState::Idle < WorkflowState::CustomerPending);
        assert!(WorkflowState::CustomerReady < WorkflowState::CategorySelected);
        assert!(WorkflowState::CategorySelected < WorkflowState::ProductSelected);
        assert_eq!(WorkflowState::default(), WorkflowState::Idle);
    }

    #[test]
    fn test_only_latest_tag_settles() {
        let mut tracker = RequestTracker::default();
        let a = tracker.issue(ProductId::new(1));
        let b = tracker.issue(ProductId::new(2));
        assert!(a < b);

        assert_eq!(tracker.settle(a), None);
        assert_eq!(tracker.outstanding(), Some((b, ProductId::new(2))));
        assert_eq!(tracker.settle(b), Some(ProductId::new(2)));
        // A tag settles once.
        assert_eq!(tracker.settle(b), None);
    }

    #[test]
    fn test_same_product_picked_twice_uses_newest_tag() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue(ProductId::new(5));
        let second = tracker.issue(ProductId::new(5));

        assert_eq!(tracker.settle(first), None);
        assert_eq!(tracker.settle(second), Some(ProductId::new(5)));
    }

    #[test]
    fn test_invalidate() {
        let mut tracker = RequestTracker::default();
        let tag = tracker.issue(ProductId::new(1));
        tracker.invalidate();
        assert_eq!(tracker.settle(tag), None);

        // Tags keep increasing after invalidation.
        let next = tracker.issue(ProductId::new(1));
        assert!(next > tag);
    }
}
