//! Ordered filter chains.

use crate::filter::{Filter, SharedFilter};
use fastroute_core::RequestContext;
use std::fmt;
use std::sync::Arc;

/// An ordered list of filters.
///
/// The router keeps one global chain plus one chain per route. Chains are
/// built during setup and only read while serving, so cloning one is an
/// `Arc` clone per filter.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<SharedFilter>,
}

impl FilterChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter, builder style.
    #[must_use]
    pub fn with(mut self, filter: impl Filter) -> Self {
        self.push(filter);
        self
    }

    /// Appends a filter.
    pub fn push(&mut self, filter: impl Filter) {
        self.filters.push(Arc::new(filter));
    }

    /// Appends an already shared filter.
    pub fn push_shared(&mut self, filter: SharedFilter) {
        self.filters.push(filter);
    }

    /// Appends every filter of `other`, after this chain's own.
    pub fn extend(&mut self, other: &FilterChain) {
        self.filters.extend(other.filters.iter().cloned());
    }

    /// Returns the number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if the chain holds no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the filter names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Runs the filters in order.
    ///
    /// Returns `false` as soon as one filter stops the request; the remaining
    /// filters are skipped.
    pub fn run(&self, ctx: &mut RequestContext) -> bool {
        for filter in &self.filters {
            if !filter.filter(ctx) {
                tracing::debug!(
                    filter = filter.name(),
                    http.method = %ctx.method(),
                    http.path = ctx.path(),
                    "Filter stopped request"
                );
                return false;
            }
        }
        true
    }
}

impl<F: Filter> FromIterator<F> for FilterChain {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut chain = Self::new();
        for filter in iter {
            chain.push(filter);
        }
        chain
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.names())
            .finish()
    }
}
