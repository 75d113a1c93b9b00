//! Memoization: cached-equivalent trees and the shared leaf registry.

use crate::error::ResolveResult;
use crate::node::{CacheSlot, ContextLeaf, LazyLeaf, LazyString};
use std::cell::RefCell;
use std::rc::Rc;

/// Shape-preserving rewrite attaching a fresh cache slot to every deferred
/// and context leaf that does not already carry one. Literals pass through
/// unchanged; leaves that are already memoized keep their existing slot, so
/// memoizing twice shares caches with the first memoization.
pub(crate) fn memoize(node: &LazyString) -> LazyString {
    match node {
        LazyString::Literal(text) => LazyString::Literal(text.clone()),
        LazyString::Lazy(leaf) => LazyString::Lazy(LazyLeaf {
            producer: leaf.producer.clone(),
            cache: Some(keep_or_fresh(&leaf.cache)),
        }),
        LazyString::Context(leaf) => LazyString::Context(ContextLeaf {
            producer: leaf.producer.clone(),
            sides: leaf.sides,
            cache: Some(keep_or_fresh(&leaf.cache)),
        }),
        LazyString::Concat(concat) => {
            LazyString::concat(memoize(&concat.left), memoize(&concat.right))
        }
    }
}

fn keep_or_fresh(cache: &Option<CacheSlot>) -> CacheSlot {
    cache
        .clone()
        .unwrap_or_else(|| Rc::new(RefCell::new(None)))
}

/// An explicit association between one leaf producer and one shared cache.
///
/// Where [`LazyString::memoize`] gives every leaf occurrence its own slot,
/// a registry binds the cache up front: every tree built from
/// [`LazyStringMemo::get`] shares the same slot, so the producer runs once
/// across all of them.
pub struct LazyStringMemo {
    leaf: LazyLeaf,
}

impl LazyStringMemo {
    /// Bind a cache to a zero-argument producer.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> String + 'static,
    {
        Self::try_new(move || Ok(f()))
    }

    /// Bind a cache to a fallible producer.
    pub fn try_new<F>(f: F) -> Self
    where
        F: Fn() -> ResolveResult<String> + 'static,
    {
        LazyStringMemo {
            leaf: LazyLeaf {
                producer: Rc::new(f),
                cache: Some(Rc::new(RefCell::new(None))),
            },
        }
    }

    /// Bind a cache to the producer of an existing deferred leaf. Returns
    /// `None` for literals, context nodes, and composites. A leaf that is
    /// already memoized shares its slot with the registry.
    pub fn from_leaf(node: &LazyString) -> Option<Self> {
        match node {
            LazyString::Lazy(leaf) => Some(LazyStringMemo {
                leaf: LazyLeaf {
                    producer: leaf.producer.clone(),
                    cache: Some(keep_or_fresh(&leaf.cache)),
                },
            }),
            _ => None,
        }
    }

    /// A deferred leaf sharing this registry's cache, usable in any number
    /// of trees.
    pub fn get(&self) -> LazyString {
        LazyString::Lazy(self.leaf.clone())
    }

    /// Whether the shared cache has been filled by some force.
    pub fn is_cached(&self) -> bool {
        self.leaf.cached().is_some()
    }
}

impl From<&LazyStringMemo> for LazyString {
    fn from(memo: &LazyStringMemo) -> Self {
        memo.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::lazy_string;

    #[test]
    fn from_leaf_rejects_non_leaves() {
        assert!(LazyStringMemo::from_leaf(&LazyString::from("plain")).is_none());
        let tree = lazy_string(|| "a".to_string()) + "b";
        assert!(LazyStringMemo::from_leaf(&tree).is_none());
    }

    #[test]
    fn registry_starts_unfilled() {
        let memo = LazyStringMemo::new(|| "x".to_string());
        assert!(!memo.is_cached());
        assert_eq!(memo.get().resolve().unwrap(), "x");
        assert!(memo.is_cached());
    }
}
