//! Node types for lazy string trees.
//!
//! A [`LazyString`] is a binary tree of text atoms: fixed literals, deferred
//! zero-argument producers, and context-aware producers that see the resolved
//! text surrounding them. Trees are immutable after construction —
//! concatenation always builds new nodes. Producers sit behind [`Rc`] so
//! nodes clone cheaply and a single producer can appear in several trees.

use crate::error::ResolveResult;
use crate::resolver;
use std::cell::RefCell;
use std::fmt;
use std::ops::Add;
use std::rc::Rc;

/// A zero-argument text producer.
pub(crate) type LeafFn = Rc<dyn Fn() -> ResolveResult<String>>;
/// A `(left_context, right_context)` text producer.
pub(crate) type ContextFn = Rc<dyn Fn(&str, &str) -> ResolveResult<String>>;
/// Shared cache slot attached to memoized leaves.
pub(crate) type CacheSlot = Rc<RefCell<Option<String>>>;

// ══════════════════════════════════════════════════════════════════════════════
// Kinds & Sides
// ══════════════════════════════════════════════════════════════════════════════

/// Result-kind classification of a tree, observable by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// No lazy content at all. Only a bare [`LazyString::Literal`] is `Text`:
    /// concatenating two literals merges them instead of building a tree.
    Text,
    /// Contains at least one deferred leaf but no context node.
    Lazy,
    /// Contains at least one context node, at any depth.
    Context,
}

/// Which sides of the surrounding text a context producer requires.
///
/// A side that is not required is passed as empty text and is never resolved
/// as a side effect of this node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sides {
    pub left: bool,
    pub right: bool,
}

impl Sides {
    /// Both sides required (the default).
    pub const BOTH: Sides = Sides { left: true, right: true };
    /// Only the text to the left.
    pub const LEFT: Sides = Sides { left: true, right: false };
    /// Only the text to the right.
    pub const RIGHT: Sides = Sides { left: false, right: true };
}

impl Default for Sides {
    fn default() -> Self {
        Sides::BOTH
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Leaf nodes
// ══════════════════════════════════════════════════════════════════════════════

/// A deferred leaf: a zero-argument producer, plus an optional cache slot
/// once memoized.
#[derive(Clone)]
pub struct LazyLeaf {
    pub(crate) producer: LeafFn,
    pub(crate) cache: Option<CacheSlot>,
}

impl LazyLeaf {
    /// Resolved text, consulting the cache slot when one is attached.
    /// Uncached resolution invokes the producer; its failures propagate.
    pub(crate) fn produce(&self) -> ResolveResult<String> {
        if let Some(text) = self.cached() {
            return Ok(text);
        }
        let text = (self.producer)()?;
        self.store(&text);
        Ok(text)
    }

    pub(crate) fn cached(&self) -> Option<String> {
        self.cache.as_ref().and_then(|slot| slot.borrow().clone())
    }

    fn store(&self, text: &str) {
        if let Some(slot) = &self.cache {
            *slot.borrow_mut() = Some(text.to_string());
        }
    }
}

impl fmt::Debug for LazyLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyLeaf")
            .field("memoized", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

/// A context-aware leaf: a two-argument producer plus its [`Sides`]
/// configuration and an optional cache slot once memoized.
#[derive(Clone)]
pub struct ContextLeaf {
    pub(crate) producer: ContextFn,
    pub(crate) sides: Sides,
    pub(crate) cache: Option<CacheSlot>,
}

impl ContextLeaf {
    /// Run the producer with the given contexts. The fallback signal is
    /// caught here — at the node boundary — and substitutes its carried
    /// text; every other failure propagates unchanged.
    pub(crate) fn produce(&self, left: &str, right: &str) -> ResolveResult<String> {
        let text = match (self.producer)(left, right) {
            Err(crate::ResolveError::InsufficientContext(fallback)) => fallback,
            other => other?,
        };
        self.store(&text);
        Ok(text)
    }

    pub(crate) fn cached(&self) -> Option<String> {
        self.cache.as_ref().and_then(|slot| slot.borrow().clone())
    }

    fn store(&self, text: &str) {
        if let Some(slot) = &self.cache {
            *slot.borrow_mut() = Some(text.to_string());
        }
    }
}

impl fmt::Debug for ContextLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextLeaf")
            .field("sides", &self.sides)
            .field("memoized", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Trees
// ══════════════════════════════════════════════════════════════════════════════

/// A lazy string tree.
///
/// Built by concatenation (`+`) over literals, deferred leaves, and context
/// nodes; forced into text with [`LazyString::resolve`].
#[derive(Debug, Clone)]
pub enum LazyString {
    /// Immutable fixed text. Resolves to itself, never a side effect.
    Literal(String),
    /// A deferred zero-argument producer.
    Lazy(LazyLeaf),
    /// A context-aware producer.
    Context(ContextLeaf),
    /// Ordered concatenation of two subtrees.
    Concat(Box<Concat>),
}

/// An ordered pair of subtrees owned by the composite, with the result kind
/// fixed at construction.
#[derive(Debug, Clone)]
pub struct Concat {
    pub(crate) left: LazyString,
    pub(crate) right: LazyString,
    kind: Kind,
}

/// Wrap a zero-argument text producer into a deferred leaf.
pub fn lazy_string<F>(f: F) -> LazyString
where
    F: Fn() -> String + 'static,
{
    try_lazy_string(move || Ok(f()))
}

/// Wrap a fallible zero-argument producer into a deferred leaf. Producer
/// failures propagate unchanged out of [`LazyString::resolve`].
pub fn try_lazy_string<F>(f: F) -> LazyString
where
    F: Fn() -> ResolveResult<String> + 'static,
{
    LazyString::Lazy(LazyLeaf {
        producer: Rc::new(f),
        cache: None,
    })
}

/// Wrap a `(left_context, right_context)` producer into a context node.
///
/// Return `Err(ResolveError::InsufficientContext(text))` from the producer
/// to resolve to `text` when the context is unusable.
pub fn context_string<F>(sides: Sides, f: F) -> LazyString
where
    F: Fn(&str, &str) -> ResolveResult<String> + 'static,
{
    LazyString::Context(ContextLeaf {
        producer: Rc::new(f),
        sides,
        cache: None,
    })
}

impl LazyString {
    /// Concatenate two values, promoting plain text into literals.
    ///
    /// Two literals merge into one (no tree is built); otherwise the result
    /// kind is `Context` if either operand contains a context node, else
    /// `Lazy`.
    pub fn concat(left: impl Into<LazyString>, right: impl Into<LazyString>) -> LazyString {
        match (left.into(), right.into()) {
            (LazyString::Literal(mut a), LazyString::Literal(b)) => {
                a.push_str(&b);
                LazyString::Literal(a)
            }
            (left, right) => {
                let kind = promote(left.kind(), right.kind());
                LazyString::Concat(Box::new(Concat { left, right, kind }))
            }
        }
    }

    /// The result kind of this tree.
    pub fn kind(&self) -> Kind {
        match self {
            LazyString::Literal(_) => Kind::Text,
            LazyString::Lazy(_) => Kind::Lazy,
            LazyString::Context(_) => Kind::Context,
            LazyString::Concat(concat) => concat.kind,
        }
    }

    /// Force the tree into plain text.
    ///
    /// Performs an in-order walk, resolving every leaf exactly once and
    /// feeding context nodes the resolved text on their required sides.
    /// Either the complete text is returned or the first failure propagates;
    /// partial text is never returned.
    pub fn resolve(&self) -> ResolveResult<String> {
        resolver::resolve(self)
    }

    /// A tree of identical shape in which every deferred and context leaf
    /// carries a cache slot: the first force fills the slots, later forces
    /// of the memoized tree invoke no producers and compute no context.
    /// `self` is left untouched. Leaves already carrying a slot keep it.
    pub fn memoize(&self) -> LazyString {
        crate::memo::memoize(self)
    }

    /// In-order iterator over the tree's non-context leaf nodes (literal
    /// and deferred leaves; context nodes are skipped). Restartable: each
    /// call yields a fresh iterator over the same stable sequence.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// The fixed text of a literal node, if this is one.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            LazyString::Literal(text) => Some(text),
            _ => None,
        }
    }
}

fn promote(a: Kind, b: Kind) -> Kind {
    match (a, b) {
        (Kind::Context, _) | (_, Kind::Context) => Kind::Context,
        (Kind::Lazy, _) | (_, Kind::Lazy) => Kind::Lazy,
        (Kind::Text, Kind::Text) => Kind::Text,
    }
}

impl From<&str> for LazyString {
    fn from(text: &str) -> Self {
        LazyString::Literal(text.to_string())
    }
}

impl From<String> for LazyString {
    fn from(text: String) -> Self {
        LazyString::Literal(text)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Concatenation operators
// ══════════════════════════════════════════════════════════════════════════════

impl Add for LazyString {
    type Output = LazyString;

    fn add(self, rhs: LazyString) -> LazyString {
        LazyString::concat(self, rhs)
    }
}

impl Add<&str> for LazyString {
    type Output = LazyString;

    fn add(self, rhs: &str) -> LazyString {
        LazyString::concat(self, rhs)
    }
}

impl Add<String> for LazyString {
    type Output = LazyString;

    fn add(self, rhs: String) -> LazyString {
        LazyString::concat(self, rhs)
    }
}

impl Add<LazyString> for &str {
    type Output = LazyString;

    fn add(self, rhs: LazyString) -> LazyString {
        LazyString::concat(self, rhs)
    }
}

impl Add<LazyString> for String {
    type Output = LazyString;

    fn add(self, rhs: LazyString) -> LazyString {
        LazyString::concat(self, rhs)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Leaf iteration
// ══════════════════════════════════════════════════════════════════════════════

/// In-order iterator over non-context leaves. See [`LazyString::leaves`].
#[derive(Debug)]
pub struct Leaves<'a> {
    stack: Vec<&'a LazyString>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a LazyString;

    fn next(&mut self) -> Option<&'a LazyString> {
        while let Some(node) = self.stack.pop() {
            match node {
                LazyString::Concat(concat) => {
                    self.stack.push(&concat.right);
                    self.stack.push(&concat.left);
                }
                LazyString::Context(_) => {}
                leaf => return Some(leaf),
            }
        }
        None
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_merge_without_a_tree() {
        let merged = LazyString::from("foo") + "bar";
        assert_eq!(merged.kind(), Kind::Text);
        assert_eq!(merged.as_literal(), Some("foobar"));
    }

    #[test]
    fn kind_promotion_prefers_context() {
        let lazy = lazy_string(|| "x".to_string());
        let ctx = context_string(Sides::BOTH, |_, _| Ok("y".to_string()));
        assert_eq!((lazy.clone() + "tail").kind(), Kind::Lazy);
        assert_eq!(("head" + lazy.clone()).kind(), Kind::Lazy);
        assert_eq!((lazy + ctx).kind(), Kind::Context);
    }

    #[test]
    fn context_kind_survives_nesting() {
        let ctx = context_string(Sides::RIGHT, |_, _| Ok("y".to_string()));
        let deep = "a" + (("b" + (ctx + "c")) + "d");
        assert_eq!(deep.kind(), Kind::Context);
    }

    #[test]
    fn leaves_skip_context_nodes() {
        let tree = "head " + lazy_string(|| "mid".to_string())
            + context_string(Sides::LEFT, |_, _| Ok("ctx".to_string()))
            + " tail";
        let kinds: Vec<Kind> = tree.leaves().map(LazyString::kind).collect();
        assert_eq!(kinds, vec![Kind::Text, Kind::Lazy, Kind::Text]);
    }

    #[test]
    fn sides_default_to_both() {
        assert_eq!(Sides::default(), Sides::BOTH);
        assert!(Sides::LEFT.left && !Sides::LEFT.right);
        assert!(!Sides::RIGHT.left && Sides::RIGHT.right);
    }
}
