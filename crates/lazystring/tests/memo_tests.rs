//! Integration tests for the `LazyStringMemo` leaf registry and the
//! interaction between registries and the `memoize()` transform.

use lazystring::{lazy_string, LazyString, LazyStringMemo};
use std::cell::Cell;
use std::rc::Rc;

/// Invocation counter injected into producers.
#[derive(Clone, Default)]
struct Counter(Rc<Cell<usize>>);

impl Counter {
    fn new() -> Self {
        Self::default()
    }

    fn bump(&self) {
        self.0.set(self.0.get() + 1);
    }

    fn get(&self) -> usize {
        self.0.get()
    }
}

fn plus_leaf_memo(counter: &Counter) -> LazyStringMemo {
    let counter = counter.clone();
    LazyStringMemo::new(move || {
        counter.bump();
        " ++++ ".to_string()
    })
}

#[test]
fn registry_shares_one_invocation_across_trees() {
    let counter = Counter::new();
    let memo = plus_leaf_memo(&counter);
    let first = memo.get() + "one";
    let second = "two" + memo.get();

    assert_eq!(first.resolve().unwrap(), " ++++ one");
    assert_eq!(second.resolve().unwrap(), "two ++++ ");
    assert_eq!(counter.get(), 1);
    assert!(memo.is_cached());
}

#[test]
fn registry_shares_across_occurrences_in_one_tree() {
    let counter = Counter::new();
    let memo = plus_leaf_memo(&counter);
    let tree = memo.get() + "|" + memo.get();

    assert_eq!(tree.resolve().unwrap(), " ++++ | ++++ ");
    assert_eq!(counter.get(), 1);
}

#[test]
fn from_leaf_shares_the_producer_but_not_the_leaf() {
    let counter = Counter::new();
    let inner = counter.clone();
    let leaf = lazy_string(move || {
        inner.bump();
        " ++++ ".to_string()
    });
    let memo = LazyStringMemo::from_leaf(&leaf).expect("lazy leaf");

    let first = memo.get() + "a";
    let second = memo.get() + "b";
    assert_eq!(first.resolve().unwrap(), " ++++ a");
    assert_eq!(second.resolve().unwrap(), " ++++ b");
    assert_eq!(counter.get(), 1);

    // The original leaf stays unmemoized and reruns.
    let plain = leaf + "c";
    assert_eq!(plain.resolve().unwrap(), " ++++ c");
    assert_eq!(counter.get(), 2);
}

#[test]
fn memoize_keeps_registry_slots() {
    let counter = Counter::new();
    let memo = plus_leaf_memo(&counter);
    let first = (memo.get() + "one").memoize();
    let second = ("two" + memo.get()).memoize();

    assert_eq!(first.resolve().unwrap(), " ++++ one");
    assert_eq!(second.resolve().unwrap(), "two ++++ ");
    assert_eq!(counter.get(), 1);
}

#[test]
fn memoizing_twice_shares_caches() {
    let counter = Counter::new();
    let inner = counter.clone();
    let tree = lazy_string(move || {
        inner.bump();
        " @@ ".to_string()
    }) + "tail";
    let once = tree.memoize();
    let twice = once.memoize();

    assert_eq!(once.resolve().unwrap(), " @@ tail");
    assert_eq!(twice.resolve().unwrap(), " @@ tail");
    assert_eq!(counter.get(), 1);
}

#[test]
fn registry_converts_into_a_node() {
    let counter = Counter::new();
    let memo = plus_leaf_memo(&counter);
    let node = LazyString::from(&memo);
    assert_eq!(node.resolve().unwrap(), " ++++ ");
}
