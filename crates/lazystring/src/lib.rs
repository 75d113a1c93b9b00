//! Lazy, composable string trees with context-aware nodes.
//!
//! A [`LazyString`] is built by concatenating plain text, deferred producers
//! ([`lazy_string`]), and context nodes ([`context_string`]) that see the
//! fully resolved text on their required sides before deciding what to
//! produce. Nothing runs until the tree is forced with
//! [`LazyString::resolve`]; [`LazyString::memoize`] makes repeated forces
//! cheap.
//!
//! ```
//! use lazystring::{context_string, lazy_string, ResolveError, Sides};
//!
//! let greet = lazy_string(|| "hello".to_string());
//! let shout = context_string(Sides::LEFT, |left, _right| {
//!     if left.is_empty() {
//!         return Err(ResolveError::InsufficientContext("!".to_string()));
//!     }
//!     Ok(format!(" ({} chars)", left.len()))
//! });
//!
//! let tree = greet + shout;
//! assert_eq!(tree.resolve().unwrap(), "hello (5 chars)");
//! ```
//!
//! A context producer signals unusable context by returning
//! [`ResolveError::InsufficientContext`] with its fallback text; the engine
//! catches that signal at the node boundary and substitutes the text. Every
//! other error propagates unchanged to the caller forcing the tree.
//!
//! Trees are single-threaded by construction (`Rc`-shared producers,
//! `RefCell` memo slots); concurrent forcing is not supported.

mod resolver;

pub mod error;
pub mod memo;
pub mod node;
pub mod outline;

pub use error::{ResolveError, ResolveResult};
pub use memo::LazyStringMemo;
pub use node::{context_string, lazy_string, try_lazy_string, Kind, LazyString, Leaves, Sides};
pub use outline::Outline;
