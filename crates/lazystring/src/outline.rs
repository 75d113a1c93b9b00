//! Serializable structural summaries of lazy string trees.
//!
//! Producers are closures and cannot be serialized; an [`Outline`] captures
//! everything else — shape, node kinds, side requirements, memoization —
//! for debugging and structural assertions.

use crate::node::{Kind, LazyString};
use serde::{Deserialize, Serialize};

/// The structure of one tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outline {
    /// Fixed text.
    Literal { text: String },
    /// A deferred leaf.
    Lazy { memoized: bool },
    /// A context node and its side requirements.
    Context {
        left: bool,
        right: bool,
        memoized: bool,
    },
    /// An ordered pair of subtrees.
    Concat { left: Box<Outline>, right: Box<Outline> },
}

impl Outline {
    /// Summarize a tree.
    pub fn of(node: &LazyString) -> Self {
        match node {
            LazyString::Literal(text) => Outline::Literal { text: text.clone() },
            LazyString::Lazy(leaf) => Outline::Lazy {
                memoized: leaf.cache.is_some(),
            },
            LazyString::Context(leaf) => Outline::Context {
                left: leaf.sides.left,
                right: leaf.sides.right,
                memoized: leaf.cache.is_some(),
            },
            LazyString::Concat(concat) => Outline::Concat {
                left: Box::new(Outline::of(&concat.left)),
                right: Box::new(Outline::of(&concat.right)),
            },
        }
    }

    /// The kind the summarized tree reports.
    pub fn kind(&self) -> Kind {
        match self {
            Outline::Literal { .. } => Kind::Text,
            Outline::Lazy { .. } => Kind::Lazy,
            Outline::Context { .. } => Kind::Context,
            Outline::Concat { left, right } => match (left.kind(), right.kind()) {
                (Kind::Context, _) | (_, Kind::Context) => Kind::Context,
                (Kind::Lazy, _) | (_, Kind::Lazy) => Kind::Lazy,
                (Kind::Text, Kind::Text) => Kind::Text,
            },
        }
    }

    /// Number of deferred leaves.
    pub fn lazy_leaves(&self) -> usize {
        match self {
            Outline::Lazy { .. } => 1,
            Outline::Literal { .. } | Outline::Context { .. } => 0,
            Outline::Concat { left, right } => left.lazy_leaves() + right.lazy_leaves(),
        }
    }

    /// Number of context nodes.
    pub fn context_leaves(&self) -> usize {
        match self {
            Outline::Context { .. } => 1,
            Outline::Literal { .. } | Outline::Lazy { .. } => 0,
            Outline::Concat { left, right } => left.context_leaves() + right.context_leaves(),
        }
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "null".to_string())
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{context_string, lazy_string, Sides};

    fn sample() -> LazyString {
        "head " + lazy_string(|| "mid".to_string())
            + context_string(Sides::RIGHT, |_, _| Ok("ctx".to_string()))
            + " tail"
    }

    #[test]
    fn counts_and_kind() {
        let outline = Outline::of(&sample());
        assert_eq!(outline.lazy_leaves(), 1);
        assert_eq!(outline.context_leaves(), 1);
        assert_eq!(outline.kind(), Kind::Context);
        assert_eq!(outline.kind(), sample().kind());
    }

    #[test]
    fn memoize_flag_shows_up() {
        let outline = Outline::of(&sample().memoize());
        assert_eq!(
            outline.to_json().matches("\"memoized\":true").count(),
            2
        );
    }

    #[test]
    fn json_round_trip() {
        let outline = Outline::of(&sample());
        let back = Outline::from_json(&outline.to_json()).unwrap();
        assert_eq!(back, outline);
    }

    #[test]
    fn literal_json_shape() {
        let outline = Outline::of(&LazyString::from("hi"));
        assert_eq!(outline.to_json(), r#"{"Literal":{"text":"hi"}}"#);
    }
}
