//! On-demand context resolution.
//!
//! Forcing a tree flattens it into its left-to-right atom sequence and
//! resolves every atom exactly once through a slot table. A context node's
//! required sides are resolved on demand, which may recursively force other
//! context nodes; an atom demanded while its own resolution is in progress
//! is a cyclic dependency and aborts the force.

use crate::error::{ResolveError, ResolveResult};
use crate::node::{ContextLeaf, LazyLeaf, LazyString};

/// One atom of the flattened sequence.
#[derive(Clone, Copy)]
enum Atom<'a> {
    Literal(&'a str),
    Lazy(&'a LazyLeaf),
    Context(&'a ContextLeaf),
}

/// Per-force resolution state of one atom.
#[derive(Clone)]
enum Slot {
    Pending,
    InProgress,
    Done(String),
}

/// Force a tree into plain text.
pub(crate) fn resolve(root: &LazyString) -> ResolveResult<String> {
    let mut atoms = Vec::new();
    flatten(root, &mut atoms);
    let slots = vec![Slot::Pending; atoms.len()];
    let mut force = Force { atoms: &atoms, slots };
    force.span(0, atoms.len())
}

fn flatten<'a>(node: &'a LazyString, atoms: &mut Vec<Atom<'a>>) {
    match node {
        LazyString::Literal(text) => atoms.push(Atom::Literal(text)),
        LazyString::Lazy(leaf) => atoms.push(Atom::Lazy(leaf)),
        LazyString::Context(leaf) => atoms.push(Atom::Context(leaf)),
        LazyString::Concat(concat) => {
            flatten(&concat.left, atoms);
            flatten(&concat.right, atoms);
        }
    }
}

/// One force of one tree: the atom sequence plus a slot per atom, so that
/// each producer runs at most once even when its text is used both as
/// context and as output.
struct Force<'a> {
    atoms: &'a [Atom<'a>],
    slots: Vec<Slot>,
}

impl Force<'_> {
    /// The resolved text of atom `i`, computing and recording it on first
    /// demand.
    fn value_of(&mut self, i: usize) -> ResolveResult<String> {
        match &self.slots[i] {
            Slot::Done(text) => return Ok(text.clone()),
            Slot::InProgress => return Err(ResolveError::CyclicContext),
            Slot::Pending => {}
        }
        self.slots[i] = Slot::InProgress;
        let atom = self.atoms[i];
        let text = match atom {
            Atom::Literal(text) => text.to_string(),
            Atom::Lazy(leaf) => leaf.produce()?,
            Atom::Context(leaf) => match leaf.cached() {
                // Memoized hit: no producer run, no context computed.
                Some(text) => text,
                None => {
                    let left = if leaf.sides.left {
                        self.span(0, i)?
                    } else {
                        String::new()
                    };
                    let right = if leaf.sides.right {
                        self.span(i + 1, self.atoms.len())?
                    } else {
                        String::new()
                    };
                    leaf.produce(&left, &right)?
                }
            },
        };
        self.slots[i] = Slot::Done(text.clone());
        Ok(text)
    }

    /// Resolved concatenation of atoms in `from..to`. A span with no atoms
    /// is the empty string.
    fn span(&mut self, from: usize, to: usize) -> ResolveResult<String> {
        let mut text = String::new();
        for i in from..to {
            text.push_str(&self.value_of(i)?);
        }
        Ok(text)
    }
}
