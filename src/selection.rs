//! Hierarchical selection propagation.
//!
//! Selecting a scheme in the tree widget implies its whole ancestor chain
//! (a child without its parents is meaningless in the table) and, per the
//! documented contract, its immediate children. Deep descendant expansion is
//! available as a named mode for callers that want whole-subtree selection.

use std::collections::BTreeSet;

use crate::{error::Error, index::SchemeIndex, properties::SchemeId};

/// How far a selected scheme's selection propagates downward. Ancestors
/// always close transitively regardless of mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Expansion {
    /// Include each selected scheme's immediate children only. Follow-up
    /// selection changes re-run the closure, so the shallow mode converges
    /// under interaction.
    #[default]
    DirectChildren,
    /// Include each selected scheme's entire subtree.
    Descendants,
}

impl SchemeIndex {
    /// Compute the selection closure of `selected`.
    ///
    /// Returns a new owned set; the caller's selection is never mutated. Ids
    /// unknown to the index pass through verbatim with no expansion. An empty
    /// selection yields an empty closure — there is no implicit select-all.
    ///
    /// The ancestor walk carries a visited guard: a revisited id means the
    /// index holds a cyclic parent chain, which [SchemeIndex::build] rejects,
    /// so hitting it here indicates corrupt state and is surfaced as an
    /// error rather than silently truncated.
    pub fn close_selection(
        &self,
        selected: &[SchemeId],
        expansion: Expansion,
    ) -> Result<BTreeSet<SchemeId>, Error> {
        let mut closed: BTreeSet<SchemeId> = selected.iter().copied().collect();

        for &id in selected {
            let mut walked = BTreeSet::new();
            let mut cursor = id;
            while let Some(node) = self.get(cursor) {
                if !walked.insert(cursor) {
                    return Err(Error::CyclicSchemes(cursor));
                }
                match node.parent_id {
                    Some(parent_id) => {
                        closed.insert(parent_id);
                        cursor = parent_id;
                    }
                    None => break,
                }
            }
        }

        match expansion {
            Expansion::DirectChildren => {
                for id in selected {
                    if let Some(children) = self.adjacency().get(id) {
                        closed.extend(children.iter().copied());
                    }
                }
            }
            Expansion::Descendants => {
                for &id in selected {
                    closed.extend(self.descendants(id));
                }
            }
        }

        Ok(closed)
    }
}
