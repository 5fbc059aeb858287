//! Scheme hierarchy construction.
//!
//! [SchemeIndex] turns the flat, parent-referencing record list delivered by
//! the API into a rooted forest, a DFS pre-order flattening, and a
//! parent→children adjacency index. One index is built per fetch; it is
//! immutable once built, and a refresh produces a fresh index rather than
//! mutating the old one in place.

use petgraph::{
    graphmap::DiGraphMap,
    visit::{depth_first_search, DfsEvent},
};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::Error,
    properties::{FlatScheme, SchemeId, SchemeRecord, SchemeTreeNode, UNKNOWN_SCHEME},
};

/// Immutable, per-version view of one fetched scheme hierarchy.
#[derive(Debug, Clone, Default)]
pub struct SchemeIndex {
    roots: Vec<SchemeTreeNode>,
    flattened: Vec<FlatScheme>,
    by_id: BTreeMap<SchemeId, FlatScheme>,
    adjacency: BTreeMap<SchemeId, Vec<SchemeId>>,
    graph: DiGraphMap<SchemeId, ()>,
    names: BTreeMap<SchemeId, String>,
}

impl SchemeIndex {
    /// Build an index from one API payload.
    ///
    /// Records whose ancestor chain breaks at a missing scheme id are dropped
    /// from the forest (warned, not fatal). A cyclic parent chain is a hard
    /// error: it would make the flattening and the selection closure
    /// non-terminating.
    pub fn build(records: &[SchemeRecord]) -> Result<SchemeIndex, Error> {
        let roots = build_forest(records)?;
        let flattened = flatten_forest(&roots);

        let by_id: BTreeMap<SchemeId, FlatScheme> = flattened
            .iter()
            .map(|node| (node.id, node.clone()))
            .collect();

        // Child order within a parent follows the record scan order, which the
        // flattening preserves per parent.
        let mut adjacency: BTreeMap<SchemeId, Vec<SchemeId>> = BTreeMap::new();
        for node in &flattened {
            if let Some(parent_id) = node.parent_id {
                adjacency.entry(parent_id).or_default().push(node.id);
            }
        }

        let mut graph = DiGraphMap::new();
        for node in &flattened {
            graph.add_node(node.id);
        }
        for (parent_id, children) in &adjacency {
            for child_id in children {
                graph.add_edge(*parent_id, *child_id, ());
            }
        }

        // Name resolution covers every record in the payload, including ones
        // dropped from the forest: raw statistic rows may still reference them.
        let names = records
            .iter()
            .map(|record| (record.scheme_id, record.scheme_name.clone()))
            .collect();

        Ok(SchemeIndex {
            roots,
            flattened,
            by_id,
            adjacency,
            graph,
            names,
        })
    }

    /// Forest roots, in input order.
    pub fn roots(&self) -> &[SchemeTreeNode] {
        &self.roots
    }

    /// All tree members in DFS pre-order: every ancestor strictly precedes
    /// its descendants.
    pub fn flattened(&self) -> &[FlatScheme] {
        &self.flattened
    }

    /// Parent id → ordered child ids.
    pub fn adjacency(&self) -> &BTreeMap<SchemeId, Vec<SchemeId>> {
        &self.adjacency
    }

    pub fn get(&self, id: SchemeId) -> Option<&FlatScheme> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: SchemeId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.flattened.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flattened.is_empty()
    }

    /// Display name for `id`, falling back to a placeholder for ids the
    /// payload never defined.
    pub fn scheme_name(&self, id: SchemeId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_SCHEME.to_string())
    }

    /// Ids of every scheme in `start`'s subtree, `start` included.
    pub fn descendants(&self, start: SchemeId) -> BTreeSet<SchemeId> {
        let mut subtree = BTreeSet::new();
        if self.graph.contains_node(start) {
            depth_first_search(&self.graph, Some(start), |event| {
                if let DfsEvent::Discover(id, _) = event {
                    subtree.insert(id);
                }
            });
        }
        subtree
    }
}

/// Convert a flat record list into a forest of [SchemeTreeNode] roots.
///
/// Child records may precede their parents in the payload; resolution goes
/// through an id→record map, never a sorted-order single pass.
pub fn build_forest(records: &[SchemeRecord]) -> Result<Vec<SchemeTreeNode>, Error> {
    let mut by_record: BTreeMap<SchemeId, &SchemeRecord> = BTreeMap::new();
    for record in records {
        if let Some(previous) = by_record.insert(record.scheme_id, record) {
            tracing::warn!(
                "Duplicate scheme id {} ('{}' replaces '{}')",
                record.scheme_id,
                record.scheme_name,
                previous.scheme_name
            );
        }
    }

    let mut root_ids = Vec::new();
    let mut children_of: BTreeMap<SchemeId, Vec<SchemeId>> = BTreeMap::new();
    for record in records {
        // Skip shadowed duplicates so each id is attached exactly once.
        if !std::ptr::eq(by_record[&record.scheme_id], record) {
            continue;
        }
        match record.parent_scheme_id {
            None => root_ids.push(record.scheme_id),
            Some(parent_id) => {
                if by_record.contains_key(&parent_id) {
                    children_of.entry(parent_id).or_default().push(record.scheme_id);
                }
            }
        }
    }

    check_membership(&by_record, &root_ids, &children_of)?;

    Ok(root_ids
        .iter()
        .map(|root_id| build_subtree(*root_id, &by_record, &children_of))
        .collect())
}

/// Classify every record as a tree member, a dropped record (ancestor chain
/// breaks at a missing id), or part of a cycle. Only the last is fatal.
fn check_membership(
    by_record: &BTreeMap<SchemeId, &SchemeRecord>,
    root_ids: &[SchemeId],
    children_of: &BTreeMap<SchemeId, Vec<SchemeId>>,
) -> Result<(), Error> {
    let mut reachable = BTreeSet::new();
    let mut stack: Vec<SchemeId> = root_ids.to_vec();
    while let Some(id) = stack.pop() {
        if reachable.insert(id) {
            if let Some(children) = children_of.get(&id) {
                stack.extend(children);
            }
        }
    }

    for (id, record) in by_record {
        if reachable.contains(id) {
            continue;
        }
        // Walk up to find out why this record is unreachable.
        let mut walked = BTreeSet::new();
        let mut cursor = *id;
        loop {
            if !walked.insert(cursor) {
                return Err(Error::CyclicSchemes(cursor));
            }
            match by_record.get(&cursor).and_then(|r| r.parent_scheme_id) {
                Some(parent_id) if by_record.contains_key(&parent_id) => cursor = parent_id,
                Some(parent_id) => {
                    tracing::warn!(
                        "Dropping scheme {} ('{}'): ancestor chain breaks at missing scheme {}",
                        id,
                        record.scheme_name,
                        parent_id
                    );
                    break;
                }
                // A rootless chain end would have been reachable; a record
                // with no parent is a root by construction.
                None => break,
            }
        }
    }
    Ok(())
}

fn build_subtree(
    id: SchemeId,
    by_record: &BTreeMap<SchemeId, &SchemeRecord>,
    children_of: &BTreeMap<SchemeId, Vec<SchemeId>>,
) -> SchemeTreeNode {
    let mut node = SchemeTreeNode::from_record(by_record[&id]);
    if let Some(children) = children_of.get(&id) {
        node.children = children
            .iter()
            .map(|child_id| build_subtree(*child_id, by_record, children_of))
            .collect();
    }
    node
}

/// Flatten a forest depth-first, pre-order: roots in forest order, children
/// in builder order, every node before any of its descendants.
pub fn flatten_forest(forest: &[SchemeTreeNode]) -> Vec<FlatScheme> {
    let mut out = Vec::new();
    flatten_into(forest, None, None, &mut out);
    out
}

fn flatten_into(
    nodes: &[SchemeTreeNode],
    parent_id: Option<SchemeId>,
    parent_title: Option<&str>,
    out: &mut Vec<FlatScheme>,
) {
    for node in nodes {
        out.push(FlatScheme {
            id: node.id,
            title: node.title.clone(),
            parent_id,
            parent_title: parent_title.map(str::to_string),
        });
        flatten_into(&node.children, Some(node.id), Some(&node.title), out);
    }
}
