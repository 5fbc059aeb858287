//! Tests for the hierarchical selection closure

use std::collections::BTreeSet;

use super::helpers::{ids, sample_records};
use crate::{index::SchemeIndex, properties::SchemeId, selection::Expansion};

fn close(index: &SchemeIndex, selected: &[u32]) -> BTreeSet<SchemeId> {
    index
        .close_selection(&ids(selected), Expansion::DirectChildren)
        .unwrap()
}

#[test]
fn selecting_a_leaf_pulls_in_the_whole_ancestor_chain() {
    let index = SchemeIndex::build(&sample_records()).unwrap();
    assert_eq!(close(&index, &[8]), ids(&[1, 2, 8]).into_iter().collect());
}

#[test]
fn selecting_a_root_adds_direct_children_only() {
    let index = SchemeIndex::build(&sample_records()).unwrap();
    // 8 is a grandchild of 1 and must not appear under shallow expansion.
    assert_eq!(close(&index, &[1]), ids(&[1, 2, 3]).into_iter().collect());
}

#[test]
fn deep_expansion_selects_whole_subtrees() {
    let index = SchemeIndex::build(&sample_records()).unwrap();
    let closed = index
        .close_selection(&ids(&[1]), Expansion::Descendants)
        .unwrap();
    assert_eq!(closed, ids(&[1, 2, 3, 8]).into_iter().collect());
}

#[test]
fn empty_selection_closes_to_empty() {
    let index = SchemeIndex::build(&sample_records()).unwrap();
    assert!(close(&index, &[]).is_empty());
}

#[test]
fn unknown_ids_pass_through_without_expansion() {
    let index = SchemeIndex::build(&sample_records()).unwrap();
    assert_eq!(close(&index, &[99]), ids(&[99]).into_iter().collect());
    // A known and an unknown id together: only the known one expands.
    assert_eq!(
        close(&index, &[99, 8]),
        ids(&[1, 2, 8, 99]).into_iter().collect()
    );
}

#[test]
fn closure_does_not_mutate_the_callers_selection() {
    let index = SchemeIndex::build(&sample_records()).unwrap();
    let selected = ids(&[8]);
    let _ = index
        .close_selection(&selected, Expansion::DirectChildren)
        .unwrap();
    assert_eq!(selected, ids(&[8]));
}

#[test]
fn closure_is_monotone() {
    let index = SchemeIndex::build(&sample_records()).unwrap();
    let subsets: &[&[u32]] = &[&[], &[8], &[3, 8], &[1, 3, 8], &[1, 2, 3, 8]];
    for window in subsets.windows(2) {
        let smaller = close(&index, window[0]);
        let larger = close(&index, window[1]);
        assert!(
            smaller.is_subset(&larger),
            "close({:?}) must be contained in close({:?})",
            window[0],
            window[1]
        );
    }
}

#[test]
fn every_member_of_a_closure_has_its_ancestors_in_the_closure() {
    let index = SchemeIndex::build(&sample_records()).unwrap();
    for selected in [&[8u32][..], &[3, 8][..], &[2][..], &[1, 8][..]] {
        let closed = close(&index, selected);
        for id in &closed {
            let mut cursor = *id;
            while let Some(parent_id) = index.get(cursor).and_then(|n| n.parent_id) {
                assert!(
                    closed.contains(&parent_id),
                    "ancestor {parent_id} of {id} missing from close({selected:?})"
                );
                cursor = parent_id;
            }
        }
    }
}

#[test]
fn a_selection_of_every_scheme_is_a_fixed_point() {
    let index = SchemeIndex::build(&sample_records()).unwrap();
    let everything: Vec<SchemeId> = index.flattened().iter().map(|n| n.id).collect();
    let closed = index
        .close_selection(&everything, Expansion::DirectChildren)
        .unwrap();
    assert_eq!(closed, everything.iter().copied().collect());

    let reclosed = index
        .close_selection(&closed.iter().copied().collect::<Vec<_>>(), Expansion::DirectChildren)
        .unwrap();
    assert_eq!(reclosed, closed);
}
