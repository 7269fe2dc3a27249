use std::collections::BTreeMap;

use super::DependencyIndex;
use crate::constants::{MODIFIER_RELATIONS, PREP_RELATION_PREFIX};

/// Collect a head token and its compound, adjectival and numeric
/// modifiers.
///
/// The indices are returned in ascending order, so that they follow
/// the surface order of the sentence regardless of the order in which
/// the edges were added. A head outside the sentence yields an empty
/// list.
pub fn modifiers(dependencies: &DependencyIndex, head: usize) -> Vec<usize> {
    if head >= dependencies.len() {
        log::trace!("Modifier head {} is outside the sentence", head);
        return Vec::new();
    }

    let mut indices = dependencies.dependents_with(head, |rel| MODIFIER_RELATIONS.contains(rel));
    indices.push(head);
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Collect the prepositional objects of a head token.
///
/// Collapsed prepositional relations (`prep_<preposition>`) are mapped
/// from their preposition to the modifier-augmented indices of the
/// object. When a preposition attaches more than one object, the
/// leftmost object is used.
pub fn prepositional_objects(
    dependencies: &DependencyIndex,
    head: usize,
) -> BTreeMap<String, Vec<usize>> {
    let mut objects: Vec<(usize, &str)> = dependencies
        .dependents(head)
        .filter_map(|(dep, rel)| {
            rel.strip_prefix(PREP_RELATION_PREFIX)
                .filter(|prep| !prep.is_empty())
                .map(|prep| (dep, prep))
        })
        .collect();
    objects.sort_unstable();

    let mut pobjs = BTreeMap::new();
    for (dep, prep) in objects {
        pobjs
            .entry(prep.to_owned())
            .or_insert_with(|| modifiers(dependencies, dep));
    }

    pobjs
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::{modifiers, prepositional_objects};
    use crate::dependency::{DependencyEdge, DependencyIndex};

    // the former chief executive of the three largest banks resigned
    fn test_edges() -> Vec<DependencyEdge> {
        vec![
            DependencyEdge::new(3, "det", 0),
            DependencyEdge::new(3, "amod", 1),
            DependencyEdge::new(3, "nn", 2),
            DependencyEdge::new(9, "nsubj", 3),
            DependencyEdge::new(8, "det", 5),
            DependencyEdge::new(8, "num", 6),
            DependencyEdge::new(8, "amod", 7),
            DependencyEdge::new(3, "prep_of", 8),
        ]
    }

    #[test]
    fn collects_modifiers_in_surface_order() {
        let index = DependencyIndex::new(10, test_edges()).unwrap();

        assert_eq!(modifiers(&index, 3), vec![1, 2, 3]);
        assert_eq!(modifiers(&index, 8), vec![6, 7, 8]);
        assert_eq!(modifiers(&index, 9), vec![9]);
    }

    #[test]
    fn head_outside_sentence() {
        let index = DependencyIndex::new(10, test_edges()).unwrap();
        assert!(modifiers(&index, 10).is_empty());
        assert!(prepositional_objects(&index, 10).is_empty());
    }

    #[test]
    fn collects_prepositional_objects() {
        let index = DependencyIndex::new(10, test_edges()).unwrap();

        assert_eq!(
            prepositional_objects(&index, 3),
            btreemap! { "of".to_string() => vec![6, 7, 8] }
        );
        assert!(prepositional_objects(&index, 8).is_empty());
    }

    #[test]
    fn leftmost_object_per_preposition() {
        let index = DependencyIndex::new(
            5,
            vec![
                DependencyEdge::new(0, "prep_in", 4),
                DependencyEdge::new(0, "prep_in", 2),
                DependencyEdge::new(0, "prep_", 3),
            ],
        )
        .unwrap();

        assert_eq!(
            prepositional_objects(&index, 0),
            btreemap! { "in".to_string() => vec![2] }
        );
    }

    #[test]
    fn edge_order_does_not_matter() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        let reference = DependencyIndex::new(10, test_edges()).unwrap();

        for _ in 0..20 {
            let mut edges = test_edges();
            edges.shuffle(&mut rng);
            let index = DependencyIndex::new(10, edges).unwrap();

            for head in 0..10 {
                assert_eq!(modifiers(&index, head), modifiers(&reference, head));
                assert_eq!(
                    prepositional_objects(&index, head),
                    prepositional_objects(&reference, head)
                );
            }
        }
    }
}
