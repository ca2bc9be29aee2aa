use itertools::Itertools;
use log::trace;
use serde::{Deserialize, Serialize};

use super::{disjoint_set::DisjointSet, labelling::Component};
use crate::{
    definitions::{DetectorOptions, MergeStrategy},
    Rect,
};

/// A group of nearby components reported as a single moving object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cluster {
    /// Smallest rect enclosing every component in the cluster.
    pub rect: Rect,

    /// Labels of the components in the cluster, ascending and without duplicates.
    pub labels: Vec<u32>,
}

impl Cluster {
    fn from_component(component: &Component) -> Self {
        Self {
            rect: component.rect,
            labels: vec![component.label],
        }
    }

    fn absorb(mut self, other: Self) -> Self {
        self.rect = self.rect.merged(&other.rect);
        self.labels = self
            .labels
            .into_iter()
            .merge(other.labels)
            .dedup()
            .collect();
        self
    }
}

/// Discards small components and groups the remainder into clusters of nearby boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionClusterer {
    min_area: u32,
    distance: u32,
    strategy: MergeStrategy,
}

impl RegionClusterer {
    pub fn new(min_area: u32, distance: u32, strategy: MergeStrategy) -> Self {
        Self {
            min_area,
            distance,
            strategy,
        }
    }

    pub fn from_options(options: &DetectorOptions) -> Self {
        Self::new(
            options.min_area,
            options.merge_distance,
            options.merge_strategy,
        )
    }

    /// True if the component is too small to be considered.
    pub fn is_noise(&self, component: &Component) -> bool {
        component.area < self.min_area
    }

    /// Group `components` into clusters. Components are visited in ascending label order, and
    /// noise is dropped before clustering begins.
    pub fn cluster(&self, components: impl IntoIterator<Item = Component>) -> Vec<Cluster> {
        let candidates = components
            .into_iter()
            .filter(|c| {
                let noise = self.is_noise(c);
                if noise {
                    trace!(
                        target: "clustering",
                        "dropping component {} with area {}",
                        c.label,
                        c.area
                    );
                }
                !noise
            })
            .sorted_by_key(|c| c.label)
            .collect::<Vec<_>>();

        match self.strategy {
            MergeStrategy::Sweep => self.sweep(&candidates),
            MergeStrategy::TransitiveClosure => self.transitive_closure(&candidates),
        }
    }

    //Single pass. Every cluster near the incoming component is pulled out and merged with it.
    //Clusters that grow are not re-checked against the clusters they were not near before.
    fn sweep(&self, candidates: &[Component]) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = vec![];

        for component in candidates {
            let (near, far): (Vec<_>, Vec<_>) = clusters
                .into_iter()
                .partition(|cluster| cluster.rect.is_near(&component.rect, self.distance));

            let merged = near
                .into_iter()
                .fold(Cluster::from_component(component), Cluster::absorb);

            clusters = far;
            clusters.push(merged);
        }

        clusters
    }

    //Every pair of nearby components is joined, compared on the component rects alone.
    fn transitive_closure(&self, candidates: &[Component]) -> Vec<Cluster> {
        let mut groups = DisjointSet::default();
        for component in candidates {
            groups.insert_single(component.label);
        }

        for (a, b) in candidates.iter().tuple_combinations() {
            if a.rect.is_near(&b.rect, self.distance) {
                groups.union(a.label, b.label);
            }
        }

        groups
            .sets()
            .filter_map(|labels| {
                candidates
                    .iter()
                    .filter(|c| labels.contains(&c.label))
                    .map(Cluster::from_component)
                    .reduce(Cluster::absorb)
            })
            .sorted_by_key(|cluster| cluster.labels.first().copied())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn comp(label: u32, rect: Rect) -> Component {
        Component {
            label,
            rect,
            area: rect.width * rect.height,
        }
    }

    //A is near B and B is near C, but A is not near C.
    fn abc() -> (Rect, Rect, Rect) {
        (
            Rect::new(0, 0, 10, 10),
            Rect::new(12, 0, 10, 10),
            Rect::new(24, 0, 10, 10),
        )
    }

    //R is near X only, but once X and R are merged the result overlaps Y.
    fn xyr() -> (Rect, Rect, Rect) {
        (
            Rect::new(0, 0, 10, 30),
            Rect::new(16, 0, 10, 10),
            Rect::new(8, 20, 10, 10),
        )
    }

    fn sweep(distance: u32) -> RegionClusterer {
        RegionClusterer::new(0, distance, MergeStrategy::Sweep)
    }

    fn closure(distance: u32) -> RegionClusterer {
        RegionClusterer::new(0, distance, MergeStrategy::TransitiveClosure)
    }

    #[test]
    fn test_empty_input() {
        assert!(sweep(0).cluster([]).is_empty());
        assert!(closure(0).cluster([]).is_empty());
    }

    #[test]
    fn test_far_apart_stay_separate() {
        let comps = [
            comp(1, Rect::new(0, 0, 10, 10)),
            comp(2, Rect::new(50, 50, 10, 10)),
        ];
        let exp = vec![
            Cluster {
                rect: Rect::new(0, 0, 10, 10),
                labels: vec![1],
            },
            Cluster {
                rect: Rect::new(50, 50, 10, 10),
                labels: vec![2],
            },
        ];
        assert_eq!(exp, sweep(0).cluster(comps));
        assert_eq!(exp, closure(0).cluster(comps));
    }

    #[test]
    fn test_overlapping_merge_keeps_all_labels() {
        let comps = [
            comp(1, Rect::new(0, 0, 10, 10)),
            comp(2, Rect::new(5, 5, 10, 10)),
        ];
        let exp = vec![Cluster {
            rect: Rect::new(0, 0, 15, 15),
            labels: vec![1, 2],
        }];
        assert_eq!(exp, sweep(0).cluster(comps));
        assert_eq!(exp, closure(0).cluster(comps));
    }

    #[test]
    fn test_visits_in_label_order() {
        let (a, b, c) = abc();

        //given out of order, still visited as 1, 2, 3
        let comps = [comp(3, c), comp(1, a), comp(2, b)];
        let clusters = sweep(2).cluster(comps);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].labels, vec![1, 2, 3]);
    }

    #[test]
    fn test_chain_in_order_abc() {
        let (a, b, c) = abc();
        let clusters = sweep(2).cluster([comp(1, a), comp(2, b), comp(3, c)]);

        let exp = vec![Cluster {
            rect: Rect::new(0, 0, 34, 10),
            labels: vec![1, 2, 3],
        }];
        assert_eq!(exp, clusters);
    }

    #[test]
    fn test_chain_in_order_acb() {
        let (a, b, c) = abc();

        //A and C are separate until B arrives and is near both
        let clusters = sweep(2).cluster([comp(1, a), comp(2, c), comp(3, b)]);

        let exp = vec![Cluster {
            rect: Rect::new(0, 0, 34, 10),
            labels: vec![1, 2, 3],
        }];
        assert_eq!(exp, clusters);
    }

    #[test]
    fn test_chain_needs_distance() {
        let (a, b, c) = abc();
        let clusters = sweep(1).cluster([comp(1, a), comp(2, b), comp(3, c)]);
        assert_eq!(clusters.len(), 3);
    }

    #[test]
    fn test_sweep_order_dependence() {
        let (x, y, r) = xyr();

        //X, Y, R: R grows X into Y, but Y is never checked again.
        let clusters = sweep(0).cluster([comp(1, x), comp(2, y), comp(3, r)]);
        let exp = vec![
            Cluster {
                rect: y,
                labels: vec![2],
            },
            Cluster {
                rect: Rect::new(0, 0, 18, 30),
                labels: vec![1, 3],
            },
        ];
        assert_eq!(exp, clusters);

        //R, X, Y: the grown box is in place by the time Y is visited.
        let clusters = sweep(0).cluster([comp(1, r), comp(2, x), comp(3, y)]);
        let exp = vec![Cluster {
            rect: Rect::new(0, 0, 26, 30),
            labels: vec![1, 2, 3],
        }];
        assert_eq!(exp, clusters);
    }

    #[test]
    fn test_closure_order_independence() {
        let (x, y, r) = xyr();
        let orders = [
            [x, y, r],
            [x, r, y],
            [y, x, r],
            [y, r, x],
            [r, x, y],
            [r, y, x],
        ];

        for order in orders {
            let comps = order
                .iter()
                .enumerate()
                .map(|(i, &rect)| comp(i as u32 + 1, rect))
                .collect::<Vec<_>>();

            let clusters = closure(0).cluster(comps);
            let mut rects = clusters.iter().map(|c| c.rect).collect::<Vec<_>>();
            rects.sort_by_key(|r| (r.x, r.y));

            assert_eq!(rects, vec![Rect::new(0, 0, 18, 30), y]);
        }
    }

    #[test]
    fn test_noise_removed() {
        let clusterer = RegionClusterer::new(100, 0, MergeStrategy::Sweep);

        let small = Component {
            label: 1,
            rect: Rect::new(0, 0, 9, 11),
            area: 99,
        };
        let exact = Component {
            label: 2,
            rect: Rect::new(50, 50, 10, 10),
            area: 100,
        };
        assert!(clusterer.is_noise(&small));
        assert!(!clusterer.is_noise(&exact));

        let clusters = clusterer.cluster([small, exact]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].labels, vec![2]);
    }

    //noise must not act as a bridge between two real components
    #[test]
    fn test_noise_does_not_bridge() {
        let left = comp(1, Rect::new(0, 0, 20, 20));
        let right = comp(3, Rect::new(24, 0, 20, 20));
        let speck = Component {
            label: 2,
            rect: Rect::new(20, 0, 4, 4),
            area: 16,
        };

        for strategy in [MergeStrategy::Sweep, MergeStrategy::TransitiveClosure] {
            let clusterer = RegionClusterer::new(100, 0, strategy);
            let clusters = clusterer.cluster([left, speck, right]);
            assert_eq!(clusters.len(), 2);
            assert!(clusters.iter().all(|c| !c.labels.contains(&2)));
        }
    }

    #[test]
    fn test_from_options() {
        let opts = DetectorOptions {
            min_area: 7,
            merge_distance: 3,
            merge_strategy: MergeStrategy::TransitiveClosure,
            ..Default::default()
        };
        let exp = RegionClusterer::new(7, 3, MergeStrategy::TransitiveClosure);
        assert_eq!(exp, RegionClusterer::from_options(&opts));
    }
}
