use std::cmp::Ordering;

use crate::objective::MultiObjective;

pub trait DominanceOrd {
    /// The type on which the dominance relation is defined.
    type T;

    /// Returns the dominance order.
    fn dominance_ord(&self, a: &Self::T, b: &Self::T) -> Ordering {
        if self.dominates(a, b) {
            Ordering::Less
        } else if self.dominates(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Returns true if `a` dominates `b` ("a < b").
    fn dominates(&self, a: &Self::T, b: &Self::T) -> bool {
        matches!(self.dominance_ord(a, b), Ordering::Less)
    }
}

impl<'a, S, D> DominanceOrd for MultiObjective<'a, S, D>
where
    S: 'a,
    D: 'a,
{
    type T = S;

    fn dominance_ord(&self, a: &Self::T, b: &Self::T) -> Ordering {
        let mut less_cnt = 0;
        let mut greater_cnt = 0;

        for objective in self.objectives.iter() {
            match objective.total_order(a, b) {
                Ordering::Less => {
                    less_cnt += 1;
                }
                Ordering::Greater => {
                    greater_cnt += 1;
                }
                Ordering::Equal => {}
            }
        }

        pareto_order(less_cnt, greater_cnt)
    }
}

/// Pareto dominance on raw objective vectors, every component minimized.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pareto;

impl DominanceOrd for Pareto {
    type T = Vec<f64>;

    fn dominance_ord(&self, a: &Self::T, b: &Self::T) -> Ordering {
        debug_assert_eq!(a.len(), b.len());

        let mut less_cnt = 0;
        let mut greater_cnt = 0;

        for (x, y) in a.iter().zip(b.iter()) {
            if x < y {
                less_cnt += 1;
            } else if x > y {
                greater_cnt += 1;
            }
        }

        pareto_order(less_cnt, greater_cnt)
    }
}

fn pareto_order(less_cnt: usize, greater_cnt: usize) -> Ordering {
    if less_cnt > 0 && greater_cnt == 0 {
        Ordering::Less
    } else if greater_cnt > 0 && less_cnt == 0 {
        Ordering::Greater
    } else {
        debug_assert!((less_cnt > 0 && greater_cnt > 0) || (less_cnt == 0 && greater_cnt == 0));
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;
    use crate::objective::{with_axes, Individual};

    #[test]
    fn test_pareto_dominance() {
        assert!(Pareto.dominates(&vec![1.0, 2.0], &vec![1.0, 3.0]));
        assert!(Pareto.dominates(&vec![0.5, 2.0], &vec![1.0, 3.0]));
        assert!(!Pareto.dominates(&vec![1.0, 3.0], &vec![1.0, 2.0]));
        assert!(!Pareto.dominates(&vec![0.0, 4.0], &vec![1.0, 3.0]));
    }

    #[test]
    fn test_equal_vectors_do_not_dominate() {
        let a = vec![2.0, 2.0, 2.0];
        assert_eq!(Pareto.dominance_ord(&a, &a.clone()), Ordering::Equal);
        assert!(!Pareto.dominates(&a, &a));
    }

    #[test]
    fn test_multi_objective_matches_pareto() {
        let a = Individual::new(Genome::new(vec![0]), vec![1.0, 5.0]);
        let b = Individual::new(Genome::new(vec![1]), vec![2.0, 5.0]);
        let c = Individual::new(Genome::new(vec![2]), vec![0.0, 9.0]);

        with_axes(2, |mo| {
            assert_eq!(mo.dominance_ord(&a, &b), Ordering::Less);
            assert_eq!(mo.dominance_ord(&b, &a), Ordering::Greater);
            assert_eq!(mo.dominance_ord(&a, &c), Ordering::Equal);
            assert_eq!(
                mo.dominance_ord(&a, &c),
                Pareto.dominance_ord(&a.objectives, &c.objectives)
            );
        });
    }
}
