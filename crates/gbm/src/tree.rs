//! Second-order regression trees grown by exact greedy splitting.
//!
//! **Not part of the public API.**

use ndarray::{ArrayView1, ArrayView2};

/// Settings shared by every tree of one boosting run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TreeSettings {
    pub(crate) max_depth: usize,
    pub(crate) lambda: f64,
    pub(crate) gamma: f64,
    pub(crate) min_child_weight: f64,
    pub(crate) learning_rate: f64,
}

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted tree stored as a flat node arena; node 0 is the root.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl Tree {
    /// Grows a tree on `rows` of `x` against gradients `grad` and hessians `hess`.
    pub(crate) fn grow(
        x: ArrayView2<'_, f64>,
        grad: &[f64],
        hess: &[f64],
        rows: Vec<usize>,
        settings: &TreeSettings,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build(x, grad, hess, rows, 0, settings);
        tree
    }

    fn build(
        &mut self,
        x: ArrayView2<'_, f64>,
        grad: &[f64],
        hess: &[f64],
        rows: Vec<usize>,
        depth: usize,
        settings: &TreeSettings,
    ) -> usize {
        let index = self.nodes.len();
        let g: f64 = rows.iter().map(|&i| grad[i]).sum();
        let h: f64 = rows.iter().map(|&i| hess[i]).sum();
        let weight = -g / (h + settings.lambda) * settings.learning_rate;
        self.nodes.push(Node::Leaf(weight));

        if depth >= settings.max_depth || rows.len() < 2 {
            return index;
        }
        let Some(best) = best_split(x, grad, hess, &rows, g, h, settings) else {
            return index;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&i| x[[i, best.feature]] <= best.threshold);
        let left = self.build(x, grad, hess, left_rows, depth + 1, settings);
        let right = self.build(x, grad, hess, right_rows, depth + 1, settings);
        self.nodes[index] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        index
    }

    /// Leaf weight reached by one feature row.
    pub(crate) fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf(w) => return w,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Number of leaves.
    #[cfg(test)]
    pub(crate) fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf(_)))
            .count()
    }

    /// Depth of the deepest leaf (a lone leaf has depth 0).
    pub(crate) fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes[index] {
                Node::Leaf(_) => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Exact greedy search: every feature, every boundary between distinct values.
fn best_split(
    x: ArrayView2<'_, f64>,
    grad: &[f64],
    hess: &[f64],
    rows: &[usize],
    g_total: f64,
    h_total: f64,
    settings: &TreeSettings,
) -> Option<BestSplit> {
    let lambda = settings.lambda;
    let parent = g_total * g_total / (h_total + lambda);
    let mut best: Option<BestSplit> = None;
    let mut sorted = rows.to_vec();

    for feature in 0..x.ncols() {
        sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

        let mut gl = 0.0;
        let mut hl = 0.0;
        for k in 0..sorted.len() - 1 {
            let i = sorted[k];
            gl += grad[i];
            hl += hess[i];

            let here = x[[i, feature]];
            let next = x[[sorted[k + 1], feature]];
            if here == next {
                continue;
            }
            let gr = g_total - gl;
            let hr = h_total - hl;
            if hl < settings.min_child_weight || hr < settings.min_child_weight {
                continue;
            }

            let gain = 0.5 * (gl * gl / (hl + lambda) + gr * gr / (hr + lambda) - parent)
                - settings.gamma;
            if gain > 0.0 && best.as_ref().is_none_or(|b| gain > b.gain) {
                best = Some(BestSplit {
                    feature,
                    threshold: 0.5 * (here + next),
                    gain,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn settings(max_depth: usize) -> TreeSettings {
        TreeSettings {
            max_depth,
            lambda: 0.0,
            gamma: 0.0,
            min_child_weight: 0.0,
            learning_rate: 1.0,
        }
    }

    #[test]
    fn depth_zero_is_single_leaf() {
        let x = array![[0.0], [1.0]];
        let grad = [-1.0, -3.0];
        let tree = Tree::grow(x.view(), &grad, &[1.0, 1.0], vec![0, 1], &settings(0));
        assert_eq!(tree.n_leaves(), 1);
        assert_abs_diff_eq!(tree.predict_row(x.row(0)), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn step_function_split_at_midpoint() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        // Targets 0,0,4,4 with zero prediction: g = -y.
        let grad = [0.0, 0.0, -4.0, -4.0];
        let tree = Tree::grow(x.view(), &grad, &[1.0; 4], vec![0, 1, 2, 3], &settings(3));
        assert_eq!(tree.depth(), 1);
        assert_abs_diff_eq!(tree.predict_row(array![1.4].view()), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tree.predict_row(array![1.6].view()), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn gamma_blocks_weak_splits() {
        let x = array![[0.0], [1.0]];
        let grad = [-1.0, 1.0];
        let mut s = settings(3);
        // Gain of this split is 0.5 * (1 + 1 - 0) = 1.
        s.gamma = 2.0;
        let tree = Tree::grow(x.view(), &grad, &[1.0, 1.0], vec![0, 1], &s);
        assert_eq!(tree.n_leaves(), 1);
    }

    #[test]
    fn min_child_weight_blocks_small_children() {
        let x = array![[0.0], [1.0], [2.0]];
        let grad = [-5.0, 0.0, 0.0];
        let mut s = settings(3);
        s.min_child_weight = 2.0;
        let tree = Tree::grow(x.view(), &grad, &[1.0; 3], vec![0, 1, 2], &s);
        assert_eq!(tree.n_leaves(), 1);
    }

    #[test]
    fn tied_feature_values_never_split() {
        let x = array![[1.0], [1.0], [1.0]];
        let grad = [-1.0, 2.0, -3.0];
        let tree = Tree::grow(x.view(), &grad, &[1.0; 3], vec![0, 1, 2], &settings(4));
        assert_eq!(tree.n_leaves(), 1);
    }

    #[test]
    fn picks_informative_feature() {
        // Feature 0 is noise, feature 1 separates the targets.
        let x = array![[3.0, 0.0], [1.0, 0.0], [2.0, 1.0], [0.0, 1.0]];
        let grad = [1.0, 1.0, -1.0, -1.0];
        let tree = Tree::grow(x.view(), &grad, &[1.0; 4], vec![0, 1, 2, 3], &settings(1));
        assert_abs_diff_eq!(tree.predict_row(x.row(0)), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tree.predict_row(x.row(3)), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn lambda_shrinks_leaf_weight() {
        let x = array![[0.0]];
        let mut s = settings(0);
        s.lambda = 1.0;
        let tree = Tree::grow(x.view(), &[-2.0], &[1.0], vec![0], &s);
        assert_abs_diff_eq!(tree.predict_row(x.row(0)), 1.0, epsilon = 1e-12);
    }
}
