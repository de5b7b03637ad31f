use super::{check_feature_count, Regressor};
use crate::errors::CalburnError;

/// A node of a regression tree
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// Go to `left` when `x[feature] < threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// Gradient-boosted tree ensemble: `base_score + Σ tree(x)`
///
/// Each tree is a flat node table rooted at index 0. Children always point
/// to a higher index, which the artifact loader checks, so every walk ends.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    base_score: f64,
    n_features: usize,
    trees: Vec<Vec<TreeNode>>,
}

impl TreeEnsemble {
    pub fn new(base_score: f64, n_features: usize, trees: Vec<Vec<TreeNode>>) -> Self {
        Self {
            base_score,
            n_features,
            trees,
        }
    }

    fn eval_tree(
        tree_idx: usize,
        nodes: &[TreeNode],
        features: &[f64],
    ) -> Result<f64, CalburnError> {
        let mut idx = 0;
        // bounded by node count: children point strictly forward
        for _ in 0..=nodes.len() {
            match nodes.get(idx) {
                Some(TreeNode::Leaf(value)) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or(CalburnError::FeatureCount {
                        expected: feature + 1,
                        actual: features.len(),
                    })?;
                    idx = if *x < *threshold { *left } else { *right };
                }
                None => {
                    return Err(CalburnError::BrokenTree {
                        tree: tree_idx,
                        node: idx,
                    })
                }
            }
        }
        Err(CalburnError::BrokenTree {
            tree: tree_idx,
            node: idx,
        })
    }
}

impl Regressor for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> Result<f64, CalburnError> {
        check_feature_count(self.n_features, features)?;
        let mut total = self.base_score;
        for (i, nodes) in self.trees.iter().enumerate() {
            total += Self::eval_tree(i, nodes, features)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, lo: f64, hi: f64) -> Vec<TreeNode> {
        vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf(lo),
            TreeNode::Leaf(hi),
        ]
    }

    #[test]
    fn test_split_goes_left_below_threshold() {
        let model = TreeEnsemble::new(0.0, 2, vec![stump(1, 10.0, -1.0, 1.0)]);
        assert_eq!(model.predict(&[0.0, 9.99]).unwrap(), -1.0);
        assert_eq!(model.predict(&[0.0, 10.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_ensemble_sums_trees_and_base_score() {
        let model = TreeEnsemble::new(
            0.5,
            2,
            vec![stump(0, 1.0, 10.0, 20.0), stump(1, 1.0, 100.0, 200.0)],
        );
        assert_eq!(model.predict(&[0.0, 5.0]).unwrap(), 210.5);
    }

    #[test]
    fn test_dangling_child_is_an_error() {
        let broken = vec![TreeNode::Split {
            feature: 0,
            threshold: 0.0,
            left: 7,
            right: 7,
        }];
        let model = TreeEnsemble::new(0.0, 1, vec![broken]);
        let err = model.predict(&[1.0]).unwrap_err();
        assert_eq!(err, CalburnError::BrokenTree { tree: 0, node: 7 });
    }

    #[test]
    fn test_self_loop_terminates() {
        let looping = vec![TreeNode::Split {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
        }];
        let model = TreeEnsemble::new(0.0, 1, vec![looping]);
        assert!(matches!(
            model.predict(&[1.0]),
            Err(CalburnError::BrokenTree { tree: 0, .. })
        ));
    }
}
