//! JSON model artifact
//!
//! ```json
//! { "format": "calburn-regressor", "version": 1,
//!   "features": ["gender", "age", "height", "weight", "duration", "heart_rate", "body_temp"],
//!   "model": { "kind": "linear", "intercept": -150.0, "coefficients": [0, 0, 0, 0, 6, 0.6, 0] } }
//! ```
//!
//! Tree ensembles use `"kind": "tree_ensemble"` with a `base_score` and a list
//! of `trees`, each a flat `nodes` table rooted at index 0. A node is either a
//! split `{ "feature", "threshold", "left", "right" }` or `{ "leaf": value }`.

use std::path::Path;

use serde::Deserialize;

use super::{LinearRegressor, Regressor, TreeEnsemble, TreeNode};
use crate::errors::CalburnError;
use crate::model::{FEATURE_COUNT, FEATURE_NAMES};

pub const ARTIFACT_FORMAT: &str = "calburn-regressor";
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArtifactFile {
    format: String,
    version: u32,
    features: Vec<String>,
    model: ModelSpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelSpec {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    TreeEnsemble {
        base_score: f64,
        trees: Vec<TreeSpec>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TreeSpec {
    nodes: Vec<NodeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

/// Load and validate a model artifact from disk
///
/// # Errors
///
/// `ArtifactNotFound` when the file is absent, `ArtifactInvalid` when it
/// cannot be read, parsed, or fails validation.
pub fn load_artifact(path: &Path) -> Result<Box<dyn Regressor>, CalburnError> {
    let label = path.display().to_string();
    if !path.exists() {
        return Err(CalburnError::ArtifactNotFound { path: label });
    }
    let text = std::fs::read_to_string(path).map_err(|e| CalburnError::ArtifactInvalid {
        path: label.clone(),
        reason: e.to_string(),
    })?;
    parse_artifact(&text, &label)
}

/// Parse and validate an artifact held in memory
///
/// `label` names the source in error messages.
///
/// # Errors
///
/// `ArtifactInvalid` when the JSON is malformed or fails validation.
pub fn parse_artifact(json: &str, label: &str) -> Result<Box<dyn Regressor>, CalburnError> {
    let invalid = |reason: String| CalburnError::ArtifactInvalid {
        path: label.to_string(),
        reason,
    };

    let file: ArtifactFile = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;

    if file.format != ARTIFACT_FORMAT {
        return Err(invalid(format!(
            "unsupported format {:?}, expected {:?}",
            file.format, ARTIFACT_FORMAT
        )));
    }
    if file.version != ARTIFACT_VERSION {
        return Err(invalid(format!(
            "unsupported version {}, expected {}",
            file.version, ARTIFACT_VERSION
        )));
    }
    if file.features != FEATURE_NAMES {
        return Err(invalid(format!(
            "feature order {:?} does not match {:?}",
            file.features, FEATURE_NAMES
        )));
    }

    match file.model {
        ModelSpec::Linear {
            intercept,
            coefficients,
        } => {
            if coefficients.len() != FEATURE_COUNT {
                return Err(invalid(format!(
                    "linear model has {} coefficients, expected {}",
                    coefficients.len(),
                    FEATURE_COUNT
                )));
            }
            if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                return Err(invalid("linear model has non-finite parameters".to_string()));
            }
            Ok(Box::new(LinearRegressor::new(intercept, coefficients)))
        }
        ModelSpec::TreeEnsemble { base_score, trees } => {
            if !base_score.is_finite() {
                return Err(invalid("base_score is not finite".to_string()));
            }
            if trees.is_empty() {
                return Err(invalid("tree ensemble has no trees".to_string()));
            }
            let trees = trees
                .into_iter()
                .enumerate()
                .map(|(i, tree)| build_tree(i, tree).map_err(&invalid))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(TreeEnsemble::new(base_score, FEATURE_COUNT, trees)))
        }
    }
}

fn build_tree(tree_idx: usize, tree: TreeSpec) -> Result<Vec<TreeNode>, String> {
    let len = tree.nodes.len();
    if len == 0 {
        return Err(format!("tree {} has no nodes", tree_idx));
    }
    tree.nodes
        .into_iter()
        .enumerate()
        .map(|(idx, node)| match node {
            NodeSpec::Leaf { leaf } if leaf.is_finite() => Ok(TreeNode::Leaf(leaf)),
            NodeSpec::Leaf { .. } => Err(format!(
                "tree {} node {} has a non-finite leaf",
                tree_idx, idx
            )),
            NodeSpec::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= FEATURE_COUNT {
                    return Err(format!(
                        "tree {} node {} splits on unknown feature {}",
                        tree_idx, idx, feature
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!(
                        "tree {} node {} has a non-finite threshold",
                        tree_idx, idx
                    ));
                }
                for child in [left, right] {
                    if child <= idx || child >= len {
                        return Err(format!(
                            "tree {} node {} has invalid child {}",
                            tree_idx, idx, child
                        ));
                    }
                }
                Ok(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURES: &str =
        r#"["gender","age","height","weight","duration","heart_rate","body_temp"]"#;

    fn linear_json(coefficients: &str) -> String {
        format!(
            r#"{{"format":"calburn-regressor","version":1,"features":{},
                "model":{{"kind":"linear","intercept":1.5,"coefficients":{}}}}}"#,
            FEATURES, coefficients
        )
    }

    fn tree_json(nodes: &str) -> String {
        format!(
            r#"{{"format":"calburn-regressor","version":1,"features":{},
                "model":{{"kind":"tree_ensemble","base_score":0.5,"trees":[{{"nodes":{}}}]}}}}"#,
            FEATURES, nodes
        )
    }

    fn reason(err: CalburnError) -> String {
        match err {
            CalburnError::ArtifactInvalid { reason, .. } => reason,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_linear() {
        let model = parse_artifact(&linear_json("[0,0,0,0,1,0,0]"), "mem").unwrap();
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.n_features(), FEATURE_COUNT);
        let y = model
            .predict(&[0.0, 25.0, 175.0, 70.0, 30.0, 110.0, 40.5])
            .unwrap();
        assert_eq!(y, 31.5);
    }

    #[test]
    fn test_linear_wrong_coefficient_count() {
        let err = parse_artifact(&linear_json("[1,2,3]"), "mem").unwrap_err();
        assert!(reason(err).contains("3 coefficients"));
    }

    #[test]
    fn test_parse_tree_ensemble() {
        let nodes = r#"[{"feature":4,"threshold":20.0,"left":1,"right":2},{"leaf":10.0},{"leaf":100.0}]"#;
        let model = parse_artifact(&tree_json(nodes), "mem").unwrap();
        assert_eq!(model.kind(), "tree_ensemble");
        let y = model
            .predict(&[0.0, 25.0, 175.0, 70.0, 30.0, 110.0, 40.5])
            .unwrap();
        assert_eq!(y, 100.5);
    }

    #[test]
    fn test_tree_backward_child_rejected() {
        let nodes = r#"[{"leaf":1.0},{"feature":0,"threshold":0.5,"left":0,"right":0}]"#;
        let err = parse_artifact(&tree_json(nodes), "mem").unwrap_err();
        assert!(reason(err).contains("invalid child"));
    }

    #[test]
    fn test_tree_unknown_feature_rejected() {
        let nodes = r#"[{"feature":7,"threshold":0.5,"left":1,"right":2},{"leaf":1.0},{"leaf":2.0}]"#;
        let err = parse_artifact(&tree_json(nodes), "mem").unwrap_err();
        assert!(reason(err).contains("unknown feature 7"));
    }

    #[test]
    fn test_wrong_format_rejected() {
        let json = linear_json("[0,0,0,0,1,0,0]").replace("calburn-regressor", "pickle");
        let err = parse_artifact(&json, "mem").unwrap_err();
        assert!(reason(err).contains("unsupported format"));
    }

    #[test]
    fn test_wrong_feature_order_rejected() {
        let json = linear_json("[0,0,0,0,1,0,0]").replace(r#""age","height""#, r#""height","age""#);
        let err = parse_artifact(&json, "mem").unwrap_err();
        assert!(reason(err).contains("feature order"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = parse_artifact("{not json", "mem").unwrap_err();
        assert!(matches!(err, CalburnError::ArtifactInvalid { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_artifact(&path).unwrap_err();
        assert!(matches!(err, CalburnError::ArtifactNotFound { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, linear_json("[0,0,0,0,1,0,0]")).unwrap();
        let model = load_artifact(&path).unwrap();
        assert_eq!(model.kind(), "linear");
    }
}
