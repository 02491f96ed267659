use crate::core::{ArtifactError, InferenceError, SparseVector};
use serde::{Deserialize, Serialize};

/// Fitted classifier loaded from a persisted artifact
///
/// The `model_type` tag mirrors the scikit-learn estimator class name that
/// produced the parameters, and is what `/api/model-info` reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type")]
pub enum Classifier {
    #[serde(rename = "MultinomialNB")]
    MultinomialNb(MultinomialNb),
    LogisticRegression(LogisticRegression),
}

/// Multinomial Naive Bayes parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    pub classes: Vec<i64>,
    pub class_log_prior: Vec<f64>,
    /// `[n_classes][n_features]` log probabilities of each feature given the class
    pub feature_log_prob: Vec<Vec<f64>>,
}

/// Strategy used to turn per-class scores into probabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    #[default]
    Multinomial,
    Ovr,
}

/// Logistic Regression parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub classes: Vec<i64>,
    /// One row for binary problems, one row per class otherwise
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    #[serde(default)]
    pub multi_class: MultiClass,
}

impl Classifier {
    /// Estimator class name, e.g. `MultinomialNB`
    pub fn type_name(&self) -> &'static str {
        match self {
            Classifier::MultinomialNb(_) => "MultinomialNB",
            Classifier::LogisticRegression(_) => "LogisticRegression",
        }
    }

    pub fn classes(&self) -> &[i64] {
        match self {
            Classifier::MultinomialNb(nb) => &nb.classes,
            Classifier::LogisticRegression(lr) => &lr.classes,
        }
    }

    /// Number of input features the model was fitted on
    pub fn n_features(&self) -> usize {
        let rows = match self {
            Classifier::MultinomialNb(nb) => &nb.feature_log_prob,
            Classifier::LogisticRegression(lr) => &lr.coef,
        };
        rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Check parameter shapes and values; called once after deserializing
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let classes = self.classes();
        if classes.len() < 2 {
            return Err(ArtifactError::Invalid(format!(
                "classifier needs at least 2 classes, got {}",
                classes.len()
            )));
        }
        let mut sorted = classes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != classes.len() {
            return Err(ArtifactError::Invalid("duplicate class labels".to_string()));
        }

        let (rows, offsets, expected_rows) = match self {
            Classifier::MultinomialNb(nb) => {
                (&nb.feature_log_prob, &nb.class_log_prior, classes.len())
            }
            Classifier::LogisticRegression(lr) => {
                let expected = if classes.len() == 2 { 1 } else { classes.len() };
                (&lr.coef, &lr.intercept, expected)
            }
        };

        if rows.len() != expected_rows || offsets.len() != expected_rows {
            return Err(ArtifactError::Invalid(format!(
                "{} expects {} parameter rows, got {} weight rows and {} offsets",
                self.type_name(),
                expected_rows,
                rows.len(),
                offsets.len()
            )));
        }

        let n_features = self.n_features();
        if n_features == 0 || rows.iter().any(|r| r.len() != n_features) {
            return Err(ArtifactError::Invalid(
                "weight rows must be non-empty and of equal length".to_string(),
            ));
        }

        // MultinomialNB keeps -inf log probabilities for unseen features when alpha=0
        let accepted: fn(&f64) -> bool = match self {
            Classifier::MultinomialNb(_) => |v| !v.is_nan(),
            Classifier::LogisticRegression(_) => |v| v.is_finite(),
        };
        if !rows.iter().flatten().chain(offsets.iter()).all(accepted) {
            return Err(ArtifactError::Invalid(format!(
                "{} contains non-finite parameters",
                self.type_name()
            )));
        }

        Ok(())
    }

    /// Predicted class label for each row
    pub fn predict(&self, rows: &[SparseVector]) -> Result<Vec<i64>, InferenceError> {
        rows.iter()
            .map(|row| {
                let proba = self.proba_row(row)?;
                argmax(&proba)
                    .and_then(|best| self.classes().get(best).copied())
                    .ok_or(InferenceError::EmptyDistribution)
            })
            .collect()
    }

    /// Probability of each class, in `classes()` order, for each row
    pub fn predict_proba(&self, rows: &[SparseVector]) -> Result<Vec<Vec<f64>>, InferenceError> {
        rows.iter().map(|row| self.proba_row(row)).collect()
    }

    fn proba_row(&self, row: &SparseVector) -> Result<Vec<f64>, InferenceError> {
        if row.dim() != self.n_features() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.n_features(),
                actual: row.dim(),
            });
        }

        let proba = match self {
            Classifier::MultinomialNb(nb) => softmax(&nb.joint_log_likelihood(row)?),
            Classifier::LogisticRegression(lr) => lr.probabilities(row)?,
        };

        if proba.is_empty() {
            return Err(InferenceError::EmptyDistribution);
        }
        if let Some(pos) = proba.iter().position(|p| !p.is_finite()) {
            return Err(InferenceError::NonFiniteScore {
                class: self.classes().get(pos).copied().unwrap_or_default(),
            });
        }

        Ok(proba)
    }
}

impl MultinomialNb {
    /// `log P(c) + sum_j x_j * log P(x_j | c)` for each class
    pub fn joint_log_likelihood(&self, row: &SparseVector) -> Result<Vec<f64>, InferenceError> {
        self.feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(weights, prior)| Ok(prior + row.dot(weights)?))
            .collect()
    }
}

impl LogisticRegression {
    /// Linear decision value per weight row
    pub fn decision_function(&self, row: &SparseVector) -> Result<Vec<f64>, InferenceError> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(weights, bias)| Ok(row.dot(weights)? + bias))
            .collect()
    }

    fn probabilities(&self, row: &SparseVector) -> Result<Vec<f64>, InferenceError> {
        let scores = self.decision_function(row)?;

        if let [score] = scores.as_slice() {
            let positive = sigmoid(*score);
            return Ok(vec![1.0 - positive, positive]);
        }

        Ok(match self.multi_class {
            MultiClass::Multinomial => softmax(&scores),
            MultiClass::Ovr => {
                let raw: Vec<f64> = scores.iter().map(|s| sigmoid(*s)).collect();
                let total: f64 = raw.iter().sum();
                if total > 0.0 {
                    raw.iter().map(|p| p / total).collect()
                } else {
                    vec![1.0 / raw.len() as f64; raw.len()]
                }
            }
        })
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Numerically stable softmax via log-sum-exp
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![f64::NAN; scores.len()];
    }
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

/// Index of the largest value; ties resolve to the first index
fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
