use crate::core::{ArtifactError, InferenceError, SparseVector};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Default scikit-learn token pattern: words of two or more word characters
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalization applied after TF-IDF weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Persisted form of a fitted TF-IDF vectorizer
///
/// Field names and defaults follow `TfidfVectorizer` from scikit-learn so an
/// export script can dump the fitted attributes as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub binary: bool,
    #[serde(default = "default_true")]
    pub use_idf: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_true() -> bool { true }
fn default_token_pattern() -> String { DEFAULT_TOKEN_PATTERN.to_string() }
fn default_ngram_range() -> (usize, usize) { (1, 1) }
fn default_norm() -> Option<Norm> { Some(Norm::L2) }

impl VectorizerArtifact {
    /// Artifact with default options over the given vocabulary and idf weights
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf: Some(idf),
            lowercase: true,
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            stop_words: Vec::new(),
            binary: false,
            use_idf: true,
            sublinear_tf: false,
            norm: default_norm(),
        }
    }
}

/// Fitted TF-IDF vectorizer
///
/// Turns raw documents into l1/l2-normalized sparse rows over a fixed
/// vocabulary. Terms outside the vocabulary are ignored.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    token_regex: Regex,
    lowercase: bool,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    binary: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    /// Validate an artifact and compile it into a usable vectorizer
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, ArtifactError> {
        let n_features = artifact.vocabulary.len();
        if n_features == 0 {
            return Err(ArtifactError::Invalid("vectorizer vocabulary is empty".to_string()));
        }

        let mut seen = vec![false; n_features];
        for (term, &index) in &artifact.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(ArtifactError::Invalid(format!(
                        "vocabulary index {} assigned twice (term {:?})",
                        index, term
                    )))
                }
                None => {
                    return Err(ArtifactError::Invalid(format!(
                        "vocabulary index {} for term {:?} exceeds vocabulary size {}",
                        index, term, n_features
                    )))
                }
            }
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::Invalid(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let idf = if artifact.use_idf {
            let idf = artifact.idf.ok_or_else(|| {
                ArtifactError::Invalid("use_idf is set but idf weights are missing".to_string())
            })?;
            if idf.len() != n_features {
                return Err(ArtifactError::Invalid(format!(
                    "idf has {} weights for {} vocabulary terms",
                    idf.len(),
                    n_features
                )));
            }
            if idf.iter().any(|w| !w.is_finite()) {
                return Err(ArtifactError::Invalid("idf contains non-finite weights".to_string()));
            }
            Some(idf)
        } else {
            None
        };

        let token_regex = Regex::new(&artifact.token_pattern).map_err(|e| {
            ArtifactError::Invalid(format!("invalid token_pattern: {}", e))
        })?;
        // Group 0 plus at most one explicit capture group
        if token_regex.captures_len() > 2 {
            return Err(ArtifactError::Invalid(
                "token_pattern may contain at most one capturing group".to_string(),
            ));
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf,
            token_regex,
            lowercase: artifact.lowercase,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            binary: artifact.binary,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }

    /// Size of the learned vocabulary, i.e. the output dimension
    pub fn feature_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Transform a batch of documents into one sparse row each
    pub fn transform<S: AsRef<str>>(&self, docs: &[S]) -> Result<Vec<SparseVector>, InferenceError> {
        docs.iter().map(|doc| self.transform_one(doc.as_ref())).collect()
    }

    fn transform_one(&self, doc: &str) -> Result<SparseVector, InferenceError> {
        let counts: Vec<(usize, f64)> = self
            .analyze(doc)
            .iter()
            .filter_map(|term| self.vocabulary.get(term.as_str()).map(|&i| (i, 1.0)))
            .collect();

        let mut row = SparseVector::from_pairs(self.feature_count(), counts)?;

        if self.binary {
            row.map_values(|_| 1.0);
        }
        if self.sublinear_tf {
            row.map_values(|tf| tf.ln() + 1.0);
        }
        if let Some(idf) = &self.idf {
            row.scale_by(idf)?;
        }

        match self.norm {
            Some(Norm::L2) => {
                let norm = row.l2_norm();
                row.normalize_by(norm);
            }
            Some(Norm::L1) => {
                let norm = row.l1_norm();
                row.normalize_by(norm);
            }
            None => {}
        }

        Ok(row)
    }

    /// Preprocess, tokenize, drop stop words and expand word n-grams
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let text: Cow<'_, str> = if self.lowercase {
            Cow::Owned(doc.to_lowercase())
        } else {
            Cow::Borrowed(doc)
        };

        let tokens: Vec<&str> = self
            .tokenize(&text)
            .into_iter()
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        self.word_ngrams(&tokens)
    }

    fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        if self.token_regex.captures_len() > 1 {
            self.token_regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect()
        } else {
            self.token_regex.find_iter(text).map(|m| m.as_str()).collect()
        }
    }

    fn word_ngrams(&self, tokens: &[&str]) -> Vec<String> {
        let (mut min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens.iter().map(|t| t.to_string()).collect();
        }

        let mut terms: Vec<String> = Vec::new();
        if min_n == 1 {
            terms.extend(tokens.iter().map(|t| t.to_string()));
            min_n += 1;
        }

        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }

        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> HashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect()
    }

    fn vectorizer(terms: &[&str]) -> TfidfVectorizer {
        let idf = vec![1.0; terms.len()];
        TfidfVectorizer::from_artifact(VectorizerArtifact::new(vocab(terms), idf)).unwrap()
    }

    #[test]
    fn test_default_tokenization_drops_single_chars() {
        let v = vectorizer(&["win", "free"]);
        assert_eq!(v.analyze("WIN a FREE prize"), vec!["win", "free", "prize"]);
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let v = vectorizer(&["win", "free", "prize"]);
        let rows = v.transform(&["win free free"]).unwrap();

        let norm = rows[0].l2_norm();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(rows[0].get(1) > rows[0].get(0));
        assert_eq!(rows[0].get(2), 0.0);
    }

    #[test]
    fn test_out_of_vocabulary_input_is_empty() {
        let v = vectorizer(&["win"]);
        let rows = v.transform(&["nothing relevant here", ""]).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_empty() && r.dim() == 1));
    }

    #[test]
    fn test_idf_weighting_and_l1_norm() {
        let mut artifact = VectorizerArtifact::new(vocab(&["win", "meeting"]), vec![3.0, 1.0]);
        artifact.norm = Some(Norm::L1);
        let v = TfidfVectorizer::from_artifact(artifact).unwrap();

        let row = &v.transform(&["win meeting"]).unwrap()[0];
        assert!((row.get(0) - 0.75).abs() < 1e-12);
        assert!((row.get(1) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_sublinear_and_binary_tf() {
        let mut artifact = VectorizerArtifact::new(vocab(&["spam"]), vec![1.0]);
        artifact.norm = None;
        artifact.sublinear_tf = true;
        let v = TfidfVectorizer::from_artifact(artifact.clone()).unwrap();
        let row = &v.transform(&["spam spam spam"]).unwrap()[0];
        assert!((row.get(0) - (1.0 + 3f64.ln())).abs() < 1e-12);

        artifact.sublinear_tf = false;
        artifact.binary = true;
        let v = TfidfVectorizer::from_artifact(artifact).unwrap();
        let row = &v.transform(&["spam spam spam"]).unwrap()[0];
        assert_eq!(row.get(0), 1.0);
    }

    #[test]
    fn test_ngrams_and_stop_words() {
        let mut artifact = VectorizerArtifact::new(vocab(&["free prize"]), vec![1.0]);
        artifact.ngram_range = (1, 2);
        artifact.stop_words = vec!["the".to_string()];
        let v = TfidfVectorizer::from_artifact(artifact).unwrap();

        assert_eq!(
            v.analyze("the free prize"),
            vec!["free", "prize", "free prize"]
        );
        assert_eq!(v.transform(&["Free the prize"]).unwrap()[0].nnz(), 1);
    }

    #[test]
    fn test_capture_group_pattern() {
        let mut artifact = VectorizerArtifact::new(vocab(&["abc"]), vec![1.0]);
        artifact.token_pattern = r"#(\w+)".to_string();
        let v = TfidfVectorizer::from_artifact(artifact).unwrap();

        assert_eq!(v.analyze("#abc def #xy"), vec!["abc", "xy"]);
    }

    #[test]
    fn test_rejects_inconsistent_artifacts() {
        let bad_idf = VectorizerArtifact::new(vocab(&["a", "b"]), vec![1.0]);
        assert!(TfidfVectorizer::from_artifact(bad_idf).is_err());

        let mut gap = HashMap::new();
        gap.insert("a".to_string(), 0);
        gap.insert("b".to_string(), 2);
        assert!(TfidfVectorizer::from_artifact(VectorizerArtifact::new(gap, vec![1.0, 1.0])).is_err());

        let mut bad_range = VectorizerArtifact::new(vocab(&["a"]), vec![1.0]);
        bad_range.ngram_range = (2, 1);
        assert!(TfidfVectorizer::from_artifact(bad_range).is_err());

        let mut bad_regex = VectorizerArtifact::new(vocab(&["a"]), vec![1.0]);
        bad_regex.token_pattern = "(".to_string();
        assert!(TfidfVectorizer::from_artifact(bad_regex).is_err());
    }

    #[test]
    fn test_artifact_defaults_from_json() {
        let artifact: VectorizerArtifact =
            serde_json::from_str(r#"{"vocabulary": {"win": 0}, "idf": [1.5]}"#).unwrap();

        assert!(artifact.lowercase);
        assert!(artifact.use_idf);
        assert_eq!(artifact.ngram_range, (1, 1));
        assert_eq!(artifact.norm, Some(Norm::L2));
        assert_eq!(artifact.token_pattern, DEFAULT_TOKEN_PATTERN);

        let no_norm: VectorizerArtifact =
            serde_json::from_str(r#"{"vocabulary": {"win": 0}, "use_idf": false, "norm": null}"#).unwrap();
        assert_eq!(no_norm.norm, None);
        assert_eq!(TfidfVectorizer::from_artifact(no_norm).unwrap().feature_count(), 1);
    }
}
