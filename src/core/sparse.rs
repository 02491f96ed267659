use crate::core::InferenceError;

/// Sparse feature row: parallel index/value arrays sorted by index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// An all-zero vector of the given dimension
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from `(index, value)` pairs. Pairs are sorted, duplicate indices are
    /// summed and explicit zeros dropped.
    pub fn from_pairs(
        dim: usize,
        mut pairs: Vec<(usize, f64)>,
    ) -> Result<Self, InferenceError> {
        if let Some(&(index, _)) = pairs.iter().find(|(i, _)| *i >= dim) {
            return Err(InferenceError::FeatureOutOfRange {
                index,
                n_features: dim,
            });
        }

        pairs.sort_unstable_by_key(|(i, _)| *i);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            match indices.last() {
                Some(&last) if last == index => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(index);
                    values.push(value);
                }
            }
        }

        let mut vector = Self {
            dim,
            indices,
            values,
        };
        vector.prune_zeros();
        Ok(vector)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `index`, zero when not stored
    pub fn get(&self, index: usize) -> f64 {
        self.indices
            .binary_search(&index)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    /// Dot product against a dense weight row
    pub fn dot(&self, dense: &[f64]) -> Result<f64, InferenceError> {
        if dense.len() != self.dim {
            return Err(InferenceError::DimensionMismatch {
                expected: dense.len(),
                actual: self.dim,
            });
        }

        Ok(self.iter().map(|(i, v)| v * dense[i]).sum())
    }

    pub fn l1_norm(&self) -> f64 {
        self.values.iter().map(|v| v.abs()).sum()
    }

    pub fn l2_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Apply `f` to every stored value in place
    pub fn map_values<F: Fn(f64) -> f64>(&mut self, f: F) {
        for v in &mut self.values {
            *v = f(*v);
        }
    }

    /// Multiply stored values element-wise by a dense row of the same dimension
    pub fn scale_by(&mut self, weights: &[f64]) -> Result<(), InferenceError> {
        if weights.len() != self.dim {
            return Err(InferenceError::DimensionMismatch {
                expected: weights.len(),
                actual: self.dim,
            });
        }

        for (i, v) in self.indices.iter().zip(self.values.iter_mut()) {
            *v *= weights[*i];
        }
        Ok(())
    }

    /// Divide every value by `norm`; zero norms leave the vector untouched
    pub fn normalize_by(&mut self, norm: f64) {
        if norm > 0.0 {
            self.map_values(|v| v / norm);
        }
    }

    fn prune_zeros(&mut self) {
        let mut keep = 0;
        for pos in 0..self.indices.len() {
            if self.values[pos] != 0.0 {
                self.indices[keep] = self.indices[pos];
                self.values[keep] = self.values[pos];
                keep += 1;
            }
        }
        self.indices.truncate(keep);
        self.values.truncate(keep);
    }
}
