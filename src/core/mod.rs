// Inference core exports
pub mod classifier;
pub mod error;
pub mod sparse;
pub mod vectorizer;

pub use classifier::{Classifier, LogisticRegression, MultiClass, MultinomialNb};
pub use error::{ArtifactError, InferenceError};
pub use sparse::SparseVector;
pub use vectorizer::{Norm, TfidfVectorizer, VectorizerArtifact};
