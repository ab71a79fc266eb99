pub mod classifier;
pub mod document;
pub mod normalize;
pub mod result;
pub mod similarity;

pub use classifier::{Classification, ConsistencyClassifier};
pub use document::{Document, PageText};
pub use normalize::TextNormalizer;
pub use result::{ClassificationResult, TextStatus};
pub use similarity::{paged_similarity, similarity};
