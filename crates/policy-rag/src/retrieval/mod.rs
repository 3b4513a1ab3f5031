//! Vector index, passage store and query-time retrieval

pub mod index;
pub mod search;
pub mod store;

pub use index::{l2_distance, FlatL2Index, IndexHit, VectorIndex};
pub use search::Retriever;
pub use store::{PassageHit, PassageStore};
