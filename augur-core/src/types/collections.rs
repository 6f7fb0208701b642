//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::{BTreeMap, BTreeSet};

/// SmallVec optimized for acquisition task names per resource (usually <2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;

/// SmallVec optimized for provided feature names per extractor (usually <8).
pub type SmallVec8<T> = SmallVec<[T; 8]>;
