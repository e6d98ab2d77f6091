pub mod bitpack;

use ahash::{AHashMap, AHashSet};
pub type SmallKeyHashMap<K, V> = AHashMap<K, V>;
pub type SmallKeyHashSet<K> = AHashSet<K>;

// Re-exports.
pub use approx;
pub use static_assertions;
