//! Store Module - per-scenario property bag
//!
//! Thread-safe mapping from symbolic names to `Value`s, shared by every step
//! and by running jobs. A single reader/writer lock guards the whole map.
//!
//! Key types:
//! - `PropsStore`: cloneable handle to the shared map
//! - `WeakPropsStore`: non-owning handle held by callables stored in the map

mod props;

pub use props::{PropsStore, WeakPropsStore};
