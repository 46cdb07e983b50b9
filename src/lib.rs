//! # Hopscotch zset - a span-counting skip list for sorted sets
//! Keeps `(score, element)` pairs in order and skips its way to any score or rank.
//!
//! This is the index behind a scored sorted-set type. The sorted-set type keeps its own
//! element-to-score map and uses it to make sure an element is never inserted twice.

pub mod skiplist;
// Re-export the SkipList struct and show at the top level of docs
#[doc(inline)]
pub use crate::skiplist::{Iter, SkipList};

mod arena;
#[doc(inline)]
pub use crate::arena::NodeId;

pub mod level;
#[doc(inline)]
pub use crate::level::{GeometricLevels, LevelGenerator, ScriptedLevels, MAX_LEVEL};

mod range;
#[doc(inline)]
pub use crate::range::ScoreRange;

mod error;
#[doc(inline)]
pub use crate::error::{Result, SkipListError};
