//! Derived counts over a canonical collection.

use crate::models::{Collection, Summary};

/// Count card lines and total copies.
///
/// Depends only on `cards`; an empty collection yields `{0, 0}`.
pub fn summarize(collection: &Collection) -> Summary {
    Summary {
        unique_count: collection.cards.len(),
        total_qty: collection.cards.iter().map(|c| u64::from(c.qty)).sum(),
    }
}
