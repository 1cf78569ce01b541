use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CardEntry — One owned card line in canonical form
// ---------------------------------------------------------------------------

/// A single card line of a canonical collection.
///
/// Serializes to the canonical wire shape
/// `{"card_id", "name", "set", "rarity", "lang", "qty"}` with absent optional
/// fields rendered as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub card_id: Option<String>,
    pub name: Option<String>,
    pub set: Option<String>,
    pub rarity: Option<String>,
    pub lang: String,
    /// Always at least 1.
    pub qty: u32,
}

// ---------------------------------------------------------------------------
// Collection — One player's full export
// ---------------------------------------------------------------------------

/// The canonical form every export shape converges to.
///
/// `cards` keeps source order and is never deduplicated: two entries with
/// the same `card_id` are both kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub player_id: String,
    pub cards: Vec<CardEntry>,
}

impl Collection {
    pub fn new(player_id: impl Into<String>, cards: Vec<CardEntry>) -> Self {
        Self {
            player_id: player_id.into(),
            cards,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
