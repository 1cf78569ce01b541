//! Conversion of raw P-Zone exports into a canonical [`Collection`].
//!
//! Normalization is pure: it reads the document, picks the card list via the
//! ordered matchers in [`shapes`], resolves a player id, and maps every card
//! through the coercions in [`coerce`]. Either a complete collection comes
//! back or [`CollectionError::ShapeNotFound`]; there is no partial output.
//!
//! Feeding a canonical collection back in is not an identity: the card
//! mapping reads the export keys (`id`/`code`, `language`, `count`/`quantity`),
//! not the canonical ones, so card ids, languages and quantities are lost.

pub mod coerce;
pub mod shapes;

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::{DEFAULT_LANG, UNKNOWN_PLAYER};
use crate::error::{CollectionError, Result};
use crate::models::{CardEntry, Collection};

use coerce::{coerce_qty, first_truthy, scalar_to_string, truthy_string, QtyCoercion};
pub use shapes::{Shape, ShapeMatch, ShapeMatcher, SHAPES};

/// Normalize an export with no externally known player id.
pub fn normalize(raw: &Value) -> Result<Collection> {
    normalize_with_player_hint(raw, None)
}

/// Normalize an export whose player is already known, typically from the
/// page URL it was captured on.
///
/// Player id precedence: the hint, `pageProps.player.id`,
/// `pageProps.playerId`, top-level `player_id`, top-level `playerId`, then
/// `"unknown"`.
pub fn normalize_with_player_hint(raw: &Value, player_hint: Option<&str>) -> Result<Collection> {
    let Some(found) = shapes::detect(raw) else {
        let detail = describe_document(raw);
        warn!(%detail, "no card list found in export");
        return Err(CollectionError::ShapeNotFound(detail));
    };
    debug!(shape = %found.shape, cards = found.cards.len(), "matched export shape");

    let player_id = resolve_player_id(raw, player_hint);
    let cards = found.cards.iter().map(map_card).collect();

    Ok(Collection { player_id, cards })
}

/// Extract the numeric player id from a `/players/<id>/cards` page URL.
pub fn player_id_from_url(url: &str) -> Option<String> {
    static PLAYER_CARDS_URL: OnceLock<Regex> = OnceLock::new();
    let re = PLAYER_CARDS_URL
        .get_or_init(|| Regex::new(r"/players/(\d+)/cards").expect("valid player URL pattern"));
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn resolve_player_id(raw: &Value, player_hint: Option<&str>) -> String {
    let container = shapes::page_props(raw);
    player_hint
        .filter(|hint| !hint.is_empty())
        .map(str::to_string)
        .or_else(|| {
            container
                .and_then(|props| props.get("player"))
                .and_then(|player| player.get("id"))
                .and_then(truthy_string)
        })
        .or_else(|| {
            container
                .and_then(|props| props.get("playerId"))
                .and_then(truthy_string)
        })
        .or_else(|| raw.get("player_id").and_then(truthy_string))
        .or_else(|| raw.get("playerId").and_then(truthy_string))
        .unwrap_or_else(|| UNKNOWN_PLAYER.to_string())
}

fn map_card(card: &Value) -> CardEntry {
    let set = match card.get("set") {
        Some(Value::Object(obj)) => obj.get("code").and_then(scalar_to_string),
        Some(other) => scalar_to_string(other),
        None => None,
    };

    let qty_source = first_truthy(card, &["count", "quantity"]);
    let qty = coerce_qty(qty_source);
    if qty == QtyCoercion::Recovered {
        trace!(value = ?qty_source, "unreadable card quantity, counting as one");
    }

    CardEntry {
        card_id: first_truthy(card, &["id", "code"]).and_then(scalar_to_string),
        name: card.get("name").and_then(scalar_to_string),
        set,
        rarity: card.get("rarity").and_then(scalar_to_string),
        lang: first_truthy(card, &["language"])
            .and_then(scalar_to_string)
            .unwrap_or_else(|| DEFAULT_LANG.to_string()),
        qty: qty.value(),
    }
}

/// Top-level keys named in a `ShapeNotFound` message; the rest are elided.
const MAX_LISTED_KEYS: usize = 10;

/// Describe what was looked for, for the `ShapeNotFound` message.
fn describe_document(raw: &Value) -> String {
    let expected = SHAPES
        .iter()
        .map(|m| m.shape.path())
        .collect::<Vec<_>>()
        .join(", ");
    match raw.as_object() {
        Some(obj) if obj.is_empty() => format!("document is empty; expected one of {expected}"),
        Some(obj) => {
            let mut keys = obj
                .keys()
                .take(MAX_LISTED_KEYS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if obj.len() > MAX_LISTED_KEYS {
                keys.push_str(", …");
            }
            format!("expected one of {expected}; top-level keys were {keys}")
        }
        None => format!("document is not a JSON object; expected one of {expected}"),
    }
}
