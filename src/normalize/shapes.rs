//! Ordered catalogue of the export layouts we know how to read.
//!
//! Each [`ShapeMatcher`] knows where one layout keeps its card list. The
//! matchers are tried in [`SHAPES`] order; precedence lives in that array and
//! nowhere else.

use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// A recognized export layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Next.js page data: `props.pageProps.cards`.
    PagePropsCards,
    /// Next.js page data: `props.pageProps.playerCards`.
    PagePropsPlayerCards,
    /// Next.js page data: `props.pageProps.data.cards`.
    PagePropsDataCards,
    /// Search API response: `results`.
    TopLevelResults,
    /// Bare card array: `cards`.
    TopLevelCards,
}

impl Shape {
    /// Dotted path of the card list this shape reads.
    pub fn path(&self) -> &'static str {
        match self {
            Shape::PagePropsCards => "pageProps.cards",
            Shape::PagePropsPlayerCards => "pageProps.playerCards",
            Shape::PagePropsDataCards => "pageProps.data.cards",
            Shape::TopLevelResults => "results",
            Shape::TopLevelCards => "cards",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

// ---------------------------------------------------------------------------
// ShapeMatcher
// ---------------------------------------------------------------------------

/// A card list located inside a raw document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeMatch<'a> {
    pub shape: Shape,
    pub cards: &'a [Value],
}

/// Locates the card list of a single [`Shape`].
pub struct ShapeMatcher {
    pub shape: Shape,
    locate: fn(&Value) -> Option<&Value>,
}

impl ShapeMatcher {
    /// Return the card list if this shape's field holds a JSON array.
    pub fn try_match<'a>(&self, raw: &'a Value) -> Option<ShapeMatch<'a>> {
        let cards = (self.locate)(raw)?.as_array()?;
        Some(ShapeMatch {
            shape: self.shape,
            cards: cards.as_slice(),
        })
    }
}

/// All known shapes, highest precedence first.
pub const SHAPES: [ShapeMatcher; 5] = [
    ShapeMatcher {
        shape: Shape::PagePropsCards,
        locate: page_props_cards,
    },
    ShapeMatcher {
        shape: Shape::PagePropsPlayerCards,
        locate: page_props_player_cards,
    },
    ShapeMatcher {
        shape: Shape::PagePropsDataCards,
        locate: page_props_data_cards,
    },
    ShapeMatcher {
        shape: Shape::TopLevelResults,
        locate: top_level_results,
    },
    ShapeMatcher {
        shape: Shape::TopLevelCards,
        locate: top_level_cards,
    },
];

fn page_props_cards(raw: &Value) -> Option<&Value> {
    page_props(raw)?.get("cards")
}

fn page_props_player_cards(raw: &Value) -> Option<&Value> {
    page_props(raw)?.get("playerCards")
}

fn page_props_data_cards(raw: &Value) -> Option<&Value> {
    page_props(raw)?.get("data")?.get("cards")
}

fn top_level_results(raw: &Value) -> Option<&Value> {
    raw.get("results")
}

fn top_level_cards(raw: &Value) -> Option<&Value> {
    raw.get("cards")
}

/// The page-properties container of a Next.js export.
///
/// Uses `props.pageProps` when `props` is present, otherwise a top-level
/// `pageProps`. An empty object counts as no container.
pub fn page_props(raw: &Value) -> Option<&Map<String, Value>> {
    let container = match raw.get("props") {
        Some(props) => props.get("pageProps"),
        None => raw.get("pageProps"),
    }?;
    container.as_object().filter(|m| !m.is_empty())
}

/// Find the card list of `raw`.
///
/// The first shape holding a non-empty array wins. When every matching
/// array is empty, the highest-precedence empty one is returned so that an
/// export of an empty collection still normalizes.
pub fn detect(raw: &Value) -> Option<ShapeMatch<'_>> {
    let mut first_empty = None;
    for matcher in SHAPES.iter() {
        let Some(found) = matcher.try_match(raw) else {
            continue;
        };
        if !found.cards.is_empty() {
            return Some(found);
        }
        if first_empty.is_none() {
            first_empty = Some(found);
        }
    }
    first_empty
}
