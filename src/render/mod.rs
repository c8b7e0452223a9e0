//! Maps the controller's result state to what the user sees.
//!
//! [`render`] is a pure function of the state. Loading wins over an error,
//! an error over results, and results over the welcome screen; because
//! [`ResultState`] holds exactly one variant this is a plain exhaustive
//! match, and the welcome branch can only appear before the first search.

mod card;

pub use card::{format_authors, CatalogLinks, CoverImage, ResultCard, UNKNOWN_AUTHOR};

use serde::Serialize;

use crate::controller::ResultState;
use crate::sources::CatalogSource;

/// Welcome text shown before the first search
pub const WELCOME_MESSAGE: &str =
    "Search the Open Library catalog by title, author, or subject to get started.";

/// One of the four visual branches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Search in flight
    Loading,

    /// Informational message (transport failure or no results)
    Message { text: String },

    /// Result cards in upstream order
    Grid { cards: Vec<ResultCard> },

    /// Nothing searched yet
    Welcome { text: String },
}

impl View {
    /// The cards, if this is the grid branch
    pub fn cards(&self) -> Option<&[ResultCard]> {
        match self {
            View::Grid { cards } => Some(cards.as_slice()),
            _ => None,
        }
    }

    /// Mutable access to the cards, for applying cover fallbacks
    pub fn cards_mut(&mut self) -> Option<&mut [ResultCard]> {
        match self {
            View::Grid { cards } => Some(cards.as_mut_slice()),
            _ => None,
        }
    }
}

/// Render a result state
pub fn render(state: &ResultState, links: &CatalogLinks) -> View {
    match state {
        ResultState::Loading => View::Loading,
        ResultState::Error(failure) => View::Message {
            text: failure.message(),
        },
        ResultState::Ready(records) => View::Grid {
            cards: records
                .iter()
                .map(|record| ResultCard::from_record(record, links))
                .collect(),
        },
        ResultState::Idle => View::Welcome {
            text: WELCOME_MESSAGE.to_string(),
        },
    }
}

/// Probe each card's cover and swap in the placeholder for any that cannot
/// be loaded.
///
/// Cards already showing the placeholder are skipped, so the placeholder is
/// never probed and a failed fallback cannot loop. Returns how many covers
/// were replaced.
pub async fn apply_cover_fallbacks<S>(cards: &mut [ResultCard], source: &S) -> usize
where
    S: CatalogSource + ?Sized,
{
    let mut replaced = 0;
    for card in cards.iter_mut().filter(|c| !c.cover.is_placeholder()) {
        let available = match source.cover_available(card.cover.src()).await {
            Ok(available) => available,
            Err(e) => {
                tracing::debug!(url = card.cover.src(), error = %e, "Cover probe failed");
                false
            }
        };
        if !available && card.cover.on_load_error() {
            replaced += 1;
        }
    }
    replaced
}
