use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle states as seen by queries and filters.
///
/// `All` only exists to express "no filter"; it never appears on a stored
/// item. Items carry an [`ItemState`] instead.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum State {
    #[default]
    All,
    Working,
    Done,
}

impl State {
    pub fn matches(self, item: &TodoItem) -> bool {
        match self {
            State::All => true,
            State::Working => item.state == ItemState::Working,
            State::Done => item.state == ItemState::Done,
        }
    }
}

/// The subset of [`State`] that may be persisted on an item.
///
/// Written as `"Working"` / `"Done"`. Reading also accepts the ordinals of
/// [`State`] (`1`, `2`) used by older stored lists.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum ItemState {
    #[default]
    Working,
    Done,
}

impl<'de> Deserialize<'de> for ItemState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ItemStateVisitor;

        impl<'de> Visitor<'de> for ItemStateVisitor {
            type Value = ItemState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"Working\", \"Done\", 1 or 2")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ItemState, E> {
                match value {
                    "Working" => Ok(ItemState::Working),
                    "Done" => Ok(ItemState::Done),
                    _ => Err(E::unknown_variant(value, &["Working", "Done"])),
                }
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<ItemState, E> {
                match value {
                    1 => Ok(ItemState::Working),
                    2 => Ok(ItemState::Done),
                    _ => Err(E::invalid_value(de::Unexpected::Unsigned(value), &self)),
                }
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<ItemState, E> {
                match u64::try_from(value) {
                    Ok(value) => self.visit_u64(value),
                    Err(_) => Err(E::invalid_value(de::Unexpected::Signed(value), &self)),
                }
            }
        }

        deserializer.deserialize_any(ItemStateVisitor)
    }
}

impl From<ItemState> for State {
    fn from(state: ItemState) -> Self {
        match state {
            ItemState::Working => State::Working,
            ItemState::Done => State::Done,
        }
    }
}

impl TryFrom<State> for ItemState {
    type Error = StateError;

    fn try_from(state: State) -> Result<Self, Self::Error> {
        match state {
            State::Working => Ok(ItemState::Working),
            State::Done => Ok(ItemState::Done),
            State::All => Err(StateError::FilterOnly),
        }
    }
}

impl FromStr for State {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(State::All),
            "working" => Ok(State::Working),
            "done" => Ok(State::Done),
            _ => Err(StateError::InvalidState(s.to_string())),
        }
    }
}

impl FromStr for ItemState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<State>()?.try_into()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::All => "all",
            State::Working => "working",
            State::Done => "done",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&State::from(*self), f)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("`all` is a filter value and cannot be stored on an item")]
    FilterOnly,
    #[error("Invalid state value: {0}")]
    InvalidState(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TodoItem {
    /// Position in the stored list, rewritten on every fetch.
    #[serde(default)]
    pub id: usize,
    pub name: String,
    pub state: ItemState,
    pub deadline: DateTime<Utc>,
    pub priority: String,
    pub select: bool,
}

impl TodoItem {
    pub fn new(name: impl Into<String>, deadline: DateTime<Utc>, priority: impl Into<String>) -> Self {
        Self {
            id: 0, // Assigned by storage on fetch
            name: name.into(),
            state: ItemState::Working,
            deadline,
            priority: priority.into(),
            select: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == ItemState::Done
    }

    pub fn mark_done(&mut self) {
        self.state = ItemState::Done;
    }

    pub fn mark_working(&mut self) {
        self.state = ItemState::Working;
    }

    pub fn toggle_select(&mut self) {
        self.select = !self.select;
    }
}

pub fn filter_items(items: &[TodoItem], state: State) -> Vec<&TodoItem> {
    items.iter().filter(|item| state.matches(item)).collect()
}
