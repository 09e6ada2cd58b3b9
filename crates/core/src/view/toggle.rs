use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structural identity of a rendered card: its section and position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardKey {
    Holding(usize),
    Recommendation(usize),
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Holding(i) => write!(f, "holding-{i}"),
            Self::Recommendation(i) => write!(f, "rec-{i}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown card key {0:?} (expected holding-<n> or rec-<n>)")]
pub struct ParseCardKeyError(String);

impl FromStr for CardKey {
    type Err = ParseCardKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseCardKeyError(s.to_string());
        let (prefix, index) = s.rsplit_once('-').ok_or_else(err)?;
        let index = index.parse::<usize>().map_err(|_| err())?;
        match prefix {
            "holding" => Ok(Self::Holding(index)),
            "rec" => Ok(Self::Recommendation(index)),
            _ => Err(err()),
        }
    }
}

/// Which cards are expanded. Everything not listed is collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    expanded: BTreeSet<CardKey>,
}

impl CollapseState {
    pub fn is_expanded(&self, key: CardKey) -> bool {
        self.expanded.contains(&key)
    }

    /// Flips `key` and returns whether it is now expanded.
    pub fn toggle(&mut self, key: CardKey) -> bool {
        if self.expanded.remove(&key) {
            false
        } else {
            self.expanded.insert(key);
            true
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn expanded(&self) -> impl Iterator<Item = CardKey> + '_ {
        self.expanded.iter().copied()
    }
}

/// Client-side toggle used by statically exported pages.
pub const TOGGLE_SCRIPT: &str = r#"<script>
function toggleCollapse(id) {
  var el = document.getElementById(id);
  if (!el) return;
  var open = el.style.display === "block";
  el.style.display = open ? "none" : "block";
  var btn = document.querySelector('[aria-controls="' + id + '"]');
  if (btn) btn.setAttribute("aria-expanded", open ? "false" : "true");
}
</script>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_text() {
        for key in [CardKey::Holding(0), CardKey::Recommendation(12)] {
            assert_eq!(key.to_string().parse::<CardKey>().unwrap(), key);
        }
        assert_eq!(CardKey::Recommendation(3).to_string(), "rec-3");
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["", "rec", "rec-", "rec--1", "card-1", "holding-x"] {
            assert!(bad.parse::<CardKey>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn cards_start_collapsed_and_toggle_back() {
        let mut state = CollapseState::default();
        let key = CardKey::Recommendation(1);
        assert!(!state.is_expanded(key));
        assert!(state.toggle(key));
        assert!(state.is_expanded(key));
        assert!(!state.toggle(key));
        assert!(!state.is_expanded(key));
    }

    #[test]
    fn collapse_all_clears_every_card() {
        let mut state = CollapseState::default();
        state.toggle(CardKey::Holding(0));
        state.toggle(CardKey::Recommendation(0));
        assert_eq!(state.expanded().count(), 2);
        state.collapse_all();
        assert_eq!(state.expanded().count(), 0);
    }
}
