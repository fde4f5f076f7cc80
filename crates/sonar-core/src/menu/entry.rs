//! Menu entries and `&`-suffix shortcut parsing.

use uuid::Uuid;

use crate::keys::Key;

/// Marker that introduces a shortcut character at the end of a label.
const SHORTCUT_MARKER: char = '&';

/// Labels this short or shorter never carry a shortcut.
const MIN_SHORTCUT_LABEL_CHARS: usize = 3;

/// A single-key shortcut bound to a menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// Key that activates the entry.
    pub key: Key,
    /// Upper-case character announced after the label.
    pub symbol: char,
}

impl Shortcut {
    /// Extract a trailing `&x` shortcut from `raw`.
    ///
    /// Returns the label with the suffix removed and the shortcut, or `None`
    /// when the label carries no recognizable suffix.
    pub fn parse(raw: &str) -> Option<(&str, Self)> {
        if raw.chars().count() <= MIN_SHORTCUT_LABEL_CHARS {
            return None;
        }

        let mut tail = raw.char_indices().rev();
        let (_, symbol) = tail.next()?;
        let (marker_at, marker) = tail.next()?;
        if marker != SHORTCUT_MARKER {
            return None;
        }

        let key = Key::from_shortcut_char(symbol)?;
        let shortcut = Self {
            key,
            symbol: symbol.to_ascii_uppercase(),
        };
        Some((raw[..marker_at].trim_end(), shortcut))
    }
}

/// One selectable row of a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    id: Uuid,
    label: String,
    shortcut: Option<Shortcut>,
    available: bool,
}

impl MenuEntry {
    /// Build an entry, optionally parsing a `&x` shortcut suffix.
    ///
    /// Malformed or unknown suffixes are left in the label untouched.
    pub fn new(raw: &str, parse_shortcut: bool, available: bool) -> Self {
        let parsed = if parse_shortcut {
            Shortcut::parse(raw)
        } else {
            None
        };

        let (label, shortcut) = match parsed {
            Some((label, shortcut)) => (label.to_string(), Some(shortcut)),
            None => (raw.to_string(), None),
        };

        Self {
            id: Uuid::new_v4(),
            label,
            shortcut,
            available,
        }
    }

    /// Stable identifier, unaffected by reordering.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub const fn shortcut(&self) -> Option<Shortcut> {
        self.shortcut
    }

    pub const fn is_available(&self) -> bool {
        self.available
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Whether this entry is activated by `key`.
    pub fn has_shortcut(&self, key: Key) -> bool {
        self.shortcut.is_some_and(|s| s.key == key)
    }

    /// Text spoken when the entry gains focus.
    pub fn readout(&self) -> String {
        match self.shortcut {
            Some(shortcut) => format!("{}, {}", self.label, shortcut.symbol),
            None => self.label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shortcut_suffix() {
        let entry = MenuEntry::new("Exit &X", true, true);
        assert_eq!(entry.label(), "Exit");
        assert_eq!(
            entry.shortcut(),
            Some(Shortcut {
                key: Key::X,
                symbol: 'X'
            })
        );
        assert_eq!(entry.readout(), "Exit, X");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let entry = MenuEntry::new("Options&o", true, true);
        assert_eq!(entry.label(), "Options");
        assert_eq!(entry.shortcut().map(|s| s.key), Some(Key::O));
        assert_eq!(entry.readout(), "Options, O");
    }

    #[test]
    fn test_plain_label_is_unchanged() {
        let entry = MenuEntry::new("Just text", true, true);
        assert_eq!(entry.label(), "Just text");
        assert_eq!(entry.shortcut(), None);
        assert_eq!(entry.readout(), "Just text");
    }

    #[test]
    fn test_short_labels_never_parse() {
        let entry = MenuEntry::new("A&1", true, true);
        assert_eq!(entry.label(), "A&1");
        assert_eq!(entry.shortcut(), None);
    }

    #[test]
    fn test_unknown_symbol_keeps_suffix() {
        let entry = MenuEntry::new("Volume &+", true, true);
        assert_eq!(entry.label(), "Volume &+");
        assert_eq!(entry.shortcut(), None);
    }

    #[test]
    fn test_parsing_can_be_disabled() {
        let entry = MenuEntry::new("Save &S", false, false);
        assert_eq!(entry.label(), "Save &S");
        assert_eq!(entry.shortcut(), None);
        assert!(!entry.is_available());
    }

    #[test]
    fn test_multibyte_label() {
        let entry = MenuEntry::new("Quête &Q", true, true);
        assert_eq!(entry.label(), "Quête");
        assert_eq!(entry.shortcut().map(|s| s.symbol), Some('Q'));
    }

    #[test]
    fn test_entries_get_distinct_ids() {
        let a = MenuEntry::new("Same", true, true);
        let b = MenuEntry::new("Same", true, true);
        assert_ne!(a.id(), b.id());
    }
}
