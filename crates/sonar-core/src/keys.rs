//! Keyboard key identifiers.

use serde::{Deserialize, Serialize};

/// A physical key the game can query.
///
/// The discriminants are dense so a key can index a fixed-size table,
/// see [`Key::COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftShift,
    RightShift,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
}

impl Key {
    /// Number of distinct keys.
    pub const COUNT: usize = Self::Num9 as usize + 1;

    /// Keys that can be bound as menu shortcuts, in lookup order.
    pub const SHORTCUT_KEYS: [Self; 36] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::O,
        Self::P,
        Self::Q,
        Self::R,
        Self::S,
        Self::T,
        Self::U,
        Self::V,
        Self::W,
        Self::X,
        Self::Y,
        Self::Z,
        Self::Num0,
        Self::Num1,
        Self::Num2,
        Self::Num3,
        Self::Num4,
        Self::Num5,
        Self::Num6,
        Self::Num7,
        Self::Num8,
        Self::Num9,
    ];

    /// Table index of this key.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resolve a shortcut character (`A`-`Z`, `0`-`9`, case-insensitive).
    pub fn from_shortcut_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        let slot = match c {
            'A'..='Z' => c as usize - 'A' as usize,
            '0'..='9' => 26 + (c as usize - '0' as usize),
            _ => return None,
        };
        Some(Self::SHORTCUT_KEYS[slot])
    }

    /// The upper-case character this key stands for in a shortcut label.
    pub fn shortcut_char(self) -> Option<char> {
        let slot = Self::SHORTCUT_KEYS.iter().position(|&k| k == self)?;
        if slot < 26 {
            char::from_u32('A' as u32 + slot as u32)
        } else {
            char::from_digit((slot - 26) as u32, 10)
        }
    }

    /// Whether this key is one of the two directional keys that auto-repeat
    /// in menus.
    pub const fn is_vertical_arrow(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_table_covers_alphanumerics() {
        assert_eq!(Key::from_shortcut_char('a'), Some(Key::A));
        assert_eq!(Key::from_shortcut_char('X'), Some(Key::X));
        assert_eq!(Key::from_shortcut_char('0'), Some(Key::Num0));
        assert_eq!(Key::from_shortcut_char('9'), Some(Key::Num9));
        assert_eq!(Key::from_shortcut_char('!'), None);
        assert_eq!(Key::from_shortcut_char('é'), None);
    }

    #[test]
    fn test_shortcut_char_inverse() {
        for key in Key::SHORTCUT_KEYS {
            let c = key.shortcut_char();
            assert!(c.is_some(), "{key:?} has no character");
            assert_eq!(c.and_then(Key::from_shortcut_char), Some(key));
        }
        assert_eq!(Key::Enter.shortcut_char(), None);
    }

    #[test]
    fn test_key_indices_are_dense() {
        assert_eq!(Key::Up.index(), 0);
        assert_eq!(Key::Num9.index(), Key::COUNT - 1);
    }
}
