//! Nonblocking, screen-reader friendly menu.
//!
//! A [`Menu`] is driven once per frame by [`Menu::frame_update`]. It reads
//! the keyboard through [`InputSource`], announces the focused entry through
//! [`SpeechSink`] and plays feedback through [`SoundSink`]. The host keeps
//! ownership of all three and lends them for the duration of the call.

mod entry;

pub use entry::{MenuEntry, Shortcut};

use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::host::{MenuHost, SoundSink, SpeechSink};
use crate::keys::Key;
use crate::timer::{Clock, SystemClock, Timer};

/// Delay before a held arrow key starts repeating.
const FIRST_REPEAT_DELAY_MS: u64 = 600;

/// Interval between repeats once repeating.
const REPEAT_INTERVAL_MS: u64 = 50;

/// Page Up / Page Down jump by `len / PAGE_DIVISOR` entries.
const PAGE_DIVISOR: usize = 20;

/// Outcome of a menu frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    /// The user backed out with Escape.
    Cancelled,
    /// The entry at this index was activated.
    Selected(usize),
}

/// Key-repeat phase for the vertical arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldState {
    /// No arrow held; the next press moves immediately.
    #[default]
    Idle,
    /// Moved once; waiting for the long initial delay.
    FirstPress,
    /// Auto-repeating at the short interval.
    Repeating,
}

impl HoldState {
    const fn advance(self) -> Self {
        match self {
            Self::Idle => Self::FirstPress,
            Self::FirstPress | Self::Repeating => Self::Repeating,
        }
    }

    const fn allows_move(self, elapsed_ms: u64) -> bool {
        match self {
            Self::Idle => true,
            Self::FirstPress => elapsed_ms >= FIRST_REPEAT_DELAY_MS,
            Self::Repeating => elapsed_ms >= REPEAT_INTERVAL_MS,
        }
    }
}

/// Sound ids played as menu feedback. Unset sounds are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSounds {
    /// Played on every cursor move.
    pub cursor: Option<String>,
    /// Played when an entry is activated.
    pub enter: Option<String>,
    /// Played when the menu is cancelled.
    pub cancel: Option<String>,
    /// Played in addition to `cursor` when focusing an unavailable entry.
    pub unavailable: Option<String>,
}

impl MenuSounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(mut self, id: impl Into<String>) -> Self {
        self.cursor = Some(id.into());
        self
    }

    pub fn enter(mut self, id: impl Into<String>) -> Self {
        self.enter = Some(id.into());
        self
    }

    pub fn cancel(mut self, id: impl Into<String>) -> Self {
        self.cancel = Some(id.into());
        self
    }

    pub fn unavailable(mut self, id: impl Into<String>) -> Self {
        self.unavailable = Some(id.into());
        self
    }
}

/// Shortcut key registered by an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShortcutBinding {
    key: Key,
    entry: Uuid,
}

/// A list of labeled options navigated with the keyboard.
#[derive(Debug)]
pub struct Menu<C: Clock = SystemClock> {
    title: String,
    entries: Vec<MenuEntry>,
    bindings: Vec<ShortcutBinding>,
    cursor: usize,
    sounds: MenuSounds,
    hold: HoldState,
    hold_timer: Timer<C>,
}

impl Menu<SystemClock> {
    /// Create an empty menu timed by the system clock.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_clock(title, SystemClock::new())
    }
}

impl<C: Clock> Menu<C> {
    /// Create an empty menu timed by `clock`.
    pub fn with_clock(title: impl Into<String>, clock: C) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
            bindings: Vec::new(),
            cursor: 0,
            sounds: MenuSounds::default(),
            hold: HoldState::Idle,
            hold_timer: Timer::with_clock(clock),
        }
    }

    pub fn with_sounds(mut self, sounds: MenuSounds) -> Self {
        self.sounds = sounds;
        self
    }

    /// Replace title, entries and sounds, and put the cursor on the first
    /// entry. Nothing is announced.
    pub fn initialize<I, S>(&mut self, title: impl Into<String>, items: I, sounds: MenuSounds)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.title = title.into();
        self.entries.clear();
        self.bindings.clear();
        self.append_many(items, true, true);
        self.cursor = 0;
        self.sounds = sounds;
        self.hold = HoldState::Idle;
        self.hold_timer.restart();
    }

    /// Append one entry.
    pub fn append_one(&mut self, label: &str, parse_shortcut: bool, available: bool) {
        let entry = MenuEntry::new(label, parse_shortcut, available);
        self.register(&entry);
        self.entries.push(entry);
    }

    /// Append entries in order, all with the same options.
    pub fn append_many<I, S>(&mut self, labels: I, parse_shortcut: bool, available: bool)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for label in labels {
            self.append_one(label.as_ref(), parse_shortcut, available);
        }
    }

    /// Insert an available entry at `index`, shifting later entries down.
    ///
    /// `index` may equal `len()` to append.
    pub fn insert(&mut self, index: usize, label: &str) -> Result<()> {
        if index > self.entries.len() {
            return Err(self.out_of_range(index));
        }
        let entry = MenuEntry::new(label, true, true);
        self.register(&entry);
        self.entries.insert(index, entry);
        Ok(())
    }

    /// Remove the entry at `index` along with its shortcut.
    pub fn delete(&mut self, index: usize) -> Result<MenuEntry> {
        if index >= self.entries.len() {
            return Err(self.out_of_range(index));
        }
        let entry = self.entries.remove(index);
        self.unregister(entry.id());
        if self.cursor >= self.entries.len() {
            self.cursor = self.entries.len().saturating_sub(1);
        }
        Ok(entry)
    }

    /// Replace the label at `index`, re-parsing its shortcut.
    ///
    /// The availability flag and the cursor are kept.
    pub fn modify(&mut self, index: usize, label: &str) -> Result<()> {
        let Some(old) = self.entries.get(index) else {
            return Err(self.out_of_range(index));
        };
        let old_id = old.id();
        let entry = MenuEntry::new(label, true, old.is_available());
        self.unregister(old_id);
        self.register(&entry);
        self.entries[index] = entry;
        Ok(())
    }

    /// Mark the entry at `index` as available or not. Out of range is ignored.
    pub fn set_availability(&mut self, index: usize, available: bool) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.set_available(available);
        }
    }

    /// Announce the title and the focused entry.
    pub fn open<H: SpeechSink + ?Sized>(&self, host: &mut H) {
        if let Some(readout) = self.readout() {
            debug!("Opening menu: {}", self.title);
            host.speak(&format!("{}, {readout}", self.title), true);
        }
    }

    /// Run one frame of menu logic.
    ///
    /// Call after the host has refreshed its keyboard snapshot.
    pub fn frame_update<H: MenuHost + ?Sized>(&mut self, host: &mut H) -> Option<MenuEvent> {
        if self.entries.is_empty() {
            self.hold = HoldState::Idle;
            return host
                .key_pressed(Key::Escape)
                .then_some(MenuEvent::Cancelled);
        }

        let up = host.key_held(Key::Up);
        let down = host.key_held(Key::Down);
        if !up && !down {
            self.hold = HoldState::Idle;
        }

        if self.hold.allows_move(self.hold_timer.elapsed()) {
            if up {
                self.move_to(self.cursor.checked_sub(1), host);
            }
            if down {
                self.move_to(self.cursor.checked_add(1), host);
            }
        }

        let last = self.entries.len() - 1;
        if host.key_pressed(Key::Home) && self.cursor != 0 {
            self.move_to(Some(0), host);
        }
        if host.key_pressed(Key::End) && self.cursor != last {
            self.move_to(Some(last), host);
        }

        let page = self.entries.len() / PAGE_DIVISOR;
        if host.key_pressed(Key::PageUp) && page > 0 {
            self.move_to(self.cursor.checked_sub(page), host);
        }
        if host.key_pressed(Key::PageDown) && page > 0 {
            self.move_to(self.cursor.checked_add(page), host);
        }

        if host.key_pressed(Key::Space) {
            self.move_to(Some(self.cursor), host);
        }

        if host.key_pressed(Key::Escape) {
            self.cancel(host);
            return Some(MenuEvent::Cancelled);
        }

        if host.key_pressed(Key::Enter) {
            self.enter(host);
            return Some(MenuEvent::Selected(self.cursor));
        }

        if !self.bindings.is_empty() {
            if let Some(key) = Key::SHORTCUT_KEYS
                .into_iter()
                .find(|&key| host.key_pressed(key))
            {
                return self.process_shortcut(key, host);
            }
        }

        None
    }

    /// Resolve a shortcut key press.
    ///
    /// A key bound to a single entry activates it at once. A key shared by
    /// several entries moves focus to the next one after the cursor, wrapping
    /// to the top, without activating it.
    pub fn process_shortcut<H: SpeechSink + SoundSink + ?Sized>(
        &mut self,
        key: Key,
        host: &mut H,
    ) -> Option<MenuEvent> {
        let mut matched = self.bindings.iter().filter(|b| b.key == key);
        let first = matched.next()?.entry;

        if matched.next().is_none() {
            let index = self.position_of(first)?;
            self.cursor = index;
            self.enter(host);
            debug!("Shortcut {key:?} selected entry {index}");
            return Some(MenuEvent::Selected(index));
        }

        let len = self.entries.len();
        let next = (self.cursor + 1..len)
            .find(|&i| self.entries[i].has_shortcut(key))
            .or_else(|| (0..len).find(|&i| self.entries[i].has_shortcut(key)));
        if let Some(target) = next {
            self.move_to(Some(target), host);
        }
        None
    }

    /// Move focus to `target` and announce it.
    ///
    /// Always advances the hold state, even when `target` is out of range
    /// and the cursor stays put.
    fn move_to<H: SpeechSink + SoundSink + ?Sized>(&mut self, target: Option<usize>, host: &mut H) {
        self.hold = self.hold.advance();
        let Some(target) = target.filter(|&t| t < self.entries.len()) else {
            return;
        };

        self.hold_timer.restart();
        if let Some(sound) = &self.sounds.cursor {
            host.play_one_shot(sound);
        }
        let entry = &self.entries[target];
        if !entry.is_available() {
            if let Some(sound) = &self.sounds.unavailable {
                host.play_one_shot(sound);
            }
        }
        self.cursor = target;

        let readout = entry.readout();
        trace!("Menu cursor -> {target}: {readout}");
        host.speak(&readout, true);
    }

    fn cancel<H: SoundSink + ?Sized>(&self, host: &mut H) {
        debug!("Menu cancelled: {}", self.title);
        if let Some(sound) = &self.sounds.cancel {
            host.play_one_shot(sound);
        }
    }

    fn enter<H: SoundSink + ?Sized>(&self, host: &mut H) {
        debug!("Menu entry {} selected: {}", self.cursor, self.title);
        if let Some(sound) = &self.sounds.enter {
            host.play_one_shot(sound);
        }
    }

    fn register(&mut self, entry: &MenuEntry) {
        if let Some(shortcut) = entry.shortcut() {
            self.bindings.push(ShortcutBinding {
                key: shortcut.key,
                entry: entry.id(),
            });
        }
    }

    fn unregister(&mut self, id: Uuid) {
        self.bindings.retain(|b| b.entry != id);
    }

    fn position_of(&self, id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            index,
            len: self.entries.len(),
        }
    }

    pub const fn cursor_pos(&self) -> usize {
        self.cursor
    }

    /// Label at `index`, or an empty string when out of range.
    pub fn get_string(&self, index: usize) -> &str {
        self.entries.get(index).map_or("", MenuEntry::label)
    }

    /// Whether the cursor rests on the last entry.
    ///
    /// `_index` does not take part in the comparison. Use
    /// [`is_last_index`](Self::is_last_index) for a positional check.
    pub fn is_last(&self, _index: usize) -> bool {
        self.is_last_index(self.cursor)
    }

    /// Whether `index` is the position of the last entry.
    pub fn is_last_index(&self, index: usize) -> bool {
        !self.entries.is_empty() && index == self.entries.len() - 1
    }

    /// Whether the entry at `index` is available. Out of range is `false`.
    pub fn is_available(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(MenuEntry::is_available)
    }

    /// Text announced for the focused entry.
    pub fn readout(&self) -> Option<String> {
        self.entries.get(self.cursor).map(MenuEntry::readout)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn hold_state(&self) -> HoldState {
        self.hold
    }

    pub const fn sounds(&self) -> &MenuSounds {
        &self.sounds
    }
}
