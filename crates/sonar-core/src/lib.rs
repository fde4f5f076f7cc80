//! # sonar-core
//!
//! Core types, traits, and error handling for the Sonar audio game template.
//!
//! The centerpiece is [`Menu`], a screen-reader friendly list widget driven
//! once per frame by the host loop.

pub mod error;
pub mod host;
pub mod input;
pub mod keys;
pub mod menu;
pub mod timer;

pub use error::{Error, Result};
pub use host::{InputSource, MenuHost, SoundSink, SpeechSink};
pub use input::KeyboardState;
pub use keys::Key;
pub use menu::{HoldState, Menu, MenuEntry, MenuEvent, MenuSounds, Shortcut};
pub use timer::{Clock, ManualClock, SystemClock, Timer};
