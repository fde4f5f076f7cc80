//! Template game: a main menu with a few demo actions.

use sonar_core::{Clock, Menu, MenuEvent, MenuSounds, SoundSink, SpeechSink, SystemClock};
use tracing::{debug, info, warn};

use super::{Flow, Game, MessageScene, Wait, WaitSound, DECIDE_SOUND};
use crate::config::GameConfig;
use crate::host::GameHost;

/// Sound folder preloaded at startup.
const SOUND_FOLDER: &str = "fx";

/// Pause between choosing "Start game" and the follow-up message.
const START_DELAY_MS: u64 = 1000;

/// Jingle played to the end before the credits are read.
const CREDITS_SOUND: &str = "fx/credits.ogg";

/// Longest the credits jingle may hold the game.
const CREDITS_SOUND_LIMIT_MS: u64 = 5000;

const START: usize = 0;
const OPTIONS: usize = 1;
const CREDITS: usize = 2;
const EXIT: usize = 3;

#[derive(Debug)]
enum Scene<C: Clock> {
    MainMenu,
    Message(MessageScene),
    Waiting { wait: Wait<C>, then: MessageScene },
    Playing { wait: WaitSound<C>, then: MessageScene },
}

/// Main menu wired to the demo scenes.
#[derive(Debug)]
pub struct DemoGame<C: Clock + Clone = SystemClock> {
    menu: Menu<C>,
    scene: Scene<C>,
    clock: C,
    credits: String,
}

impl DemoGame<SystemClock> {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock + Clone> DemoGame<C> {
    pub fn with_clock(config: &GameConfig, clock: C) -> Self {
        let mut menu = Menu::with_clock("Main menu", clock.clone());
        menu.initialize(
            "Main menu",
            ["Start game &S", "Options &O", "Credits &C", "Exit &X"],
            menu_sounds(),
        );
        menu.set_availability(OPTIONS, false);

        Self {
            menu,
            scene: Scene::MainMenu,
            clock,
            credits: format!("{} version {}", config.game_name, config.game_version),
        }
    }

    fn show_message_scene(&mut self, scene: MessageScene, host: &mut GameHost) {
        scene.open(host);
        self.scene = Scene::Message(scene);
    }

    /// Play the credits jingle and read the credits once it ends. Without
    /// the jingle the credits are read at once.
    fn show_credits(&mut self, host: &mut GameHost) {
        let then = MessageScene::new(self.credits.clone());
        match host.sounds_mut().play(CREDITS_SOUND) {
            Ok(Some(handle)) => {
                let wait =
                    WaitSound::with_clock(handle, CREDITS_SOUND_LIMIT_MS, self.clock.clone());
                self.scene = Scene::Playing { wait, then };
            }
            Ok(None) => self.show_message_scene(then, host),
            Err(e) => {
                debug!("No credits jingle: {e}");
                self.show_message_scene(then, host);
            }
        }
    }

    fn back_to_menu(&mut self, host: &mut GameHost) {
        self.scene = Scene::MainMenu;
        self.menu.open(host);
    }

    fn menu_frame(&mut self, host: &mut GameHost) -> Flow {
        match self.menu.frame_update(host) {
            Some(MenuEvent::Selected(START)) => {
                info!("Starting game");
                host.speak("Starting.", true);
                self.scene = Scene::Waiting {
                    wait: Wait::with_clock(START_DELAY_MS, self.clock.clone()),
                    then: MessageScene::new(
                        "There is no game here yet. Press Enter to return to the menu.",
                    ),
                };
                Flow::Continue
            }
            Some(MenuEvent::Selected(OPTIONS)) => {
                host.speak("Options are not available yet.", true);
                Flow::Continue
            }
            Some(MenuEvent::Selected(CREDITS)) => {
                self.show_credits(host);
                Flow::Continue
            }
            Some(MenuEvent::Selected(EXIT) | MenuEvent::Cancelled) => Flow::Exit,
            Some(MenuEvent::Selected(other)) => {
                debug!("No action for menu entry {other}");
                Flow::Continue
            }
            None => Flow::Continue,
        }
    }
}

#[cfg(test)]
impl<C: Clock + Clone> DemoGame<C> {
    const fn menu(&self) -> &Menu<C> {
        &self.menu
    }

    const fn in_main_menu(&self) -> bool {
        matches!(self.scene, Scene::MainMenu)
    }
}

impl<C: Clock + Clone> Game for DemoGame<C> {
    fn start(&mut self, host: &mut GameHost) {
        if let Err(e) = host.sounds_mut().load_folder(SOUND_FOLDER) {
            warn!("Could not preload sounds: {e}");
        }
        host.play_one_shot(DECIDE_SOUND);
        self.menu.open(host);
    }

    fn frame(&mut self, host: &mut GameHost) -> Flow {
        match &self.scene {
            Scene::MainMenu => self.menu_frame(host),
            Scene::Message(message) => {
                if message.frame_update(host) {
                    self.back_to_menu(host);
                }
                Flow::Continue
            }
            Scene::Waiting { wait, then } => {
                if wait.is_done() {
                    let then = then.clone();
                    self.show_message_scene(then, host);
                }
                Flow::Continue
            }
            Scene::Playing { wait, then } => {
                if wait.is_done() {
                    let then = then.clone();
                    self.show_message_scene(then, host);
                }
                Flow::Continue
            }
        }
    }

    fn on_exit(&mut self, host: &mut GameHost) -> bool {
        host.speak("Goodbye.", true);
        true
    }
}

fn menu_sounds() -> MenuSounds {
    MenuSounds::new()
        .cursor("fx/cursor.ogg")
        .enter(DECIDE_SOUND)
        .cancel("fx/cancel.ogg")
        .unavailable("fx/unavailable.ogg")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests use unwrap for brevity

    use super::*;
    use crate::game::run_frame;
    use crate::host::tests::host;
    use sonar_audio::SampleData;
    use sonar_core::{Key, ManualClock};

    fn game() -> (DemoGame<ManualClock>, ManualClock, GameHost) {
        let clock = ManualClock::new();
        let config = GameConfig {
            game_name: "Cave Run".to_string(),
            game_version: "2.1".to_string(),
            ..GameConfig::default()
        };
        let mut host = host();
        let mut game = DemoGame::with_clock(&config, clock.clone());
        game.start(&mut host);
        (game, clock, host)
    }

    fn tap(game: &mut DemoGame<ManualClock>, host: &mut GameHost, key: Key) -> bool {
        host.keyboard().lock().press(key);
        let running = run_frame(game, host);
        host.keyboard().lock().release(key);
        run_frame(game, host) && running
    }

    fn last_spoken(host: &GameHost) -> Option<&str> {
        host.speaker().last_spoken()
    }

    #[test]
    fn test_start_opens_main_menu() {
        let (game, _clock, host) = game();
        assert!(game.in_main_menu());
        assert_eq!(last_spoken(&host), Some("Main menu, Start game, S"));
        assert!(!game.menu().is_available(OPTIONS));
    }

    #[test]
    fn test_credits_message_and_return() {
        let (mut game, _clock, mut host) = game();
        assert!(tap(&mut game, &mut host, Key::C));
        assert_eq!(last_spoken(&host), Some("Cave Run version 2.1"));
        assert!(!game.in_main_menu());

        assert!(tap(&mut game, &mut host, Key::Enter));
        assert!(game.in_main_menu());
        assert_eq!(last_spoken(&host), Some("Main menu, Credits, C"));
    }

    #[test]
    fn test_start_waits_before_message() {
        let (mut game, clock, mut host) = game();
        assert!(tap(&mut game, &mut host, Key::Enter));
        assert_eq!(last_spoken(&host), Some("Starting."));

        clock.advance(START_DELAY_MS - 1);
        assert!(run_frame(&mut game, &mut host));
        assert_eq!(last_spoken(&host), Some("Starting."));

        clock.advance(1);
        assert!(run_frame(&mut game, &mut host));
        assert!(last_spoken(&host).is_some_and(|s| s.starts_with("There is no game")));
    }

    #[test]
    fn test_credits_wait_for_jingle() {
        let (mut game, _clock, mut host) = game();
        host.sounds_mut()
            .bank_mut()
            .insert(CREDITS_SOUND, SampleData::new(vec![0.3; 4], 8000, 1))
            .unwrap();

        assert!(tap(&mut game, &mut host, Key::C));
        assert_eq!(last_spoken(&host), Some("Main menu, Start game, S"));

        let mut out = vec![0.0; 32];
        host.sounds().mixer().lock().render(&mut out);
        assert!(run_frame(&mut game, &mut host));
        assert_eq!(last_spoken(&host), Some("Cave Run version 2.1"));
    }

    #[test]
    fn test_stalled_jingle_gives_up() {
        let (mut game, clock, mut host) = game();
        host.sounds_mut()
            .bank_mut()
            .insert(CREDITS_SOUND, SampleData::new(vec![0.3; 4], 8000, 1))
            .unwrap();

        assert!(tap(&mut game, &mut host, Key::C));
        clock.advance(CREDITS_SOUND_LIMIT_MS);
        assert!(run_frame(&mut game, &mut host));
        assert_eq!(last_spoken(&host), Some("Cave Run version 2.1"));
    }

    #[test]
    fn test_unavailable_options_stay_in_menu() {
        let (mut game, _clock, mut host) = game();
        assert!(tap(&mut game, &mut host, Key::O));
        assert!(game.in_main_menu());
        assert_eq!(last_spoken(&host), Some("Options are not available yet."));
    }

    #[test]
    fn test_escape_and_exit_shortcut_close() {
        let (mut game, _clock, mut host) = game();
        assert!(!tap(&mut game, &mut host, Key::Escape));
        assert_eq!(last_spoken(&host), Some("Goodbye."));

        let (mut game, _clock, mut host) = self::game();
        assert!(!tap(&mut game, &mut host, Key::X));
    }
}
