//! # Sonar
//!
//! An accessible audio game template built with Rust and Dioxus.
//! Everything is driven by the keyboard and announced through speech and
//! sound; the window itself only captures keys.

// RSX macros generate code that triggers these warnings incorrectly
#![allow(unused_qualifications)]
#![allow(clippy::use_self)]

mod config;
mod game;
mod host;
mod keymap;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::GameConfig;
use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use game::{run_frame, DemoGame, Game};
use host::{GameHost, SharedKeyboard};
use parking_lot::Mutex;
use sonar_audio::{SoundConfig, SoundSystem};
use sonar_core::KeyboardState;
use sonar_speech::Speaker;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let loaded = GameConfig::load();
    let log_file = loaded
        .as_ref()
        .map_or_else(|_| GameConfig::default().log_file, |c| c.log_file.clone());

    // Initialize logging: console plus a per-run debug log
    let file_layer = match std::fs::File::create(&log_file) {
        Ok(file) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        ),
        Err(e) => {
            eprintln!("Cannot create {}: {e}", log_file.display());
            None
        }
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sonar=debug,sonar_app=debug,sonar_audio=info".into()),
        )
        .init();

    let config = loaded.context("Failed to load configuration")?;
    info!(
        "Starting {} v{} ({} fps)",
        config.game_name, config.game_version, config.frames_per_second
    );

    let window_builder = WindowBuilder::new()
        .with_title(config.window_title())
        .with_inner_size(LogicalSize::new(config.window_width, config.window_height))
        .with_resizable(false);

    let desktop_config = Config::new()
        .with_window(window_builder)
        .with_disable_context_menu(true)
        .with_menu(None);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(desktop_config)
        .with_context(config)
        .launch(App);

    Ok(())
}

/// Root component: a focusable surface feeding the keyboard state, and the
/// frame loop running the game.
#[component]
fn App() -> Element {
    let config = use_context::<GameConfig>();
    let keyboard: SharedKeyboard = use_hook(|| Arc::new(Mutex::new(KeyboardState::new())));

    use_frame_loop(config.clone(), keyboard.clone());

    let on_down = keyboard.clone();
    let on_up = keyboard.clone();
    let on_blur = keyboard;
    let title = config.window_title();

    rsx! {
        style { {include_str!("../assets/styles.css")} }

        div {
            class: "game-surface",
            tabindex: "0",
            role: "application",
            aria_label: "{title}",
            onmounted: move |evt| async move {
                if let Err(e) = evt.set_focus(true).await {
                    error!("Failed to focus game surface: {e:?}");
                }
            },
            onkeydown: move |evt: KeyboardEvent| {
                if let Some(key) = keymap::key_for_code(evt.code()) {
                    evt.prevent_default();
                    on_down.lock().press(key);
                }
            },
            onkeyup: move |evt: KeyboardEvent| {
                if let Some(key) = keymap::key_for_code(evt.code()) {
                    on_up.lock().release(key);
                }
            },
            onblur: move |_| on_blur.lock().release_all(),

            h1 { class: "game-surface__title", "{title}" }
            p { class: "game-surface__hint", "Use the arrow keys and Enter. Press F1 to repeat, Escape to quit." }
        }
    }
}

/// Run the game at the configured frame rate until it asks to close.
fn use_frame_loop(config: GameConfig, keyboard: SharedKeyboard) {
    use_future(move || {
        let config = config.clone();
        let keyboard = keyboard.clone();
        async move {
            let speaker = Speaker::new(config.speech_enabled);
            let sounds = SoundSystem::new(SoundConfig {
                root: config.sound_dir.clone(),
                master_volume_db: config.master_volume_db,
            });
            let mut host = GameHost::new(keyboard, speaker, sounds);
            let mut game = DemoGame::new(&config);
            game.start(&mut host);

            let mut ticker =
                tokio::time::interval(Duration::from_millis(config.frame_interval_ms()));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if !run_frame(&mut game, &mut host) {
                    break;
                }
            }

            host.sounds().stop_all();
            dioxus::desktop::window().close();
        }
    });
}
