//! Game loop contract and built-in scenes.

pub mod demo;
pub mod message;
pub mod wait;

pub use demo::DemoGame;
pub use message::MessageScene;
pub use wait::{Wait, WaitSound};

use tracing::{debug, info};

use crate::host::GameHost;

/// Played when a choice is confirmed.
pub const DECIDE_SOUND: &str = "fx/decide.ogg";

/// What the frame loop should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A game driven one frame at a time by the host window.
pub trait Game {
    /// Called once before the first frame.
    fn start(&mut self, host: &mut GameHost);

    /// Run one frame. The host has already taken its keyboard snapshot.
    fn frame(&mut self, host: &mut GameHost) -> Flow;

    /// Called when the game is about to close. Return false to keep running.
    fn on_exit(&mut self, _host: &mut GameHost) -> bool {
        true
    }
}

/// Advance `game` by one frame. Returns false once the game should close.
pub fn run_frame<G: Game + ?Sized>(game: &mut G, host: &mut GameHost) -> bool {
    host.frame_update();

    if host.take_exit_request() && confirm_exit(game, host) {
        return false;
    }

    match game.frame(host) {
        Flow::Continue => true,
        Flow::Exit => !confirm_exit(game, host),
    }
}

fn confirm_exit<G: Game + ?Sized>(game: &mut G, host: &mut GameHost) -> bool {
    if game.on_exit(host) {
        info!("Exiting after {} frames", host.frame());
        true
    } else {
        debug!("Exit cancelled by the game");
        false
    }
}
