//! Lazy preview players.
//!
//! Preview videos only get their `src` once they first scroll into view, and
//! only play while they are visible and the window has focus. The
//! [`Miniplayers`] controller owns every observed player; the page builds one
//! on load and hands it to its event bindings.

use crate::debug::{self, cat};

/// Playback surface of one preview video.
pub trait PreviewPlayer {
    fn is_paused(&self) -> bool;

    /// A source is already attached.
    fn has_source(&self) -> bool;

    /// Attach the deferred source.
    fn load_source(&mut self);

    fn play(&mut self);

    fn pause(&mut self);
}

/// What to do with one player after a visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    /// Attach the source first if needed, then play.
    Play { load_source: bool },
    Pause,
    Nothing,
}

/// Pure decision for one player.
pub fn decide(is_playing: bool, has_source: bool, in_view: bool, window_focused: bool) -> PreviewAction {
    let visible = in_view && window_focused;
    match (is_playing, visible) {
        (false, true) => PreviewAction::Play {
            load_source: !has_source,
        },
        (true, false) => PreviewAction::Pause,
        _ => PreviewAction::Nothing,
    }
}

/// Handle to an observed player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewId(usize);

impl PreviewId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns the observed preview players of one page.
pub struct Miniplayers<P> {
    players: Vec<P>,
}

impl<P> Default for Miniplayers<P> {
    fn default() -> Self {
        Self {
            players: Vec::new(),
        }
    }
}

impl<P: PreviewPlayer> Miniplayers<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, player: P) -> PreviewId {
        self.players.push(player);
        PreviewId(self.players.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: PreviewId) -> Option<&P> {
        self.players.get(id.index())
    }

    /// Apply an intersection change reported for `id`.
    pub fn on_intersection(&mut self, id: PreviewId, is_intersecting: bool, window_focused: bool) -> PreviewAction {
        let Some(player) = self.players.get_mut(id.index()) else {
            return PreviewAction::Nothing;
        };
        let action = decide(!player.is_paused(), player.has_source(), is_intersecting, window_focused);
        match action {
            PreviewAction::Play { load_source } => {
                // Deferred so a page full of previews doesn't fetch them all up front.
                if load_source {
                    player.load_source();
                }
                player.play();
                debug::log(cat::PREVIEW, format!("play #{} (load_source={load_source})", id.index()));
            }
            PreviewAction::Pause => {
                player.pause();
                debug::log(cat::PREVIEW, format!("pause #{}", id.index()));
            }
            PreviewAction::Nothing => {}
        }
        action
    }

    /// Pause every observed player (window blur).
    pub fn pause_all(&mut self) {
        for player in &mut self.players {
            player.pause();
        }
        debug::log(cat::PREVIEW, format!("paused all {}", self.players.len()));
    }
}
