use tracing::debug;

use crate::models::Asset;

/// The native media element the transport drives.
///
/// Implementations clamp `set_position` to their own bounds and report a
/// `NaN` duration until metadata has loaded.
pub trait MediaElement {
    fn load(&mut self, source: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
    fn position(&self) -> f64;
    fn set_position(&mut self, seconds: f64);
    fn duration(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

pub struct AudioTransport<M> {
    element: M,
    state: PlaybackState,
    muted: bool,
}

impl<M: MediaElement> AudioTransport<M> {
    pub fn new(element: M) -> Self {
        Self {
            element,
            state: PlaybackState::Idle,
            muted: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn element(&self) -> &M {
        &self.element
    }

    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }
        self.element.play();
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.element.pause();
        self.state = PlaybackState::Paused;
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Moves the playhead without touching play/pause state.
    pub fn seek(&mut self, seconds: f64) {
        self.element.set_position(seconds);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.element.set_muted(self.muted);
    }

    /// The element reached the end of the track: rewind and go idle.
    pub fn on_ended(&mut self) {
        self.element.set_position(0.0);
        self.state = PlaybackState::Idle;
    }

    /// A different track was selected.
    pub fn on_track_change(&mut self, source: &str) {
        debug!("Loading audio track {source}");
        self.element.pause();
        self.element.load(source);
        self.element.set_position(0.0);
        self.state = PlaybackState::Idle;
    }

    pub fn elapsed_label(&self) -> String {
        format_time(self.element.position())
    }

    pub fn duration_label(&self) -> String {
        format_time(self.element.duration())
    }
}

/// `mm:ss`, both parts zero-padded. Unknown (`NaN`) or negative times show `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// The audio lectures of a unit, one of which is loaded into the transport.
pub struct Playlist<M> {
    tracks: Vec<Asset>,
    selected: Option<usize>,
    transport: AudioTransport<M>,
}

impl<M: MediaElement> Playlist<M> {
    /// Loads the first track, if any.
    pub fn new(tracks: Vec<Asset>, element: M) -> Self {
        let mut playlist = Self {
            tracks,
            selected: None,
            transport: AudioTransport::new(element),
        };
        playlist.select(0);
        playlist
    }

    pub fn tracks(&self) -> &[Asset] {
        &self.tracks
    }

    pub fn current(&self) -> Option<&Asset> {
        self.selected.and_then(|i| self.tracks.get(i))
    }

    pub fn transport(&self) -> &AudioTransport<M> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut AudioTransport<M> {
        &mut self.transport
    }

    /// Returns false when `index` is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(track) = self.tracks.get(index) else {
            return false;
        };
        self.transport.on_track_change(&track.link);
        self.selected = Some(index);
        true
    }
}
