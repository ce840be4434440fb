//! Playback overlay
//!
//! Drives one media element from a spawned task. The front end forwards
//! native media and keyboard events through [`OverlayHubs`] and user
//! actions through [`PlaybackOverlay`]; the task owns all state and
//! publishes a snapshot after every change.
//!
//! Timers per mount:
//! - fullscreen is requested 100 ms after mounting
//! - loading that has not reached can-play within 10 s becomes an error

use std::time::Duration;

use streamia_core::SubtitleTrack;
use streamia_net::PlaybackSource;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::events::{EventHub, Subscription};

pub const FULLSCREEN_DELAY: Duration = Duration::from_millis(100);
pub const LOADING_TIMEOUT: Duration = Duration::from_secs(10);

pub const LOAD_ERROR: &str = "Error al cargar el video. Verifica tu conexión a internet.";
pub const TIMEOUT_ERROR: &str = "El video está tardando mucho en cargar. Intenta con otro video.";

/// Player errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlayerError {
    #[error("Fullscreen request failed: {0}")]
    Fullscreen(String),

    #[error("Media element error: {0}")]
    Media(String),
}

/// The native video element
pub trait MediaElement: Send + 'static {
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn set_muted(&mut self, muted: bool);
    /// Restart loading the current source
    fn reload(&mut self);
}

/// Whatever can put the overlay into fullscreen
pub trait FullscreenHost: Send + 'static {
    fn request(&mut self) -> Result<(), PlayerError>;
    fn exit(&mut self) -> Result<(), PlayerError>;
    fn is_active(&self) -> bool;
}

/// Events raised by the media element
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    LoadStart,
    CanPlay,
    TimeUpdate(f64),
    DurationChange(f64),
    Error,
    Play,
    Pause,
    Ended,
    FullscreenChange(bool),
}

/// Keys the overlay reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Space,
    F,
    Escape,
    Other,
}

/// Event sources the front end publishes into
#[derive(Clone, Default)]
pub struct OverlayHubs {
    pub media: EventHub<MediaEvent>,
    pub keys: EventHub<KeyPress>,
}

/// What a page hands to the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    pub title: String,
    pub source: PlaybackSource,
}

impl PlaybackRequest {
    pub fn subtitles(&self) -> &[SubtitleTrack] {
        &self.source.subtitles
    }
}

/// Snapshot of the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub playing: bool,
    pub muted: bool,
    pub current_time: f64,
    pub duration: f64,
    pub controls_visible: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub fullscreen: bool,
    pub closed: bool,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            playing: false,
            muted: false,
            current_time: 0.0,
            duration: 0.0,
            controls_visible: true,
            loading: true,
            error: None,
            fullscreen: false,
            closed: false,
        }
    }
}

impl OverlayState {
    pub fn progress_percent(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    /// `"MM:SS / MM:SS"`
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.current_time),
            format_time(self.duration)
        )
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Seek target for a click `x` pixels into a progress bar `width` wide
pub fn seek_target(x: f64, width: f64, duration: f64) -> Option<f64> {
    if duration.is_nan() || width.is_nan() || duration <= 0.0 || width <= 0.0 {
        return None;
    }
    Some((x / width * duration).clamp(0.0, duration))
}

enum Command {
    TogglePlay,
    Stop,
    ToggleMute,
    ToggleFullscreen,
    Seek { x: f64, width: f64 },
    PointerMove,
    PointerLeave,
    Retry,
    Close,
    Unmount,
}

type CloseCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a mounted overlay. Dropping it unmounts.
pub struct PlaybackOverlay {
    request: PlaybackRequest,
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<OverlayState>,
    task: Option<JoinHandle<()>>,
}

impl PlaybackOverlay {
    /// Mount over `media`, subscribing to `hubs` until unmounted.
    /// `on_close` runs at most once, when the user closes the overlay.
    pub fn mount<M, F, C>(
        request: PlaybackRequest,
        media: M,
        host: F,
        hubs: &OverlayHubs,
        on_close: C,
    ) -> Self
    where
        M: MediaElement,
        F: FullscreenHost,
        C: FnOnce() + Send + 'static,
    {
        info!(title = %request.title, url = %request.source.url, "Mounting playback overlay");
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(OverlayState::default());

        let worker = OverlayTask {
            media,
            host,
            state: OverlayState::default(),
            state_tx,
            loading_deadline: Some(Instant::now() + LOADING_TIMEOUT),
            fullscreen_at: Some(Instant::now() + FULLSCREEN_DELAY),
            on_close: Some(Box::new(on_close)),
        };
        let task = tokio::spawn(worker.run(
            command_rx,
            hubs.media.subscribe(),
            hubs.keys.subscribe(),
        ));

        Self {
            request,
            commands,
            state,
            task: Some(task),
        }
    }

    pub fn request(&self) -> &PlaybackRequest {
        &self.request
    }

    pub fn state(&self) -> OverlayState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every published snapshot
    pub fn watch(&self) -> watch::Receiver<OverlayState> {
        self.state.clone()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("Playback overlay already unmounted");
        }
    }

    pub fn toggle_play(&self) {
        self.send(Command::TogglePlay);
    }

    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    pub fn toggle_mute(&self) {
        self.send(Command::ToggleMute);
    }

    pub fn toggle_fullscreen(&self) {
        self.send(Command::ToggleFullscreen);
    }

    /// Click on the progress bar
    pub fn seek(&self, x: f64, width: f64) {
        self.send(Command::Seek { x, width });
    }

    pub fn pointer_move(&self) {
        self.send(Command::PointerMove);
    }

    pub fn pointer_leave(&self) {
        self.send(Command::PointerLeave);
    }

    pub fn retry(&self) {
        self.send(Command::Retry);
    }

    pub fn close(&self) {
        self.send(Command::Close);
    }

    /// Stop the task and release every subscription. Does not run the
    /// close callback.
    pub async fn unmount(mut self) {
        self.send(Command::Unmount);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Playback overlay task failed");
            }
        }
    }
}

impl Drop for PlaybackOverlay {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct OverlayTask<M, F> {
    media: M,
    host: F,
    state: OverlayState,
    state_tx: watch::Sender<OverlayState>,
    loading_deadline: Option<Instant>,
    fullscreen_at: Option<Instant>,
    on_close: Option<CloseCallback>,
}

async fn wait_until(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

impl<M: MediaElement, F: FullscreenHost> OverlayTask<M, F> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut media_events: Subscription<MediaEvent>,
        mut keys: Subscription<KeyPress>,
    ) {
        loop {
            let keep_going = tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => false,
                },
                Some(event) = media_events.recv() => {
                    self.handle_media(event);
                    true
                }
                Some(key) = keys.recv() => self.handle_key(key),
                _ = wait_until(self.fullscreen_at) => {
                    self.fullscreen_at = None;
                    self.enter_fullscreen();
                    true
                }
                _ = wait_until(self.loading_deadline) => {
                    self.loading_deadline = None;
                    if self.state.loading {
                        warn!(timeout_secs = LOADING_TIMEOUT.as_secs(), "Video did not become playable in time");
                        self.state.loading = false;
                        self.state.error = Some(TIMEOUT_ERROR.to_string());
                    }
                    true
                }
            };

            self.publish();
            if !keep_going {
                break;
            }
        }
        debug!("Playback overlay unmounted");
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }

    fn enter_loading(&mut self) {
        if !self.state.loading {
            self.state.loading = true;
            self.loading_deadline = Some(Instant::now() + LOADING_TIMEOUT);
        }
        self.state.error = None;
    }

    fn enter_fullscreen(&mut self) {
        match self.host.request() {
            Ok(()) => self.state.fullscreen = true,
            Err(e) => warn!(error = %e, "Could not enter fullscreen"),
        }
    }

    fn toggle_play(&mut self) {
        if self.state.playing {
            self.media.pause();
        } else if let Err(e) = self.media.play() {
            warn!(error = %e, "Playback refused");
        }
        self.state.playing = !self.state.playing;
    }

    fn toggle_fullscreen(&mut self) {
        if self.host.is_active() {
            match self.host.exit() {
                Ok(()) => self.state.fullscreen = false,
                Err(e) => warn!(error = %e, "Could not leave fullscreen"),
            }
        } else {
            self.enter_fullscreen();
        }
    }

    fn close(&mut self) {
        self.state.closed = true;
        if let Some(on_close) = self.on_close.take() {
            info!("Playback overlay closed");
            on_close();
        }
    }

    /// Returns `false` when the overlay should unmount
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::TogglePlay => self.toggle_play(),
            Command::Stop => {
                self.media.pause();
                self.media.seek(0.0);
                self.state.playing = false;
                self.state.current_time = 0.0;
            }
            Command::ToggleMute => {
                let muted = !self.state.muted;
                self.media.set_muted(muted);
                self.state.muted = muted;
            }
            Command::ToggleFullscreen => self.toggle_fullscreen(),
            Command::Seek { x, width } => {
                if let Some(target) = seek_target(x, width, self.state.duration) {
                    self.media.seek(target);
                    self.state.current_time = target;
                }
            }
            Command::PointerMove => self.state.controls_visible = true,
            Command::PointerLeave => self.state.controls_visible = false,
            Command::Retry => {
                self.enter_loading();
                self.media.reload();
            }
            Command::Close => {
                self.close();
                return false;
            }
            Command::Unmount => return false,
        }
        true
    }

    fn handle_media(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadStart => self.enter_loading(),
            MediaEvent::CanPlay => {
                self.state.loading = false;
                self.state.error = None;
                self.loading_deadline = None;
            }
            MediaEvent::TimeUpdate(t) => self.state.current_time = t,
            MediaEvent::DurationChange(d) => self.state.duration = d,
            MediaEvent::Error => {
                warn!("Media element reported an error");
                self.state.loading = false;
                self.state.error = Some(LOAD_ERROR.to_string());
                self.loading_deadline = None;
            }
            MediaEvent::Play => self.state.playing = true,
            MediaEvent::Pause | MediaEvent::Ended => self.state.playing = false,
            MediaEvent::FullscreenChange(active) => self.state.fullscreen = active,
        }
    }

    fn handle_key(&mut self, key: KeyPress) -> bool {
        match key {
            KeyPress::Escape if self.state.fullscreen => {
                self.close();
                return false;
            }
            KeyPress::Space => self.toggle_play(),
            KeyPress::F => self.toggle_fullscreen(),
            KeyPress::Escape | KeyPress::Other => {}
        }
        true
    }
}
