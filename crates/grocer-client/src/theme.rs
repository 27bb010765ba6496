//! # Theme Sync
//!
//! Keeps the dark-mode preference in step across the local file, the
//! operating system setting and the signed-in user's profile.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ThemeSync actor                                │
//! │                                                                         │
//! │  ThemeHandle ──mpsc──►  ┌────────────────────────┐                      │
//! │  toggle / set           │ explicit: Option<Theme>│──save──► local file  │
//! │  sign_in / sign_out     │ system_dark: bool      │                      │
//! │  flush / shutdown       │ signed_in: bool        │──watch──► current()  │
//! │                         │ pending push + due     │                      │
//! │  OS setting ──watch──►  └───────────┬────────────┘                      │
//! │                                     │ trailing edge, 500 ms quiet       │
//! │                                     ▼                                   │
//! │                           push worker ──► ThemeRemote::push_theme       │
//! │                           (own task, one push at a time, best effort)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - The local preference renders immediately; the server never blocks it.
//!   Pushes run on their own task so a slow backend cannot stall commands.
//! - With no explicit preference the theme follows the OS setting.
//! - On sign-in a stored remote preference overrides the local one.
//! - Changes while signed in are pushed once input has been quiet for the
//!   debounce window. Only the latest value is sent.
//! - A failed push is logged and dropped. No retry, no user-facing error.
//! - Sign-out drops unsent changes, including ones already queued for the
//!   worker.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use grocer_core::Theme;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::config::ThemeSettings;
use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;

// =============================================================================
// Local Storage
// =============================================================================

/// Where the device keeps its own preference.
pub trait LocalThemeStore: Send + Sync {
    fn load(&self) -> ClientResult<Option<Theme>>;
    fn save(&self, theme: Theme) -> ClientResult<()>;
    /// Forgets the explicit preference so the OS setting applies again.
    fn clear(&self) -> ClientResult<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTheme {
    theme: Theme,
}

/// JSON file holding `{"theme": "dark"}`.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileThemeStore { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LocalThemeStore for FileThemeStore {
    fn load(&self) -> ClientResult<Option<Theme>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| ClientError::ThemeStore(e.to_string()))?;
        let stored: StoredTheme =
            serde_json::from_str(&contents).map_err(|e| ClientError::ThemeStore(e.to_string()))?;
        Ok(Some(stored.theme))
    }

    fn save(&self, theme: Theme) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ClientError::ThemeStore(e.to_string()))?;
        }
        let contents = serde_json::to_string(&StoredTheme { theme })?;
        std::fs::write(&self.path, contents).map_err(|e| ClientError::ThemeStore(e.to_string()))
    }

    fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::ThemeStore(e.to_string())),
        }
    }
}

/// In-memory store for tests and for sessions without a writable disk.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    theme: Mutex<Option<Theme>>,
}

impl MemoryThemeStore {
    pub fn with_theme(theme: Theme) -> Self {
        MemoryThemeStore {
            theme: Mutex::new(Some(theme)),
        }
    }
}

impl LocalThemeStore for MemoryThemeStore {
    fn load(&self) -> ClientResult<Option<Theme>> {
        self.theme
            .lock()
            .map(|guard| *guard)
            .map_err(|_| ClientError::ThemeStore("theme lock poisoned".into()))
    }

    fn save(&self, theme: Theme) -> ClientResult<()> {
        let mut guard = self
            .theme
            .lock()
            .map_err(|_| ClientError::ThemeStore("theme lock poisoned".into()))?;
        *guard = Some(theme);
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        let mut guard = self
            .theme
            .lock()
            .map_err(|_| ClientError::ThemeStore("theme lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

// =============================================================================
// Remote Preference
// =============================================================================

/// Server side of the preference.
#[async_trait]
pub trait ThemeRemote: Send + Sync {
    async fn push_theme(&self, theme: Theme) -> ClientResult<()>;
}

#[async_trait]
impl ThemeRemote for ApiClient {
    async fn push_theme(&self, theme: Theme) -> ClientResult<()> {
        self.update_theme(theme).await
    }
}

// =============================================================================
// Handle
// =============================================================================

#[derive(Debug)]
enum ThemeCommand {
    Toggle(oneshot::Sender<Theme>),
    Set(Theme, oneshot::Sender<Theme>),
    FollowSystem(oneshot::Sender<Theme>),
    SignIn {
        remote: Option<Theme>,
        reply: oneshot::Sender<Theme>,
    },
    SignOut(oneshot::Sender<()>),
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Handle for controlling the theme sync task.
#[derive(Debug, Clone)]
pub struct ThemeHandle {
    cmd_tx: mpsc::Sender<ThemeCommand>,
    theme_rx: watch::Receiver<Theme>,
}

impl ThemeHandle {
    /// Flips between light and dark. Returns the new theme.
    pub async fn toggle(&self) -> ClientResult<Theme> {
        self.call(ThemeCommand::Toggle).await
    }

    pub async fn set(&self, theme: Theme) -> ClientResult<Theme> {
        self.call(|reply| ThemeCommand::Set(theme, reply)).await
    }

    /// Drops the explicit preference and follows the OS setting again.
    pub async fn follow_system(&self) -> ClientResult<Theme> {
        self.call(ThemeCommand::FollowSystem).await
    }

    /// Starts remote sync. `remote` is the preference stored on the profile.
    pub async fn sign_in(&self, remote: Option<Theme>) -> ClientResult<Theme> {
        self.call(|reply| ThemeCommand::SignIn { remote, reply }).await
    }

    /// Stops remote sync and drops any unsent change.
    pub async fn sign_out(&self) -> ClientResult<()> {
        self.call(ThemeCommand::SignOut).await
    }

    /// Sends a pending change now instead of waiting for the debounce.
    pub async fn flush(&self) -> ClientResult<()> {
        self.call(ThemeCommand::Flush).await
    }

    /// Flushes, then stops the task.
    pub async fn shutdown(&self) -> ClientResult<()> {
        self.call(ThemeCommand::Shutdown).await
    }

    /// Theme to render right now.
    pub fn current(&self) -> Theme {
        *self.theme_rx.borrow()
    }

    pub fn effective_dark(&self) -> bool {
        self.current().is_dark()
    }

    /// Receiver that fires whenever the rendered theme changes.
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.theme_rx.clone()
    }

    async fn call<R>(&self, command: impl FnOnce(oneshot::Sender<R>) -> ThemeCommand) -> ClientResult<R> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| ClientError::ChannelClosed("Theme sync stopped".into()))?;
        reply_rx
            .await
            .map_err(|_| ClientError::ChannelClosed("Theme sync stopped".into()))
    }
}

// =============================================================================
// Actor
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct PendingPush {
    theme: Theme,
    due: Instant,
}

/// Work for the push task. A job without a theme only waits for the pushes
/// queued before it.
#[derive(Debug)]
struct PushJob {
    theme: Option<Theme>,
    session: u64,
    done: Option<oneshot::Sender<()>>,
}

pub struct ThemeSync {
    local: Arc<dyn LocalThemeStore>,
    debounce: Duration,
    explicit: Option<Theme>,
    system_dark: bool,
    signed_in: bool,
    pending: Option<PendingPush>,
    /// Bumped on sign-out; queued pushes from an older session are skipped.
    session: Arc<AtomicU64>,
    push_tx: mpsc::UnboundedSender<PushJob>,
    theme_tx: watch::Sender<Theme>,
}

impl ThemeSync {
    /// Loads the local preference, spawns the sync task and returns its handle.
    ///
    /// `system` carries the OS dark-mode flag; dropping its sender freezes
    /// the last value.
    pub fn start(
        settings: &ThemeSettings,
        local: Arc<dyn LocalThemeStore>,
        remote: Arc<dyn ThemeRemote>,
        system: watch::Receiver<bool>,
    ) -> ThemeHandle {
        let explicit = local.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read local theme, following system");
            None
        });
        let system_dark = *system.borrow();
        let initial = explicit.unwrap_or(Theme::from_dark(system_dark));

        let (theme_tx, theme_rx) = watch::channel(initial);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (push_tx, push_rx) = mpsc::unbounded_channel();
        let session = Arc::new(AtomicU64::new(0));

        let actor = ThemeSync {
            local,
            debounce: settings.debounce(),
            explicit,
            system_dark,
            signed_in: false,
            pending: None,
            session: session.clone(),
            push_tx,
            theme_tx,
        };
        tokio::spawn(push_worker(remote, session, push_rx));
        tokio::spawn(actor.run(cmd_rx, system));

        ThemeHandle { cmd_tx, theme_rx }
    }

    fn effective(&self) -> Theme {
        self.explicit
            .unwrap_or_else(|| Theme::from_dark(self.system_dark))
    }

    fn publish(&self) {
        self.theme_tx.send_replace(self.effective());
    }

    async fn run(mut self, mut cmd_rx: mpsc::Receiver<ThemeCommand>, mut system: watch::Receiver<bool>) {
        info!(theme = %self.effective(), debounce_ms = self.debounce.as_millis() as u64, "Theme sync started");
        let mut system_open = true;

        loop {
            let due = self.pending.map(|p| p.due);

            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else {
                        self.queue_push(None);
                        break;
                    };
                    if !self.handle(cmd) {
                        break;
                    }
                }
                changed = system.changed(), if system_open => {
                    match changed {
                        Ok(()) => {
                            self.system_dark = *system.borrow_and_update();
                            debug!(system_dark = self.system_dark, "System theme changed");
                            self.publish();
                        }
                        Err(_) => system_open = false,
                    }
                }
                _ = sleep_until(due.unwrap_or_else(Instant::now)), if due.is_some() => {
                    self.queue_push(None);
                }
            }
        }

        info!("Theme sync stopped");
    }

    /// Returns false when the task should stop.
    fn handle(&mut self, cmd: ThemeCommand) -> bool {
        match cmd {
            ThemeCommand::Toggle(reply) => {
                let theme = self.effective().toggled();
                self.choose(theme);
                let _ = reply.send(theme);
            }
            ThemeCommand::Set(theme, reply) => {
                self.choose(theme);
                let _ = reply.send(theme);
            }
            ThemeCommand::FollowSystem(reply) => {
                self.explicit = None;
                if let Err(e) = self.local.clear() {
                    warn!(error = %e, "Failed to clear local theme");
                }
                self.publish();
                let _ = reply.send(self.effective());
            }
            ThemeCommand::SignIn { remote, reply } => {
                self.signed_in = true;
                self.pending = None;
                if let Some(theme) = remote {
                    debug!(theme = %theme, "Applying profile theme");
                    self.explicit = Some(theme);
                    if let Err(e) = self.local.save(theme) {
                        warn!(error = %e, "Failed to save local theme");
                    }
                    self.publish();
                }
                let _ = reply.send(self.effective());
            }
            ThemeCommand::SignOut(reply) => {
                self.signed_in = false;
                self.pending = None;
                self.session.fetch_add(1, Ordering::SeqCst);
                let _ = reply.send(());
            }
            // The worker answers once everything queued so far is sent.
            ThemeCommand::Flush(reply) => self.queue_push(Some(reply)),
            ThemeCommand::Shutdown(reply) => {
                self.queue_push(Some(reply));
                return false;
            }
        }
        true
    }

    /// Applies a user choice locally and schedules the remote push.
    fn choose(&mut self, theme: Theme) {
        self.explicit = Some(theme);
        if let Err(e) = self.local.save(theme) {
            warn!(error = %e, "Failed to save local theme");
        }
        self.publish();

        if self.signed_in {
            self.pending = Some(PendingPush {
                theme,
                due: Instant::now() + self.debounce,
            });
        }
    }

    /// Hands the pending change to the push worker without waiting for it.
    fn queue_push(&mut self, done: Option<oneshot::Sender<()>>) {
        let theme = self
            .pending
            .take()
            .filter(|_| self.signed_in)
            .map(|p| p.theme);
        if theme.is_none() && done.is_none() {
            return;
        }

        let job = PushJob {
            theme,
            session: self.session.load(Ordering::SeqCst),
            done,
        };
        if let Err(mpsc::error::SendError(job)) = self.push_tx.send(job) {
            warn!(theme = ?job.theme, "Theme push worker stopped, change dropped");
            if let Some(done) = job.done {
                let _ = done.send(());
            }
        }
    }
}

/// Sends queued themes one at a time. Jobs that piled up behind a slow push
/// collapse into a single push of the newest theme.
async fn push_worker(
    remote: Arc<dyn ThemeRemote>,
    session: Arc<AtomicU64>,
    mut jobs: mpsc::UnboundedReceiver<PushJob>,
) {
    while let Some(first) = jobs.recv().await {
        let mut latest = first.theme.map(|theme| (theme, first.session));
        let mut waiters: Vec<oneshot::Sender<()>> = first.done.into_iter().collect();
        while let Ok(job) = jobs.try_recv() {
            if let Some(theme) = job.theme {
                latest = Some((theme, job.session));
            }
            waiters.extend(job.done);
        }

        if let Some((theme, queued_in)) = latest {
            if queued_in != session.load(Ordering::SeqCst) {
                debug!(theme = %theme, "Signed out before push, dropped");
            } else {
                match remote.push_theme(theme).await {
                    Ok(()) => debug!(theme = %theme, "Theme pushed to profile"),
                    Err(e) => debug!(theme = %theme, error = %e, "Theme push failed, dropped"),
                }
            }
        }

        for waiter in waiters {
            let _ = waiter.send(());
        }
    }
    debug!("Theme push worker stopped");
}
