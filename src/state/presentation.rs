use crate::state::messages::UiEvent;
use crate::state::ticker::Ticker;
use log::debug;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long each tab stays up while presenting.
pub const ROTATION_PERIOD: Duration = Duration::from_secs(10);

/// Below this the leaderboard table cannot render a single row plus
/// chrome, so entering presentation mode is refused.
pub const MIN_PRESENTATION_ROWS: u16 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PresentationMode {
    #[default]
    Normal,
    Fullscreen,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PresentationError {
    pub rows: u16,
}

impl fmt::Display for PresentationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "terminal too small to present ({} rows, need {MIN_PRESENTATION_ROWS})",
            self.rows
        )
    }
}

/// Normal/Fullscreen state machine for the projected "datashow" view.
/// Owns the tab-rotation ticker: it exists exactly while the mode is
/// `Fullscreen`. The viewport height is only tracked while presenting —
/// that is the resize probe the renderer trusts in this mode.
pub struct PresentationController {
    mode: PresentationMode,
    viewport_rows: u16,
    rotation: Option<Ticker>,
    events: mpsc::Sender<UiEvent>,
}

impl PresentationController {
    pub fn new(events: mpsc::Sender<UiEvent>) -> Self {
        Self {
            mode: PresentationMode::Normal,
            viewport_rows: 0,
            rotation: None,
            events,
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.mode == PresentationMode::Fullscreen
    }

    pub fn viewport_rows(&self) -> u16 {
        self.viewport_rows
    }

    /// Request presentation mode. On refusal nothing changes: the mode
    /// stays `Normal` and no rotation ticker is started.
    pub fn enter(&mut self, rows: u16) -> Result<(), PresentationError> {
        if self.is_fullscreen() {
            return Ok(());
        }
        if rows < MIN_PRESENTATION_ROWS {
            return Err(PresentationError { rows });
        }
        let events = self.events.clone();
        self.rotation = Some(Ticker::spawn(ROTATION_PERIOD, move || {
            let events = events.clone();
            async move {
                let _ = events.send(UiEvent::RotateTab).await;
            }
        }));
        self.viewport_rows = rows;
        self.mode = PresentationMode::Fullscreen;
        Ok(())
    }

    pub fn exit(&mut self) {
        if let Some(rotation) = self.rotation.take() {
            rotation.stop();
        }
        self.viewport_rows = 0;
        self.mode = PresentationMode::Normal;
    }

    /// Toggle; returns whether the controller is now presenting.
    pub fn toggle(&mut self, rows: u16) -> Result<bool, PresentationError> {
        if self.is_fullscreen() {
            self.exit();
            Ok(false)
        } else {
            self.enter(rows)?;
            Ok(true)
        }
    }

    /// The host took fullscreen away (here: the viewport collapsed).
    /// Resynchronize instead of trusting our own last toggle.
    pub fn resync_external_exit(&mut self) {
        debug!("presentation surface lost, resyncing to normal mode");
        self.exit();
    }

    /// Viewport probe — only installed while presenting.
    pub fn on_resize(&mut self, rows: u16) {
        if !self.is_fullscreen() {
            return;
        }
        if rows < MIN_PRESENTATION_ROWS {
            self.resync_external_exit();
        } else {
            self.viewport_rows = rows;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn controller() -> (PresentationController, mpsc::Receiver<UiEvent>) {
        let (tx, rx) = mpsc::channel(16);
        (PresentationController::new(tx), rx)
    }

    #[tokio::test]
    async fn enter_refused_on_small_viewport() {
        let (mut pc, _rx) = controller();
        let err = pc.enter(MIN_PRESENTATION_ROWS - 1).unwrap_err();
        assert_eq!(err.rows, MIN_PRESENTATION_ROWS - 1);
        assert!(!pc.is_fullscreen());
        assert!(pc.rotation.is_none());
    }

    #[tokio::test]
    async fn enter_starts_rotation_and_exit_stops_it() {
        let (mut pc, _rx) = controller();
        pc.enter(40).unwrap();
        assert!(pc.is_fullscreen());
        assert_eq!(pc.viewport_rows(), 40);
        assert!(pc.rotation.is_some());

        pc.exit();
        assert!(!pc.is_fullscreen());
        assert!(pc.rotation.is_none());
        assert_eq!(pc.viewport_rows(), 0);
    }

    #[tokio::test]
    async fn exit_is_idempotent() {
        let (mut pc, _rx) = controller();
        pc.enter(40).unwrap();
        pc.exit();
        pc.exit();
        assert!(!pc.is_fullscreen());
    }

    #[tokio::test]
    async fn resize_updates_viewport_while_presenting() {
        let (mut pc, _rx) = controller();
        pc.enter(40).unwrap();
        pc.on_resize(33);
        assert_eq!(pc.viewport_rows(), 33);
        assert!(pc.is_fullscreen());
    }

    #[tokio::test]
    async fn resize_is_ignored_in_normal_mode() {
        let (mut pc, _rx) = controller();
        pc.on_resize(50);
        assert_eq!(pc.viewport_rows(), 0);
        assert!(!pc.is_fullscreen());
    }

    #[tokio::test]
    async fn viewport_collapse_is_an_external_exit() {
        let (mut pc, _rx) = controller();
        pc.enter(40).unwrap();
        pc.on_resize(MIN_PRESENTATION_ROWS - 2);
        assert!(!pc.is_fullscreen());
        assert!(pc.rotation.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn rotation_ticks_arrive_while_presenting() {
        let (mut pc, mut rx) = controller();
        pc.enter(40).unwrap();
        sleep(ROTATION_PERIOD * 2 + Duration::from_millis(100)).await;
        let mut rotations = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, UiEvent::RotateTab) {
                rotations += 1;
            }
        }
        assert_eq!(rotations, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn no_rotation_after_exit() {
        let (mut pc, mut rx) = controller();
        pc.enter(40).unwrap();
        pc.exit();
        sleep(ROTATION_PERIOD * 3).await;
        assert!(rx.try_recv().is_err());
    }
}
