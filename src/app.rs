use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, DashboardSnapshot};
use crate::state::countdown::CountdownState;
use crate::state::messages::UiEvent;
use crate::state::presentation::PresentationController;
use chrono::{DateTime, Local, Utc};
use hackathon_api::{Challenge, Team};
use log::warn;
use tokio::sync::mpsc;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Leaderboard,
    Activity,
    Challenges,
    Team,
    Help,
}

impl MenuItem {
    /// Presentation-mode rotation order: the three public display tabs
    /// cycle; anything else re-enters the cycle at the leaderboard.
    pub fn rotation_next(self) -> Self {
        match self {
            MenuItem::Leaderboard => MenuItem::Activity,
            MenuItem::Activity => MenuItem::Challenges,
            MenuItem::Challenges => MenuItem::Leaderboard,
            MenuItem::Team | MenuItem::Help => MenuItem::Leaderboard,
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub presentation: PresentationController,
}

impl App {
    pub fn new(settings: AppSettings, events: mpsc::Sender<UiEvent>) -> Self {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        Self {
            state: AppState::new(),
            presentation: PresentationController::new(events),
            settings,
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_dashboard_loaded(
        &mut self,
        snapshot: DashboardSnapshot,
        team: Option<Team>,
        challenges: Vec<Challenge>,
    ) {
        self.state.last_error = None;
        self.state.refresh.apply(snapshot, update_stamp());
        self.state.team.set_team(team);
        self.state.challenges.set(challenges);
    }

    pub fn on_dashboard_refreshed(&mut self, snapshot: DashboardSnapshot) {
        self.state.last_error = None;
        self.state.refresh.apply(snapshot, update_stamp());
    }

    /// Stale-but-available: the previous snapshot and its timestamp
    /// stay on screen, only the status line changes.
    pub fn on_refresh_failed(&mut self, message: String) {
        warn!("dashboard refresh failed: {message}");
        self.state.last_error = Some(format!("refresh failed, showing last data: {message}"));
    }

    pub fn on_challenges_loaded(&mut self, challenges: Vec<Challenge>) {
        self.state.last_error = None;
        self.state.challenges.set(challenges);
    }

    pub fn on_team_saved(&mut self, team: Team) {
        self.state.last_error = None;
        self.state.team.set_team(Some(team));
        self.state.team.cancel_edit();
        self.state.team.cancel_member_input();
    }

    pub fn on_team_deleted(&mut self) {
        self.state.last_error = None;
        self.state.team.set_team(None);
        self.state.team.cancel_edit();
        self.state.team.cancel_member_input();
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    // -----------------------------------------------------------------------
    // Countdown — driven by the 1s ticker
    // -----------------------------------------------------------------------

    /// Recompute the countdown. Returns true once the deadline has
    /// passed so the caller can cancel the ticker.
    pub fn on_countdown_tick(&mut self, now: DateTime<Utc>) -> bool {
        self.state.countdown = CountdownState::remaining(now, self.settings.deadline);
        self.state.countdown.expired
    }

    // -----------------------------------------------------------------------
    // Presentation mode
    // -----------------------------------------------------------------------

    pub fn toggle_presentation(&mut self) {
        let rows = self.state.terminal_rows;
        match self.presentation.toggle(rows) {
            Ok(entered) => {
                if entered && !matches!(self.state.active_tab, MenuItem::Leaderboard | MenuItem::Activity | MenuItem::Challenges) {
                    // Presenting a private tab makes no sense on a projector.
                    self.update_tab(MenuItem::Leaderboard);
                }
            }
            Err(e) => self.state.last_error = Some(e.to_string()),
        }
    }

    pub fn exit_presentation(&mut self) {
        self.presentation.exit();
    }

    /// Rotation tick. Reads the current tab, so a manual selection made
    /// between ticks rotates onward from where the user left it. Ticks
    /// that straggle in after leaving fullscreen are dropped.
    pub fn advance_presentation_tab(&mut self) {
        if !self.presentation.is_fullscreen() {
            return;
        }
        let next = self.state.active_tab.rotation_next();
        self.update_tab(next);
    }

    pub fn on_resize(&mut self, rows: u16) {
        self.state.terminal_rows = rows;
        self.presentation.on_resize(rows);
    }
}

fn update_stamp() -> String {
    Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::presentation::MIN_PRESENTATION_ROWS;
    use chrono::{Duration, TimeZone};
    use hackathon_api::LeaderboardRow;

    fn test_app() -> App {
        let (tx, _rx) = mpsc::channel(16);
        let settings = AppSettings {
            github_login: "octocat".into(),
            deadline: Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap(),
            log_level: None,
        };
        let mut app = App::new(settings, tx);
        app.state.terminal_rows = 40;
        app
    }

    fn snapshot_with(teams: &[&str]) -> DashboardSnapshot {
        DashboardSnapshot {
            leaderboard: teams
                .iter()
                .enumerate()
                .map(|(i, name)| LeaderboardRow {
                    rank: i as u32 + 1,
                    team: name.to_string(),
                    ..Default::default()
                })
                .collect(),
            activity: Vec::new(),
        }
    }

    #[test]
    fn rotation_wraps_after_three_ticks() {
        for start in [MenuItem::Leaderboard, MenuItem::Activity, MenuItem::Challenges] {
            let mut tab = start;
            for _ in 0..3 {
                tab = tab.rotation_next();
            }
            assert_eq!(tab, start);
        }
    }

    #[test]
    fn private_tabs_rotate_back_into_the_cycle() {
        assert_eq!(MenuItem::Team.rotation_next(), MenuItem::Leaderboard);
        assert_eq!(MenuItem::Help.rotation_next(), MenuItem::Leaderboard);
    }

    #[tokio::test]
    async fn rotation_only_advances_while_fullscreen() {
        let mut app = test_app();
        app.advance_presentation_tab();
        assert_eq!(app.state.active_tab, MenuItem::Leaderboard);

        app.toggle_presentation();
        assert!(app.presentation.is_fullscreen());
        app.advance_presentation_tab();
        assert_eq!(app.state.active_tab, MenuItem::Activity);
    }

    #[tokio::test]
    async fn manual_selection_feeds_the_next_rotation() {
        let mut app = test_app();
        app.toggle_presentation();
        app.update_tab(MenuItem::Challenges);
        app.advance_presentation_tab();
        assert_eq!(app.state.active_tab, MenuItem::Leaderboard);
    }

    #[tokio::test]
    async fn presentation_refused_on_small_terminal() {
        let mut app = test_app();
        app.state.terminal_rows = MIN_PRESENTATION_ROWS - 1;
        app.toggle_presentation();
        assert!(!app.presentation.is_fullscreen());
        assert!(app.state.last_error.is_some());
    }

    #[tokio::test]
    async fn entering_presentation_leaves_private_tab() {
        let mut app = test_app();
        app.update_tab(MenuItem::Team);
        app.toggle_presentation();
        assert_eq!(app.state.active_tab, MenuItem::Leaderboard);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let mut app = test_app();
        app.on_dashboard_refreshed(snapshot_with(&["ByteBusters", "CodeCrafters"]));
        let stamp_before = app.state.refresh.last_updated.clone();

        app.on_refresh_failed("connection reset".into());
        assert_eq!(app.state.refresh.snapshot.leaderboard.len(), 2);
        assert_eq!(app.state.refresh.last_updated, stamp_before);
        assert!(app.state.last_error.as_deref().unwrap().contains("connection reset"));

        app.on_dashboard_refreshed(snapshot_with(&["DevDynamos"]));
        assert_eq!(app.state.refresh.snapshot.leaderboard.len(), 1);
        assert!(app.state.last_error.is_none());
    }

    #[test]
    fn countdown_tick_reports_expiry() {
        let mut app = test_app();
        let before = app.settings.deadline - Duration::seconds(5);
        assert!(!app.on_countdown_tick(before));
        assert_eq!(app.state.countdown.seconds, 5);

        let after = app.settings.deadline + Duration::seconds(1);
        assert!(app.on_countdown_tick(after));
        assert!(app.state.countdown.expired);
    }
}
