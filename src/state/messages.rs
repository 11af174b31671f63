use crate::state::app_state::DashboardSnapshot;
use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use hackathon_api::{Challenge, Difficulty, Team, TeamForm};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Initial full load: dashboard snapshot, own team, challenge catalogue.
    LoadDashboard,
    /// Periodic/manual dashboard refresh (leaderboard + activity only).
    RefreshDashboard,
    LoadChallenges { difficulty: Option<Difficulty> },
    /// `id = None` creates, `Some` patches.
    SaveTeam { id: Option<u64>, form: TeamForm },
    DeleteTeam { id: u64 },
    AddMember { team_id: u64, login: String },
    RemoveMember { team_id: u64, login: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged {
        loading_state: LoadingState,
    },
    DashboardLoaded {
        snapshot: DashboardSnapshot,
        team: Option<Team>,
        challenges: Vec<Challenge>,
    },
    DashboardRefreshed {
        snapshot: DashboardSnapshot,
    },
    /// Refresh failed — previous data stays on screen, the schedule
    /// continues. Distinct from `Error` so the in-flight guard clears.
    RefreshFailed {
        message: String,
    },
    ChallengesLoaded {
        challenges: Vec<Challenge>,
    },
    TeamSaved {
        team: Team,
    },
    TeamDeleted,
    Error {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    /// Terminal resize: (columns, rows).
    Resize(u16, u16),
    AppStarted,
    /// One-second countdown tick.
    CountdownTick,
    /// Presentation-mode tab rotation tick.
    RotateTab,
}
