use crate::app::MenuItem;
use crate::state::countdown::CountdownState;
use hackathon_api::{ActivityItem, Challenge, Difficulty, LeaderboardRow, Team, TeamForm};

// ---------------------------------------------------------------------------
// Dashboard refresh state
// ---------------------------------------------------------------------------

/// One atomic unit of refreshed data: the ranked leaderboard and the
/// recent-activity feed, fetched together so the view never mixes rows
/// from two different refresh cycles.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub leaderboard: Vec<LeaderboardRow>,
    pub activity: Vec<ActivityItem>,
}

/// Stale-but-available cache of the last successful refresh. A failed
/// refresh leaves both the snapshot and the timestamp untouched.
#[derive(Debug, Default)]
pub struct RefreshState {
    pub snapshot: DashboardSnapshot,
    /// "HH:MM" of the last successful refresh; None until the first one.
    pub last_updated: Option<String>,
    pub leaderboard_scroll: u16,
    pub activity_scroll: u16,
}

impl RefreshState {
    /// Replace the snapshot wholesale and stamp the update time.
    pub fn apply(&mut self, snapshot: DashboardSnapshot, stamp: String) {
        self.snapshot = snapshot;
        self.last_updated = Some(stamp);
        let max_lb = self.snapshot.leaderboard.len().saturating_sub(1) as u16;
        self.leaderboard_scroll = self.leaderboard_scroll.min(max_lb);
        let max_act = self.snapshot.activity.len().saturating_sub(1) as u16;
        self.activity_scroll = self.activity_scroll.min(max_act);
    }

    pub fn leaderboard_scroll_down(&mut self) {
        let max = self.snapshot.leaderboard.len().saturating_sub(1) as u16;
        self.leaderboard_scroll = (self.leaderboard_scroll + 1).min(max);
    }

    pub fn leaderboard_scroll_up(&mut self) {
        self.leaderboard_scroll = self.leaderboard_scroll.saturating_sub(1);
    }

    pub fn activity_scroll_down(&mut self) {
        let max = self.snapshot.activity.len().saturating_sub(1) as u16;
        self.activity_scroll = (self.activity_scroll + 1).min(max);
    }

    pub fn activity_scroll_up(&mut self) {
        self.activity_scroll = self.activity_scroll.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Challenge catalogue state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ChallengeState {
    pub challenges: Vec<Challenge>,
    /// None shows the whole catalogue.
    pub filter: Option<Difficulty>,
    pub selected: usize,
}

impl ChallengeState {
    pub fn set(&mut self, challenges: Vec<Challenge>) {
        self.challenges = challenges;
        self.selected = 0;
    }

    /// All → easy → medium → hard → all.
    pub fn cycle_filter(&mut self) -> Option<Difficulty> {
        self.filter = match self.filter {
            None => Some(Difficulty::Easy),
            Some(Difficulty::Hard) => None,
            Some(level) => Some(level.next()),
        };
        self.filter
    }

    pub fn navigate_down(&mut self) {
        let max = self.challenges.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_challenge(&self) -> Option<&Challenge> {
        self.challenges.get(self.selected)
    }
}

// ---------------------------------------------------------------------------
// Team tab state — own team plus the inline create/edit form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Description,
    RepositoryLink,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Description,
            FormField::Description => FormField::RepositoryLink,
            FormField::RepositoryLink => FormField::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Description => "Description",
            FormField::RepositoryLink => "Repository",
        }
    }
}

/// In-progress team form. `existing_id` is set when editing, None when
/// creating.
#[derive(Debug, Clone, Default)]
pub struct TeamFormDraft {
    pub name: String,
    pub description: String,
    pub repository_link: String,
    pub focus: FormField,
    pub existing_id: Option<u64>,
}

impl TeamFormDraft {
    pub fn from_team(team: Option<&Team>) -> Self {
        match team {
            Some(t) => Self {
                name: t.name.clone(),
                description: t.description.clone(),
                repository_link: t.repository_link.clone(),
                focus: FormField::Name,
                existing_id: Some(t.id),
            },
            None => Self::default(),
        }
    }

    fn focused_field_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Description => &mut self.description,
            FormField::RepositoryLink => &mut self.repository_link,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.focused_field_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_field_mut().pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn to_form(&self) -> TeamForm {
        TeamForm {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            repository_link: self.repository_link.trim().to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TeamState {
    pub team: Option<Team>,
    pub form: Option<TeamFormDraft>,
    /// Single-line member-login input, active while Some.
    pub member_input: Option<String>,
    pub selected_member: usize,
}

impl TeamState {
    pub fn begin_edit(&mut self) {
        self.form = Some(TeamFormDraft::from_team(self.team.as_ref()));
    }

    pub fn cancel_edit(&mut self) {
        self.form = None;
    }

    pub fn begin_member_input(&mut self) {
        if self.team.is_some() {
            self.member_input = Some(String::new());
        }
    }

    pub fn cancel_member_input(&mut self) {
        self.member_input = None;
    }

    pub fn set_team(&mut self, team: Option<Team>) {
        let member_count = team.as_ref().map(|t| t.members.len()).unwrap_or(0);
        self.selected_member = self.selected_member.min(member_count.saturating_sub(1));
        self.team = team;
    }

    pub fn member_down(&mut self) {
        let max = self
            .team
            .as_ref()
            .map(|t| t.members.len().saturating_sub(1))
            .unwrap_or(0);
        if self.selected_member < max {
            self.selected_member += 1;
        }
    }

    pub fn member_up(&mut self) {
        self.selected_member = self.selected_member.saturating_sub(1);
    }

    pub fn selected_member_login(&self) -> Option<String> {
        self.team
            .as_ref()
            .and_then(|t| t.members.get(self.selected_member))
            .cloned()
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// Last known terminal height, fed to the presentation controller
    /// when the user toggles fullscreen.
    pub terminal_rows: u16,
    pub countdown: CountdownState,
    pub refresh: RefreshState,
    pub challenges: ChallengeState,
    pub team: TeamState,
}

impl AppState {
    pub fn new() -> Self {
        let terminal_rows = crossterm::terminal::size().map(|(_, h)| h).unwrap_or(24);
        Self {
            terminal_rows,
            ..Self::default()
        }
    }
}
