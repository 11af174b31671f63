use crate::state::app_state::DashboardSnapshot;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use hackathon_api::client::{ApiError, HackathonApi};
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Serial consumer of network requests. Requests are processed one at a
/// time in arrival order; refresh overlap is prevented upstream by the
/// RefreshGuard before a request is ever enqueued.
pub struct NetworkWorker {
    client: HackathonApi,
    github_login: String,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        github_login: String,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: HackathonApi::new(),
            github_login,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let is_refresh = matches!(request, NetworkRequest::RefreshDashboard);
            let result = match request {
                NetworkRequest::LoadDashboard => self.handle_load_dashboard().await,
                NetworkRequest::RefreshDashboard => self.handle_refresh_dashboard().await,
                NetworkRequest::LoadChallenges { difficulty } => {
                    self.handle_load_challenges(difficulty).await
                }
                NetworkRequest::SaveTeam { id, form } => self.handle_save_team(id, form).await,
                NetworkRequest::DeleteTeam { id } => self.handle_delete_team(id).await,
                NetworkRequest::AddMember { team_id, login } => {
                    self.handle_add_member(team_id, login).await
                }
                NetworkRequest::RemoveMember { team_id, login } => {
                    self.handle_remove_member(team_id, login).await
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            // Refresh failures keep the schedule alive and the stale
            // data on screen, so they get their own response variant.
            let response = result.unwrap_or_else(|err| {
                if is_refresh {
                    NetworkResponse::RefreshFailed { message: err.to_string() }
                } else {
                    NetworkResponse::Error { message: err.to_string() }
                }
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_dashboard(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading full dashboard");
        let (leaderboard, activity, team, challenges) = tokio::join!(
            self.client.fetch_leaderboard(),
            self.client.fetch_recent_activity(),
            self.client.fetch_team_by_leader(&self.github_login),
            self.client.fetch_challenges(None),
        );
        Ok(NetworkResponse::DashboardLoaded {
            snapshot: DashboardSnapshot { leaderboard: leaderboard?, activity: activity? },
            team: team?,
            challenges: challenges?,
        })
    }

    async fn handle_refresh_dashboard(&self) -> Result<NetworkResponse, ApiError> {
        debug!("refreshing dashboard snapshot");
        let (leaderboard, activity) = tokio::join!(
            self.client.fetch_leaderboard(),
            self.client.fetch_recent_activity(),
        );
        Ok(NetworkResponse::DashboardRefreshed {
            snapshot: DashboardSnapshot { leaderboard: leaderboard?, activity: activity? },
        })
    }

    async fn handle_load_challenges(
        &self,
        difficulty: Option<hackathon_api::Difficulty>,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("loading challenges (filter: {difficulty:?})");
        let challenges = self.client.fetch_challenges(difficulty).await?;
        Ok(NetworkResponse::ChallengesLoaded { challenges })
    }

    async fn handle_save_team(
        &self,
        id: Option<u64>,
        form: hackathon_api::TeamForm,
    ) -> Result<NetworkResponse, ApiError> {
        let team = match id {
            Some(id) => {
                debug!("updating team {id}");
                self.client.update_team(id, &form).await?
            }
            None => {
                debug!("creating team for {}", self.github_login);
                self.client.create_team(&form, &self.github_login).await?
            }
        };
        Ok(NetworkResponse::TeamSaved { team })
    }

    async fn handle_delete_team(&self, id: u64) -> Result<NetworkResponse, ApiError> {
        debug!("deleting team {id}");
        self.client.delete_team(id).await?;
        Ok(NetworkResponse::TeamDeleted)
    }

    async fn handle_add_member(
        &self,
        team_id: u64,
        login: String,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("adding member {login} to team {team_id}");
        let team = self.client.add_member(team_id, &login).await?;
        Ok(NetworkResponse::TeamSaved { team })
    }

    async fn handle_remove_member(
        &self,
        team_id: u64,
        login: String,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("removing member {login} from team {team_id}");
        let team = self.client.remove_member(team_id, &login).await?;
        Ok(NetworkResponse::TeamSaved { team })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
