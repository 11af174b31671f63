use crate::wire::{
    WireActivityItem, WireChallenge, WireLeaderboardRow, WireTag, WireTeam, map_activity_item,
    map_challenge, map_leaderboard_row, map_team,
};
use crate::{ActivityItem, Challenge, Difficulty, LeaderboardRow, Tag, Team, TeamForm};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Hackathon platform client backed by the Django REST backend.
#[derive(Debug, Clone)]
pub struct HackathonApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for HackathonApi {
    fn default() -> Self {
        let base_url = std::env::var("HACKDASH_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl HackathonApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client against an explicit base URL (no trailing slash).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::builder()
                .user_agent(concat!("hackdash/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url,
            timeout: Duration::from_secs(10),
        }
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    pub async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
        let url = format!("{}/teams/", self.base_url);
        let raw: Vec<WireTeam> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_team).collect())
    }

    pub async fn fetch_team(&self, id: u64) -> ApiResult<Team> {
        let url = format!("{}/teams/{id}/", self.base_url);
        let raw: WireTeam = self.get(&url).await?;
        Ok(map_team(raw))
    }

    /// Look up the team led by a GitHub login. The backend answers the
    /// `by_leader` action with a (possibly empty) list; both an empty
    /// list and a 404 mean "no team yet".
    pub async fn fetch_team_by_leader(&self, login: &str) -> ApiResult<Option<Team>> {
        let url = format!(
            "{}/teams/by_leader/?github_login={}",
            self.base_url,
            urlencode(login)
        );
        match self.get::<Vec<WireTeam>>(&url).await {
            Ok(raw) => Ok(raw.into_iter().next().map(map_team)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a team with the given leader and no members yet.
    pub async fn create_team(&self, form: &TeamForm, leader: &str) -> ApiResult<Team> {
        let url = format!("{}/teams/", self.base_url);
        let body = serde_json::json!({
            "name": form.name,
            "description": form.description,
            "repository_link": form.repository_link,
            "leader": leader,
            "members": [],
        });
        let raw: WireTeam = self.send_json(self.client.post(&url), &url, &body).await?;
        Ok(map_team(raw))
    }

    pub async fn update_team(&self, id: u64, form: &TeamForm) -> ApiResult<Team> {
        let url = format!("{}/teams/{id}/", self.base_url);
        let raw: WireTeam = self.send_json(self.client.patch(&url), &url, form).await?;
        Ok(map_team(raw))
    }

    pub async fn delete_team(&self, id: u64) -> ApiResult<()> {
        let url = format!("{}/teams/{id}/", self.base_url);
        let response = self
            .client
            .delete(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;
        match response.error_for_status() {
            Ok(_) => Ok(()),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => Err(ApiError::NotFound(url)),
            Err(e) => Err(ApiError::Api(e, url)),
        }
    }

    /// Add a member to the team's login list. Read-modify-write: the
    /// backend stores members as a plain list, so the add is a PATCH of
    /// the whole list. Adding an existing member is a no-op.
    pub async fn add_member(&self, team_id: u64, login: &str) -> ApiResult<Team> {
        let team = self.fetch_team(team_id).await?;
        if team.has_member(login) {
            return Ok(team);
        }
        let mut members = team.members;
        members.push(login.to_string());
        self.patch_members(team_id, &members).await
    }

    pub async fn remove_member(&self, team_id: u64, login: &str) -> ApiResult<Team> {
        let team = self.fetch_team(team_id).await?;
        let members: Vec<String> = team.members.into_iter().filter(|m| m != login).collect();
        self.patch_members(team_id, &members).await
    }

    async fn patch_members(&self, team_id: u64, members: &[String]) -> ApiResult<Team> {
        let url = format!("{}/teams/{team_id}/", self.base_url);
        let body = serde_json::json!({ "members": members });
        let raw: WireTeam = self.send_json(self.client.patch(&url), &url, &body).await?;
        Ok(map_team(raw))
    }

    // -----------------------------------------------------------------------
    // Challenges + tags
    // -----------------------------------------------------------------------

    /// Fetch the challenge catalogue, optionally narrowed by the
    /// backend's `by_difficulty` action.
    pub async fn fetch_challenges(&self, difficulty: Option<Difficulty>) -> ApiResult<Vec<Challenge>> {
        let url = match difficulty {
            Some(level) => format!(
                "{}/defis/by_difficulty/?level={}",
                self.base_url,
                level.label()
            ),
            None => format!("{}/defis/", self.base_url),
        };
        let raw: Vec<WireChallenge> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_challenge).collect())
    }

    pub async fn fetch_tags(&self) -> ApiResult<Vec<Tag>> {
        let url = format!("{}/tags/", self.base_url);
        let raw: Vec<WireTag> = self.get(&url).await?;
        Ok(raw.into_iter().map(|t| Tag { id: t.id, name: t.name }).collect())
    }

    // -----------------------------------------------------------------------
    // Leaderboard + activity
    // -----------------------------------------------------------------------

    pub async fn fetch_leaderboard(&self) -> ApiResult<Vec<LeaderboardRow>> {
        let url = format!("{}/teams/leaderboard/", self.base_url);
        let raw: Vec<WireLeaderboardRow> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_leaderboard_row).collect())
    }

    pub async fn fetch_recent_activity(&self) -> ApiResult<Vec<ActivityItem>> {
        let url = format!("{}/activity/recent/", self.base_url);
        let raw: Vec<WireActivityItem> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_activity_item).collect())
    }

    // -----------------------------------------------------------------------
    // HTTP plumbing
    // -----------------------------------------------------------------------

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                Err(ApiError::NotFound(url.to_owned()))
            }
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }

    async fn send_json<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = request
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                Err(ApiError::NotFound(url.to_owned()))
            }
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

/// Minimal percent-encoding for query values (logins are ASCII but may
/// contain characters like '+').
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TEAM_JSON: &str = r#"{
        "id": 2,
        "name": "CodeCrafters",
        "description": "We craft code",
        "repository_link": "https://github.com/codecrafters/hackathon-project",
        "leader": "octocat",
        "members": ["alice", "bob"],
        "created_at": "2026-08-01T09:30:00Z",
        "updated_at": "2026-08-02T11:00:00Z"
    }"#;

    #[test]
    fn urlencode_passes_unreserved_chars() {
        assert_eq!(urlencode("octocat-42"), "octocat-42");
        assert_eq!(urlencode("a b+c"), "a%20b%2Bc");
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let api = HackathonApi::with_base_url("http://example.test/api/");
        assert_eq!(api.base_url, "http://example.test/api");
    }

    #[tokio::test]
    async fn fetch_teams_parses_list() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/teams/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{TEAM_JSON}]"))
            .create_async()
            .await;

        let api = HackathonApi::with_base_url(server.url());
        let teams = api.fetch_teams().await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "CodeCrafters");
        assert_eq!(teams[0].contributor_count(), 3);
    }

    #[tokio::test]
    async fn by_leader_empty_list_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/teams/by_leader/")
            .match_query(Matcher::UrlEncoded("github_login".into(), "nobody".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let api = HackathonApi::with_base_url(server.url());
        assert!(api.fetch_team_by_leader("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn by_leader_404_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/teams/by_leader/")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let api = HackathonApi::with_base_url(server.url());
        assert!(api.fetch_team_by_leader("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_team_posts_leader_and_empty_members() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/teams/")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "CodeCrafters",
                "leader": "octocat",
                "members": [],
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(TEAM_JSON)
            .create_async()
            .await;

        let api = HackathonApi::with_base_url(server.url());
        let form = TeamForm {
            name: "CodeCrafters".into(),
            description: "We craft code".into(),
            repository_link: "https://github.com/codecrafters/hackathon-project".into(),
        };
        let team = api.create_team(&form, "octocat").await.unwrap();
        assert_eq!(team.id, 2);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn add_member_skips_patch_when_already_present() {
        let mut server = mockito::Server::new_async().await;
        // Only the GET is mocked; a PATCH would 501 and fail the call.
        let _m = server
            .mock("GET", "/teams/2/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TEAM_JSON)
            .create_async()
            .await;

        let api = HackathonApi::with_base_url(server.url());
        let team = api.add_member(2, "alice").await.unwrap();
        assert_eq!(team.members, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[tokio::test]
    async fn challenges_by_difficulty_uses_level_query() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/defis/by_difficulty/")
            .match_query(Matcher::UrlEncoded("level".into(), "hard".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 4, "title": "ML recommender", "difficulty": "hard", "tags": []}]"#,
            )
            .create_async()
            .await;

        let api = HackathonApi::with_base_url(server.url());
        let challenges = api.fetch_challenges(Some(Difficulty::Hard)).await.unwrap();
        assert_eq!(challenges.len(), 1);
        assert_eq!(challenges[0].difficulty, Difficulty::Hard);
    }

    #[tokio::test]
    async fn leaderboard_rows_parse() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/teams/leaderboard/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"rank": 1, "name": "ByteBusters", "score": 1250, "commits": 78,
                     "contributors": 4, "challenges": ["RESTful API"]}]"#,
            )
            .create_async()
            .await;

        let api = HackathonApi::with_base_url(server.url());
        let rows = api.fetch_leaderboard().await.unwrap();
        assert_eq!(rows[0].team, "ByteBusters");
        assert_eq!(rows[0].score, 1250);
    }

    #[tokio::test]
    async fn tags_parse() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/tags/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "name": "web"}, {"id": 2, "name": "ai"}]"#)
            .create_async()
            .await;

        let api = HackathonApi::with_base_url(server.url());
        let tags = api.fetch_tags().await.unwrap();
        assert_eq!(tags, vec![
            Tag { id: 1, name: "web".into() },
            Tag { id: 2, name: "ai".into() },
        ]);
    }

    #[tokio::test]
    async fn server_error_maps_to_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/teams/leaderboard/")
            .with_status(500)
            .create_async()
            .await;

        let api = HackathonApi::with_base_url(server.url());
        match api.fetch_leaderboard().await {
            Err(ApiError::Api(_, url)) => assert!(url.ends_with("/teams/leaderboard/")),
            other => panic!("expected ApiError::Api, got {other:?}"),
        }
    }
}
