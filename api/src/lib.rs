pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the REST wire format
// ---------------------------------------------------------------------------

/// A hackathon team as stored by the backend. `members` holds GitHub
/// logins; the leader is not repeated in the member list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub repository_link: String,
    pub leader: String,
    pub members: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Team {
    /// Leader plus members — the headcount shown on the dashboard.
    pub fn contributor_count(&self) -> usize {
        1 + self.members.len()
    }

    pub fn has_member(&self, login: &str) -> bool {
        self.members.iter().any(|m| m == login)
    }
}

/// Payload for team create/update. The leader is fixed at creation and
/// members are managed via add/remove, so neither appears here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamForm {
    pub name: String,
    pub description: String,
    pub repository_link: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Cycle order used by the challenges difficulty filter.
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Challenge {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub tags: Vec<Tag>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One row of the live leaderboard, pre-ranked by the backend.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub team: String,
    pub score: u32,
    pub commits: u32,
    pub contributors: u32,
    pub challenges: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivityKind {
    #[default]
    Commit,
    Submission,
}

/// A recent-activity feed entry: either a commit (with its message) or
/// a challenge submission (with the challenge title).
#[derive(Debug, Clone, Default)]
pub struct ActivityItem {
    pub team: String,
    pub kind: ActivityKind,
    pub detail: String,
    pub occurred_at: Option<DateTime<Utc>>,
}
