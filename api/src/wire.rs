//! Raw wire types for the hackathon REST backend, serde shapes matching
//! the Django REST Framework serializers. These map to the clean domain
//! types via the mapping functions at the bottom.

use crate::{
    ActivityItem, ActivityKind, Challenge, Difficulty, LeaderboardRow, Tag, Team,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Teams  (/teams/)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeam {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub repository_link: String,
    #[serde(default)]
    pub leader: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub created_at: Option<String>, // ISO 8601
    pub updated_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Challenges  (/defis/)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTag {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireChallenge {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Absent from the list serializer; present on detail responses.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<WireTag>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Leaderboard + activity  (/teams/leaderboard/, /activity/recent/)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireLeaderboardRow {
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub commits: u32,
    #[serde(default)]
    pub contributors: u32,
    #[serde(default)]
    pub challenges: Vec<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireActivityItem {
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub action: String, // "commit" | "submission"
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub challenge: Option<String>,
    pub occurred_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn parse_timestamp(raw: &Option<String>) -> Option<DateTime<Utc>> {
    raw.as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn map_team(w: WireTeam) -> Team {
    let created_at = parse_timestamp(&w.created_at);
    let updated_at = parse_timestamp(&w.updated_at);
    Team {
        id: w.id,
        name: w.name,
        description: w.description,
        repository_link: w.repository_link,
        leader: w.leader,
        members: w.members,
        created_at,
        updated_at,
    }
}

pub fn map_challenge(w: WireChallenge) -> Challenge {
    let created_at = parse_timestamp(&w.created_at);
    let updated_at = parse_timestamp(&w.updated_at);
    Challenge {
        id: w.id,
        title: w.title,
        description: w.description,
        difficulty: Difficulty::parse(&w.difficulty).unwrap_or_default(),
        tags: w.tags.into_iter().map(|t| Tag { id: t.id, name: t.name }).collect(),
        created_at,
        updated_at,
    }
}

pub fn map_leaderboard_row(w: WireLeaderboardRow) -> LeaderboardRow {
    LeaderboardRow {
        rank: w.rank,
        team: w.name,
        score: w.score,
        commits: w.commits,
        contributors: w.contributors,
        challenges: w.challenges,
    }
}

pub fn map_activity_item(w: WireActivityItem) -> ActivityItem {
    let occurred_at = parse_timestamp(&w.occurred_at);
    let (kind, detail) = match w.action.as_str() {
        "submission" => (
            ActivityKind::Submission,
            w.challenge.unwrap_or_default(),
        ),
        _ => (ActivityKind::Commit, w.message.unwrap_or_default()),
    };
    ActivityItem {
        team: w.team,
        kind,
        detail,
        occurred_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_timestamps_parse_rfc3339() {
        let wire = WireTeam {
            id: 7,
            name: "ByteBusters".into(),
            leader: "octocat".into(),
            created_at: Some("2026-08-01T09:30:00Z".into()),
            updated_at: Some("not-a-date".into()),
            ..Default::default()
        };
        let team = map_team(wire);
        assert_eq!(team.id, 7);
        assert!(team.created_at.is_some());
        assert!(team.updated_at.is_none());
    }

    #[test]
    fn unknown_difficulty_falls_back_to_medium() {
        let wire = WireChallenge {
            id: 1,
            title: "RESTful API".into(),
            difficulty: "impossible".into(),
            ..Default::default()
        };
        assert_eq!(map_challenge(wire).difficulty, Difficulty::Medium);
    }

    #[test]
    fn submission_activity_uses_challenge_title() {
        let wire = WireActivityItem {
            team: "CodeCrafters".into(),
            action: "submission".into(),
            message: None,
            challenge: Some("HTML5 Game".into()),
            occurred_at: None,
        };
        let item = map_activity_item(wire);
        assert_eq!(item.kind, ActivityKind::Submission);
        assert_eq!(item.detail, "HTML5 Game");
    }

    #[test]
    fn commit_activity_uses_message() {
        let wire = WireActivityItem {
            team: "DevDynamos".into(),
            action: "commit".into(),
            message: Some("Fix auth bug".into()),
            challenge: None,
            occurred_at: None,
        };
        let item = map_activity_item(wire);
        assert_eq!(item.kind, ActivityKind::Commit);
        assert_eq!(item.detail, "Fix auth bug");
    }
}
