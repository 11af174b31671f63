use chrono::{DateTime, Duration, Utc};
use log::LevelFilter;

/// Hackathon length used when no deadline is configured — three days,
/// the event's standard duration.
const DEFAULT_DEADLINE_HOURS: i64 = 72;

#[derive(Debug, Clone)]
pub struct AppSettings {
    /// GitHub login of the current user; team lookup keys on it. The
    /// OAuth flow itself lives outside this client.
    pub github_login: String,
    /// Submission deadline the countdown targets. Immutable for the
    /// life of the process.
    pub deadline: DateTime<Utc>,
    pub log_level: Option<LevelFilter>,
}

impl AppSettings {
    pub fn load() -> Self {
        let github_login = std::env::var("HACKDASH_GITHUB_LOGIN")
            .ok()
            .or_else(|| std::env::var("USER").ok())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| "hacker".to_string());

        let deadline = parse_deadline(std::env::var("HACKDASH_DEADLINE").ok().as_deref(), Utc::now());

        Self {
            github_login,
            deadline,
            log_level: None,
        }
    }
}

/// RFC 3339 deadline from the environment, else now + 72h.
fn parse_deadline(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| now + Duration::hours(DEFAULT_DEADLINE_HOURS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn explicit_deadline_is_parsed() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let deadline = parse_deadline(Some("2026-09-15T18:00:00Z"), now);
        assert_eq!(deadline, Utc.with_ymd_and_hms(2026, 9, 15, 18, 0, 0).unwrap());
    }

    #[test]
    fn missing_or_invalid_deadline_defaults_to_72h() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let expected = now + Duration::hours(72);
        assert_eq!(parse_deadline(None, now), expected);
        assert_eq!(parse_deadline(Some("next tuesday"), now), expected);
    }
}
