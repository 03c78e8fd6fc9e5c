use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InterviewType {
    Technical,
    Behavioral,
    #[serde(rename = "System Design")]
    SystemDesign,
}

impl InterviewType {
    pub const ALL: [InterviewType; 3] = [
        InterviewType::Technical,
        InterviewType::Behavioral,
        InterviewType::SystemDesign,
    ];

    /// Label used both on the wire and in the UI
    pub fn label(&self) -> &'static str {
        match self {
            InterviewType::Technical => "Technical",
            InterviewType::Behavioral => "Behavioral",
            InterviewType::SystemDesign => "System Design",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            InterviewType::Technical => "\u{1F3AF}",
            InterviewType::Behavioral => "\u{1F464}",
            InterviewType::SystemDesign => "\u{1F4C8}",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown interview type: {0}")]
pub struct UnknownInterviewType(pub String);

impl FromStr for InterviewType {
    type Err = UnknownInterviewType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Technical" => Ok(InterviewType::Technical),
            "Behavioral" => Ok(InterviewType::Behavioral),
            "System Design" => Ok(InterviewType::SystemDesign),
            other => Err(UnknownInterviewType(other.to_string())),
        }
    }
}

impl TryFrom<String> for InterviewType {
    type Error = UnknownInterviewType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A completed mock interview. Written by the interview engine, never by this crate.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub company: String,
    #[sqlx(try_from = "String")]
    pub interview_type: InterviewType,
    pub duration: i32, // in minutes, always > 0
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct CodingSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform_name: String,
    pub platform_url: String,
    pub created_at: DateTime<Utc>,
}

/// Renders a timestamp the way the history list shows it, e.g. `January 5, 2025 at 09:30 AM`.
pub fn format_session_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%B %-d, %Y at %I:%M %p")
        .to_string()
}
