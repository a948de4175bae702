use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{errors::AppError, utils::markdown::strip_all_tags};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    #[display("attending")]
    Attending,
    #[display("not_attending")]
    NotAttending,
    #[display("maybe")]
    Maybe,
}

impl FromStr for Attendance {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "attending" => Ok(Attendance::Attending),
            "not_attending" => Ok(Attendance::NotAttending),
            "maybe" => Ok(Attendance::Maybe),
            other => Err(format!("Unknown attendance '{}'", other)),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct RsvpRow {
    pub id: Uuid,
    pub client_slug: String,
    pub name: String,
    pub attendance: String,
    pub guest_count: i32,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: Uuid,
    pub client_slug: String,
    pub name: String,
    pub attendance: Attendance,
    pub guest_count: i32,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RsvpRow> for Rsvp {
    type Error = AppError;

    fn try_from(row: RsvpRow) -> Result<Self, Self::Error> {
        let attendance = row
            .attendance
            .parse()
            .map_err(|e: String| AppError::InternalError(format!("Stored RSVP row is corrupt: {}", e)))?;
        Ok(Rsvp {
            id: row.id,
            client_slug: row.client_slug,
            name: row.name,
            attendance,
            guest_count: row.guest_count,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRsvpRequest {
    #[validate(length(min = 1, max = 100, message = "Client slug is required"))]
    pub client_slug: String,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    pub attendance: Attendance,

    #[serde(default = "default_guest_count")]
    #[validate(range(min = 1, max = 10, message = "Guest count must be between 1 and 10"))]
    pub guest_count: i32,

    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

fn default_guest_count() -> i32 {
    1
}

impl NewRsvpRequest {
    pub fn into_rsvp(self, now: DateTime<Utc>) -> Option<Rsvp> {
        let name = strip_all_tags(&self.name);
        if name.is_empty() {
            return None;
        }
        let message = self
            .message
            .map(|m| strip_all_tags(&m))
            .filter(|m| !m.is_empty());
        Some(Rsvp {
            id: Uuid::new_v4(),
            client_slug: self.client_slug,
            name,
            attendance: self.attendance,
            guest_count: self.guest_count,
            message,
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSummary {
    pub total_responses: usize,
    pub attending: usize,
    pub not_attending: usize,
    pub maybe: usize,
    /// Sum of guest counts for those attending.
    pub expected_guests: i64,
}

impl RsvpSummary {
    pub fn from_rsvps(rsvps: &[Rsvp]) -> Self {
        rsvps.iter().fold(RsvpSummary::default(), |mut summary, rsvp| {
            summary.total_responses += 1;
            match rsvp.attendance {
                Attendance::Attending => {
                    summary.attending += 1;
                    summary.expected_guests += i64::from(rsvp.guest_count);
                }
                Attendance::NotAttending => summary.not_attending += 1,
                Attendance::Maybe => summary.maybe += 1,
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsvp(attendance: Attendance, guests: i32) -> Rsvp {
        NewRsvpRequest {
            client_slug: "sari-budi".into(),
            name: "Tamu".into(),
            attendance,
            guest_count: guests,
            message: Some("   ".into()),
        }
        .into_rsvp(Utc::now())
        .unwrap()
    }

    #[test]
    fn summary_counts_attendance_and_guests() {
        let rsvps = vec![
            rsvp(Attendance::Attending, 2),
            rsvp(Attendance::Attending, 3),
            rsvp(Attendance::NotAttending, 1),
            rsvp(Attendance::Maybe, 4),
        ];
        let summary = RsvpSummary::from_rsvps(&rsvps);

        assert_eq!(summary.total_responses, 4);
        assert_eq!(summary.attending, 2);
        assert_eq!(summary.not_attending, 1);
        assert_eq!(summary.maybe, 1);
        assert_eq!(summary.expected_guests, 5);
    }

    #[test]
    fn blank_message_is_dropped() {
        assert_eq!(rsvp(Attendance::Maybe, 1).message, None);
    }

    #[test]
    fn attendance_wire_values() {
        let parsed: Attendance = serde_json::from_str("\"not_attending\"").unwrap();
        assert_eq!(parsed, Attendance::NotAttending);
        assert!(serde_json::from_str::<Attendance>("\"yes\"").is_err());
    }
}
