use chrono::{Duration, NaiveDate, NaiveTime};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One gym visit. Created open on check-in, closed exactly once on check-out.
/// Durations are same-day wall clock; overnight sessions are not supported.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AttendanceSession {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub member_id: ObjectId,
    pub date: NaiveDate,
    pub time_in: NaiveTime,
    #[serde(default)]
    pub time_out: Option<NaiveTime>,
}

impl AttendanceSession {
    pub fn open(member_id: ObjectId, date: NaiveDate, time_in: NaiveTime) -> AttendanceSession {
        AttendanceSession {
            id: ObjectId::new(),
            member_id,
            date,
            time_in,
            time_out: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.time_out.is_none()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.time_out.map(|time_out| time_out - self.time_in)
    }

    pub fn duration_label(&self) -> String {
        match self.duration() {
            Some(duration) => {
                format!("{}h {}m", duration.num_hours(), duration.num_minutes() % 60)
            }
            None => "In Progress".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(time_in: (u32, u32, u32), time_out: Option<(u32, u32, u32)>) -> AttendanceSession {
        let (h, m, s) = time_in;
        let mut session = AttendanceSession::open(
            ObjectId::new(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveTime::from_hms_opt(h, m, s).unwrap(),
        );
        session.time_out =
            time_out.map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap());
        session
    }

    #[test]
    fn test_open_session_has_no_duration() {
        let session = session((9, 0, 0), None);
        assert!(session.is_open());
        assert_eq!(session.duration(), None);
        assert_eq!(session.duration_label(), "In Progress");
    }

    #[test]
    fn test_closed_session_duration() {
        let session = session((9, 0, 0), Some((11, 30, 0)));
        assert!(!session.is_open());
        assert_eq!(session.duration(), Some(Duration::minutes(150)));
        assert_eq!(session.duration_label(), "2h 30m");
    }

    #[test]
    fn test_short_session_label() {
        assert_eq!(session((9, 0, 0), Some((9, 0, 30))).duration_label(), "0h 0m");
        assert_eq!(session((9, 0, 0), Some((9, 59, 59))).duration_label(), "0h 59m");
    }
}
