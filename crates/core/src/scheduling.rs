//! # Scheduling
//!
//! Rules the admin scheduling workflow applies around the form itself: which
//! pending request to convert, which window to pre-fill, and the validator
//! hook run on a submitted meeting.
//!
//! No overlap or availability-containment check is performed. A meeting may
//! double-book a tutor or fall outside their declared windows;
//! [`MeetingValidator`] is where such a rule would plug in.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::FieldErrors;
use crate::models::lesson::LessonRequest;
use crate::models::meeting::NewMeeting;

/// Start of the window offered when the student has no usable request.
pub fn fallback_start() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub const FALLBACK_MINUTES: i64 = 30;

/// Initial start/end shown on the scheduling form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl SessionWindow {
    /// The request's stored window when it has one, else 10:00–10:30.
    pub fn prefill(request: Option<&LessonRequest>) -> Self {
        match request.and_then(|r| r.start_time.zip(r.end_time)) {
            Some((start_time, end_time)) => Self { start_time, end_time },
            None => {
                let start_time = fallback_start();
                Self {
                    start_time,
                    end_time: start_time + Duration::minutes(FALLBACK_MINUTES),
                }
            }
        }
    }
}

/// Picks the request to convert when a student has several: the earliest
/// created, ties broken by id.
pub fn pick_pending(requests: &[LessonRequest]) -> Option<&LessonRequest> {
    requests.iter().min_by_key(|r| (r.created_at, r.id))
}

/// Extra checks on a meeting after its form validated.
pub trait MeetingValidator: Send + Sync {
    fn check(&self, meeting: &NewMeeting) -> Result<(), FieldErrors>;
}

/// Accepts every meeting.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl MeetingValidator for AcceptAll {
    fn check(&self, _meeting: &NewMeeting) -> Result<(), FieldErrors> {
        Ok(())
    }
}
