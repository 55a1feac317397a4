//! In-memory [`Store`] for tests and local runs without PostgreSQL.
//!
//! It enforces the same constraints as the schema: unique usernames, emails
//! and availability windows, required lesson durations, participant
//! references, and the atomicity of availability replacement and meeting
//! scheduling.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{Datelike, NaiveTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tutorsync_core::errors::{TutorError, TutorResult};
use tutorsync_core::models::{
    availability::{window_order, AvailabilityEntry, AvailabilityWindow},
    lesson::{resolve_times, LessonDuration, LessonRequest, NewLessonRequest},
    meeting::{Meeting, MeetingDetail, NewMeeting},
    profile::TutorProfile,
    user::{NewUser, Role, User},
};
use uuid::Uuid;

use crate::store::Store;

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    lesson_requests: Vec<LessonRequest>,
    meetings: Vec<Meeting>,
    availability: Vec<AvailabilityWindow>,
    profiles: HashMap<Uuid, TutorProfile>,
}

impl State {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn require_user(&self, id: Uuid, column: &str) -> TutorResult<&User> {
        self.user(id).ok_or_else(|| {
            TutorError::Integrity(format!("{column} {id} does not reference an existing user"))
        })
    }

    fn detail(&self, meeting: &Meeting) -> MeetingDetail {
        let name = |id| self.user(id).map(User::full_name).unwrap_or_default();
        MeetingDetail {
            meeting: meeting.clone(),
            tutor_name: name(meeting.tutor_id),
            student_name: name(meeting.student_id),
        }
    }

    fn profile(&mut self, tutor_id: Uuid) -> TutorResult<&mut TutorProfile> {
        self.require_user(tutor_id, "tutor_id")?;
        Ok(self
            .profiles
            .entry(tutor_id)
            .or_insert_with(|| TutorProfile::empty(tutor_id)))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_details(state: &State, mut meetings: Vec<&Meeting>) -> Vec<MeetingDetail> {
    meetings.sort_by_key(|m| (m.date, m.start_time));
    meetings.into_iter().map(|m| state.detail(m)).collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> TutorResult<User> {
        new_user.validate()?;
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.username == new_user.username) {
            return Err(TutorError::Integrity(format!(
                "username {} already exists",
                new_user.username
            )));
        }
        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(TutorError::Integrity(format!(
                "email {} already exists",
                new_user.email
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            role: new_user.role,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> TutorResult<Option<User>> {
        Ok(self.state.lock().await.user(id).cloned())
    }

    async fn list_users_by_role(&self, role: Role) -> TutorResult<Vec<User>> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state.users.iter().filter(|u| u.is(role)).cloned().collect();
        users.sort_by(|a, b| {
            (&a.last_name, &a.first_name, &a.username).cmp(&(&b.last_name, &b.first_name, &b.username))
        });
        Ok(users)
    }

    async fn create_lesson_request(
        &self,
        student_id: Uuid,
        request: NewLessonRequest,
    ) -> TutorResult<LessonRequest> {
        let mut state = self.state.lock().await;
        state.require_user(student_id, "student_id")?;
        let duration = request.duration.ok_or_else(|| {
            TutorError::Integrity("null value in column \"duration\" violates not-null constraint".to_string())
        })?;
        if request.days.is_empty() {
            return Err(TutorError::Integrity("lesson request needs at least one day".to_string()));
        }

        let resolved = resolve_times(request.start_time, duration);
        let lesson = LessonRequest {
            id: Uuid::new_v4(),
            student_id,
            knowledge_area: request.knowledge_area,
            term: request.term,
            start_time: request.start_time,
            duration,
            end_time: resolved.end_time,
            time_of_day: resolved.time_of_day,
            days: request.days,
            venue_preference: request.venue_preference,
            approved: false,
            notes: request.notes,
            created_at: Utc::now(),
        };
        state.lesson_requests.push(lesson.clone());
        Ok(lesson)
    }

    async fn get_lesson_request(&self, id: Uuid) -> TutorResult<Option<LessonRequest>> {
        let state = self.state.lock().await;
        Ok(state.lesson_requests.iter().find(|r| r.id == id).cloned())
    }

    async fn update_lesson_times(
        &self,
        id: Uuid,
        start_time: Option<NaiveTime>,
        duration: LessonDuration,
    ) -> TutorResult<LessonRequest> {
        let mut state = self.state.lock().await;
        let request = state
            .lesson_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| TutorError::NotFound(format!("Lesson request {id} not found")))?;
        request.start_time = start_time;
        request.duration = duration;
        request.recompute();
        Ok(request.clone())
    }

    async fn lesson_requests_for_student(&self, student_id: Uuid) -> TutorResult<Vec<LessonRequest>> {
        let state = self.state.lock().await;
        let mut requests: Vec<LessonRequest> = state
            .lesson_requests
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| (r.created_at, r.id));
        Ok(requests)
    }

    async fn all_lesson_requests(&self) -> TutorResult<Vec<LessonRequest>> {
        let state = self.state.lock().await;
        let mut requests = state.lesson_requests.clone();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(requests)
    }

    async fn schedule_meeting(
        &self,
        new_meeting: NewMeeting,
        retire_request: Option<Uuid>,
    ) -> TutorResult<Meeting> {
        let mut state = self.state.lock().await;
        state.require_user(new_meeting.tutor_id, "tutor_id")?;
        state.require_user(new_meeting.student_id, "student_id")?;

        let now = Utc::now();
        let meeting = Meeting {
            id: Uuid::new_v4(),
            tutor_id: new_meeting.tutor_id,
            student_id: new_meeting.student_id,
            date: new_meeting.date,
            day: new_meeting.day,
            start_time: new_meeting.start_time,
            end_time: new_meeting.end_time,
            time_of_day: new_meeting.time_of_day,
            topic: new_meeting.topic,
            status: new_meeting.status,
            notes: new_meeting.notes,
            created_at: now,
            updated_at: now,
        };
        state.meetings.push(meeting.clone());
        if let Some(request_id) = retire_request {
            state.lesson_requests.retain(|r| r.id != request_id);
        }
        Ok(meeting)
    }

    async fn get_meeting(&self, id: Uuid) -> TutorResult<Option<Meeting>> {
        let state = self.state.lock().await;
        Ok(state.meetings.iter().find(|m| m.id == id).cloned())
    }

    async fn update_meeting_notes(&self, id: Uuid, notes: String) -> TutorResult<Meeting> {
        let mut state = self.state.lock().await;
        let meeting = state
            .meetings
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| TutorError::NotFound(format!("Meeting {id} not found")))?;
        meeting.notes = notes;
        meeting.updated_at = Utc::now();
        Ok(meeting.clone())
    }

    async fn meetings_for_tutor_month(
        &self,
        tutor_id: Uuid,
        year: i32,
        month: u32,
    ) -> TutorResult<Vec<MeetingDetail>> {
        let state = self.state.lock().await;
        let meetings = state
            .meetings
            .iter()
            .filter(|m| m.tutor_id == tutor_id && m.date.year() == year && m.date.month() == month)
            .collect();
        Ok(sorted_details(&state, meetings))
    }

    async fn meetings_for_user(&self, user_id: Uuid, role: Role) -> TutorResult<Vec<MeetingDetail>> {
        let state = self.state.lock().await;
        let meetings = state
            .meetings
            .iter()
            .filter(|m| match role {
                Role::Student => m.student_id == user_id,
                Role::Tutor => m.tutor_id == user_id,
                Role::Admin => true,
            })
            .collect();
        Ok(sorted_details(&state, meetings))
    }

    async fn replace_availability(
        &self,
        tutor_id: Uuid,
        entries: Vec<AvailabilityEntry>,
    ) -> TutorResult<Vec<AvailabilityWindow>> {
        let mut state = self.state.lock().await;
        state.require_user(tutor_id, "tutor_id")?;

        let mut seen = HashSet::new();
        let mut windows = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.end_time <= entry.start_time {
                return Err(TutorError::Integrity(format!(
                    "availability window on {} ends before it starts",
                    entry.day
                )));
            }
            if !seen.insert((entry.day, entry.start_time, entry.end_time)) {
                return Err(TutorError::Integrity(format!(
                    "duplicate availability window on {} {}-{}",
                    entry.day, entry.start_time, entry.end_time
                )));
            }
            windows.push(AvailabilityWindow {
                id: Uuid::new_v4(),
                tutor_id,
                day: entry.day,
                start_time: entry.start_time,
                end_time: entry.end_time,
                is_available: true,
            });
        }

        state.availability.retain(|w| w.tutor_id != tutor_id);
        state.availability.extend(windows);

        let mut current: Vec<AvailabilityWindow> = state
            .availability
            .iter()
            .filter(|w| w.tutor_id == tutor_id)
            .cloned()
            .collect();
        current.sort_by_key(window_order);
        Ok(current)
    }

    async fn list_availability(&self, tutor_id: Uuid) -> TutorResult<Vec<AvailabilityWindow>> {
        let state = self.state.lock().await;
        let mut windows: Vec<AvailabilityWindow> = state
            .availability
            .iter()
            .filter(|w| w.tutor_id == tutor_id)
            .cloned()
            .collect();
        windows.sort_by_key(window_order);
        Ok(windows)
    }

    async fn get_or_create_profile(&self, tutor_id: Uuid) -> TutorResult<TutorProfile> {
        let mut state = self.state.lock().await;
        Ok(state.profile(tutor_id)?.clone())
    }

    async fn find_profile(&self, tutor_id: Uuid) -> TutorResult<Option<TutorProfile>> {
        let state = self.state.lock().await;
        Ok(state.profiles.get(&tutor_id).cloned())
    }

    async fn set_hourly_rate(&self, tutor_id: Uuid, rate: Decimal) -> TutorResult<TutorProfile> {
        if rate.is_sign_negative() && !rate.is_zero() {
            return Err(TutorError::Integrity("hourly_rate must be non-negative".to_string()));
        }
        let mut state = self.state.lock().await;
        let profile = state.profile(tutor_id)?;
        profile.hourly_rate = Some(rate);
        Ok(profile.clone())
    }

    async fn set_subjects(&self, tutor_id: Uuid, subjects: Vec<String>) -> TutorResult<TutorProfile> {
        let mut state = self.state.lock().await;
        let profile = state.profile(tutor_id)?;
        profile.subjects = subjects;
        Ok(profile.clone())
    }

    async fn add_custom_subject(&self, tutor_id: Uuid, subject: String) -> TutorResult<TutorProfile> {
        let mut state = self.state.lock().await;
        let profile = state.profile(tutor_id)?;
        profile.subjects.push(subject);
        Ok(profile.clone())
    }
}
