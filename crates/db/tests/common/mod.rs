#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime, Weekday};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use tutorsync_core::models::{
    availability::AvailabilityEntry,
    lesson::{KnowledgeArea, LessonDuration, NewLessonRequest, Term, Venue},
    meeting::{MeetingStatus, NewMeeting},
    time::TimeOfDay,
    user::{NewUser, Role, User},
};
use tutorsync_db::Store;
use uuid::Uuid;

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn new_user(role: Role) -> NewUser {
    let handle: String = Uuid::new_v4().simple().to_string()[..12].to_string();
    NewUser {
        username: format!("@{handle}"),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        email: format!("{handle}.{}", SafeEmail().fake::<String>()),
        role,
    }
}

pub async fn user(store: &dyn Store, role: Role) -> User {
    store.create_user(new_user(role)).await.unwrap()
}

pub fn lesson(start: Option<NaiveTime>, duration: Option<LessonDuration>) -> NewLessonRequest {
    NewLessonRequest {
        knowledge_area: KnowledgeArea::Ruby,
        term: Term::SeptDec,
        start_time: start,
        duration,
        days: vec![Weekday::Mon, Weekday::Thu],
        venue_preference: Venue::Online,
        notes: None,
    }
}

pub fn meeting(tutor_id: Uuid, student_id: Uuid, date: NaiveDate, start: NaiveTime) -> NewMeeting {
    NewMeeting {
        tutor_id,
        student_id,
        date,
        day: chrono::Datelike::weekday(&date),
        start_time: start,
        end_time: start + chrono::Duration::hours(1),
        time_of_day: TimeOfDay::classify(start).unwrap_or(TimeOfDay::Morning),
        topic: "Ruby on Rails".to_string(),
        status: MeetingStatus::Scheduled,
        notes: String::new(),
    }
}

pub fn window(day: Weekday, start: NaiveTime, end: NaiveTime) -> AvailabilityEntry {
    AvailabilityEntry {
        day,
        start_time: start,
        end_time: end,
    }
}
