pub mod availability;
pub mod dashboard;
pub mod lesson;
pub mod meeting;
pub mod profile;
pub mod schedule;
pub mod tutors;
