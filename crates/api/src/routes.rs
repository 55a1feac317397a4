pub mod dashboard;
pub mod health;
pub mod lesson;
pub mod schedule;
pub mod tutor;
pub mod tutors;
