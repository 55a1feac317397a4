//! # TutorSync Core
//!
//! Domain types and pure scheduling logic for the tutoring service: users and
//! roles, lesson requests and their derived times, meetings, tutor
//! availability and profiles, the monthly calendar grid, and the scheduling
//! pre-fill rules. Nothing in this crate performs I/O; persistence lives in
//! `tutorsync-db` and the HTTP surface in `tutorsync-api`.

pub mod calendar;
pub mod clock;
pub mod errors;
pub mod models;
pub mod scheduling;
