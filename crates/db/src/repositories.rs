pub mod availability;
pub mod lesson;
pub mod meeting;
pub mod profile;
pub mod user;
