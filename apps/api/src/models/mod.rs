pub mod application;
pub mod interview;
pub mod job_post;
pub mod organization;
pub mod profile;
