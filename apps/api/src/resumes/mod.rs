//! Resume Access Service: owner CRUD, clone, slugs and public visibility.

pub mod handlers;
pub mod patch;
pub mod service;

pub use service::ResumeService;
