//! Annexes: the per-owner document library and the ordered assignment of annexes to
//! resumes.

pub mod assignment;
pub mod handlers;
pub mod library;

pub use assignment::AnnexeAssignmentService;
pub use library::AnnexeLibrary;
