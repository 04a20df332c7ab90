pub mod annexe;
pub mod resume;
