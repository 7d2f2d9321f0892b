// Skill self-assessment, learning links and the assessable skills catalogue.

pub mod handlers;
pub mod learning;
pub mod scoring;
pub mod store;
