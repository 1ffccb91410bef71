pub mod api;
pub mod cli;
pub mod report;
pub mod submit;
