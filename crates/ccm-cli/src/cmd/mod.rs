pub mod list;
pub mod projects;
pub mod serve;
