pub mod agent;
pub mod command;
pub mod error;
pub mod frontmatter;
pub mod hook;
pub mod io;
pub mod mcp;
pub mod parsed;
pub mod paths;
pub mod project;
pub mod scope;
pub mod user;
pub mod writer;

pub use error::{CcmError, Result};
pub use parsed::{ParseWarning, Parsed};
pub use scope::Scope;
