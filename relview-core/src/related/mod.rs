pub mod resolver;
pub mod search;

pub use resolver::{resolve, ResolveError};
pub use search::{FileSearch, GlobSearch};
