pub mod types;
pub mod source;
pub mod cache;
pub mod resolver;

pub use types::*;
pub use source::{BlameRetriever, BlameSource, CachedSource, RetrieveError};
pub use cache::{BlameCache, SourceFactory};
pub use resolver::LineResolver;
