//! Pipeline module - loading, cleaning and analysis stages

pub mod association;
pub mod cleaner;
pub mod correlation;
pub mod loader;
pub mod missing;
pub mod schema;
pub mod summary;
pub mod target;
pub mod values;

pub use association::*;
pub use cleaner::*;
pub use correlation::*;
pub use loader::*;
pub use missing::*;
pub use schema::*;
pub use summary::*;
pub use target::*;
