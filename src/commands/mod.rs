pub mod inspect;
pub mod run;

// Re-export command functions for convenience
pub use inspect::{extract, links, stats};
pub use run::run;
