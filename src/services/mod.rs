//! Service layer
//!
//! Infrastructure concerns kept apart from the stage logic.

pub mod io;

pub use io::ImageIOService;
