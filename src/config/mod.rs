pub mod project;

pub use project::{Project, CONFIG_FILE};
