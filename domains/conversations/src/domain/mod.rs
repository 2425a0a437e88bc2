pub mod entities;
pub mod prompt;
