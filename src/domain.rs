pub mod autosave;
pub mod entities;
pub mod registry;
pub mod use_cases;
