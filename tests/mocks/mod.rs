pub mod completion_model;
pub mod page_loader;
pub mod transcript_source;
