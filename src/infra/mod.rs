pub mod git;
pub mod llm;
pub mod settings;
pub mod terminal;
