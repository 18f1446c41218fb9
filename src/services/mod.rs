pub mod interaction;
pub mod language_model;
pub mod settings;
pub mod version_control;

pub use interaction::{Interaction, NoticeLevel};
pub use language_model::LanguageModelService;
pub use settings::SettingsStore;
pub use version_control::{DiffTarget, VersionControlService};
