use std::sync::Arc;

use crate::services::{Interaction, LanguageModelService, SettingsStore, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub version_control: Arc<dyn VersionControlService>,
    pub language_model: Arc<dyn LanguageModelService>,
    pub interaction: Arc<dyn Interaction>,
    pub settings: Arc<dyn SettingsStore>,
}

impl AppContext {
    pub fn new(
        version_control: Arc<dyn VersionControlService>,
        language_model: Arc<dyn LanguageModelService>,
        interaction: Arc<dyn Interaction>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            version_control,
            language_model,
            interaction,
            settings,
        }
    }
}
