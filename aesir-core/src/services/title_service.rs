use std::sync::Arc;
use tracing::info;

use aesir_common::models::Title;
use crate::config::ConfigHandle;
use crate::services::message_sender::MessageSender;

/// Shows full-screen titles to every connected player, using the fade
/// timings from the current config.
pub struct TitleService {
    config: ConfigHandle,
    sender: Arc<MessageSender>,
}

impl TitleService {
    pub fn new(config: ConfigHandle, sender: Arc<MessageSender>) -> Self {
        Self { config, sender }
    }

    /// `TitleMainMessage` over `TitleMessage`.
    pub fn show_configured_title(&self) -> Title {
        let snapshot = self.config.load_full();
        let title = self.sender.show_title(
            &snapshot.title_main_message,
            &snapshot.title_message,
            snapshot.title_times(),
        );
        info!("Title message sent: {}", snapshot.title_message);
        title
    }

    /// `CustomTitleMainMessage` over freeform text from the command line.
    pub fn show_custom_title(&self, subtitle: &str) -> Title {
        let snapshot = self.config.load_full();
        let title = self.sender.show_title(
            &snapshot.custom_title_main_message,
            subtitle,
            snapshot.title_times(),
        );
        info!("Custom title sent: {}", subtitle);
        title
    }
}
