use std::sync::Arc;
use tracing::debug;

use aesir_common::models::{ClickAction, ConfigSnapshot, Title, TitleTimes};
use aesir_common::traits::{PlayerSink, TextRenderer};

/// Renders templates and hands the results to every connected player.
///
/// Both the live announcement and the regular broadcast go through
/// [`MessageSender::broadcast_messages`]; they only differ in the URL a
/// click opens.
pub struct MessageSender {
    renderer: Arc<dyn TextRenderer>,
    sink: Arc<dyn PlayerSink>,
}

impl MessageSender {
    pub fn new(renderer: Arc<dyn TextRenderer>, sink: Arc<dyn PlayerSink>) -> Self {
        Self { renderer, sink }
    }

    /// Sends every configured broadcast line, each with the configured hover
    /// text and a click that opens `click_url`. Returns how many lines went out.
    pub fn broadcast_messages(&self, snapshot: &ConfigSnapshot, click_url: &str) -> usize {
        let hover = self.renderer.render(&snapshot.hover_message);
        for template in &snapshot.broadcast_messages {
            let component = self
                .renderer
                .render(template)
                .with_hover(hover.clone())
                .with_click(ClickAction::OpenUrl(click_url.to_string()));
            self.sink.send_to_all(&component);
        }
        debug!(
            "Sent {} broadcast line(s) linking to {}",
            snapshot.broadcast_messages.len(),
            click_url
        );
        snapshot.broadcast_messages.len()
    }

    pub fn show_title(&self, title_template: &str, subtitle_template: &str, times: TitleTimes) -> Title {
        let title = Title {
            title: self.renderer.render(title_template),
            subtitle: self.renderer.render(subtitle_template),
            times,
        };
        self.sink.show_title_to_all(&title);
        title
    }
}
