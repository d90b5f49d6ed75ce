// src/render.rs

use once_cell::sync::Lazy;
use regex::Regex;

use aesir_common::models::Component;
use aesir_common::traits::TextRenderer;

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[a-zA-Z_#][a-zA-Z0-9_:#.\-]*>").expect("static tag regex"));
static LEGACY_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[&§][0-9a-fk-orA-FK-OR]").expect("static legacy code regex"));

/// Renders templates as plain text.
///
/// Tag markup such as `<red>` and legacy `&a` colour codes are dropped.
/// Hosts that can show colours plug in their own [`TextRenderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    pub fn strip(template: &str) -> String {
        let without_tags = TAG_RE.replace_all(template, "");
        LEGACY_CODE_RE.replace_all(&without_tags, "").into_owned()
    }
}

impl TextRenderer for PlainTextRenderer {
    fn render(&self, template: &str) -> Component {
        Component::text(Self::strip(template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_codes() {
        assert_eq!(PlainTextRenderer::strip("<red>Announcement!</red>"), "Announcement!");
        assert_eq!(PlainTextRenderer::strip("&aAesirMC is now live!"), "AesirMC is now live!");
        assert_eq!(PlainTextRenderer::strip("<#ff0000>hex</#ff0000> &lbold"), "hex bold");
    }

    #[test]
    fn test_leaves_plain_text_alone() {
        assert_eq!(PlainTextRenderer::strip("a < b & c > d"), "a < b & c > d");
        let c = PlainTextRenderer.render("hello");
        assert_eq!(c, Component::text("hello"));
    }
}
