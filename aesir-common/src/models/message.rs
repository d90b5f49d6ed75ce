use std::time::Duration;

/// What happens when a player clicks a chat component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    OpenUrl(String),
}

/// A rendered piece of chat text, ready to hand to the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Component {
    pub text: String,
    pub hover: Option<Box<Component>>,
    pub click: Option<ClickAction>,
}

impl Component {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hover: None,
            click: None,
        }
    }

    pub fn with_hover(mut self, hover: Component) -> Self {
        self.hover = Some(Box::new(hover));
        self
    }

    pub fn with_click(mut self, click: ClickAction) -> Self {
        self.click = Some(click);
        self
    }

    /// URL opened on click, if any.
    pub fn click_url(&self) -> Option<&str> {
        match &self.click {
            Some(ClickAction::OpenUrl(url)) => Some(url.as_str()),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTimes {
    pub fade_in: Duration,
    pub stay: Duration,
    pub fade_out: Duration,
}

/// A full-screen title with a subtitle underneath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub title: Component,
    pub subtitle: Component,
    pub times: TitleTimes,
}
