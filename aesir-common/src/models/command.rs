/// Who issued a command.
///
/// The proxy console is always trusted; players go through the
/// permission check before anything runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    Console,
    Player { name: String },
}

impl CommandSource {
    pub fn player(name: impl Into<String>) -> Self {
        CommandSource::Player { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            CommandSource::Console => "CONSOLE",
            CommandSource::Player { name } => name,
        }
    }
}

/// Lines to send back to whoever ran the command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResponse {
    pub texts: Vec<String>,
}

impl CommandResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self { texts: vec![text.into()] }
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
