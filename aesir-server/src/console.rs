// aesir-server/src/console.rs
//
// Host-side capabilities for running the plugin from a terminal: deliveries
// to "all players" are logged, and permissions come from the operator list.

use std::collections::HashSet;
use tracing::info;

use aesir_common::models::{CommandSource, Component, Title};
use aesir_common::traits::{PermissionCheck, PlayerSink};

pub struct ConsoleSink;

impl PlayerSink for ConsoleSink {
    fn send_to_all(&self, component: &Component) {
        match component.click_url() {
            Some(url) => info!(target: "aesir::chat", "{} [{}]", component.text, url),
            None => info!(target: "aesir::chat", "{}", component.text),
        }
    }

    fn show_title_to_all(&self, title: &Title) {
        info!(
            target: "aesir::title",
            "{} / {} (in {:?}, stay {:?}, out {:?})",
            title.title.text,
            title.subtitle.text,
            title.times.fade_in,
            title.times.stay,
            title.times.fade_out
        );
    }
}

/// Operators hold every permission; other players hold none.
pub struct OperatorPermissions {
    operators: HashSet<String>,
}

impl OperatorPermissions {
    pub fn new(operators: impl IntoIterator<Item = String>) -> Self {
        Self {
            operators: operators.into_iter().map(|o| o.to_lowercase()).collect(),
        }
    }
}

impl PermissionCheck for OperatorPermissions {
    fn has_permission(&self, source: &CommandSource, _permission: &str) -> bool {
        match source {
            CommandSource::Console => true,
            CommandSource::Player { name } => self.operators.contains(&name.to_lowercase()),
        }
    }
}

/// One parsed console line.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleLine {
    Execute { source: CommandSource, args: Vec<String> },
    Suggest { args: Vec<String> },
    Quit,
    Empty,
}

/// Accepts `ab <args>`, `/ab <args>`, `aesirbroadcast <args>` or bare
/// `<args>`, optionally prefixed with `as <player>`.
pub fn parse_line(line: &str) -> ConsoleLine {
    let mut words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if words.is_empty() {
        return ConsoleLine::Empty;
    }
    match words[0].to_lowercase().as_str() {
        "quit" | "exit" | "stop" => return ConsoleLine::Quit,
        "suggest" => {
            words.remove(0);
            // a trailing space means the user wants the next word completed
            if line.ends_with(' ') {
                words.push(String::new());
            }
            return ConsoleLine::Suggest { args: strip_command_name(words) };
        }
        _ => {}
    }

    let mut source = CommandSource::Console;
    if words.len() >= 2 && words[0].eq_ignore_ascii_case("as") {
        source = CommandSource::player(words[1].clone());
        words.drain(..2);
    }
    ConsoleLine::Execute { source, args: strip_command_name(words) }
}

fn strip_command_name(mut words: Vec<String>) -> Vec<String> {
    if let Some(first) = words.first() {
        let name = first.trim_start_matches('/').to_lowercase();
        if name == aesir_core::services::command_service::COMMAND_NAME
            || aesir_core::services::command_service::COMMAND_ALIASES.contains(&name.as_str())
        {
            words.remove(0);
        }
    }
    words
}
