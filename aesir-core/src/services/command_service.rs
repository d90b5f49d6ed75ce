use std::sync::Arc;
use tracing::{debug, error};

use aesir_common::models::{CommandResponse, CommandSource};
use aesir_common::traits::{PermissionCheck, Scheduler};
use crate::config::{ConfigHandle, ConfigLoader};
use crate::services::broadcast_service::{BroadcastService, StartOutcome, StopOutcome};
use crate::services::title_service::TitleService;

/// Name the command is registered under with the proxy.
pub const COMMAND_NAME: &str = "ab";
pub const COMMAND_ALIASES: &[&str] = &["aesirbroadcast"];

pub const RELOAD_OK: &str = "Configuration reloaded successfully!";
pub const RELOAD_FELL_BACK: &str =
    "Configuration could not be read, defaults are active. See console for details.";
pub const NO_PERMISSION: &str = "You do not have permission to use this command!";
pub const USAGE: &str = "Usage: /ab <broadcast|title|reload>";
pub const UNKNOWN_USAGE: &str = "Unknown subcommand. Usage: /ab <broadcast|title|reload|ozeltitle>";
pub const OZELTITLE_USAGE: &str = "Usage: /ab ozeltitle <message>";
const OZELTITLE_PLACEHOLDER: &str = "<your_message_here>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Broadcast,
    BroadcastStart,
    BroadcastStop,
    Title,
    OzelTitle,
    Reload,
}

impl Subcommand {
    pub const ALL: [Subcommand; 6] = [
        Subcommand::Broadcast,
        Subcommand::BroadcastStart,
        Subcommand::BroadcastStop,
        Subcommand::Title,
        Subcommand::Reload,
        Subcommand::OzelTitle,
    ];

    pub fn parse(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "broadcast" => Some(Subcommand::Broadcast),
            "broadcaststart" => Some(Subcommand::BroadcastStart),
            "broadcaststop" => Some(Subcommand::BroadcastStop),
            "title" => Some(Subcommand::Title),
            "ozeltitle" => Some(Subcommand::OzelTitle),
            "reload" => Some(Subcommand::Reload),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Subcommand::Broadcast => "broadcast",
            Subcommand::BroadcastStart => "broadcaststart",
            Subcommand::BroadcastStop => "broadcaststop",
            Subcommand::Title => "title",
            Subcommand::OzelTitle => "ozeltitle",
            Subcommand::Reload => "reload",
        }
    }

    pub fn permission(&self) -> &'static str {
        match self {
            Subcommand::Broadcast => "aesirbroadcast.broadcast",
            Subcommand::BroadcastStart => "aesirbroadcast.broadcaststart",
            Subcommand::BroadcastStop => "aesirbroadcast.broadcaststop",
            Subcommand::Title => "aesirbroadcast.title",
            Subcommand::OzelTitle => "aesirbroadcast.ozeltitle",
            Subcommand::Reload => "aesirbroadcast.reload",
        }
    }
}

/// Dispatches `/ab <subcommand>` to the broadcast, title and reload logic.
pub struct CommandService {
    broadcast: Arc<BroadcastService>,
    titles: Arc<TitleService>,
    permissions: Arc<dyn PermissionCheck>,
    scheduler: Arc<dyn Scheduler>,
    loader: ConfigLoader,
    config: ConfigHandle,
}

impl CommandService {
    pub fn new(
        broadcast: Arc<BroadcastService>,
        titles: Arc<TitleService>,
        permissions: Arc<dyn PermissionCheck>,
        scheduler: Arc<dyn Scheduler>,
        loader: ConfigLoader,
        config: ConfigHandle,
    ) -> Self {
        debug!("Initializing CommandService");
        Self {
            broadcast,
            titles,
            permissions,
            scheduler,
            loader,
            config,
        }
    }

    /// Runs one invocation. `args` are the words after `/ab`.
    pub fn execute(&self, source: &CommandSource, args: &[String]) -> CommandResponse {
        let Some(first) = args.first() else {
            return CommandResponse::line(USAGE);
        };
        let Some(sub) = Subcommand::parse(first) else {
            debug!("Unknown subcommand '{}' from {}", first, source.name());
            return CommandResponse::line(UNKNOWN_USAGE);
        };

        // ozeltitle reports missing text before it checks permission
        if sub == Subcommand::OzelTitle && args.len() < 2 {
            return CommandResponse::line(OZELTITLE_USAGE);
        }
        if !self.permitted(source, sub) {
            debug!("{} lacks permission '{}'", source.name(), sub.permission());
            return CommandResponse::line(NO_PERMISSION);
        }

        match sub {
            Subcommand::Broadcast => {
                self.broadcast.broadcast_now();
                CommandResponse::empty()
            }
            Subcommand::BroadcastStart => match self.broadcast.start(self.scheduler.as_ref()) {
                Ok(StartOutcome::Started { interval_secs }) => {
                    CommandResponse::line(format!("Broadcast started every {} seconds.", interval_secs))
                }
                Ok(StartOutcome::AlreadyRunning) => CommandResponse::line("Broadcast is already running!"),
                Err(e) => {
                    error!("Failed to schedule broadcast: {}", e);
                    CommandResponse::line("Failed to start broadcast, see console for details.")
                }
            },
            Subcommand::BroadcastStop => match self.broadcast.stop() {
                StopOutcome::Stopped => CommandResponse::line("Broadcast stopped."),
                StopOutcome::NotRunning => CommandResponse::line("No active broadcast to stop!"),
            },
            Subcommand::Title => {
                self.titles.show_configured_title();
                CommandResponse::empty()
            }
            Subcommand::OzelTitle => {
                let subtitle = args[1..].join(" ");
                self.titles.show_custom_title(&subtitle);
                CommandResponse::empty()
            }
            Subcommand::Reload => {
                if self.loader.reload(&self.config).fell_back() {
                    CommandResponse::line(RELOAD_FELL_BACK)
                } else {
                    CommandResponse::line(RELOAD_OK)
                }
            }
        }
    }

    /// Tab-completion for the words typed so far.
    pub fn suggest(&self, args: &[String]) -> Vec<String> {
        match args {
            [] => Subcommand::ALL.iter().map(|s| s.token().to_string()).collect(),
            [partial] => {
                let partial = partial.to_lowercase();
                Subcommand::ALL
                    .iter()
                    .map(|s| s.token())
                    .filter(|t| t.starts_with(&partial))
                    .map(str::to_string)
                    .collect()
            }
            [first, _] if Subcommand::parse(first) == Some(Subcommand::OzelTitle) => {
                vec![OZELTITLE_PLACEHOLDER.to_string()]
            }
            _ => Vec::new(),
        }
    }

    fn permitted(&self, source: &CommandSource, sub: Subcommand) -> bool {
        match source {
            CommandSource::Console => true,
            CommandSource::Player { .. } => self.permissions.has_permission(source, sub.permission()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Subcommand::parse("BroadcastStart"), Some(Subcommand::BroadcastStart));
        assert_eq!(Subcommand::parse("OZELTITLE"), Some(Subcommand::OzelTitle));
        assert_eq!(Subcommand::parse("nope"), None);
    }

    #[test]
    fn test_every_subcommand_has_its_own_permission() {
        let mut perms: Vec<&str> = Subcommand::ALL.iter().map(|s| s.permission()).collect();
        perms.sort();
        perms.dedup();
        assert_eq!(perms.len(), Subcommand::ALL.len());
        for sub in Subcommand::ALL {
            assert_eq!(Subcommand::parse(sub.token()), Some(sub));
        }
    }
}
