pub mod broadcast_service;
pub mod command_service;
pub mod message_sender;
pub mod title_service;

pub use broadcast_service::{BroadcastService, BroadcastState, StartOutcome, StopOutcome};
pub use command_service::CommandService;
pub use message_sender::MessageSender;
pub use title_service::TitleService;
