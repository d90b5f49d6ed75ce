// File: aesir-common/src/models/mod.rs
pub mod command;
pub mod config;
pub mod message;

pub use command::{CommandResponse, CommandSource};
pub use config::ConfigSnapshot;
pub use message::{ClickAction, Component, Title, TitleTimes};
