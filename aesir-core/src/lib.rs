// src/lib.rs

pub mod config;
pub mod http;
pub mod render;
pub mod scheduler;
pub mod services;
pub mod tasks;
pub mod plugin;
pub mod test_utils;

pub use aesir_common::error::Error;
pub use aesir_common::models;
pub use aesir_common::traits;
pub use config::{ConfigHandle, ConfigLoader, ReloadOutcome};
pub use http::{DefaultHttpClient, HttpClient, HttpResponse};
pub use plugin::{AesirBroadcast, HostServices};
