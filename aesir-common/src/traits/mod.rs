pub mod host_traits;

pub use host_traits::{
    LiveStatusSource, PermissionCheck, PlayerSink, ScheduledTask, Scheduler, TaskHandle,
    TextRenderer,
};
