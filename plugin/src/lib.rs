pub mod classifier;
pub mod clock;
pub mod config;
pub mod entry;
pub mod host;
pub mod memory_client;
pub mod menu;
pub mod plugin;
pub mod rank_resolver;
pub mod recency;
pub mod scheduler;
pub mod sort_engine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ConfigStore, JsonFileConfigStore, MemoryConfigStore};
pub use entry::Entry;
pub use host::{ClanChannel, ClanMember, Client, HostError, RosterSnapshot, WidgetInfo};
pub use memory_client::{MemberRow, MemoryClient};
pub use menu::MenuRotation;
pub use plugin::ClanMemberListSort;
pub use recency::RecencyCache;
pub use scheduler::{RESCAN_INTERVAL_MS, RescanScheduler, RescanState, TickDecision};
pub use sort_engine::SortOutcome;
