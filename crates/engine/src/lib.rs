//! Client-side progression engine for the quiz-adventure.
//!
//! This crate wires the pure rules from `progress-core` and the content
//! tables from `progress-content` into a running engine: durable storage,
//! the canonical progress store, change notification, the one-way world
//! registry mirror, and the periodic tick worker. Consumers embed one
//! [`GameStateManager`] instance and pass it by reference; there is no
//! ambient global state.
//!
//! Modules are organized by responsibility:
//! - [`facade`] hosts the single public entry point and its builder
//! - [`store`] owns the canonical record and write-through persistence
//! - [`storage`] provides the key/value storage abstraction and backends
//! - [`notifier`] fans out immutable snapshots to subscribers
//! - [`registry`] and [`bridge`] keep the rendering-layer mirror in sync
//! - [`ticker`] drives validation and playtime accrual once per second
pub mod bridge;
pub mod clock;
pub mod facade;
pub mod notifier;
pub mod registry;
pub mod storage;
pub mod store;
pub mod ticker;

pub use bridge::SyncBridge;
pub use clock::{Clock, ManualClock, SystemClock};
pub use facade::{GameStateManager, GameStateManagerBuilder, QuizResult, SubmitOutcome};
pub use notifier::{ChangeNotifier, SubscriberId};
pub use registry::{RegistryView, WorldRegistry};
pub use storage::{FileStore, InMemoryStore, KeyValueStore, StorageError};
pub use store::{ProgressStore, SAVE_KEY};
pub use ticker::TickWorker;
