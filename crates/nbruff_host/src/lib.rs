//! nbruff host integration
//!
//! Connects the formatting core to an editor: the editor reports what
//! happens (focus changes, cell execution, saves, commands) on an
//! [`EventBus`], and a [`Formatter`] rewrites the affected documents held in
//! [`HostState`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let state = Arc::new(HostState::new());
//! let formatter = Formatter::new(
//!     state.clone(),
//!     Arc::new(FsStorage::default()),
//!     Arc::new(RuffCommandFactory::default()),
//!     Arc::new(MemorySettings::default()),
//! );
//! formatter.initialize().await?;
//!
//! let bus = EventBus::default();
//! let _subscription = formatter.listen(&bus);
//! bus.emit(HostEvent::Command(Command::FormatAllCells));
//! ```

pub mod config;
pub mod document;
mod error;
pub mod events;
mod formatter;
mod handler;
pub mod settings;
pub mod state;

pub use document::{Buffer, Cell, CellKind, Document, Notebook};
pub use error::HostError;
pub use events::{Command, EventBus, HostEvent, Subscription};
pub use formatter::Formatter;
pub use settings::{MemorySettings, Setting, Settings, SettingsStore};
pub use state::{ActiveWorkspaces, HostState, SharedState};
