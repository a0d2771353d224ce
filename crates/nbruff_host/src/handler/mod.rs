//! Host event handlers.

mod commands;
mod documents;

pub use commands::handle_command;
pub use documents::{
    handle_active_document_changed, handle_cell_execution_scheduled, handle_save_started,
};
