//! The formatter service wired into a host.

use std::path::Path;
use std::sync::Arc;

use nbruff_core::{Storage, format_source};
use nbruff_engine::EngineFactory;
use toml::Table;
use tracing::{debug, error, info, warn};

use crate::HostError;
use crate::config::reload_config;
use crate::document::Document;
use crate::events::{EventBus, HostEvent, Subscription};
use crate::handler;
use crate::settings::SettingsStore;
use crate::state::SharedState;

/// Formats host documents in response to [`HostEvent`]s.
///
/// Cheap to clone; clones share the same state and collaborators.
#[derive(Clone)]
pub struct Formatter {
    state: SharedState,
    storage: Arc<dyn Storage>,
    factory: Arc<dyn EngineFactory>,
    settings: Arc<dyn SettingsStore>,
    overrides: Arc<Table>,
}

impl std::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatter")
            .field("state", &self.state)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl Formatter {
    /// Creates a formatter over the given host state and collaborators.
    pub fn new(
        state: SharedState,
        storage: Arc<dyn Storage>,
        factory: Arc<dyn EngineFactory>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            state,
            storage,
            factory,
            settings,
            overrides: Arc::new(Table::new()),
        }
    }

    /// Merges `overrides` over every configuration this formatter resolves.
    pub fn with_overrides(mut self, overrides: Table) -> Self {
        self.overrides = Arc::new(overrides);
        self
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Loads persisted settings and resolves configuration for the active
    /// document, if there is one.
    pub async fn initialize(&self) -> Result<(), HostError> {
        let settings = self.settings.load().await?;
        *self.state.settings.write() = settings;
        info!("nbruff formatter initialized");

        if let Some(path) = self.state.active_path() {
            self.reload(&path).await?;
        }
        Ok(())
    }

    /// Handles one event. Failures are logged, never returned.
    pub async fn handle(&self, event: HostEvent) {
        self.activate(&event);
        self.process(event).await;
    }

    /// Handles every event emitted on `bus` until the subscription ends.
    ///
    /// Document switches are recorded in emission order before any handler
    /// runs, so a command emitted after a switch sees the new document.
    pub fn listen(&self, bus: &EventBus) -> Subscription {
        let formatter = self.clone();
        bus.subscribe(move |event| {
            formatter.activate(&event);
            let formatter = formatter.clone();
            async move { formatter.process(event).await }
        })
    }

    /// Records an active document switch.
    fn activate(&self, event: &HostEvent) {
        if let HostEvent::ActiveDocumentChanged { path } = event {
            self.state.activate(path);
        }
    }

    async fn process(&self, event: HostEvent) {
        debug!("Handling {:?}", event);

        let result = match event {
            HostEvent::ActiveDocumentChanged { path } => {
                handler::handle_active_document_changed(self, &path).await
            }
            HostEvent::CellExecutionScheduled { path, cell } => {
                handler::handle_cell_execution_scheduled(self, &path, cell).await
            }
            HostEvent::SaveStarted { path } => handler::handle_save_started(self, &path).await,
            HostEvent::Command(command) => handler::handle_command(self, command).await,
        };

        if let Err(e) = result {
            error!("{}", e);
        }
    }

    pub(crate) fn settings_store(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    /// Resolves configuration for the document at `path`.
    pub(crate) async fn reload(&self, path: &Path) -> Result<(), HostError> {
        reload_config(
            &self.state,
            self.storage.as_ref(),
            self.factory.as_ref(),
            &self.overrides,
            path,
        )
        .await
    }

    /// Formats the listed cells of a notebook. Returns how many changed.
    ///
    /// Indices past the end and non-code cells are ignored.
    pub(crate) async fn format_cells(
        &self,
        path: &Path,
        cells: Vec<usize>,
        explicit: bool,
    ) -> Result<usize, HostError> {
        let Some(document) = self.state.document(path) else {
            return Err(HostError::UnknownDocument(path.to_path_buf()));
        };
        let Document::Notebook(notebook) = document else {
            return Err(HostError::WrongDocumentKind {
                operation: "Cell formatting",
                path: path.to_path_buf(),
            });
        };

        let sources: Vec<(usize, String)> = cells
            .into_iter()
            .filter_map(|index| {
                let cell = notebook.cells.get(index)?;
                cell.is_code().then(|| (index, cell.source.clone()))
            })
            .collect();
        if sources.is_empty() {
            debug!("No code cells to format in {}", path.display());
            return Ok(0);
        }

        let Some(results) = self.format_all(path, sources, explicit).await? else {
            return Ok(0);
        };

        let mut changed = 0;
        for (index, before, after) in results {
            if before != after && self.state.replace_cell_source(path, index, &before, after) {
                changed += 1;
            }
        }
        debug!("Formatted {} cell(s) in {}", changed, path.display());
        Ok(changed)
    }

    /// Formats a buffer. Returns whether it changed.
    pub(crate) async fn format_buffer(&self, path: &Path, explicit: bool) -> Result<bool, HostError> {
        let Some(document) = self.state.document(path) else {
            return Err(HostError::UnknownDocument(path.to_path_buf()));
        };
        let Document::Buffer(buffer) = document else {
            return Err(HostError::WrongDocumentKind {
                operation: "Editor formatting",
                path: path.to_path_buf(),
            });
        };

        let Some(results) = self.format_all(path, vec![(0, buffer.text)], explicit).await? else {
            return Ok(false);
        };

        Ok(results.into_iter().any(|(_, before, after)| {
            before != after && self.state.replace_buffer_text(path, &before, after)
        }))
    }

    /// Runs the formatting pipeline over `sources` off the async runtime.
    ///
    /// Returns `None` when nothing may be formatted: no configuration has
    /// been resolved yet, or `path` is out of scope.
    async fn format_all(
        &self,
        path: &Path,
        sources: Vec<(usize, String)>,
        explicit: bool,
    ) -> Result<Option<Vec<(usize, String, String)>>, HostError> {
        let Some(active) = self.state.active_workspaces() else {
            warn!("No configuration resolved, skipping {}", path.display());
            return Ok(None);
        };
        if !active.format.should_format(path, explicit) {
            warn!("{} is excluded from formatting", path.display());
            return Ok(None);
        }

        let format = active.format;
        let isort = self.state.settings().sort_imports.then_some(active.isort);

        let results = tokio::task::spawn_blocking(move || {
            sources
                .into_iter()
                .map(|(index, source)| {
                    let formatted = format_source(&format, isort.as_deref(), &source);
                    (index, source, formatted)
                })
                .collect::<Vec<_>>()
        })
        .await?;

        Ok(Some(results))
    }
}
