//! Working state for the generator and auditor
//!
//! A [`Workspace`] holds the editable fields. A [`Session`] ties a
//! workspace to a generation service and the history store, and is the
//! only place that appends to the history: an item is recorded only after
//! the service returns successfully.

use crate::backend::{Storage, WORKSPACE_KEY};
use crate::error::{Error, Result};
use crate::generation::Generator;
use crate::history::{HistoryItem, HistoryStore};
use crate::templates::TemplateKind;
use crate::types::HistoryId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const GENERATE_FIELDS_REQUIRED: &str =
    "Please fill in both brand voice and content request fields.";
const AUDIT_FIELDS_REQUIRED: &str = "Please fill in both brand voice and content to audit fields.";

/// Editable fields of the generator and auditor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub brand_voice: String,
    pub content_request: String,
    pub generated_content: String,
    pub audit_brand_voice: String,
    pub content_to_audit: String,
    pub audit_result: String,
}

impl Workspace {
    /// Read the saved workspace; a corrupt copy is removed
    pub fn load<S: Storage>(storage: &mut S) -> Result<Self> {
        let Some(raw) = storage.read(WORKSPACE_KEY)? else {
            return Ok(Self::default());
        };
        match serde_json::from_str(&raw) {
            Ok(workspace) => Ok(workspace),
            Err(e) => {
                warn!(error = %e, "discarding corrupt workspace");
                storage.delete(WORKSPACE_KEY)?;
                Ok(Self::default())
            }
        }
    }

    /// Persist the workspace
    pub fn save<S: Storage>(&self, storage: &mut S) -> Result<()> {
        storage.write(WORKSPACE_KEY, &serde_json::to_string(self)?)
    }

    /// Copy a past session back into the generator fields
    pub fn restore(&mut self, item: &HistoryItem) {
        self.brand_voice = item.brand_voice.clone();
        self.content_request = item.content_request.clone();
        self.generated_content = item.generated_content.clone();
    }

    /// Replace the request with a template starter
    pub fn apply_template(&mut self, kind: TemplateKind) {
        self.content_request = kind.request().to_string();
    }

    fn ready_to_generate(&self) -> bool {
        !self.brand_voice.trim().is_empty() && !self.content_request.trim().is_empty()
    }

    fn ready_to_audit(&self) -> bool {
        !self.audit_brand_voice.trim().is_empty() && !self.content_to_audit.trim().is_empty()
    }
}

/// A workspace connected to a generation service and the history
pub struct Session<G: Generator, S: Storage> {
    generator: G,
    history: HistoryStore<S>,
    workspace: Workspace,
}

impl<G: Generator, S: Storage> Session<G, S> {
    /// Open the history and the saved workspace from `storage`
    pub fn open(generator: G, storage: S) -> Result<Self> {
        let mut history = HistoryStore::initialize(storage)?;
        let workspace = Workspace::load(history.storage_mut())?;
        Ok(Self {
            generator,
            history,
            workspace,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Give back the backing storage
    pub fn into_storage(self) -> S {
        self.history.into_storage()
    }

    /// Persist the workspace next to the history
    pub fn save_workspace(&mut self) -> Result<()> {
        self.workspace.save(self.history.storage_mut())
    }

    /// Generate content for the current voice and request
    ///
    /// On success the result becomes the workspace output and is recorded
    /// in the history. On failure the output is empty and the history is
    /// untouched.
    pub fn generate(&mut self) -> Result<&HistoryItem> {
        if !self.workspace.ready_to_generate() {
            return Err(Error::invalid_input(GENERATE_FIELDS_REQUIRED));
        }

        self.workspace.generated_content.clear();
        let result = self
            .generator
            .generate(&self.workspace.brand_voice, &self.workspace.content_request)?;
        self.workspace.generated_content = result;

        self.history.record(
            &self.workspace.brand_voice,
            &self.workspace.content_request,
            &self.workspace.generated_content,
        )
    }

    /// Audit the draft against the audit voice
    pub fn audit(&mut self) -> Result<&str> {
        if !self.workspace.ready_to_audit() {
            return Err(Error::invalid_input(AUDIT_FIELDS_REQUIRED));
        }

        self.workspace.audit_result.clear();
        let report = self.generator.audit(
            &self.workspace.audit_brand_voice,
            &self.workspace.content_to_audit,
        )?;
        self.workspace.audit_result = report;
        Ok(&self.workspace.audit_result)
    }

    /// Replace the brand voice with an analysis of `identifier`
    ///
    /// A blank identifier does nothing and returns `Ok(false)`. On failure
    /// the voice field holds `Error: <message>` and the error is returned.
    pub fn analyze_voice(&mut self, identifier: &str) -> Result<bool> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            debug!("no identifier to analyze");
            return Ok(false);
        }

        self.workspace.brand_voice.clear();
        match self.generator.analyze_voice(identifier) {
            Ok(voice) => {
                self.workspace.brand_voice = voice;
                Ok(true)
            }
            Err(e) => {
                self.workspace.brand_voice = format!("Error: {}", e);
                Err(e)
            }
        }
    }

    /// Copy a past session into the workspace
    pub fn load_history_item(&mut self, id: HistoryId) -> Result<()> {
        let item = self
            .history
            .load(id)
            .ok_or(Error::HistoryItemNotFound { id: id.as_i64() })?;
        self.workspace.restore(item);
        Ok(())
    }

    /// Set the request from a template
    pub fn apply_template(&mut self, kind: TemplateKind) {
        self.workspace.apply_template(kind);
    }

    /// Remove every recorded session
    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear()
    }
}
