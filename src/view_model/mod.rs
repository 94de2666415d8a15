//! Group list view-model: loads the user's groups, filters them by search
//! text, and remembers which group was selected last.
//!
//! Collaborator failures never escape. They are logged and turned into a
//! status message plus the error flag, which the presentation layer renders.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::api::{SessionHandle, VrchatApi};
use crate::error::Result;
use crate::models::Group;
use crate::storage::DataStorage;

mod events;
mod task;

pub use events::ViewModelEvent;
pub use task::InitTask;

use events::Notifier;

const READY_STATUS: &str = "Ready to load groups";
const NOT_AUTHENTICATED_STATUS: &str = "Not authenticated. Please log in first.";
const NO_MATCH_STATUS: &str = "No groups match your search criteria";

pub struct GroupViewModel<A, S> {
    api: Arc<A>,
    storage: Arc<S>,
    session: SessionHandle,

    groups: Vec<Group>,
    filtered_groups: Vec<Group>,
    selected_group: Option<Group>,
    search_text: String,
    is_loading: bool,
    status_message: String,
    has_groups: bool,
    has_error: bool,

    notifier: Notifier,
}

impl<A, S> GroupViewModel<A, S>
where
    A: VrchatApi + 'static,
    S: DataStorage + 'static,
{
    pub fn new(api: Arc<A>, storage: Arc<S>, session: SessionHandle) -> Self {
        Self {
            api,
            storage,
            session,
            groups: Vec::new(),
            filtered_groups: Vec::new(),
            selected_group: None,
            search_text: String::new(),
            is_loading: false,
            status_message: READY_STATUS.to_string(),
            has_groups: false,
            has_error: false,
            notifier: Notifier::default(),
        }
    }

    /// Receive every subsequent change to the observable state.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ViewModelEvent> {
        self.notifier.subscribe()
    }

    // ── State ───────────────────────────────────────────────────────────────

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn filtered_groups(&self) -> &[Group] {
        &self.filtered_groups
    }

    pub fn selected_group(&self) -> Option<&Group> {
        self.selected_group.as_ref()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn has_groups(&self) -> bool {
        self.has_groups
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    // ── Operations ──────────────────────────────────────────────────────────

    /// Load groups, then restore the previously selected one.
    pub async fn initialize(&mut self) {
        self.load_groups().await;
        self.restore_selected_group().await;
    }

    /// Run [`GroupViewModel::initialize`] in the background and hand back a
    /// handle the caller can join or cancel.
    pub fn spawn_initialize(view_model: Arc<Mutex<Self>>) -> InitTask<A, S> {
        InitTask::spawn(view_model)
    }

    /// The refresh command.
    pub async fn refresh(&mut self) {
        self.load_groups().await;
    }

    pub async fn load_groups(&mut self) {
        self.set_loading(true);
        if let Err(e) = self.fetch_groups().await {
            tracing::error!(error = %e, "Error loading groups");
            self.set_status(format!("Error: {e}"));
            self.set_error(true);
        }
        self.set_loading(false);
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.search_text == text {
            return;
        }
        self.search_text = text;
        self.notifier.emit(ViewModelEvent::SearchTextChanged {
            search_text: self.search_text.clone(),
        });
        self.apply_filter();
    }

    /// The select command. Selecting nothing is a no-op.
    pub async fn select_group(&mut self, group: Option<&Group>) {
        let Some(group) = group else {
            return;
        };
        self.set_selected(Some(group.clone()));
        self.save_selected_group(&group.id).await;
    }

    // ── Internals ───────────────────────────────────────────────────────────

    async fn fetch_groups(&mut self) -> Result<()> {
        self.set_error(false);
        self.set_status("Loading groups...");

        self.replace_groups(Vec::new());
        self.set_filtered(Vec::new());
        self.set_has_groups(false);

        if !self.session.is_authenticated().await {
            self.set_status(NOT_AUTHENTICATED_STATUS);
            self.set_error(true);
            return Ok(());
        }

        let groups = self.api.get_groups(&self.session).await?;
        let count = groups.len();
        self.replace_groups(groups);
        self.apply_filter();
        self.set_has_groups(!self.groups.is_empty());
        self.set_status(format!("Loaded {count} groups"));
        tracing::info!(count, "Loaded groups");
        Ok(())
    }

    fn apply_filter(&mut self) {
        let filtered: Vec<Group> = self
            .groups
            .iter()
            .filter(|g| g.matches(&self.search_text))
            .cloned()
            .collect();
        self.set_filtered(filtered);

        let searching = !self.search_text.trim().is_empty();
        let status = if self.filtered_groups.is_empty() && searching {
            NO_MATCH_STATUS.to_string()
        } else if self.filtered_groups.len() != self.groups.len() {
            format!(
                "Showing {} of {} groups",
                self.filtered_groups.len(),
                self.groups.len()
            )
        } else {
            format!("Loaded {} groups", self.groups.len())
        };
        self.set_status(status);
    }

    async fn save_selected_group(&self, group_id: &str) {
        let mut settings = self.storage.load_settings().await;
        settings.last_selected_group_id = group_id.to_string();
        match self.storage.save_settings(&settings).await {
            Ok(()) => tracing::info!(group_id, "Saved selected group"),
            Err(e) => tracing::error!(group_id, error = %e, "Error saving selected group"),
        }
    }

    async fn restore_selected_group(&mut self) {
        if let Err(e) = self.try_restore_selected_group().await {
            tracing::error!(error = %e, "Error restoring selected group");
        }
    }

    async fn try_restore_selected_group(&mut self) -> Result<()> {
        let group_id = self.storage.load_settings().await.last_selected_group_id;
        if group_id.is_empty() {
            return Ok(());
        }

        let mut group = self.groups.iter().find(|g| g.id == group_id).cloned();

        if group.is_none() && self.session.is_authenticated().await {
            // Not in the listing; ask for it directly.
            group = self.api.get_group(&self.session, &group_id).await?;
            if let Some(fetched) = &group {
                if !self.groups.iter().any(|g| g.id == fetched.id) {
                    let mut groups = self.groups.clone();
                    groups.push(fetched.clone());
                    self.replace_groups(groups);
                    self.set_has_groups(true);
                    self.apply_filter();
                }
            }
        }

        if let Some(group) = group {
            tracing::info!(group_id = %group.id, name = %group.name, "Restored selected group");
            self.set_selected(Some(group));
        }
        Ok(())
    }

    fn finish_cancelled(&mut self) {
        if self.is_loading {
            self.set_loading(false);
            self.set_status("Loading cancelled");
        }
    }

    // ── Change notification ─────────────────────────────────────────────────

    fn set_loading(&mut self, value: bool) {
        if self.is_loading != value {
            self.is_loading = value;
            self.notifier
                .emit(ViewModelEvent::LoadingChanged { is_loading: value });
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.status_message != message {
            self.status_message = message;
            self.notifier.emit(ViewModelEvent::StatusChanged {
                message: self.status_message.clone(),
            });
        }
    }

    fn set_error(&mut self, value: bool) {
        if self.has_error != value {
            self.has_error = value;
            self.notifier
                .emit(ViewModelEvent::ErrorChanged { has_error: value });
        }
    }

    fn set_has_groups(&mut self, value: bool) {
        if self.has_groups != value {
            self.has_groups = value;
            self.notifier
                .emit(ViewModelEvent::HasGroupsChanged { has_groups: value });
        }
    }

    fn set_selected(&mut self, group: Option<Group>) {
        if self.selected_group != group {
            self.selected_group = group;
            self.notifier.emit(ViewModelEvent::SelectionChanged {
                group_id: self.selected_group.as_ref().map(|g| g.id.clone()),
            });
        }
    }

    fn replace_groups(&mut self, groups: Vec<Group>) {
        if self.groups != groups {
            self.groups = groups;
            self.notifier.emit(ViewModelEvent::GroupsChanged {
                total: self.groups.len(),
            });
        }
    }

    fn set_filtered(&mut self, groups: Vec<Group>) {
        if self.filtered_groups != groups {
            self.filtered_groups = groups;
            self.notifier.emit(ViewModelEvent::FilteredGroupsChanged {
                visible: self.filtered_groups.len(),
            });
        }
    }
}
