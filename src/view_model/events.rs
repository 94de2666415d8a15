use serde::Serialize;
use tokio::sync::mpsc;

// ── Events ──────────────────────────────────────────────────────────────────

/// Change notifications published by [`super::GroupViewModel`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "data")]
pub enum ViewModelEvent {
    #[serde(rename_all = "camelCase")]
    LoadingChanged { is_loading: bool },
    StatusChanged { message: String },
    #[serde(rename_all = "camelCase")]
    ErrorChanged { has_error: bool },
    #[serde(rename_all = "camelCase")]
    HasGroupsChanged { has_groups: bool },
    GroupsChanged { total: usize },
    FilteredGroupsChanged { visible: usize },
    #[serde(rename_all = "camelCase")]
    SearchTextChanged { search_text: String },
    #[serde(rename_all = "camelCase")]
    SelectionChanged { group_id: Option<String> },
}

// ── Subscribers ─────────────────────────────────────────────────────────────

/// Fans events out to every live subscriber. Sending never blocks; dropped
/// receivers are pruned on the next emit.
#[derive(Default)]
pub(crate) struct Notifier {
    subscribers: Vec<mpsc::UnboundedSender<ViewModelEvent>>,
}

impl Notifier {
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ViewModelEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: ViewModelEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
