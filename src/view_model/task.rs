use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::GroupViewModel;
use crate::api::VrchatApi;
use crate::error::{JoinerError, Result};
use crate::storage::DataStorage;

/// Handle to a view-model initialization running in the background.
///
/// The presentation layer may keep rendering from events while this runs,
/// then join it, or cancel it.
pub struct InitTask<A, S> {
    handle: JoinHandle<()>,
    view_model: Arc<Mutex<GroupViewModel<A, S>>>,
}

impl<A, S> InitTask<A, S>
where
    A: VrchatApi + 'static,
    S: DataStorage + 'static,
{
    pub(super) fn spawn(view_model: Arc<Mutex<GroupViewModel<A, S>>>) -> Self {
        let vm = view_model.clone();
        let handle = tokio::spawn(async move {
            vm.lock().await.initialize().await;
        });
        Self { handle, view_model }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for initialization to complete.
    pub async fn join(self) -> Result<()> {
        self.handle
            .await
            .map_err(|e| JoinerError::Custom(format!("Initialization task failed: {e}")))
    }

    /// Abort initialization. A load cut short leaves the view-model idle
    /// with a "cancelled" status instead of stuck in the loading state.
    pub async fn cancel(self) {
        self.handle.abort();
        let _ = self.handle.await;

        let mut vm = self.view_model.lock().await;
        vm.finish_cancelled();
    }
}
