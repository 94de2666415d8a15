use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Group, Instance};

mod mock;
mod session;

pub use mock::MockVrchatApi;
pub use session::{Session, SessionHandle};

/// Operations the group and instance workflow needs from VRChat.
///
/// Authentication state lives in the caller's [`SessionHandle`], not in the
/// client. Being signed out is never an error: listings come back empty,
/// lookups come back `None`, and joins return `false`.
#[async_trait]
pub trait VrchatApi: Send + Sync {
    /// Returns `Ok(true)` when the credentials were accepted. The session may
    /// still require a two-factor code afterwards.
    async fn authenticate(&self, session: &SessionHandle, username: &str, password: &str)
        -> Result<bool>;

    async fn verify_two_factor(&self, session: &SessionHandle, code: &str) -> Result<bool>;

    async fn authenticate_with_token(&self, session: &SessionHandle, token: &str) -> Result<bool>;

    /// Clears the session and the persisted token.
    async fn logout(&self, session: &SessionHandle);

    async fn get_groups(&self, session: &SessionHandle) -> Result<Vec<Group>>;

    async fn get_group(&self, session: &SessionHandle, group_id: &str) -> Result<Option<Group>>;

    async fn get_group_instances(&self, session: &SessionHandle, group_id: &str)
        -> Result<Vec<Instance>>;

    async fn join_instance(
        &self,
        session: &SessionHandle,
        world_id: &str,
        instance_id: &str,
    ) -> Result<bool>;
}
