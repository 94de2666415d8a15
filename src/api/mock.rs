use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};

use super::{SessionHandle, VrchatApi};
use crate::error::Result;
use crate::models::{Group, Instance, InstanceType};
use crate::storage::DataStorage;

const DEFAULT_DELAY: Duration = Duration::from_millis(500);
const TOKEN_PREFIX: &str = "auth-token-";
const TEMP_TOKEN: &str = "temp-auth-token";

/// Local stand-in for the VRChat API.
///
/// Every call waits a fixed delay and answers from static data. Accepted
/// credentials and codes are placeholders, not real account rules.
pub struct MockVrchatApi<S> {
    storage: Arc<S>,
    delay: Duration,
    two_factor_accounts: Vec<String>,
}

impl<S: DataStorage> MockVrchatApi<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            delay: DEFAULT_DELAY,
            two_factor_accounts: vec!["test@example.com".to_string()],
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_two_factor_accounts(mut self, accounts: Vec<String>) -> Self {
        self.two_factor_accounts = accounts;
        self
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    async fn issue_token(&self, session: &SessionHandle) -> Result<()> {
        let token = format!("{TOKEN_PREFIX}{}", uuid::Uuid::new_v4());
        self.storage.save_auth_token(&token).await?;
        session.write().await.authorize(token);
        Ok(())
    }
}

fn is_six_digit_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

fn mock_groups() -> Vec<Group> {
    vec![
        Group {
            id: "grp_12345".into(),
            name: "VRChat Enthusiasts".into(),
            description: "A group for VRChat enthusiasts".into(),
            owner_id: "usr_12345".into(),
            member_count: 150,
            is_join_request_enabled: true,
            icon_url: "https://example.com/icon1.png".into(),
            tags: vec!["social".into(), "gaming".into()],
        },
        Group {
            id: "grp_67890".into(),
            name: "World Creators".into(),
            description: "A group for world creators".into(),
            owner_id: "usr_67890".into(),
            member_count: 75,
            is_join_request_enabled: false,
            icon_url: "https://example.com/icon2.png".into(),
            tags: vec!["creation".into(), "development".into()],
        },
    ]
}

fn mock_instances(group_id: &str) -> Vec<Instance> {
    let now = Utc::now();
    let instance = |world: &str, id: &str, name: &str, users, capacity, age, kind| Instance {
        world_id: world.into(),
        instance_id: id.into(),
        name: name.into(),
        user_count: users,
        capacity,
        created_at: now - TimeDelta::minutes(age),
        instance_type: kind,
    };

    match group_id {
        "grp_12345" => vec![
            instance("wrld_12345", "12345", "The Great Pug", 15, 32, 30, InstanceType::Group),
            instance("wrld_67890", "67890", "Midnight Rooftop", 8, 24, 15, InstanceType::GroupPlus),
        ],
        "grp_67890" => vec![instance(
            "wrld_abcde",
            "abcde",
            "Creator Hub",
            5,
            16,
            45,
            InstanceType::Group,
        )],
        _ => Vec::new(),
    }
}

#[async_trait]
impl<S: DataStorage + 'static> VrchatApi for MockVrchatApi<S> {
    async fn authenticate(
        &self,
        session: &SessionHandle,
        username: &str,
        password: &str,
    ) -> Result<bool> {
        tracing::info!(username, "Authenticating user");
        session.write().await.clear();

        self.simulate_latency().await;

        if username.is_empty() || password.is_empty() {
            return Ok(false);
        }

        if self.two_factor_accounts.iter().any(|a| a == username) {
            session.write().await.await_two_factor(TEMP_TOKEN.to_string());
            tracing::info!(username, "Two-factor verification required");
            return Ok(true);
        }

        self.issue_token(session).await?;
        Ok(true)
    }

    async fn verify_two_factor(&self, session: &SessionHandle, code: &str) -> Result<bool> {
        tracing::info!("Verifying two-factor code");
        if !session.read().await.requires_two_factor() {
            return Ok(false);
        }

        self.simulate_latency().await;

        if !is_six_digit_code(code) {
            return Ok(false);
        }

        self.issue_token(session).await?;
        Ok(true)
    }

    async fn authenticate_with_token(&self, session: &SessionHandle, token: &str) -> Result<bool> {
        tracing::info!("Authenticating with token");
        if token.is_empty() {
            return Ok(false);
        }

        self.simulate_latency().await;

        if token.starts_with(TOKEN_PREFIX) {
            session.write().await.authorize(token.to_string());
            return Ok(true);
        }
        Ok(false)
    }

    async fn logout(&self, session: &SessionHandle) {
        tracing::info!("Logging out");
        self.simulate_latency().await;

        session.write().await.clear();
        if let Err(e) = self.storage.clear_auth_token().await {
            tracing::error!(error = %e, "Logout could not clear the stored token");
        }
    }

    async fn get_groups(&self, session: &SessionHandle) -> Result<Vec<Group>> {
        tracing::info!("Getting groups");
        if !session.is_authenticated().await {
            return Ok(Vec::new());
        }

        self.simulate_latency().await;
        Ok(mock_groups())
    }

    async fn get_group(&self, session: &SessionHandle, group_id: &str) -> Result<Option<Group>> {
        tracing::info!(group_id, "Getting group");
        if !session.is_authenticated().await || group_id.is_empty() {
            return Ok(None);
        }

        self.simulate_latency().await;
        Ok(mock_groups().into_iter().find(|g| g.id == group_id))
    }

    async fn get_group_instances(
        &self,
        session: &SessionHandle,
        group_id: &str,
    ) -> Result<Vec<Instance>> {
        tracing::info!(group_id, "Getting group instances");
        if !session.is_authenticated().await || group_id.is_empty() {
            return Ok(Vec::new());
        }

        self.simulate_latency().await;
        Ok(mock_instances(group_id))
    }

    async fn join_instance(
        &self,
        session: &SessionHandle,
        world_id: &str,
        instance_id: &str,
    ) -> Result<bool> {
        tracing::info!("Joining instance {world_id}:{instance_id}");
        if !session.is_authenticated().await || world_id.is_empty() || instance_id.is_empty() {
            return Ok(false);
        }

        self.simulate_latency().await;
        Ok(true)
    }
}
