use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access scope of a world instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceType {
    #[default]
    Public,
    Friends,
    FriendsPlus,
    Group,
    GroupPlus,
    GroupPublic,
    Invite,
    InvitePlus,
}

/// A running, joinable session of a world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub world_id: String,
    pub instance_id: String,
    pub name: String,
    pub user_count: u32,
    pub capacity: u32,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub instance_type: InstanceType,
}

impl Instance {
    /// `world:instance`, the identifier used when launching into an instance.
    pub fn full_instance_id(&self) -> String {
        format!("{}:{}", self.world_id, self.instance_id)
    }

    /// True when the instance has a capacity and no free slot left.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.user_count >= self.capacity
    }
}
