use serde::{Deserialize, Serialize};

/// Strategy for automatically choosing an instance to join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionAlgorithm {
    AlphabeticalByWorldId,
    #[default]
    MostRecentlyCreated,
    MostUsers,
    FewestUsers,
    Custom,
}

impl std::str::FromStr for SelectionAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "alphabeticalbyworldid" => Ok(Self::AlphabeticalByWorldId),
            "mostrecentlycreated" => Ok(Self::MostRecentlyCreated),
            "mostusers" => Ok(Self::MostUsers),
            "fewestusers" => Ok(Self::FewestUsers),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown selection algorithm: {other}")),
        }
    }
}

/// User preferences persisted as `settings.json`.
///
/// Every field has a default, so a partial or older file still loads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub dark_mode_enabled: bool,
    pub poll_interval_seconds: i32,
    pub auto_join_enabled: bool,
    pub notifications_enabled: bool,
    pub notification_sound: String,
    pub last_selected_group_id: String,
    pub selection_algorithm: SelectionAlgorithm,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode_enabled: true,
            poll_interval_seconds: 5,
            auto_join_enabled: false,
            notifications_enabled: true,
            notification_sound: "default".to_string(),
            last_selected_group_id: String::new(),
            selection_algorithm: SelectionAlgorithm::MostRecentlyCreated,
        }
    }
}
