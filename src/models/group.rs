use serde::{Deserialize, Serialize};

/// A VRChat group as returned by the API client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub member_count: u32,
    pub is_join_request_enabled: bool,
    pub icon_url: String,
    pub tags: Vec<String>,
}

impl Group {
    /// Case-insensitive substring match against name, description, or any tag.
    /// Blank search text matches every group.
    pub fn matches(&self, search_text: &str) -> bool {
        if search_text.trim().is_empty() {
            return true;
        }
        let needle = search_text.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> Group {
        Group {
            id: "grp_12345".into(),
            name: "VRChat Group".into(),
            description: "A group for VRChat users".into(),
            tags: vec!["social".into(), "Gaming".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_matches_name_description_and_tags() {
        let g = group();
        assert!(g.matches("vrchat group"));
        assert!(g.matches("USERS"));
        assert!(g.matches("gam"));
        assert!(!g.matches("nonexistent"));
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let g = group();
        assert!(g.matches(""));
        assert!(g.matches("   \t"));
    }
}
