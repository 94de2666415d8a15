use clap::{Args, Subcommand};

use crate::app::App;
use crate::error::Result;
use crate::models::{SelectionAlgorithm, Settings};
use crate::storage::DataStorage;

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings as JSON
    Show,
    /// Change one or more settings
    Set(SettingsUpdate),
}

#[derive(Debug, Default, Args)]
pub struct SettingsUpdate {
    #[arg(long)]
    pub dark_mode: Option<bool>,
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
    pub poll_interval: Option<i32>,
    #[arg(long)]
    pub auto_join: Option<bool>,
    #[arg(long)]
    pub notifications: Option<bool>,
    #[arg(long)]
    pub notification_sound: Option<String>,
    /// Group restored on the next load; an empty value forgets it
    #[arg(long)]
    pub last_selected_group: Option<String>,
    /// alphabetical-by-world-id, most-recently-created, most-users, fewest-users, custom
    #[arg(long)]
    pub selection_algorithm: Option<SelectionAlgorithm>,
}

impl SettingsUpdate {
    /// Apply every given field; returns whether anything was given.
    pub fn apply(self, settings: &mut Settings) -> bool {
        let mut changed = false;
        if let Some(v) = self.dark_mode {
            settings.dark_mode_enabled = v;
            changed = true;
        }
        if let Some(v) = self.poll_interval {
            settings.poll_interval_seconds = v;
            changed = true;
        }
        if let Some(v) = self.auto_join {
            settings.auto_join_enabled = v;
            changed = true;
        }
        if let Some(v) = self.notifications {
            settings.notifications_enabled = v;
            changed = true;
        }
        if let Some(v) = self.notification_sound {
            settings.notification_sound = v;
            changed = true;
        }
        if let Some(v) = self.last_selected_group {
            settings.last_selected_group_id = v;
            changed = true;
        }
        if let Some(v) = self.selection_algorithm {
            settings.selection_algorithm = v;
            changed = true;
        }
        changed
    }
}

pub async fn run(app: &App, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            let settings = app.storage.load_settings().await;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsCommand::Set(update) => {
            let mut settings = app.storage.load_settings().await;
            if update.apply(&mut settings) {
                app.storage.save_settings(&settings).await?;
                tracing::info!("Saved settings");
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_given_fields() {
        let mut settings = Settings::default();
        let update = SettingsUpdate {
            poll_interval: Some(15),
            selection_algorithm: Some(SelectionAlgorithm::FewestUsers),
            ..Default::default()
        };
        assert!(update.apply(&mut settings));
        assert_eq!(settings.poll_interval_seconds, 15);
        assert_eq!(settings.selection_algorithm, SelectionAlgorithm::FewestUsers);
        assert!(settings.dark_mode_enabled);

        assert!(!SettingsUpdate::default().apply(&mut settings));
    }

    #[test]
    fn test_set_and_forget_last_selected_group() {
        let mut settings = Settings::default();
        let update = SettingsUpdate {
            last_selected_group: Some("grp_67890".into()),
            ..Default::default()
        };
        assert!(update.apply(&mut settings));
        assert_eq!(settings.last_selected_group_id, "grp_67890");

        let forget = SettingsUpdate {
            last_selected_group: Some(String::new()),
            ..Default::default()
        };
        assert!(forget.apply(&mut settings));
        assert_eq!(settings.last_selected_group_id, "");
    }
}
