use crate::api::VrchatApi;
use crate::app::App;
use crate::commands::require_session;
use crate::error::{JoinerError, Result};
use crate::models::Instance;
use crate::selection::pick_instance;
use crate::storage::DataStorage;

fn print_instance(instance: &Instance) {
    println!(
        "{:<24} {:<20} {:>3}/{:<3} {:<12} {}",
        instance.full_instance_id(),
        instance.name,
        instance.user_count,
        instance.capacity,
        format!("{:?}", instance.instance_type),
        instance.created_at.format("%Y-%m-%d %H:%M UTC"),
    );
}

pub async fn list_instances(app: &App, group_id: &str) -> Result<()> {
    require_session(app).await?;

    let instances = app.api.get_group_instances(&app.session, group_id).await?;
    if instances.is_empty() {
        println!("No instances for {group_id}");
        return Ok(());
    }
    for instance in &instances {
        print_instance(instance);
    }
    Ok(())
}

/// Join `explicit` when given, otherwise pick an instance of the group with
/// the configured selection algorithm.
pub async fn join(
    app: &App,
    group_id: Option<String>,
    explicit: Option<(String, String)>,
) -> Result<()> {
    require_session(app).await?;

    let (world_id, instance_id) = match explicit {
        Some(ids) => ids,
        None => {
            let settings = app.storage.load_settings().await;
            let group_id = group_id
                .filter(|g| !g.is_empty())
                .unwrap_or(settings.last_selected_group_id);
            if group_id.is_empty() {
                return Err(JoinerError::Custom(
                    "No group given and none selected. Run `vrchat-joiner select <group-id>`."
                        .into(),
                ));
            }

            let instances = app.api.get_group_instances(&app.session, &group_id).await?;
            let picked = pick_instance(settings.selection_algorithm, &instances).ok_or_else(|| {
                JoinerError::Custom(format!(
                    "No joinable instance in {group_id} for {:?}",
                    settings.selection_algorithm
                ))
            })?;
            tracing::info!(
                algorithm = ?settings.selection_algorithm,
                instance = %picked.full_instance_id(),
                "Picked instance"
            );
            (picked.world_id.clone(), picked.instance_id.clone())
        }
    };

    if !app
        .api
        .join_instance(&app.session, &world_id, &instance_id)
        .await?
    {
        return Err(JoinerError::Custom(format!(
            "Could not join {world_id}:{instance_id}"
        )));
    }
    println!("Joined {world_id}:{instance_id}");
    Ok(())
}
