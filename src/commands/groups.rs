use std::sync::Arc;

use tokio::sync::Mutex;

use crate::app::App;
use crate::error::{JoinerError, Result};
use crate::models::Group;
use crate::view_model::{GroupViewModel, ViewModelEvent};

fn print_group(group: &Group, selected: bool) {
    let marker = if selected { "*" } else { " " };
    println!(
        "{marker} {:<12} {:<24} {:>5} members  [{}]",
        group.id,
        group.name,
        group.member_count,
        group.tags.join(", ")
    );
}

/// Initialize a group view-model in the background, report its progress,
/// then print the visible groups.
pub async fn list_groups(app: &App, search: Option<String>) -> Result<()> {
    app.restore_session().await;

    let mut vm = app.group_view_model();
    let mut events = vm.subscribe();
    if let Some(text) = search {
        vm.set_search_text(text);
    }
    let vm = Arc::new(Mutex::new(vm));

    let progress = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                ViewModelEvent::StatusChanged { message } => tracing::info!("{message}"),
                other => tracing::debug!(event = ?other, "View-model changed"),
            }
        }
    });

    GroupViewModel::spawn_initialize(vm.clone()).join().await?;

    let result = {
        let vm = vm.lock().await;
        if vm.has_error() {
            Err(JoinerError::Custom(vm.status_message().to_string()))
        } else {
            let selected = vm.selected_group().map(|g| g.id.as_str());
            for group in vm.filtered_groups() {
                print_group(group, selected == Some(group.id.as_str()));
            }
            println!("{}", vm.status_message());
            Ok(())
        }
    };

    // Dropping the last handle closes the event stream.
    drop(vm);
    let _ = progress.await;
    result
}

pub async fn select_group(app: &App, group_id: &str) -> Result<()> {
    app.restore_session().await;

    let mut vm = app.group_view_model();
    vm.load_groups().await;
    if vm.has_error() {
        return Err(JoinerError::Custom(vm.status_message().to_string()));
    }

    let group = vm
        .groups()
        .iter()
        .find(|g| g.id == group_id)
        .cloned()
        .ok_or_else(|| JoinerError::Custom(format!("No group with id {group_id}")))?;

    vm.select_group(Some(&group)).await;
    println!("Selected {} ({})", group.name, group.id);
    Ok(())
}
