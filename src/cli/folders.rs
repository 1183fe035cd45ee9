use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{discogs, error, types::FolderTableRow};

/// Lists the configured user's Discogs collection folders with their item
/// counts. Folder `0` is the synthetic "All" folder and is the default
/// target of `sync`.
pub async fn folders() {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching collection folders...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let folders = match discogs::collection::get_folders().await {
        Ok(folders) => folders,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch collection folders: {}", e);
        }
    };
    pb.finish_and_clear();

    let rows: Vec<FolderTableRow> = folders
        .iter()
        .map(|f| FolderTableRow {
            id: f.id,
            name: f.name.clone(),
            items: f.count,
        })
        .collect();

    let table = Table::new(rows);
    println!("{}", table);
}
