use crate::cli::FilesCommand;
use crate::client::{FileContent, WorkspaceItem};
use crate::commands::{backend, print_banner};
use crate::config::Config;
use crate::controllers::{Activation, ItemRow, WorkspaceBrowserController};
use crate::download::FileDownloader;
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};
use std::path::PathBuf;
use std::sync::Arc;

/// Handle workspace commands
pub async fn handle_files(config: &Config, command: FilesCommand) -> Result<()> {
    let client = backend(config)?;

    let out = match &command {
        FilesCommand::View { out, .. } | FilesCommand::Download { out, .. } => out.clone(),
        FilesCommand::Ls { .. } => None,
    };
    let dir = out
        .map(PathBuf::from)
        .unwrap_or_else(|| config.workspace.resolved_download_dir());
    let downloader = FileDownloader::new(client.http().clone(), dir);
    let target_dir = downloader.dir().to_path_buf();

    let browser = WorkspaceBrowserController::new(client, Arc::new(downloader));

    match command {
        FilesCommand::Ls { path } => {
            if let Err(e) = browser.list_directory(&path).await {
                print_banner(browser.error());
                return Err(e);
            }
            print_listing(&browser.current_path(), &browser.rows());
        }
        FilesCommand::View { path, .. } => {
            let item = WorkspaceItem::file(&path);
            match browser.activate_item(&item).await {
                Ok(Activation::Viewed(content)) => print_file(&content),
                Ok(Activation::Downloaded) => {
                    println!(
                        "{} is not a text file; saved to {}",
                        item.name.cyan(),
                        target_dir.display()
                    );
                }
                Ok(Activation::Navigated(_)) | Ok(Activation::Stale) => {}
                Err(e) => {
                    print_banner(browser.error());
                    return Err(e);
                }
            }
        }
        FilesCommand::Download { path, .. } => {
            let item = WorkspaceItem::file(&path);
            browser.download(&item).await?;
            println!(
                "{}",
                format!("Saved {} to {}", item.name, target_dir.display()).green()
            );
        }
    }

    Ok(())
}

fn print_listing(path: &str, rows: &[ItemRow]) {
    let location = if path.is_empty() { "/" } else { path };
    println!("\nWorkspace: {}", location.cyan());

    if rows.is_empty() {
        println!("{}", "Directory is empty.".yellow());
        println!();
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Name".bold(),
        "Size".bold(),
        "Modified".bold()
    ]);

    for row in rows {
        let name = if row.is_dir {
            format!("{}/", row.name).blue().bold()
        } else {
            row.name.normal()
        };
        table.add_row(prettytable::row![name, row.size_label, row.modified_label]);
    }

    table.printstd();
    println!();
}

fn print_file(content: &FileContent) {
    println!(
        "{} ({}, {} bytes)",
        content.name.bold(),
        content.kind,
        content.size
    );
    println!("{}", "-".repeat(40).dimmed());
    println!("{}", content.content);
}
