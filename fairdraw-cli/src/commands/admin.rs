use super::format_time;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use fairdraw_core::{DrawError, DrawService, Result};

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List all draws, newest first
    List {
        /// Page number (starts at 1)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Draws per page
        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },
    /// Delete a single draw
    Delete {
        /// Draw key
        key: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Delete every draw
    Purge {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_admin_command(
    cmd: AdminCommands,
    service: &DrawService,
    json: bool,
) -> Result<()> {
    match cmd {
        AdminCommands::List { page, per_page } => {
            let listing = service.list_page(page, per_page).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
                return Ok(());
            }

            if listing.draws.is_empty() {
                println!("No history found.");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Key (ID)", "Owner", "Result", "Range", "Date"]);

            for draw in &listing.draws {
                table.add_row(vec![
                    draw.id().to_string(),
                    draw.owner().unwrap_or("Guest / Unknown").to_string(),
                    draw.result().to_string(),
                    format!("{} - {}", draw.min(), draw.max()),
                    format_time(&draw.created_at()),
                ]);
            }

            println!("{}", table);
            println!(
                "Page {} of {} ({} draws)",
                listing.page, listing.total_pages, listing.total
            );
        }

        AdminCommands::Delete { key, force } => {
            if !force && !confirm(&format!("Delete draw '{}'?", key))? {
                println!("Deletion cancelled.");
                return Ok(());
            }

            if service.delete(&key).await? {
                println!("Draw '{}' deleted.", key);
            } else {
                return Err(DrawError::not_found(key));
            }
        }

        AdminCommands::Purge { force } => {
            if !force
                && !confirm("Are you sure you want to delete ALL history? This cannot be undone.")?
            {
                println!("Purge cancelled.");
                return Ok(());
            }

            let removed = service.purge().await?;
            println!("All history cleared ({} draws removed).", removed);
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| DrawError::internal(format!("Confirmation prompt failed: {}", e)))
}
