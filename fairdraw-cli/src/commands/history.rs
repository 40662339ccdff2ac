use super::format_time;
use comfy_table::{presets::UTF8_FULL, Table};
use fairdraw_core::{DrawService, Result};

pub async fn show_history(service: &DrawService, owner: &str, limit: u32, json: bool) -> Result<()> {
    let entries = service.history(owner, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No draws found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Key", "Result", "Range", "Date"]);

    for entry in &entries {
        table.add_row(vec![
            entry.id.clone(),
            entry.result.to_string(),
            format!("{}-{}", entry.min, entry.max),
            format_time(&entry.created_at),
        ]);
    }

    println!("{}", table);
    Ok(())
}
