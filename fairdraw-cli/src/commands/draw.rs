use super::format_time;
use comfy_table::{presets::UTF8_FULL, Table};
use fairdraw_core::audit::{self, AuditOutcome};
use fairdraw_core::{CreateDrawRequest, DrawService, Result, VerifyRequest};
use serde::Serialize;

pub async fn create_draw(
    service: &DrawService,
    min: &str,
    max: &str,
    owner: Option<String>,
    json: bool,
) -> Result<()> {
    let request = CreateDrawRequest::parse(min, max, owner)?;
    let receipt = service.create_draw(&request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Final number".to_string(), receipt.result.to_string()]);
    table.add_row(vec![
        "Range used".to_string(),
        format!("{} to {}", receipt.min, receipt.max),
    ]);
    table.add_row(vec!["Verification key".to_string(), receipt.id.clone()]);
    table.add_row(vec!["Seed hash".to_string(), receipt.commitment_hash.clone()]);
    table.add_row(vec!["Timestamp".to_string(), format_time(&receipt.created_at)]);

    println!("{}", table);
    println!();
    println!("The seed stays sealed until someone verifies the draw:");
    println!("fairdraw verify {}", receipt.id);

    Ok(())
}

pub async fn verify_draw(service: &DrawService, key: &str, json: bool) -> Result<()> {
    let request = VerifyRequest::parse(key)?;
    let report = service.verify(&request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Final number".to_string(), report.result.to_string()]);
    table.add_row(vec![
        "Range used".to_string(),
        format!("{} to {}", report.min, report.max),
    ]);
    table.add_row(vec!["Seed".to_string(), report.secret.clone()]);
    table.add_row(vec![
        "Seed hash (SHA-256)".to_string(),
        report.commitment_hash.clone(),
    ]);
    table.add_row(vec![
        "Hash verification".to_string(),
        if report.hash_match {
            "Hash matches. The stored seed and seed hash are consistent.".to_string()
        } else {
            "Hash mismatch. Data may have been altered.".to_string()
        },
    ]);
    table.add_row(vec!["Timestamp".to_string(), format_time(&report.created_at)]);
    println!("{}", table);

    println!();
    println!("Calculation:");
    for step in &report.derivation_trace {
        println!("  {}", step);
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    outcome: AuditOutcome,
    commitment_match: Option<bool>,
    result_match: Option<bool>,
}

/// Recompute a draw from disclosed values without touching the store.
/// Returns false when a supplied commitment or result disagrees.
pub fn check_draw(
    secret: &str,
    min: &str,
    max: &str,
    result: Option<i64>,
    commitment: Option<String>,
    json: bool,
) -> Result<bool> {
    let request = CreateDrawRequest::parse(min, max, None)?;
    let outcome = audit::recompute(secret.trim(), request.min, request.max)?;

    let commitment_match = commitment.as_deref().map(|c| outcome.commitment_matches(c));
    let result_match = result.map(|r| outcome.result_matches(r));
    let consistent = commitment_match.unwrap_or(true) && result_match.unwrap_or(true);

    if json {
        let output = CheckOutput {
            outcome,
            commitment_match,
            result_match,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(consistent);
    }

    println!("1) seed = {}", secret.trim());
    println!("2) sha256(seed) = {}", outcome.hash);
    println!("3) first 15 hex chars = {}", outcome.prefix);
    println!("4) as integer (base 16) = {}", outcome.value);
    println!(
        "5) range = max - min + 1 = {} - {} + 1 = {}",
        request.max, request.min, outcome.range
    );
    let modulo = outcome.result - i128::from(request.min);
    println!(
        "6) mod = integer mod range = {} mod {} = {}",
        outcome.value, outcome.range, modulo
    );
    println!(
        "7) final = mod + min = {} + {} = {}",
        modulo, request.min, outcome.result
    );

    match commitment_match {
        Some(true) => println!("Commitment matches the published seed hash."),
        Some(false) => println!("WARNING: commitment does not match sha256(seed)."),
        None => {}
    }
    match (result_match, result) {
        (Some(true), Some(r)) => println!("This matches the reported result: {}", r),
        (Some(false), Some(r)) => println!(
            "WARNING: calculated final value {} does not match reported result {}",
            outcome.result, r
        ),
        _ => {}
    }

    Ok(consistent)
}
