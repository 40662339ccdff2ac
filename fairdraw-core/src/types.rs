use crate::error::{DrawError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A committed draw. Fields are fixed at creation; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    id: String,
    owner: Option<String>,
    min: i64,
    max: i64,
    result: i64,
    secret: String,
    commitment: String,
    created_at: DateTime<Utc>,
}

impl Draw {
    /// Rebuild a draw from persisted columns. Store backends use this;
    /// new draws come from `DrawEngine`.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: String,
        owner: Option<String>,
        min: i64,
        max: i64,
        result: i64,
        secret: String,
        commitment: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            min,
            max,
            result,
            secret,
            commitment,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn result(&self) -> i64 {
        self.result
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn commitment(&self) -> &str {
        &self.commitment
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The public view handed back at creation time. The secret stays behind.
    pub fn receipt(&self) -> DrawReceipt {
        DrawReceipt {
            id: self.id.clone(),
            min: self.min,
            max: self.max,
            result: self.result,
            commitment_hash: self.commitment.clone(),
            created_at: self.created_at,
        }
    }

    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            id: self.id.clone(),
            min: self.min,
            max: self.max,
            result: self.result,
            created_at: self.created_at,
        }
    }
}

/// Input of the create operation, validated once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDrawRequest {
    pub min: i64,
    pub max: i64,
    pub owner: Option<String>,
}

impl CreateDrawRequest {
    pub fn new(min: i64, max: i64, owner: Option<String>) -> Self {
        Self { min, max, owner }
    }

    /// Parse textual bounds, e.g. from a form or command line.
    pub fn parse(min: &str, max: &str, owner: Option<String>) -> Result<Self> {
        let min = parse_bound("min", min)?;
        let max = parse_bound("max", max)?;
        Ok(Self { min, max, owner })
    }
}

fn parse_bound(name: &str, raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DrawError::invalid_input("Both min and max are required"));
    }
    trimmed.parse::<i64>().map_err(|_| {
        DrawError::invalid_input(format!("{} must be an integer, got '{}'", name, trimmed))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub id: String,
}

impl VerifyRequest {
    pub fn parse(raw: &str) -> Result<Self> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(DrawError::invalid_input("Key required"));
        }
        Ok(Self { id: id.to_string() })
    }
}

/// Response of the create operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawReceipt {
    pub id: String,
    pub min: i64,
    pub max: i64,
    pub result: i64,
    pub commitment_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One labelled line of a derivation trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub label: String,
    pub text: String,
}

impl TraceStep {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl std::fmt::Display for TraceStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label, self.text)
    }
}

/// Response of the verify operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub id: String,
    pub min: i64,
    pub max: i64,
    pub result: i64,
    pub secret: String,
    pub commitment_hash: String,
    pub created_at: DateTime<Utc>,
    pub hash_match: bool,
    pub calc_match: bool,
    pub derivation_trace: Vec<TraceStep>,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.hash_match && self.calc_match
    }
}

/// Account history row: no secret, no commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub min: i64,
    pub max: i64,
    pub result: i64,
    pub created_at: DateTime<Utc>,
}

/// One page of the administrative draw listing, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawPage {
    pub draws: Vec<Draw>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl DrawPage {
    pub fn new(draws: Vec<Draw>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page as u64) as u32
        };
        Self {
            draws,
            page,
            per_page,
            total,
            total_pages,
        }
    }
}
