use crate::commitment::{CommitmentScheme, Sha256Commitment};
use crate::error::{DrawError, Result};
use crate::range::{PrefixModuloMapper, RangeDerivation, RangeMapper};
use crate::storage::DrawStore;
use crate::types::{Draw, TraceStep, VerificationReport, VerifyRequest};
use std::sync::Arc;

/// Recomputes a stored draw's commitment and result.
///
/// Read-only and open to anyone holding the key: the key itself is the
/// capability to see the secret.
pub struct Verifier {
    commitment: Arc<dyn CommitmentScheme>,
    mapper: Arc<dyn RangeMapper>,
    store: Arc<dyn DrawStore>,
}

impl Verifier {
    pub fn new(
        commitment: Arc<dyn CommitmentScheme>,
        mapper: Arc<dyn RangeMapper>,
        store: Arc<dyn DrawStore>,
    ) -> Self {
        Self {
            commitment,
            mapper,
            store,
        }
    }

    /// Verifier with the production hash and mapper.
    pub fn with_store(store: Arc<dyn DrawStore>) -> Self {
        Self::new(Arc::new(Sha256Commitment), Arc::new(PrefixModuloMapper), store)
    }

    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerificationReport> {
        let draw = self
            .store
            .get(&request.id)
            .await?
            .ok_or_else(|| DrawError::not_found(request.id.as_str()))?;

        let report = self.check(&draw);
        if !report.hash_match || !report.calc_match {
            tracing::warn!(
                "Draw {} failed verification (hash_match={}, calc_match={})",
                draw.id(),
                report.hash_match,
                report.calc_match
            );
        } else {
            tracing::debug!("Draw {} verified", draw.id());
        }

        Ok(report)
    }

    /// Cross-check a draw already in hand.
    pub fn check(&self, draw: &Draw) -> VerificationReport {
        let recomputed = self.commitment.commit(draw.secret());
        let hash_match = recomputed.eq_ignore_ascii_case(draw.commitment());

        // The result is folded from the stored commitment, as at creation.
        let derivation = self.mapper.derive(draw.commitment(), draw.min(), draw.max());
        let calc_match = matches!(&derivation, Ok(d) if d.result == draw.result());

        let derivation_trace = build_trace(draw, &recomputed, hash_match, &derivation);

        VerificationReport {
            id: draw.id().to_string(),
            min: draw.min(),
            max: draw.max(),
            result: draw.result(),
            secret: draw.secret().to_string(),
            commitment_hash: draw.commitment().to_string(),
            created_at: draw.created_at(),
            hash_match,
            calc_match,
            derivation_trace,
        }
    }
}

fn build_trace(
    draw: &Draw,
    recomputed: &str,
    hash_match: bool,
    derivation: &Result<RangeDerivation>,
) -> Vec<TraceStep> {
    let mut steps = vec![
        TraceStep::new("1) seed", draw.secret()),
        TraceStep::new("2) sha256(seed)", recomputed),
        TraceStep::new(
            "hash check",
            if hash_match {
                format!("{} (matches)", draw.commitment())
            } else {
                format!("{} (MISMATCH: data may have been altered)", draw.commitment())
            },
        ),
    ];

    let d = match derivation {
        Ok(d) => d,
        Err(e) => {
            steps.push(TraceStep::new("3) first 15 hex chars", format!("unavailable: {}", e)));
            return steps;
        }
    };

    steps.push(TraceStep::new("3) first 15 hex chars", d.prefix.as_str()));
    steps.push(TraceStep::new("4) as integer (base 16)", d.value.to_string()));
    steps.push(TraceStep::new(
        "5) range",
        format!(
            "max - min + 1 = {} - {} + 1 = {}",
            d.max, d.min, d.range
        ),
    ));
    steps.push(TraceStep::new(
        "6) mod",
        format!("integer mod range = {} mod {} = {}", d.value, d.range, d.modulo),
    ));
    steps.push(TraceStep::new(
        "7) final",
        format!("mod + min = {} + {} = {}", d.modulo, d.min, d.result),
    ));

    if d.result == draw.result() {
        steps.push(TraceStep::new(
            "check",
            format!("matches the stored result {}", draw.result()),
        ));
    } else {
        steps.push(TraceStep::new(
            "check",
            format!(
                "WARNING: calculated final value {} does not match stored result {}",
                d.result,
                draw.result()
            ),
        ));
    }

    steps
}
