//! Weighted score calculator
//!
//! Turns one participant's rubric sheet into an equity split. Each category's
//! importance is normalized against the total importance, every participant's
//! scores are averaged under those weights, and the weighted scores are then
//! normalized to percentages.
//!
//! Results are never stored; they are recomputed from a submission whenever
//! they are needed.

use serde::{Deserialize, Serialize};
use shared::ParticipantId;
use std::collections::BTreeMap;

use super::rubric::RubricSheet;
use crate::error::CalculationError;

/// Decimal places kept on each percentage
pub const PERCENTAGE_PRECISION: i32 = 3;

/// One participant's slice of a computed split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityShare {
    pub participant_id: ParticipantId,
    pub name: String,
    pub percentage: f64,
}

/// Equity split derived from a single sheet, in sheet column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySplit {
    shares: Vec<EquityShare>,
}

impl EquitySplit {
    pub(crate) fn from_shares(shares: Vec<EquityShare>) -> Self {
        Self { shares }
    }

    pub fn shares(&self) -> &[EquityShare] {
        &self.shares
    }

    pub fn percentage_of(&self, participant_id: &ParticipantId) -> Option<f64> {
        self.shares
            .iter()
            .find(|s| &s.participant_id == participant_id)
            .map(|s| s.percentage)
    }

    pub fn total(&self) -> f64 {
        self.shares.iter().map(|s| s.percentage).sum()
    }

    /// Names of participants whose share came out at exactly 0%.
    ///
    /// The calculation itself succeeded; whether a zero share is acceptable is
    /// a business decision made at submission time.
    pub fn zero_equity_participants(&self) -> Vec<String> {
        self.shares
            .iter()
            .filter(|s| s.percentage == 0.0)
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn to_map(&self) -> BTreeMap<ParticipantId, f64> {
        self.shares
            .iter()
            .map(|s| (s.participant_id.clone(), s.percentage))
            .collect()
    }
}

/// Round half-up to `PERCENTAGE_PRECISION` decimals
pub fn round_percentage(value: f64) -> f64 {
    let factor = 10f64.powi(PERCENTAGE_PRECISION);
    (value * factor).round() / factor
}

/// Sum of importance over scoring categories
pub fn total_importance(sheet: &RubricSheet) -> u32 {
    RubricSheet::scoring_categories()
        .map(|category| u32::from(sheet.importance(category)))
        .sum()
}

/// Importance-weighted average score for every participant column
pub fn weighted_scores(sheet: &RubricSheet) -> Result<Vec<f64>, CalculationError> {
    let total = total_importance(sheet);
    if total == 0 {
        return Err(CalculationError::InsufficientData);
    }
    let total = f64::from(total);

    let scores = (0..sheet.participant_count())
        .map(|participant| {
            RubricSheet::scoring_categories()
                .map(|category| {
                    let weight = f64::from(sheet.importance(category)) / total;
                    weight * f64::from(sheet.score(category, participant))
                })
                .sum()
        })
        .collect();
    Ok(scores)
}

/// Unrounded percentages per participant column
pub fn raw_percentages(sheet: &RubricSheet) -> Result<Vec<f64>, CalculationError> {
    let scores = weighted_scores(sheet)?;
    let total: f64 = scores.iter().sum();
    if total == 0.0 {
        return Err(CalculationError::AllZeroScores);
    }
    Ok(scores.iter().map(|score| score / total * 100.0).collect())
}

/// Compute the equity split a sheet implies
pub fn calculate_equity(sheet: &RubricSheet) -> Result<EquitySplit, CalculationError> {
    let percentages = raw_percentages(sheet)?;
    let shares = sheet
        .participants()
        .iter()
        .zip(percentages)
        .map(|(participant, pct)| EquityShare {
            participant_id: participant.id.clone(),
            name: participant.display_name.clone(),
            percentage: round_percentage(pct),
        })
        .collect();
    Ok(EquitySplit { shares })
}
