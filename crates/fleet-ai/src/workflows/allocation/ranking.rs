use super::domain::ScoredVehicle;
use super::error::AllocationError;

/// Number of runner-up vehicles offered next to the recommendation.
pub const ALTERNATIVE_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    pub recommended: ScoredVehicle,
    pub alternatives: Vec<ScoredVehicle>,
}

/// Orders candidates by ascending risk. Ties keep roster order.
pub fn rank(mut candidates: Vec<ScoredVehicle>) -> Result<Ranking, AllocationError> {
    sort_by_risk(&mut candidates);

    let mut ordered = candidates.into_iter();
    let recommended = ordered.next().ok_or(AllocationError::NoEligibleVehicles)?;
    let alternatives = ordered.take(ALTERNATIVE_LIMIT).collect();

    Ok(Ranking {
        recommended,
        alternatives,
    })
}

pub(crate) fn sort_by_risk(candidates: &mut [ScoredVehicle]) {
    // `sort_by_key` is stable.
    candidates.sort_by_key(|candidate| candidate.calculated_risk);
}
