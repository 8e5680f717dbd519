use kindling_core::{Candidate, KindlingError};

/// Pick the highest-scoring candidate. Ties go to the earliest one generated.
pub fn select(candidates: Vec<Candidate>) -> Result<Candidate, KindlingError> {
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        match &best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best.ok_or(KindlingError::NoCandidates)
}
