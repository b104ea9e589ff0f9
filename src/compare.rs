use crate::symbolic::{SymbolicValue, evaluate};

/// Whether `claim_text` denotes the same quantity as `expected`.
///
/// The claim may itself be an expression. A claim that does not evaluate is
/// never equivalent.
pub fn equivalent(expected: &SymbolicValue, claim_text: &str) -> bool {
    evaluate(claim_text).is_ok_and(|claim| equivalent_values(expected, &claim))
}

/// Whether two evaluated values denote the same quantity.
pub fn equivalent_values(expected: &SymbolicValue, claim: &SymbolicValue) -> bool {
    expected.as_rational() == claim.as_rational()
}
