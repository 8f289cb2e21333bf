use crate::Approval;

const AFFIRMATIVE: [&str; 8] = ["proceed", "yes", "y", "ok", "okay", "sure", "approve", "go ahead"];

/// Reads a free-text reply to the budget question. Anything that does not
/// start with an affirmative word is a rejection.
pub fn parse_approval(reply: &str) -> Approval {
    let normalized = reply.trim().to_lowercase();
    let approved = AFFIRMATIVE.iter().any(|word| {
        normalized
            .strip_prefix(word)
            .map(|rest| rest.chars().next().map_or(true, |c| !c.is_alphanumeric()))
            .unwrap_or(false)
    });
    if approved {
        Approval::Approved
    } else {
        Approval::Rejected
    }
}
