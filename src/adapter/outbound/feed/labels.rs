//! Embedded outcome-label dictionary.
//!
//! A hand-picked subset of the venue's published dictionaries covering
//! the most common pre-match markets. Ids that are not in the table
//! resolve to [`Label::Unknown`] so the gap stays visible in output
//! instead of being papered over with a placeholder.

use crate::domain::Label;

/// Resolves the market and selection labels for an outcome id.
#[must_use]
pub fn outcome_labels(outcome_id: &str) -> (Label, Label) {
    let Ok(id) = outcome_id.trim().parse::<u64>() else {
        return (Label::Unknown, Label::Unknown);
    };
    let (market, selection) = match id {
        29 => ("Full Time Result", "1"),
        30 => ("Full Time Result", "X"),
        31 => ("Full Time Result", "2"),
        32 => ("Double Chance", "1X"),
        33 => ("Double Chance", "12"),
        34 => ("Double Chance", "X2"),
        180 => ("Both Teams To Score", "Yes"),
        181 => ("Both Teams To Score", "No"),
        186 => ("Match Winner", "1"),
        187 => ("Match Winner", "2"),
        _ => return (Label::Unknown, Label::Unknown),
    };
    (Label::known(market), Label::known(selection))
}
