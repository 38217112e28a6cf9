//! Selection of the single price that applies at an instant.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::domain::price::Price;

/// Pick the winning price among `candidates` at `instant`.
///
/// Candidates that do not contain `instant` are ignored, so the input does not
/// have to be pre-filtered. Among the applicable ones the highest priority
/// wins. Ties at the top priority go to the lowest price list, then to the
/// latest start date, then to the lowest storage id (persisted records before
/// unsaved ones). The outcome never depends on the order of `candidates`.
///
/// Returns `None` when no candidate applies.
pub fn resolve<I>(candidates: I, instant: NaiveDateTime) -> Option<Price>
where
    I: IntoIterator<Item = Price>,
{
    candidates
        .into_iter()
        .filter(|price| price.is_applicable_at(instant))
        .min_by(precedence)
}

/// Orders prices so that the winner compares as the smallest element.
pub fn precedence(a: &Price, b: &Price) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| a.price_list_id().cmp(&b.price_list_id()))
        .then_with(|| b.start_date().cmp(&a.start_date()))
        .then_with(|| match (a.id(), b.id()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
