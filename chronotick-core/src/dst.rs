//! US Daylight Saving Time Rule
//!
//! DST runs from the second Sunday of March through the first Sunday of
//! November (US rule, 2007 onwards). The predicate here is pure: it looks
//! only at the month, day and weekday of the specific date being tested,
//! never at "today".
//!
//! The engine evaluates this against the *UTC* calendar fields of a sync
//! reading, then shifts the local instant. Evaluating against local
//! fields would need the offset that DST itself is part of.

use crate::civil::Weekday;

/// True if US daylight saving time is in effect on the given date.
///
/// `weekday` must be the weekday of that `(month, day)` date; it is
/// back-propagated to the rule's anchor day to find the deciding Sunday.
/// The switch hour (2am local) is ignored: the rule is evaluated at
/// day granularity, as the original display firmware did.
pub fn applies_dst(month: u8, day: u8, weekday: Weekday) -> bool {
    match month {
        // April through October are entirely inside DST
        4..=10 => true,
        // March: on or after the second Sunday (first Sunday on/after the 8th)
        3 => day >= first_sunday_on_or_after(8, day, weekday),
        // November: strictly before the first Sunday
        11 => day < first_sunday_on_or_after(1, day, weekday),
        _ => false,
    }
}

/// Day-of-month of the first Sunday on or after `anchor`, derived from
/// the weekday of some other day in the same month.
fn first_sunday_on_or_after(anchor: u8, day: u8, weekday: Weekday) -> u8 {
    let anchor_weekday =
        (weekday.index() as i16 - (day as i16 - anchor as i16)).rem_euclid(7) as u8;
    anchor + (7 - anchor_weekday) % 7
}
