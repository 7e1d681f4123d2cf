//! Quotation Tickets

use jiff::Timestamp;
use rand::Rng;

/// Mints a quotation ticket: `COT-` followed by the last six digits of
/// the epoch millisecond timestamp and a zero-padded three digit random
/// suffix.
pub(crate) fn mint_quotation_ticket<R: Rng>(now: Timestamp, rng: &mut R) -> String {
    let stamp = now.as_millisecond().rem_euclid(1_000_000);
    let suffix: u32 = rng.gen_range(0..1_000);

    format!("COT-{stamp:06}-{suffix:03}")
}

/// Derives an order ticket from its source quotation ticket by swapping
/// the `COT-` prefix for `ORD-`. The numeric suffix is kept as is.
pub(crate) fn order_ticket_from(quotation_ticket: &str) -> String {
    quotation_ticket.replacen("COT-", "ORD-", 1)
}
