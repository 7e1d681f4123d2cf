//! WhatsApp Messaging
//!
//! Renders a staff response as an emoji-annotated WhatsApp message and
//! wraps it in a `wa.me` deep link to the customer's phone.

use jiff::{Timestamp, tz::TimeZone};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use super::data::ResponseLine;

/// Aggregate pricing for a staff response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingSummary {
    pub original_total: u64,
    pub adjusted_total: u64,

    /// `original_total - adjusted_total`; negative on markups.
    pub total_discount: i64,

    /// Discount as a share of the original total, rounded to the
    /// nearest whole percent; zero when the original total is zero.
    pub discount_percentage: i64,
}

impl PricingSummary {
    /// The amount saved, when the response is actually cheaper.
    #[must_use]
    pub fn savings(&self) -> Option<u64> {
        u64::try_from(self.total_discount)
            .ok()
            .filter(|amount| *amount > 0)
    }
}

/// Computes totals over the adjusted lines.
pub(crate) fn summarize(lines: &[ResponseLine]) -> PricingSummary {
    let original_total = lines
        .iter()
        .fold(0u64, |acc, line| acc.saturating_add(line.original_subtotal()));

    let adjusted_total = lines
        .iter()
        .fold(0u64, |acc, line| acc.saturating_add(line.adjusted_subtotal()));

    let total_discount = difference(original_total, adjusted_total);

    PricingSummary {
        original_total,
        adjusted_total,
        total_discount,
        discount_percentage: rounded_percentage(total_discount, original_total),
    }
}

fn difference(original: u64, adjusted: u64) -> i64 {
    let wide = i128::from(original) - i128::from(adjusted);

    i64::try_from(wide).unwrap_or(if wide < 0 { i64::MIN } else { i64::MAX })
}

/// Rounds `discount / original` to the nearest whole percent, halves
/// away from zero.
fn rounded_percentage(discount: i64, original: u64) -> i64 {
    if original == 0 {
        return 0;
    }

    let scaled = i128::from(discount) * 100;
    let original = i128::from(original);

    let rounded = if scaled >= 0 {
        (scaled + original / 2) / original
    } else {
        (scaled - original / 2) / original
    };

    i64::try_from(rounded).unwrap_or_default()
}

/// Renders the message sent to the customer. Discounted lines show the
/// original price struck through next to the offered one.
pub(crate) fn render_message(
    ticket: &str,
    customer_name: &str,
    lines: &[ResponseLine],
    summary: PricingSummary,
    notes: Option<&str>,
    valid_until: Timestamp,
) -> String {
    let mut message = String::new();

    message.push_str(&format!("¡Hola {customer_name}! 👋\n\n"));
    message.push_str(&format!("Tu cotización *{ticket}* está lista:\n\n"));
    message.push_str("🛍️ *Detalle:*\n");

    for line in lines {
        message.push_str(&format!("• {} x{}\n", line.name, line.quantity));

        if line.adjusted_price < line.original_price {
            message.push_str(&format!(
                "  ~{}~ ➡️ {}\n",
                format_clp(line.original_subtotal()),
                format_clp(line.adjusted_subtotal())
            ));
        } else {
            message.push_str(&format!("  {}\n", format_clp(line.adjusted_subtotal())));
        }
    }

    message.push_str(&format!(
        "\n💰 *Total: {}*\n",
        format_clp(summary.adjusted_total)
    ));

    if let Some(savings) = summary.savings() {
        message.push_str(&format!(
            "🎁 Ahorro: {} ({}% de descuento)\n",
            format_clp(savings),
            summary.discount_percentage
        ));
    }

    if let Some(notes) = notes {
        message.push_str(&format!("\n📝 Nota: {notes}\n"));
    }

    message.push_str(&format!(
        "\n⏰ Válida hasta el {}\n",
        format_date(valid_until)
    ));

    message.push_str("\n¡Gracias por preferirnos!");

    message
}

/// Builds a `wa.me` link opening a conversation with the message
/// prefilled. Everything but digits is stripped from the phone number.
pub(crate) fn deep_link(phone: &str, message: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let encoded = utf8_percent_encode(message, NON_ALPHANUMERIC);

    format!("https://wa.me/{digits}?text={encoded}")
}

/// Formats minor currency units as Chilean pesos, e.g. `$1.234.567`.
pub(crate) fn format_clp(amount: u64) -> String {
    let digits = amount.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push('.');
        }

        formatted.push(digit);
    }

    format!("${formatted}")
}

fn format_date(at: Timestamp) -> String {
    let date = at.to_zoned(TimeZone::UTC).date();

    format!("{:02}-{:02}-{}", date.day(), date.month(), date.year())
}
