//! Telegram message builders for order notifications.
//!
//! Messages use Telegram's Markdown parse mode. The operator reads these
//! on a phone in a kitchen, so the format favors short labeled lines over
//! prose.

use rust_decimal::Decimal;

use fresca_core::types::money::format_usd;
use fresca_core::{Order, PricingConfig};

/// Build the operator notification for a newly placed cash order.
///
/// Cash orders show the full breakdown including the cash discount, plus
/// the amount to collect on handoff.
#[must_use]
pub fn build_cash_order_message(order: &Order, pricing: &PricingConfig) -> String {
    let mut lines = vec!["🛒 *New Cash Order* 💵".to_string(), String::new()];
    lines.extend(customer_lines(order));
    lines.push(String::new());
    lines.push("💰 *Payment Method:* CASH IN PERSON".to_string());
    lines.push(format!(
        "💵 *Total to collect:* {}",
        format_usd(order.pricing.total)
    ));
    lines.push(String::new());
    lines.push("📋 *Order Details:*".to_string());
    lines.push(format!("• Subtotal: {}", format_usd(order.pricing.subtotal)));
    lines.push(format!(
        "• Cash Discount ({}%): -{}",
        percent(pricing.cash_discount_rate),
        format_usd(order.pricing.discount)
    ));
    lines.push(format!(
        "• Tax ({}%): {}",
        percent(pricing.tax_rate),
        format_usd(order.pricing.tax)
    ));
    lines.push(format!("• *Total: {}*", format_usd(order.pricing.total)));
    lines.push(String::new());
    lines.push("🛍️ *Items:*".to_string());
    lines.extend(item_lines(order));
    lines.push(String::new());
    lines.push(timestamp_line(order));
    lines.join("\n")
}

/// Build the operator notification for a completed card payment.
#[must_use]
pub fn build_paid_order_message(order: &Order) -> String {
    let mut lines = vec!["✅ *Payment Received* 💳".to_string(), String::new()];
    lines.extend(customer_lines(order));
    lines.push(String::new());
    lines.push("📋 *Order Details:*".to_string());
    lines.push(format!("• Subtotal: {}", format_usd(order.pricing.subtotal)));
    lines.push(format!("• Tax: {}", format_usd(order.pricing.tax)));
    lines.push(format!("• *Total: {}*", format_usd(order.pricing.total)));
    lines.push(String::new());
    lines.push("🛍️ *Items:*".to_string());
    lines.extend(item_lines(order));
    lines.push(String::new());
    lines.push(timestamp_line(order));
    lines.join("\n")
}

fn customer_lines(order: &Order) -> Vec<String> {
    let customer = &order.customer;
    let mut lines = vec![
        format!("🆔 *Order:* {}", order.order_id),
        format!("👤 *Customer:* {}", customer.name),
        format!("📧 *Email:* {}", customer.email().unwrap_or("N/A")),
        format!("📞 *Phone:* {}", customer.phone.as_deref().unwrap_or("N/A")),
        format!("📍 *Address:* {}", customer.address.as_deref().unwrap_or("N/A")),
    ];
    if let Some(instructions) = &customer.instructions {
        lines.push(format!("📝 *Instructions:* {instructions}"));
    }
    lines
}

fn item_lines(order: &Order) -> Vec<String> {
    order
        .items
        .iter()
        .map(|item| {
            format!(
                "• {}x {} - {}",
                item.quantity,
                item.name,
                format_usd(item.line_total())
            )
        })
        .collect()
}

fn timestamp_line(order: &Order) -> String {
    format!("⏰ *Time:* {}", order.created_at.format("%Y-%m-%d %H:%M UTC"))
}

/// Render a fractional rate as a percentage without trailing zeros,
/// e.g. `0.05` as `5` and `0.085` as `8.5`.
fn percent(rate: Decimal) -> String {
    (rate * Decimal::ONE_HUNDRED).normalize().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fresca_core::{CustomerInfo, LineItem, PaymentMethod, compute_totals};

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn cash_order(instructions: Option<&str>) -> Order {
        let items = vec![LineItem {
            id: "greek".to_owned(),
            name: "Greek Salad".to_owned(),
            description: None,
            unit_price: dec("10.00"),
            quantity: 2,
            category: None,
        }];
        let pricing = compute_totals(&items, PaymentMethod::Cash, &PricingConfig::default());
        let customer = CustomerInfo {
            name: "Sam Lee".to_owned(),
            phone: Some("555-0199".to_owned()),
            instructions: instructions.map(str::to_owned),
            ..CustomerInfo::default()
        };
        Order::new(customer, items, pricing, PaymentMethod::Cash)
    }

    #[test]
    fn test_cash_message_has_full_breakdown() {
        // 20.00 subtotal, 5% discount -> 1.00, 8% tax on 19.00 -> 1.52
        let message = build_cash_order_message(&cash_order(None), &PricingConfig::default());

        assert!(message.contains("*New Cash Order*"));
        assert!(message.contains("💰 *Payment Method:* CASH IN PERSON"));
        assert!(message.contains("💵 *Total to collect:* $20.52"));
        assert!(message.contains("• Subtotal: $20.00"));
        assert!(message.contains("• Cash Discount (5%): -$1.00"));
        assert!(message.contains("• Tax (8%): $1.52"));
        assert!(message.contains("• *Total: $20.52*"));
        assert!(message.contains("• 2x Greek Salad - $20.00"));
    }

    #[test]
    fn test_cash_message_customer_lines() {
        let message = build_cash_order_message(&cash_order(None), &PricingConfig::default());

        assert!(message.contains("👤 *Customer:* Sam Lee"));
        assert!(message.contains("📞 *Phone:* 555-0199"));
        assert!(message.contains("📧 *Email:* N/A"));
        assert!(message.contains("📍 *Address:* N/A"));
    }

    #[test]
    fn test_instructions_line_only_when_present() {
        let without = build_cash_order_message(&cash_order(None), &PricingConfig::default());
        assert!(!without.contains("*Instructions:*"));

        let with =
            build_cash_order_message(&cash_order(Some("No onions")), &PricingConfig::default());
        assert!(with.contains("📝 *Instructions:* No onions"));
    }

    #[test]
    fn test_paid_message_has_totals_without_discount() {
        let mut order = cash_order(None);
        order.payment_method = PaymentMethod::Card;
        let message = build_paid_order_message(&order);

        assert!(message.contains("*Payment Received*"));
        assert!(message.contains(&order.order_id));
        assert!(!message.contains("Cash Discount"));
        assert!(message.contains("• *Total: $20.52*"));
    }

    #[test]
    fn test_percent_drops_trailing_zeros() {
        assert_eq!(percent(dec("0.05")), "5");
        assert_eq!(percent(dec("0.08")), "8");
        assert_eq!(percent(dec("0.085")), "8.5");
    }
}
