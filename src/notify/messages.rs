//! Message templates.
//!
//! Telegram is called with HTML parse mode, so every customer-provided value is
//! escaped before it is interpolated.

use crate::entities::{consultation_request, order};

/// Formats a money amount for display, e.g. `3000.00 RUB`.
#[must_use]
pub fn format_price(amount: f64) -> String {
    format!("{amount:.2} RUB")
}

/// Escapes the characters Telegram's HTML parse mode treats as markup.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Message announcing a paid order handed over for delivery.
///
/// `courier_name` is `None` when no courier was available for assignment.
#[must_use]
pub fn delivery_assignment(
    order: &order::Model,
    product_name: &str,
    courier_name: Option<&str>,
) -> String {
    let courier = courier_name.map_or_else(|| "not assigned".to_string(), escape_html);
    format!(
        "🚚 New order for delivery!\n\n\
         Order: #{}\n\
         Courier: {}\n\n\
         Address: {}\n\
         Date: {}, {}\n\
         Recipient: {}, {}\n\
         Product: {} × {}\n\
         Total: {}",
        order.id,
        courier,
        escape_html(&order.delivery_address),
        order.delivery_date.format("%Y-%m-%d"),
        order.delivery_time.label(),
        escape_html(&order.customer_name),
        escape_html(&order.customer_phone),
        escape_html(product_name),
        order.quantity,
        format_price(order.total_price),
    )
}

/// Message announcing a new consultation request.
#[must_use]
pub fn new_consultation(request: &consultation_request::Model) -> String {
    let comment = if request.comment.trim().is_empty() {
        "—".to_string()
    } else {
        escape_html(&request.comment)
    };
    format!(
        "💬 New consultation request!\n\n\
         Name: {}\n\
         Phone: {}\n\
         Comment:\n{}",
        escape_html(&request.customer_name),
        escape_html(&request.customer_phone),
        comment,
    )
}
