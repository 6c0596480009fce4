//! Storefront summaries: the countdown banner, shipping rules, and order quotes.

use chrono::{DateTime, Utc};
use storefront_settings_core::{CountdownSettings, Currency, Price, ShippingSettings};

use super::App;
use crate::console;
use crate::error::CliError;

/// Print what shipping an order subtotal would be charged.
pub async fn quote(app: &App, subtotal: Price) -> Result<(), CliError> {
    let settings = app.load().await?;
    console::line(&quote_line(
        &settings.shipping_settings,
        app.store.currency(),
        subtotal,
    ));
    Ok(())
}

/// Banner state as visitors see it at `now`.
#[must_use]
pub fn countdown_line(countdown: &CountdownSettings, now: DateTime<Utc>) -> String {
    if !countdown.enabled {
        return "off".to_string();
    }
    if countdown.is_active(now) {
        let left = countdown
            .remaining(now)
            .map_or_else(|| "unknown".to_string(), format_remaining);
        return format!("\"{}\", {left} left", countdown.title);
    }
    match countdown.target() {
        Some(_) => format!("\"{}\", ended", countdown.title),
        None => format!("\"{}\", invalid target date {}", countdown.title, countdown.target_date),
    }
}

/// Charge range and free shipping threshold.
#[must_use]
pub fn shipping_line(shipping: &ShippingSettings, currency: Currency) -> String {
    format!(
        "{} - {}, free from {}",
        shipping.min_price.display(currency),
        shipping.max_price.display(currency),
        shipping.free_shipping_threshold.display(currency)
    )
}

fn quote_line(shipping: &ShippingSettings, currency: Currency, subtotal: Price) -> String {
    let order = subtotal.display(currency);
    if shipping.qualifies_for_free_shipping(subtotal) {
        format!("Order of {order} ships free")
    } else {
        format!(
            "Order of {order} ships for {} - {}; free from {}",
            shipping.min_price.display(currency),
            shipping.max_price.display(currency),
            shipping.free_shipping_threshold.display(currency)
        )
    }
}

/// Days, hours and minutes, dropping leading zero units.
fn format_remaining(remaining: chrono::Duration) -> String {
    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storefront_settings_core::STORE_CURRENCY;

    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn launch() -> CountdownSettings {
        CountdownSettings {
            enabled: true,
            target_date: "2026-01-01T00:00:00Z".to_owned(),
            title: "Launch".to_owned(),
        }
    }

    #[test]
    fn test_countdown_line_shows_time_left() {
        let line = countdown_line(&launch(), at("2025-12-29T21:30:00Z"));
        assert_eq!(line, "\"Launch\", 2d 2h 30m left");

        let line = countdown_line(&launch(), at("2025-12-31T23:45:00Z"));
        assert_eq!(line, "\"Launch\", 15m left");
    }

    #[test]
    fn test_countdown_line_past_disabled_and_invalid() {
        assert_eq!(
            countdown_line(&launch(), at("2026-02-01T00:00:00Z")),
            "\"Launch\", ended"
        );

        let disabled = CountdownSettings {
            enabled: false,
            ..launch()
        };
        assert_eq!(countdown_line(&disabled, at("2025-06-01T00:00:00Z")), "off");

        let invalid = CountdownSettings {
            target_date: "soon".to_owned(),
            ..launch()
        };
        assert_eq!(
            countdown_line(&invalid, at("2025-06-01T00:00:00Z")),
            "\"Launch\", invalid target date soon"
        );
    }

    #[test]
    fn test_shipping_line_uses_store_currency() {
        let line = shipping_line(&ShippingSettings::default(), STORE_CURRENCY);
        assert_eq!(line, "Rs. 300 - Rs. 800, free from Rs. 5000");
    }

    #[test]
    fn test_quote_line_at_threshold_ships_free() {
        let shipping = ShippingSettings::default();
        assert_eq!(
            quote_line(&shipping, STORE_CURRENCY, Price::from_units(5000)),
            "Order of Rs. 5000 ships free"
        );
        assert_eq!(
            quote_line(&shipping, STORE_CURRENCY, Price::from_units(4999)),
            "Order of Rs. 4999 ships for Rs. 300 - Rs. 800; free from Rs. 5000"
        );
    }
}
