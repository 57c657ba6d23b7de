use serenity::builder::ExecuteWebhook;
use serenity::http::Http;
use serenity::model::webhook::Webhook;
use thiserror::Error;
use tracing::info;

use crate::models::Summary;
use crate::services::format_service::{format_bid, format_percent};
use crate::services::rules_service::Thresholds;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("discord webhook error: {0}")]
    Webhook(String),
}

/// Arrow for the direction of a change
fn trend_arrow(change: f64) -> &'static str {
    if change > 0.0 {
        "⬆️"
    } else if change < 0.0 {
        "⬇️"
    } else {
        "➡️"
    }
}

pub const MESSAGE_FOOTER: &str = "🧠 Cofrinho: disciplina > timing perfeito 😌";

/// Build the Markdown body posted to Discord
pub fn build_message(summary: &Summary, thresholds: &Thresholds) -> String {
    let bid = summary.last.bid;

    let change_text = match summary.change {
        Some(change) => format!("{} {}", trend_arrow(change), format_percent(change)),
        None => "N/A".to_string(),
    };

    let mut message = format!(
        "💵 **USD/BRL update**\n\
         - Cotação (bid): **R$ {}**\n\
         - Variação vs última: **{}**\n\
         - Timestamp (UTC): `{}`\n\
         - Fonte: {}\n",
        format_bid(bid),
        change_text,
        summary.last.timestamp_iso,
        summary.last.source.as_deref().unwrap_or("—"),
    );

    if let Some(below) = thresholds.below.filter(|b| bid < *b) {
        message.push_str(&format!("🚨 Abaixo do limite de alerta R$ {}\n", format_bid(below)));
    }
    if let Some(above) = thresholds.above.filter(|a| bid > *a) {
        message.push_str(&format!("🚨 Acima do limite de alerta R$ {}\n", format_bid(above)));
    }

    message.push('\n');
    message.push_str(MESSAGE_FOOTER);
    message
}

/// Post `message` through a Discord webhook URL
pub async fn notify_discord(webhook_url: &str, message: &str) -> Result<(), NotifyError> {
    // Webhook URLs carry their own token
    let http = Http::new("");

    let webhook = Webhook::from_url(&http, webhook_url)
        .await
        .map_err(|e| NotifyError::Webhook(format!("Failed to resolve webhook: {}", e)))?;

    webhook
        .execute(&http, false, ExecuteWebhook::new().content(message))
        .await
        .map_err(|e| NotifyError::Webhook(format!("Failed to send message: {}", e)))?;

    info!("✓ Discord notification sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;

    fn summary(bid: f64, change: Option<f64>) -> Summary {
        Summary {
            last: Observation {
                bid,
                timestamp_iso: "2024-01-03T12:00:00+00:00".to_string(),
                source: Some("AwesomeAPI".to_string()),
            },
            previous: None,
            change,
        }
    }

    #[test]
    fn test_message_with_change() {
        let message = build_message(&summary(5.0, Some(-3.846153846153846)), &Thresholds::default());

        assert!(message.starts_with("💵 **USD/BRL update**\n"));
        assert!(message.contains("- Cotação (bid): **R$ 5.0000**"));
        assert!(message.contains("- Variação vs última: **⬇️ -3.85%**"));
        assert!(message.contains("- Timestamp (UTC): `2024-01-03T12:00:00+00:00`"));
        assert!(message.contains("- Fonte: AwesomeAPI"));
        assert!(message.ends_with(&format!("\n\n{}", MESSAGE_FOOTER)));
        assert!(!message.contains("🚨"));
    }

    #[test]
    fn test_message_without_previous() {
        let message = build_message(&summary(5.0, None), &Thresholds::default());
        assert!(message.contains("**N/A**"));
    }

    #[test]
    fn test_message_flat_change() {
        let message = build_message(&summary(5.0, Some(0.0)), &Thresholds::default());
        assert!(message.contains("➡️ +0.00%"));
    }

    #[test]
    fn test_message_threshold_line() {
        let thresholds = Thresholds { below: Some(5.1), above: None };
        let message = build_message(&summary(5.0, Some(-1.0)), &thresholds);
        assert!(message.contains("🚨 Abaixo do limite de alerta R$ 5.1000"));
        assert!(message.ends_with(MESSAGE_FOOTER));
    }
}
