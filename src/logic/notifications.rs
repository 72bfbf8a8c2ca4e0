use crate::models::{Alert, AlertLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: AlertLevel,
    pub title: String,
    pub body: String,
}

/// Pick the single most important notification for one evaluation pass.
///
/// Danger alerts win over warnings, warnings over due waterings.
pub fn summarize(alerts: &[Alert], due_count: usize) -> Option<Notification> {
    let dangers: Vec<&Alert> = alerts
        .iter()
        .filter(|a| a.level == AlertLevel::Danger)
        .collect();
    if !dangers.is_empty() {
        return Some(Notification {
            level: AlertLevel::Danger,
            title: "Critical plant alerts!".to_string(),
            body: format!(
                "{} plant(s) need immediate attention. {}",
                dangers.len(),
                dangers[0].message
            ),
        });
    }

    if let Some(warning) = alerts.iter().find(|a| a.level == AlertLevel::Warning) {
        return Some(Notification {
            level: AlertLevel::Warning,
            title: "Weather advisory".to_string(),
            body: warning.message.clone(),
        });
    }

    if due_count > 0 {
        return Some(Notification {
            level: AlertLevel::Info,
            title: "Time to water".to_string(),
            body: if due_count == 1 {
                "1 plant is thirsty today.".to_string()
            } else {
                format!("{} plants are thirsty today.", due_count)
            },
        });
    }

    None
}

/// Deliver through the log. Callers with a console also print it.
pub fn dispatch(notification: &Notification, enabled: bool) -> bool {
    if !enabled {
        tracing::debug!(title = %notification.title, "notifications disabled");
        return false;
    }
    tracing::info!(
        level = notification.level.as_str(),
        title = %notification.title,
        body = %notification.body,
        "notification"
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(level: AlertLevel, message: &str) -> Alert {
        Alert::new(level, message, "p1")
    }

    #[test]
    fn danger_takes_priority() {
        let alerts = vec![
            alert(AlertLevel::Warning, "Strong sun: avoid direct rays."),
            alert(AlertLevel::Danger, "Protect from rain now! Rot risk."),
            alert(AlertLevel::Danger, "Critical UV: ensure full shade now."),
        ];
        let n = summarize(&alerts, 4).unwrap();
        assert_eq!(n.title, "Critical plant alerts!");
        assert_eq!(n.level, AlertLevel::Danger);
        assert!(n.body.starts_with("2 plant(s)"));
        assert!(n.body.contains("Rot risk"));
    }

    #[test]
    fn warning_without_danger() {
        let alerts = vec![
            alert(AlertLevel::Info, "Very dry air: mist the leaves today."),
            alert(AlertLevel::Warning, "Cold alert tomorrow. Prepare protection."),
        ];
        let n = summarize(&alerts, 1).unwrap();
        assert_eq!(n.title, "Weather advisory");
        assert_eq!(n.body, "Cold alert tomorrow. Prepare protection.");
    }

    #[test]
    fn due_plants_without_alerts() {
        let n = summarize(&[alert(AlertLevel::Success, "Perfect growth weather today!")], 2)
            .unwrap();
        assert_eq!(n.title, "Time to water");
        assert_eq!(n.body, "2 plants are thirsty today.");
        assert_eq!(summarize(&[], 1).unwrap().body, "1 plant is thirsty today.");
    }

    #[test]
    fn nothing_to_say() {
        assert_eq!(summarize(&[], 0), None);
        assert_eq!(
            summarize(&[alert(AlertLevel::Info, "Very dry air: mist the leaves today.")], 0),
            None
        );
    }

    #[test]
    fn dispatch_respects_flag() {
        let n = summarize(&[], 1).unwrap();
        assert!(dispatch(&n, true));
        assert!(!dispatch(&n, false));
    }
}
