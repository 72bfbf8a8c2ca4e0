use serde::{Deserialize, Serialize};

/// Alert severity, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Success => "Success",
            AlertLevel::Info => "Info",
            AlertLevel::Warning => "Warning",
            AlertLevel::Danger => "Danger",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            AlertLevel::Success => Color::Green,
            AlertLevel::Info => Color::Blue,
            AlertLevel::Warning => Color::Yellow,
            AlertLevel::Danger => Color::Red,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AlertLevel::Success => "✓",
            AlertLevel::Info => "ℹ",
            AlertLevel::Warning => "⚠",
            AlertLevel::Danger => "!",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    /// Back-reference to the plant the alert concerns.
    pub plant_id: String,
}

impl Alert {
    pub fn new(level: AlertLevel, message: impl Into<String>, plant_id: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            plant_id: plant_id.into(),
        }
    }

    pub fn is_actionable(&self) -> bool {
        matches!(self.level, AlertLevel::Warning | AlertLevel::Danger)
    }
}
