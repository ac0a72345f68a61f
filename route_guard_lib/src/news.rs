use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub fn color(self) -> &'static str {
        match self {
            Priority::Critical => "#ef4444",
            Priority::High => "#f97316",
            Priority::Medium => "#f59e0b",
            Priority::Low => "#3b82f6",
        }
    }

    /// High-priority items light up the unread badge on the news toggle.
    pub fn is_high(self) -> bool {
        matches!(self, Priority::Critical | Priority::High)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_lowercase_and_defaults_to_low() {
        let item: NewsItem = serde_json::from_str(
            r#"{"title": "Road closure", "content": "Avoid MG Road tonight", "priority": "high"}"#,
        )
        .unwrap();
        assert_eq!(item.priority, Priority::High);
        assert!(item.priority.is_high());

        let bare: NewsItem =
            serde_json::from_str(r#"{"title": "t", "content": "c"}"#).unwrap();
        assert_eq!(bare.priority, Priority::Low);
        assert!(!bare.priority.is_high());
    }
}
