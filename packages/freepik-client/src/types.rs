use serde::{Deserialize, Serialize};

/// Request body for a Mystic generation task.
#[derive(Debug, Clone, Serialize)]
pub struct MysticRequest {
    pub prompt: String,
    pub resolution: String,
    pub aspect_ratio: String,
    pub model: String,
}

impl MysticRequest {
    /// Request with the fixed generation parameters used for post thumbnails:
    /// 1k resolution, 16:9 widescreen, realism model.
    pub fn thumbnail(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            resolution: "1k".to_string(),
            aspect_ratio: "widescreen_16_9".to_string(),
            model: "realism".to_string(),
        }
    }
}

/// Wrapper for Freepik API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Task status as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Created,
    InProgress,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Created => "CREATED",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task metadata returned on submission.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreated {
    pub task_id: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

/// Task metadata returned when polling.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskData {
    #[serde(default)]
    pub task_id: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub generated: Vec<String>,
}

impl TaskData {
    /// First generated asset URL, if any.
    pub fn first_image_url(&self) -> Option<&str> {
        self.generated.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_request_uses_fixed_parameters() {
        let value = serde_json::to_value(MysticRequest::thumbnail("a cat")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "prompt": "a cat",
                "resolution": "1k",
                "aspect_ratio": "widescreen_16_9",
                "model": "realism"
            })
        );
    }

    #[test]
    fn task_status_parses_known_and_unknown_values() {
        let parse = |s: &str| serde_json::from_str::<TaskStatus>(s).unwrap();
        assert_eq!(parse(r#""IN_PROGRESS""#), TaskStatus::InProgress);
        assert_eq!(parse(r#""COMPLETED""#), TaskStatus::Completed);
        assert_eq!(parse(r#""FAILED""#), TaskStatus::Failed);
        assert_eq!(parse(r#""QUEUED""#), TaskStatus::Unknown);
    }

    #[test]
    fn task_data_without_generated_list() {
        let data: TaskData =
            serde_json::from_str(r#"{"task_id":"abc","status":"CREATED"}"#).unwrap();
        assert!(data.first_image_url().is_none());
    }
}
