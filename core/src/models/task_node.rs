use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not-started" => Some(TaskStatus::NotStarted),
            "in-progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            TaskStatus::NotStarted => "not-started".to_string(),
            TaskStatus::InProgress => "in-progress".to_string(),
            TaskStatus::Completed => "completed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            TaskPriority::Low => "low".to_string(),
            TaskPriority::Medium => "medium".to_string(),
            TaskPriority::High => "high".to_string(),
        }
    }
}

/// A task and its subtasks.
///
/// Ids are unique across the whole forest, not just among siblings, and each
/// child is owned by exactly one parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "subTasks")]
    pub children: Vec<TaskNode>,
}

impl TaskNode {
    /// Create a new task with a generated id
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(super::new_id(), title)
    }

    /// Create a task with a caller-chosen id
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::NotStarted,
            priority: TaskPriority::Medium,
            start_date: None,
            due_date: None,
            estimated_minutes: None,
            tags: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append a child, builder style
    pub fn with_child(mut self, child: TaskNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Check if this task has no subtasks
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including the task itself
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(TaskNode::subtree_size).sum::<usize>()
    }

    /// Check whether the task is past due on `today` and not yet done
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.due_date.map_or(false, |due| due < today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = TaskNode::new("Write report");
        assert_eq!(task.title, "Write report");
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.is_leaf());
        assert!(!task.is_completed());
    }

    #[test]
    fn test_subtree_size() {
        let task = TaskNode::with_id("1", "root")
            .with_child(TaskNode::with_id("2", "a").with_child(TaskNode::with_id("3", "a1")))
            .with_child(TaskNode::with_id("4", "b"));
        assert_eq!(task.subtree_size(), 4);
    }

    #[test]
    fn test_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        let task = TaskNode::new("late").with_due_date(yesterday);
        assert!(task.is_overdue(today));
        assert!(!task.clone().with_status(TaskStatus::Completed).is_overdue(today));
        assert!(!TaskNode::new("no due date").is_overdue(today));
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(TaskStatus::from_str("in-progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::from_str("COMPLETED"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::from_str("done"), None);
        assert_eq!(TaskStatus::NotStarted.to_string(), "not-started");
    }

    #[test]
    fn test_priority_conversion() {
        assert_eq!(TaskPriority::from_str("low"), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::from_str("HIGH"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::from_str("invalid"), None);
    }

    #[test]
    fn test_deserializes_legacy_sub_tasks() {
        let json = r#"{"id":"1","title":"parent","status":"in-progress","subTasks":[{"id":"2","title":"child"}]}"#;
        let task: TaskNode = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.children.len(), 1);
        assert_eq!(task.children[0].status, TaskStatus::NotStarted);
    }
}
