use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::{Subtask, TaskData, TaskStatus};

/// One task blueprint inside a workflow template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    #[serde(default)]
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Ids of blueprints in the same template this one follows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub phase: u32,
    #[serde(default)]
    pub parallel: u32,
    #[serde(default)]
    pub is_milestone: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

impl TaskTemplate {
    /// Task data for a freshly dropped copy of this blueprint.
    pub fn to_task_data(&self) -> TaskData {
        let mut data = TaskData {
            label: self.label.clone(),
            status: TaskStatus::Pending,
            trade: self.trade.clone(),
            trade_color: self.trade_color.clone(),
            is_milestone: self.is_milestone,
            subtasks: self.subtasks.clone(),
            description: self.description.clone(),
            duration: self.duration,
            phase: Some(self.phase),
            parallel: Some(self.parallel),
            ..Default::default()
        };
        if !self.id.is_empty() {
            data.extra
                .insert("templateTaskId".to_string(), Value::String(self.id.clone()));
        }
        if !self.dependencies.is_empty() {
            data.extra.insert(
                "dependencies".to_string(),
                Value::Array(self.dependencies.iter().cloned().map(Value::String).collect()),
            );
        }
        data
    }
}

/// An ordered list of task blueprints, expanded into a chain on drop.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tasks: Vec<TaskTemplate>,
}
