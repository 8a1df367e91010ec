use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Renderer tag every task card carries.
pub const TASK_NODE_KIND: &str = "taskNode";

static NODE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh node id of the form `node-<unix-millis>-<seq>`.
///
/// The sequence number keeps ids distinct when several nodes are created
/// within the same millisecond (template drops, imports).
pub fn new_node_id() -> String {
    let seq = NODE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("node-{}-{}", Utc::now().timestamp_millis(), seq)
}

/// Workflow state of a task. Transitions are unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Delayed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Delayed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Delayed => "delayed",
        }
    }

    /// Lenient parse used by the CLI and table edits.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "not started" | "not-started" => Some(TaskStatus::Pending),
            "in-progress" | "in progress" | "active" | "started" => Some(TaskStatus::InProgress),
            "completed" | "complete" | "done" | "finished" => Some(TaskStatus::Completed),
            "delayed" | "late" => Some(TaskStatus::Delayed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 2D canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A user assigned to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A checklist item inside a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            completed: false,
        }
    }
}

/// A discussion entry on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
}

impl Comment {
    pub fn new(text: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            timestamp: Utc::now(),
            user: user.into(),
        }
    }
}

/// Everything a task card shows. Keys the editor does not know about are
/// kept in `extra` and written back untouched.
///
/// Reading is lenient: a field holding a value of the wrong shape falls back
/// to its default instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    #[serde(default, deserialize_with = "lenient")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub trade: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub trade_color: Option<String>,
    /// Percent complete, 0-100. Independent of `status`.
    #[serde(default, deserialize_with = "lenient_completion", skip_serializing_if = "Option::is_none")]
    pub completion: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_milestone: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub is_critical: bool,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<Assignee>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw start date as entered or imported; never interpreted.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Template column hint (x offset in 300px steps).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub phase: Option<u32>,
    /// Template lane hint (y offset in 150px steps).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub parallel: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JSON keys of the typed `TaskData` fields.
pub const TYPED_FIELDS: [&str; 15] = [
    "label",
    "status",
    "trade",
    "tradeColor",
    "completion",
    "isMilestone",
    "isCritical",
    "assignees",
    "subtasks",
    "comments",
    "description",
    "startDate",
    "duration",
    "phase",
    "parallel",
];

impl TaskData {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn is_typed_field(key: &str) -> bool {
        TYPED_FIELDS.contains(&key)
    }

    /// Write `value` into the typed field with JSON key `key`. Text is
    /// accepted for numbers and flags, `null` clears optional fields.
    /// Returns `false` if the key is not a typed field or the value does
    /// not fit; the field is then left as it was.
    pub fn set_field(&mut self, key: &str, value: &Value) -> bool {
        match key {
            "label" => match text(value) {
                Some(v) => {
                    self.label = v;
                    true
                }
                None => false,
            },
            "status" => match value.as_str().and_then(TaskStatus::parse) {
                Some(v) => {
                    self.status = v;
                    true
                }
                None => false,
            },
            "trade" => set_text(&mut self.trade, value),
            "tradeColor" => set_text(&mut self.trade_color, value),
            "description" => set_text(&mut self.description, value),
            "startDate" => set_text(&mut self.start_date, value),
            "completion" => {
                if value.is_null() {
                    self.completion = None;
                    return true;
                }
                match number(value) {
                    Some(n) => {
                        self.completion = Some(clamp_percent(n));
                        true
                    }
                    None => false,
                }
            }
            "duration" => set_int(&mut self.duration, value),
            "phase" => set_int(&mut self.phase, value),
            "parallel" => set_int(&mut self.parallel, value),
            "isMilestone" => match flag(value) {
                Some(v) => {
                    self.is_milestone = v;
                    true
                }
                None => false,
            },
            "isCritical" => match flag(value) {
                Some(v) => {
                    self.is_critical = v;
                    true
                }
                None => false,
            },
            "assignees" => set_list(&mut self.assignees, value),
            "subtasks" => set_list(&mut self.subtasks, value),
            "comments" => set_list(&mut self.comments, value),
            _ => false,
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn clamp_percent(n: f64) -> u8 {
    n.clamp(0.0, 100.0).round() as u8
}

fn set_text(slot: &mut Option<String>, value: &Value) -> bool {
    if value.is_null() {
        *slot = None;
        return true;
    }
    match text(value) {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

fn set_int<T: TryFrom<i64>>(slot: &mut Option<T>, value: &Value) -> bool {
    if value.is_null() {
        *slot = None;
        return true;
    }
    match number(value).and_then(|n| T::try_from(n.trunc() as i64).ok()) {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

fn set_list<T: DeserializeOwned>(slot: &mut Vec<T>, value: &Value) -> bool {
    match serde_json::from_value(value.clone()) {
        Ok(v) => {
            *slot = v;
            true
        }
        Err(_) => false,
    }
}

/// Read any JSON value and convert it, falling back to the default when it
/// has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Accepts any spelling `TaskStatus::parse` knows; anything else is pending.
fn lenient_status<'de, D>(deserializer: D) -> Result<TaskStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(TaskStatus::parse).unwrap_or_default())
}

/// Numbers are clamped to 0-100; anything else reads as unset.
fn lenient_completion<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value).map(clamp_percent))
}

/// A task card on the workflow canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient")]
    pub position: Position,
    #[serde(default, deserialize_with = "lenient")]
    pub data: TaskData,
}

fn default_kind() -> String {
    TASK_NODE_KIND.to_string()
}

impl Node {
    /// Create a task node with a freshly generated id.
    pub fn new(label: impl Into<String>, position: Position) -> Self {
        Self::with_data(new_node_id(), position, TaskData::new(label))
    }

    pub fn with_data(id: impl Into<String>, position: Position, data: TaskData) -> Self {
        Self {
            id: id.into(),
            kind: default_kind(),
            position,
            data,
        }
    }
}

/// Field-level changes to a task's data. Only the fields that are `Some`
/// (and the keys present in `extra`) overwrite; everything else is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDataPatch {
    pub label: Option<String>,
    pub status: Option<TaskStatus>,
    pub trade: Option<String>,
    pub trade_color: Option<String>,
    pub completion: Option<u8>,
    pub is_milestone: Option<bool>,
    pub is_critical: Option<bool>,
    pub assignees: Option<Vec<Assignee>>,
    pub subtasks: Option<Vec<Subtask>>,
    pub comments: Option<Vec<Comment>>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub duration: Option<i64>,
    pub extra: Map<String, Value>,
}

impl TaskDataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the percent complete, clamped to 100.
    pub fn completion(mut self, completion: u8) -> Self {
        self.completion = Some(completion.min(100));
        self
    }

    pub fn trade(mut self, name: impl Into<String>, color: impl Into<String>) -> Self {
        self.trade = Some(name.into());
        self.trade_color = Some(color.into());
        self
    }

    pub fn milestone(mut self, is_milestone: bool) -> Self {
        self.is_milestone = Some(is_milestone);
        self
    }

    pub fn critical(mut self, is_critical: bool) -> Self {
        self.is_critical = Some(is_critical);
        self
    }

    pub fn assignees(mut self, assignees: Vec<Assignee>) -> Self {
        self.assignees = Some(assignees);
        self
    }

    pub fn subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = Some(subtasks);
        self
    }

    pub fn comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = Some(comments);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn duration(mut self, duration: i64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set a field by its JSON key. Keys of typed fields are written to
    /// those fields on apply; any other key lands in `extra`.
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Shallow-merge this patch into `data`.
    pub fn apply(self, data: &mut TaskData) {
        if let Some(v) = self.label {
            data.label = v;
        }
        if let Some(v) = self.status {
            data.status = v;
        }
        if let Some(v) = self.trade {
            data.trade = Some(v);
        }
        if let Some(v) = self.trade_color {
            data.trade_color = Some(v);
        }
        if let Some(v) = self.completion {
            data.completion = Some(v);
        }
        if let Some(v) = self.is_milestone {
            data.is_milestone = v;
        }
        if let Some(v) = self.is_critical {
            data.is_critical = v;
        }
        if let Some(v) = self.assignees {
            data.assignees = v;
        }
        if let Some(v) = self.subtasks {
            data.subtasks = v;
        }
        if let Some(v) = self.comments {
            data.comments = v;
        }
        if let Some(v) = self.description {
            data.description = Some(v);
        }
        if let Some(v) = self.start_date {
            data.start_date = Some(v);
        }
        if let Some(v) = self.duration {
            data.duration = Some(v);
        }
        for (key, value) in self.extra {
            if TaskData::is_typed_field(&key) {
                if !data.set_field(&key, &value) {
                    tracing::warn!("ignoring {} for task field '{}'", value, key);
                }
            } else {
                data.extra.insert(key, value);
            }
        }
    }
}

/// A partial update for a node: `kind` and `position` replace wholesale,
/// `data` is merged field by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub kind: Option<String>,
    pub position: Option<Position>,
    pub data: Option<TaskDataPatch>,
}

impl NodeUpdate {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn data(patch: TaskDataPatch) -> Self {
        Self {
            data: Some(patch),
            ..Default::default()
        }
    }

    pub fn apply(self, node: &mut Node) {
        if let Some(kind) = self.kind {
            node.kind = kind;
        }
        if let Some(position) = self.position {
            node.position = position;
        }
        if let Some(patch) = self.data {
            patch.apply(&mut node.data);
        }
    }
}
