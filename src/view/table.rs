//! Spreadsheet-style view: one row per task plus the bulk edits the table
//! offers.

use crate::app::WorkflowApp;
use crate::io::storage::KeyValueStore;
use crate::model::trade::Trade;
use crate::model::{Node, NodeUpdate, TaskDataPatch, TaskStatus};

/// A table column, keyed by the task field it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub label: &'static str,
}

pub const DEFAULT_COLUMNS: [Column; 4] = [
    Column { field: "label", label: "Task Name" },
    Column { field: "trade", label: "Trade" },
    Column { field: "status", label: "Status" },
    Column { field: "duration", label: "Duration" },
];

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub label: String,
    pub trade: Option<String>,
    pub status: TaskStatus,
    pub duration: Option<i64>,
    pub selected: bool,
}

impl TableRow {
    /// Display text for `field`; empty for unset or unknown fields.
    pub fn cell(&self, field: &str) -> String {
        match field {
            "id" => self.id.clone(),
            "label" => self.label.clone(),
            "trade" => self.trade.clone().unwrap_or_default(),
            "status" => self.status.to_string(),
            "duration" => self.duration.map(|d| d.to_string()).unwrap_or_default(),
            _ => String::new(),
        }
    }
}

pub fn table_rows(nodes: &[Node], selected: Option<&str>) -> Vec<TableRow> {
    nodes
        .iter()
        .map(|n| TableRow {
            id: n.id.clone(),
            label: n.data.label.clone(),
            trade: n.data.trade.clone(),
            status: n.data.status,
            duration: n.data.duration,
            selected: selected == Some(n.id.as_str()),
        })
        .collect()
}

/// Plain-text rendering with padded columns.
pub fn render_table(rows: &[TableRow], columns: &[Column]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.label.len()).collect();
    for row in rows {
        for (i, col) in columns.iter().enumerate() {
            widths[i] = widths[i].max(row.cell(col.field).chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: Vec<String>, marker: &str| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        format!("{} {}", marker, padded.join("  ")).trim_end().to_string()
    };

    out.push_str(&line(columns.iter().map(|c| c.label.to_string()).collect(), " "));
    out.push('\n');
    for row in rows {
        let marker = if row.selected { ">" } else { " " };
        out.push_str(&line(columns.iter().map(|c| row.cell(c.field)).collect(), marker));
        out.push('\n');
    }
    out
}

/// Commit an inline cell edit. Values that do not fit the field's type are
/// logged and dropped. Other typed fields are converted from the text;
/// unknown fields are kept as extra task data.
pub fn edit_cell<S: KeyValueStore>(app: &mut WorkflowApp<S>, node_id: &str, field: &str, value: &str) {
    let patch = match field {
        "label" => TaskDataPatch::new().label(value),
        "trade" => {
            let color = app
                .settings()
                .trades
                .iter()
                .find(|t| t.name == value)
                .map(|t| t.color.clone());
            let mut patch = TaskDataPatch::new();
            patch.trade = Some(value.to_string());
            patch.trade_color = color;
            patch
        }
        "status" => match TaskStatus::parse(value) {
            Some(status) => TaskDataPatch::new().status(status),
            None => {
                tracing::warn!("ignoring unknown status '{}'", value);
                return;
            }
        },
        "duration" => match value.trim().parse::<i64>() {
            Ok(d) => TaskDataPatch::new().duration(d),
            Err(_) => {
                tracing::warn!("ignoring non-numeric duration '{}'", value);
                return;
            }
        },
        "description" => TaskDataPatch::new().description(value),
        "startDate" => TaskDataPatch::new().start_date(value),
        other => TaskDataPatch::new().set(other, serde_json::Value::String(value.to_string())),
    };
    app.update_node(node_id, NodeUpdate::data(patch));
}

pub fn bulk_set_status<S: KeyValueStore>(app: &mut WorkflowApp<S>, ids: &[String], status: TaskStatus) {
    for id in ids {
        app.set_status(id, status);
    }
}

pub fn bulk_set_trade<S: KeyValueStore>(app: &mut WorkflowApp<S>, ids: &[String], trade: &Trade) {
    for id in ids {
        app.update_node(
            id,
            NodeUpdate::data(TaskDataPatch::new().trade(trade.name.clone(), trade.color.clone())),
        );
    }
}

pub fn bulk_remove<S: KeyValueStore>(app: &mut WorkflowApp<S>, ids: &[String]) {
    for id in ids {
        app.remove_node(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStore;
    use crate::model::node::{Position, TaskData};
    use crate::settings::AppSettings;

    fn app_with(ids: &[&str]) -> WorkflowApp {
        let mut app = WorkflowApp::in_memory();
        for id in ids {
            app.add_node(Node::with_data(*id, Position::default(), TaskData::new(id.to_uppercase())));
        }
        app
    }

    #[test]
    fn test_rows_mark_selection() {
        let app = app_with(&["a", "b"]);
        let rows = table_rows(app.nodes(), Some("b"));
        assert!(!rows[0].selected);
        assert!(rows[1].selected);
        assert_eq!(rows[1].cell("status"), "pending");
        assert_eq!(rows[1].cell("duration"), "");
    }

    #[test]
    fn test_render_pads_columns() {
        let app = app_with(&["a"]);
        let text = render_table(&table_rows(app.nodes(), None), &DEFAULT_COLUMNS);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Task Name"));
        assert!(lines[1].contains("pending"));
    }

    #[test]
    fn test_edit_cell() {
        let mut app = app_with(&["a"]);
        edit_cell(&mut app, "a", "duration", "4");
        edit_cell(&mut app, "a", "status", "Done");
        edit_cell(&mut app, "a", "status", "whatever");
        edit_cell(&mut app, "a", "dueDate", "2024-05-01");
        let data = &app.node("a").unwrap().data;
        assert_eq!(data.duration, Some(4));
        assert_eq!(data.status, TaskStatus::Completed);
        assert_eq!(data.extra["dueDate"], "2024-05-01");
    }

    #[test]
    fn test_bulk_edits() {
        let mut app = app_with(&["a", "b", "c"]);
        let ids = vec!["a".to_string(), "b".to_string()];
        bulk_set_status(&mut app, &ids, TaskStatus::Delayed);
        let trade = Trade {
            id: "tile".into(),
            name: "Tile".into(),
            color: "#4B8E8D".into(),
            category: "Finishes".into(),
        };
        bulk_set_trade(&mut app, &ids, &trade);
        assert_eq!(app.node("b").unwrap().data.status, TaskStatus::Delayed);
        assert_eq!(app.node("a").unwrap().data.trade_color.as_deref(), Some("#4B8E8D"));
        assert_eq!(app.node("c").unwrap().data.status, TaskStatus::Pending);

        bulk_remove(&mut app, &ids);
        assert_eq!(app.nodes().len(), 1);
    }

    #[test]
    fn test_edit_typed_field_survives_reload() {
        let store = MemoryStore::new();
        let mut app = WorkflowApp::new(store.clone(), AppSettings::default());
        let mut data = TaskData::new("Foundation");
        data.description = Some("Pour footing".into());
        app.add_node(Node::with_data("a", Position::default(), data));

        edit_cell(&mut app, "a", "description", "Changed");
        edit_cell(&mut app, "a", "completion", "40");
        edit_cell(&mut app, "a", "isMilestone", "true");

        let live = &app.node("a").unwrap().data;
        assert_eq!(live.description.as_deref(), Some("Changed"));
        assert_eq!(live.completion, Some(40));
        assert!(live.is_milestone);
        assert!(live.extra.is_empty());

        let reloaded = WorkflowApp::load(store, AppSettings::default());
        assert_eq!(reloaded.nodes().len(), 1);
        assert_eq!(reloaded.node("a").unwrap().data, *live);
    }
}
