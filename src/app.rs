use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::io::storage::{self, KeyValueStore, MemoryStore};
use crate::io::xer::{self, Activity, LinkMode};
use crate::model::node::{new_node_id, Assignee, Comment, Subtask};
use crate::model::project::{PersistedEnvelope, ProjectState};
use crate::model::{
    Edge, GraphSnapshot, Node, NodeUpdate, TaskDataPatch, TaskStatus, UndoHistory, Zone,
    ZoneUpdate,
};
use crate::settings::AppSettings;

/// Handle returned by [`WorkflowApp::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GraphSnapshot)>;

/// Counts from one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Offset applied to duplicated nodes.
const DUPLICATE_OFFSET: f64 = 50.0;

/// The workflow graph and its edit history.
///
/// All changes to nodes, edges and zones go through these methods so the
/// undo history, persisted copy and subscribers stay in step.
pub struct WorkflowApp<S: KeyValueStore = MemoryStore> {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    zones: Vec<Zone>,
    selected_node_id: Option<String>,
    project_name: String,
    history: UndoHistory,
    settings: AppSettings,
    storage: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    status_message: Option<String>,
}

impl WorkflowApp<MemoryStore> {
    /// An empty project backed by a private in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), AppSettings::default())
    }
}

impl<S: KeyValueStore> WorkflowApp<S> {
    /// An empty project. Nothing is read from `storage`.
    pub fn new(storage: S, settings: AppSettings) -> Self {
        let history = UndoHistory::with_limit(GraphSnapshot::default(), settings.max_history);
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            zones: Vec::new(),
            selected_node_id: None,
            project_name: settings.default_project_name.clone(),
            history,
            settings,
            storage,
            listeners: Vec::new(),
            next_subscription: 0,
            status_message: None,
        }
    }

    /// Restore the persisted project, seeding a history of one.
    ///
    /// A missing entry gives an empty project; a broken one is logged and
    /// replaced by an empty project.
    pub fn load(storage: S, settings: AppSettings) -> Self {
        let mut app = Self::new(storage, settings);
        match storage::load_state(&app.storage, &app.settings.storage_key) {
            Ok(Some(envelope)) => {
                let state = envelope.state;
                tracing::info!(
                    "restored '{}' ({} nodes, {} edges, {} zones)",
                    state.project_name,
                    state.nodes.len(),
                    state.edges.len(),
                    state.zones.len()
                );
                app.history.reset(state.snapshot());
                app.nodes = state.nodes;
                app.edges = state.edges;
                app.zones = state.zones;
                app.project_name = state.project_name;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("discarding unreadable saved project: {}", e);
            }
        }
        app
    }

    // --- Accessors ---

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            zones: self.zones.clone(),
        }
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected_node_id.as_deref().and_then(|id| self.node(id))
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Last user-visible outcome (import failures, counts), until dismissed.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn dismiss_message(&mut self) {
        self.status_message = None;
    }

    // --- Subscriptions ---

    /// Call `listener` with the live graph after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&GraphSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    // --- Core mutators ---

    /// Append a node. Ids are not checked for uniqueness.
    pub fn add_node(&mut self, node: Node) {
        tracing::debug!("add node {}", node.id);
        self.nodes.push(node);
        self.commit();
    }

    /// Apply `update` to the node with `id`. An unknown id changes nothing
    /// but still records a history entry.
    pub fn update_node(&mut self, id: &str, update: NodeUpdate) {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => update.apply(node),
            None => tracing::debug!("update for unknown node {}", id),
        }
        self.commit();
    }

    /// Remove a node and every edge that touches it.
    pub fn remove_node(&mut self, id: &str) {
        tracing::debug!("remove node {}", id);
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| !e.touches(id));
        if self.selected_node_id.as_deref() == Some(id) {
            self.selected_node_id = None;
        }
        self.commit();
    }

    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
        self.commit();
    }

    /// Append an edge. Duplicates, cycles and dangling ends are accepted.
    pub fn add_edge(&mut self, edge: Edge) {
        tracing::debug!("add edge {} ({} -> {})", edge.id, edge.source, edge.target);
        self.edges.push(edge);
        self.commit();
    }

    pub fn remove_edge(&mut self, id: &str) {
        self.edges.retain(|e| e.id != id);
        self.commit();
    }

    pub fn add_zone(&mut self, zone: Zone) {
        self.zones.push(zone);
        self.commit();
    }

    pub fn update_zone(&mut self, id: &str, update: ZoneUpdate) {
        if let Some(zone) = self.zones.iter_mut().find(|z| z.id == id) {
            update.apply(zone);
        }
        self.commit();
    }

    pub fn remove_zone(&mut self, id: &str) {
        self.zones.retain(|z| z.id != id);
        self.commit();
    }

    // --- Undo / redo ---

    pub fn undo(&mut self) {
        if let Some(snap) = self.history.undo().cloned() {
            self.restore(snap);
            self.status_message = Some("Undo".to_string());
        }
    }

    pub fn redo(&mut self) {
        if let Some(snap) = self.history.redo().cloned() {
            self.restore(snap);
            self.status_message = Some("Redo".to_string());
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Non-graph state ---

    pub fn set_selected_node_id(&mut self, id: Option<String>) {
        self.selected_node_id = id;
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project_name = name.into();
        self.persist();
    }

    /// Start over with an empty project and a history of one.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.zones.clear();
        self.selected_node_id = None;
        self.project_name = self.settings.default_project_name.clone();
        self.history.reset(GraphSnapshot::default());
        self.notify();
        self.persist();
        self.status_message = Some("New project created".to_string());
    }

    // --- Editing helpers built on the core mutators ---

    /// Copy a node under a fresh id, offset down and right. Returns the new id.
    pub fn duplicate_node(&mut self, id: &str) -> Option<String> {
        let mut copy = self.node(id)?.clone();
        copy.id = new_node_id();
        copy.position = copy.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        let new_id = copy.id.clone();
        self.add_node(copy);
        Some(new_id)
    }

    /// Link `source` to `target` unless that exact link already exists.
    pub fn connect(&mut self, source: &str, target: &str) -> bool {
        if self.edges.iter().any(|e| e.source == source && e.target == target) {
            return false;
        }
        self.add_edge(Edge::link(source, target));
        true
    }

    /// Drop every link between `a` and `b`, in either direction.
    pub fn remove_links_between(&mut self, a: &str, b: &str) {
        let edges = self
            .edges
            .iter()
            .filter(|e| !((e.source == a && e.target == b) || (e.source == b && e.target == a)))
            .cloned()
            .collect();
        self.set_edges(edges);
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) {
        self.update_node(id, NodeUpdate::data(TaskDataPatch::new().status(status)));
    }

    /// Mark a task completed at 100%.
    pub fn complete_task(&mut self, id: &str) {
        self.update_node(
            id,
            NodeUpdate::data(
                TaskDataPatch::new()
                    .status(TaskStatus::Completed)
                    .completion(100),
            ),
        );
    }

    /// Append a comment by `user`, or by the configured author when `None`.
    /// Blank text is ignored.
    pub fn add_comment(&mut self, id: &str, text: &str, user: Option<&str>) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(node) = self.node(id) else {
            return false;
        };
        let mut comments = node.data.comments.clone();
        let user = user.unwrap_or(self.settings.comment_author.as_str()).to_string();
        comments.push(Comment::new(text, user));
        self.update_node(id, NodeUpdate::data(TaskDataPatch::new().comments(comments)));
        true
    }

    /// Assign a user unless already assigned.
    pub fn assign_user(&mut self, id: &str, assignee: Assignee) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if node.data.assignees.iter().any(|a| a.id == assignee.id) {
            return false;
        }
        let mut assignees = node.data.assignees.clone();
        assignees.push(assignee);
        self.update_node(id, NodeUpdate::data(TaskDataPatch::new().assignees(assignees)));
        true
    }

    pub fn unassign_user(&mut self, id: &str, user_id: &str) {
        let Some(node) = self.node(id) else {
            return;
        };
        let assignees = node
            .data
            .assignees
            .iter()
            .filter(|a| a.id != user_id)
            .cloned()
            .collect();
        self.update_node(id, NodeUpdate::data(TaskDataPatch::new().assignees(assignees)));
    }

    pub fn add_subtask(&mut self, id: &str, label: &str) -> Option<String> {
        let node = self.node(id)?;
        let subtask = Subtask::new(label);
        let subtask_id = subtask.id.clone();
        let mut subtasks = node.data.subtasks.clone();
        subtasks.push(subtask);
        self.update_node(id, NodeUpdate::data(TaskDataPatch::new().subtasks(subtasks)));
        Some(subtask_id)
    }

    pub fn toggle_subtask(&mut self, id: &str, subtask_id: &str) {
        self.edit_subtasks(id, |subtasks| {
            if let Some(s) = subtasks.iter_mut().find(|s| s.id == subtask_id) {
                s.completed = !s.completed;
            }
        });
    }

    pub fn remove_subtask(&mut self, id: &str, subtask_id: &str) {
        self.edit_subtasks(id, |subtasks| subtasks.retain(|s| s.id != subtask_id));
    }

    /// Move subtask `dragged` into the slot currently held by `target`.
    pub fn move_subtask(&mut self, id: &str, dragged: &str, target: &str) {
        if dragged == target {
            return;
        }
        self.edit_subtasks(id, |subtasks| {
            let from = subtasks.iter().position(|s| s.id == dragged);
            let to = subtasks.iter().position(|s| s.id == target);
            if let (Some(from), Some(to)) = (from, to) {
                let moved = subtasks.remove(from);
                subtasks.insert(to, moved);
            }
        });
    }

    fn edit_subtasks(&mut self, id: &str, edit: impl FnOnce(&mut Vec<Subtask>)) {
        let Some(node) = self.node(id) else {
            return;
        };
        let mut subtasks = node.data.subtasks.clone();
        edit(&mut subtasks);
        self.update_node(id, NodeUpdate::data(TaskDataPatch::new().subtasks(subtasks)));
    }

    // --- Import ---

    /// Parse an `.xer` file and add its activities. On failure nothing is
    /// added and the error becomes the status message.
    pub fn import_xer(&mut self, path: &Path, mode: LinkMode) -> Result<ImportSummary> {
        match xer::parse_xer_file(path) {
            Ok(activities) => {
                let summary = self.import_activities(&activities, mode);
                self.status_message = Some(format!(
                    "Imported {} activities ({} links)",
                    summary.nodes, summary.edges
                ));
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!("XER import failed: {}", e);
                self.status_message = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Turn parsed activities into pending nodes laid out on a grid.
    ///
    /// With [`LinkMode::Chain`] each node follows the one before it. With
    /// [`LinkMode::Predecessors`] the parsed predecessor lists are wired
    /// instead; predecessors that were not imported are skipped.
    pub fn import_activities(&mut self, activities: &[Activity], mode: LinkMode) -> ImportSummary {
        let mut summary = ImportSummary::default();
        let mut node_ids: HashMap<&str, String> = HashMap::new();
        let mut created: Vec<(String, &Activity)> = Vec::with_capacity(activities.len());
        let mut last: Option<String> = None;

        for (index, activity) in activities.iter().enumerate() {
            let node = Node::with_data(new_node_id(), xer::grid_position(index), activity.to_task_data());
            let node_id = node.id.clone();
            self.add_node(node);
            summary.nodes += 1;

            if mode == LinkMode::Chain {
                if let Some(prev) = &last {
                    self.add_edge(Edge::link(prev, &node_id));
                    summary.edges += 1;
                }
            }
            node_ids.entry(activity.id.as_str()).or_insert_with(|| node_id.clone());
            created.push((node_id.clone(), activity));
            last = Some(node_id);
        }

        if mode == LinkMode::Predecessors {
            for (node_id, activity) in &created {
                for pred in &activity.predecessors {
                    match node_ids.get(pred.as_str()) {
                        Some(source) => {
                            self.add_edge(Edge::link(source, node_id));
                            summary.edges += 1;
                        }
                        None => tracing::debug!("predecessor {} of {} not imported", pred, activity.id),
                    }
                }
            }
        }

        tracing::info!("imported {} nodes, {} edges", summary.nodes, summary.edges);
        summary
    }

    // --- Internals ---

    /// Record the live graph, tell subscribers, write it out.
    fn commit(&mut self) {
        let snap = self.snapshot();
        self.history.record(snap);
        self.notify();
        self.persist();
    }

    fn restore(&mut self, snap: GraphSnapshot) {
        self.nodes = snap.nodes;
        self.edges = snap.edges;
        self.zones = snap.zones;
        if let Some(sel) = &self.selected_node_id {
            if !self.nodes.iter().any(|n| &n.id == sel) {
                self.selected_node_id = None;
            }
        }
        self.notify();
        self.persist();
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snap = self.snapshot();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snap);
        }
    }

    /// Fire-and-forget write of the live graph; failures are only logged.
    fn persist(&mut self) {
        let envelope = PersistedEnvelope::new(ProjectState::new(self.project_name.clone(), self.snapshot()));
        if let Err(e) = storage::save_state(&mut self.storage, &self.settings.storage_key, &envelope) {
            tracing::warn!("failed to persist project: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{Position, TaskData};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn task(id: &str, label: &str) -> Node {
        Node::with_data(id, Position::default(), TaskData::new(label))
    }

    #[test]
    fn test_add_then_undo_redo() {
        let mut app = WorkflowApp::in_memory();
        assert!(!app.can_undo());
        app.add_node(task("a", "Dig"));
        assert!(app.can_undo());

        app.undo();
        assert!(app.nodes().is_empty());
        assert!(app.can_redo());

        app.redo();
        assert_eq!(app.nodes().len(), 1);
        assert!(!app.can_redo());
    }

    #[test]
    fn test_update_merges_data() {
        let mut app = WorkflowApp::in_memory();
        let mut node = task("a", "Dig");
        node.data.trade = Some("Excavation".into());
        app.add_node(node.clone());

        app.complete_task("a");
        let updated = app.node("a").unwrap();
        assert_eq!(updated.data.status, TaskStatus::Completed);
        assert_eq!(updated.data.completion, Some(100));
        assert_eq!(updated.data.trade, node.data.trade);
        assert_eq!(updated.data.label, "Dig");
    }

    #[test]
    fn test_update_unknown_node_still_records() {
        let mut app = WorkflowApp::in_memory();
        app.update_node("ghost", NodeUpdate::position(Position::new(1.0, 1.0)));
        assert_eq!(app.history().len(), 2);
        assert!(app.nodes().is_empty());
    }

    #[test]
    fn test_remove_node_cascades_and_clears_selection() {
        let mut app = WorkflowApp::in_memory();
        app.add_node(task("a", "A"));
        app.add_node(task("b", "B"));
        app.add_edge(Edge::link("a", "b"));
        app.add_edge(Edge::link("b", "a"));
        app.add_edge(Edge::link("b", "c"));
        app.set_selected_node_id(Some("a".into()));

        app.remove_node("a");
        assert!(app.edges().iter().all(|e| !e.touches("a")));
        assert_eq!(app.edges().len(), 1);
        assert_eq!(app.selected_node_id(), None);
    }

    #[test]
    fn test_connect_skips_duplicates() {
        let mut app = WorkflowApp::in_memory();
        assert!(app.connect("a", "b"));
        assert!(!app.connect("a", "b"));
        assert!(app.connect("b", "a"));
        assert_eq!(app.edges().len(), 2);

        // the store itself does not dedupe
        app.add_edge(Edge::link("a", "b"));
        assert_eq!(app.edges().len(), 3);
    }

    #[test]
    fn test_remove_links_between() {
        let mut app = WorkflowApp::in_memory();
        app.connect("a", "b");
        app.connect("b", "a");
        app.connect("a", "c");
        app.remove_links_between("b", "a");
        assert_eq!(app.edges().len(), 1);
        assert_eq!(app.edges()[0].target, "c");
    }

    #[test]
    fn test_zone_crud() {
        use crate::model::ZoneRect;
        let mut app = WorkflowApp::in_memory();
        app.add_zone(Zone::new("z1", "Level 1", "#ff0000", ZoneRect::default()));
        app.update_zone(
            "z1",
            ZoneUpdate {
                name: Some("Level 2".into()),
                ..Default::default()
            },
        );
        assert_eq!(app.zones()[0].name, "Level 2");
        assert_eq!(app.zones()[0].color, "#ff0000");
        app.remove_zone("z1");
        assert!(app.zones().is_empty());
        app.undo();
        assert_eq!(app.zones()[0].name, "Level 2");
    }

    #[test]
    fn test_duplicate_offsets_copy() {
        let mut app = WorkflowApp::in_memory();
        app.add_node(Node::with_data("a", Position::new(10.0, 10.0), TaskData::new("A")));
        let new_id = app.duplicate_node("a").unwrap();
        let copy = app.node(&new_id).unwrap();
        assert_ne!(new_id, "a");
        assert_eq!(copy.position, Position::new(60.0, 60.0));
        assert_eq!(copy.data.label, "A");
        assert!(app.duplicate_node("missing").is_none());
    }

    #[test]
    fn test_comments_and_assignees() {
        let mut app = WorkflowApp::in_memory();
        app.add_node(task("a", "A"));
        assert!(!app.add_comment("a", "   ", None));
        assert!(app.add_comment("a", " Looks good ", None));
        assert!(app.add_comment("a", "Rebar on site", Some("Site Lead")));
        let comments = &app.node("a").unwrap().data.comments;
        assert_eq!(comments[0].text, "Looks good");
        assert_eq!(comments[0].user, "Current User");
        assert_eq!(comments[1].user, "Site Lead");

        let user = Assignee {
            id: "u1".into(),
            name: "Sam".into(),
            email: "sam@example.com".into(),
            avatar: None,
        };
        assert!(app.assign_user("a", user.clone()));
        assert!(!app.assign_user("a", user));
        app.unassign_user("a", "u1");
        assert!(app.node("a").unwrap().data.assignees.is_empty());
    }

    #[test]
    fn test_subtask_editing() {
        let mut app = WorkflowApp::in_memory();
        app.add_node(task("a", "A"));
        let s1 = app.add_subtask("a", "one").unwrap();
        let s2 = app.add_subtask("a", "two").unwrap();
        let s3 = app.add_subtask("a", "three").unwrap();

        app.move_subtask("a", &s3, &s1);
        let order: Vec<_> = app.node("a").unwrap().data.subtasks.iter().map(|s| s.label.clone()).collect();
        assert_eq!(order, vec!["three", "one", "two"]);

        app.toggle_subtask("a", &s2);
        assert!(app.node("a").unwrap().data.subtasks[2].completed);

        app.remove_subtask("a", &s1);
        assert_eq!(app.node("a").unwrap().data.subtasks.len(), 2);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let mut app = WorkflowApp::in_memory();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = app.subscribe(move |snap| sink.borrow_mut().push(snap.nodes.len()));

        app.add_node(task("a", "A"));
        app.add_node(task("b", "B"));
        app.undo();
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);

        assert!(app.unsubscribe(id));
        app.redo();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_persists_and_reloads_as_history_of_one() {
        let store = MemoryStore::new();
        let mut app = WorkflowApp::new(store.clone(), AppSettings::default());
        app.add_node(task("a", "A"));
        app.add_node(task("b", "B"));
        app.connect("a", "b");
        app.set_project_name("Lot 7");

        let reloaded = WorkflowApp::load(store, AppSettings::default());
        assert_eq!(reloaded.project_name(), "Lot 7");
        assert_eq!(reloaded.nodes().len(), 2);
        assert_eq!(reloaded.edges().len(), 1);
        assert_eq!(reloaded.history().len(), 1);
        assert!(!reloaded.can_undo());
    }

    #[test]
    fn test_broken_saved_state_starts_empty() {
        let mut store = MemoryStore::new();
        store.set_item("workflow-storage", "{ nope").unwrap();
        let app = WorkflowApp::load(store, AppSettings::default());
        assert!(app.nodes().is_empty());
        assert_eq!(app.project_name(), "Untitled Project");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut app = WorkflowApp::in_memory();
        app.add_node(task("a", "A"));
        app.set_project_name("X");
        app.reset();
        assert!(app.nodes().is_empty());
        assert!(!app.can_undo());
        assert_eq!(app.project_name(), "Untitled Project");
        assert_eq!(app.status_message(), Some("New project created"));
        app.dismiss_message();
        assert_eq!(app.status_message(), None);
    }

    fn activities() -> Vec<Activity> {
        xer::parse_xer(
            "%T\tTASK\nA1\tDig\td\t2\nA2\tForm\td\nA3\tPour\td\n%T\tTASKPRED\nA1\tA3\nA9\tA2\n",
        )
        .unwrap()
    }

    #[test]
    fn test_import_chain() {
        let mut app = WorkflowApp::in_memory();
        let summary = app.import_activities(&activities(), LinkMode::Chain);
        assert_eq!(summary, ImportSummary { nodes: 3, edges: 2 });
        let ids: Vec<_> = app.nodes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(app.edges()[0].source, ids[0]);
        assert_eq!(app.edges()[0].target, ids[1]);
        assert_eq!(app.edges()[1].target, ids[2]);
        assert_eq!(app.nodes()[0].data.duration, Some(2));
        assert_eq!(app.nodes()[0].data.status, TaskStatus::Pending);
        assert_eq!(app.nodes()[1].position, xer::grid_position(1));
    }

    #[test]
    fn test_import_predecessors() {
        let mut app = WorkflowApp::in_memory();
        let summary = app.import_activities(&activities(), LinkMode::Predecessors);
        assert_eq!(summary, ImportSummary { nodes: 3, edges: 1 });
        assert_eq!(app.edges()[0].source, app.nodes()[0].id);
        assert_eq!(app.edges()[0].target, app.nodes()[2].id);
    }

    #[test]
    fn test_failed_import_commits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = WorkflowApp::in_memory();
        let result = app.import_xer(&dir.path().join("missing.xer"), LinkMode::Chain);
        assert!(result.is_err());
        assert!(app.nodes().is_empty());
        assert_eq!(app.history().len(), 1);
        assert!(app.status_message().unwrap().contains("Failed to read XER file"));
    }
}
