//! Primavera P6 XER import.
//!
//! XER is tab-delimited text. `%T` lines open a table (`TASK`, `TASKPRED`,
//! ...); rows follow until the next `%T`. Only the task and predecessor
//! tables are read, everything else is skipped.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::node::{Position, TaskData, TaskStatus};

/// Failures of an XER import. Each one aborts the whole import.
#[derive(Debug, thiserror::Error)]
pub enum XerError {
    #[error("Please upload a valid XER file: {0}")]
    UnsupportedFile(PathBuf),

    #[error("Failed to read XER file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse XER file at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: csv::Error,
    },
}

/// One activity read from the `TASK` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub duration: Option<i64>,
    /// Raw, uninterpreted start date.
    pub start_date: Option<String>,
    /// Predecessor ids in first-seen order, no duplicates.
    pub predecessors: Vec<String>,
}

impl Activity {
    /// Data for the node this activity becomes on import.
    pub fn to_task_data(&self) -> TaskData {
        TaskData {
            label: self.name.clone(),
            status: TaskStatus::Pending,
            description: Some(self.description.clone()),
            start_date: self.start_date.clone(),
            duration: self.duration,
            ..Default::default()
        }
    }
}

/// How imported activities get linked together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Each activity follows the one imported before it.
    #[default]
    Chain,
    /// Links come from the `TASKPRED` table.
    Predecessors,
}

impl FromStr for LinkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chain" => Ok(LinkMode::Chain),
            "predecessors" | "pred" => Ok(LinkMode::Predecessors),
            other => Err(format!("unknown link mode '{}' (expected chain or predecessors)", other)),
        }
    }
}

/// Canvas position of the `index`-th imported activity: 250px columns,
/// a new 150px row every five activities.
pub fn grid_position(index: usize) -> Position {
    Position::new(100.0 + index as f64 * 250.0, 100.0 + (index / 5) as f64 * 150.0)
}

/// Split a row on tabs. Quotes are not special in XER.
fn split_fields(line: &str) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(record.iter().map(str::to_string).collect())
    } else {
        Ok(Vec::new())
    }
}

/// Leading integer of `s` (`"5 days"` -> 5). `None` if there are no digits.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let n: i64 = rest[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Parse XER text into activities, in file order.
pub fn parse_xer(content: &str) -> Result<Vec<Activity>, XerError> {
    let mut activities: Vec<Activity> = Vec::new();
    let mut section: Option<String> = None;

    for (i, raw) in content.split('\n').enumerate() {
        let line = raw.trim();
        let fields = || split_fields(line).map_err(|source| XerError::Parse { line: i + 1, source });

        if line.starts_with("%T") {
            section = fields()?.into_iter().nth(1);
            continue;
        }
        if line.starts_with('%') {
            continue;
        }

        match section.as_deref() {
            Some("TASK") => {
                let fields = fields()?;
                if fields.len() < 3 {
                    continue;
                }
                activities.push(Activity {
                    id: fields[0].clone(),
                    name: fields[1].clone(),
                    description: fields[2].clone(),
                    duration: fields.get(3).and_then(|f| parse_leading_int(f)).filter(|d| *d != 0),
                    start_date: fields.get(4).cloned(),
                    predecessors: Vec::new(),
                });
            }
            Some("TASKPRED") => {
                let fields = fields()?;
                if fields.len() < 2 {
                    continue;
                }
                let (pred, task_id) = (&fields[0], &fields[1]);
                match activities.iter_mut().find(|a| &a.id == task_id) {
                    Some(task) => {
                        if !task.predecessors.contains(pred) {
                            task.predecessors.push(pred.clone());
                        }
                    }
                    None => tracing::debug!("TASKPRED row {} names unknown task '{}'", i + 1, task_id),
                }
            }
            _ => {}
        }
    }

    Ok(activities)
}

/// Read and parse an `.xer` file.
///
/// Invalid UTF-8 is replaced rather than rejected, since P6 exports are
/// often in a legacy code page.
pub fn parse_xer_file(path: &Path) -> Result<Vec<Activity>, XerError> {
    let is_xer = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xer"))
        .unwrap_or(false);
    if !is_xer {
        return Err(XerError::UnsupportedFile(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| XerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    let activities = parse_xer(&content)?;
    tracing::info!("parsed {} activities from {:?}", activities.len(), path);
    Ok(activities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_task_document() {
        let doc = "%T\tTASK\nT1\tFoundation\tPour footing\t5\t2024-01-01\n";
        let activities = parse_xer(doc).unwrap();
        assert_eq!(
            activities,
            vec![Activity {
                id: "T1".into(),
                name: "Foundation".into(),
                description: "Pour footing".into(),
                duration: Some(5),
                start_date: Some("2024-01-01".into()),
                predecessors: vec![],
            }]
        );
    }

    #[test]
    fn test_predecessors_recorded_once() {
        let doc = "%T\tTASK\n\
                   T1\tDig\tExcavate\n\
                   T2\tPour\tPour slab\n\
                   %T\tTASKPRED\n\
                   T1\tT2\n\
                   T1\tT2\n";
        let activities = parse_xer(doc).unwrap();
        assert_eq!(activities[1].predecessors, vec!["T1".to_string()]);
        assert!(activities[0].predecessors.is_empty());
    }

    #[test]
    fn test_short_rows_skipped() {
        let doc = "%T\tTASK\nT1\tOnly two\n\nT2\tDig\tdesc\n%T\tTASKPRED\nlonely\n";
        let activities = parse_xer(doc).unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].id, "T2");
        assert_eq!(activities[0].duration, None);
        assert_eq!(activities[0].start_date, None);
    }

    #[test]
    fn test_no_task_header_yields_nothing() {
        let doc = "ERMHDR\t8.0\nT1\tDig\tdesc\t3\n%T\tPROJECT\nP1\tTower\tx\n";
        assert!(parse_xer(doc).unwrap().is_empty());
        assert!(parse_xer("").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_sections_and_percent_rows_ignored() {
        let doc = "%T\tTASK\n%F\ttask_id\ttask_name\n%R\tX\tY\tZ\nT1\tDig\tdesc\n%T\tCALENDAR\nC1\tStd\tcal\n";
        let activities = parse_xer(doc).unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].id, "T1");
    }

    #[test]
    fn test_crlf_and_quotes_kept_verbatim() {
        let doc = "%T\tTASK\r\nT1\t\"Slab\" pour\tdesc\t3d\r\n";
        let activities = parse_xer(doc).unwrap();
        assert_eq!(activities[0].name, "\"Slab\" pour");
        assert_eq!(activities[0].duration, Some(3));
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int(" 7.5"), Some(7));
        assert_eq!(parse_leading_int("-2"), Some(-2));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_grid_position_wraps_rows() {
        assert_eq!(grid_position(0), Position::new(100.0, 100.0));
        assert_eq!(grid_position(4), Position::new(1100.0, 100.0));
        assert_eq!(grid_position(5), Position::new(1350.0, 250.0));
    }

    #[test]
    fn test_file_extension_checked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.txt");
        std::fs::write(&path, "%T\tTASK\nT1\tDig\tdesc\n").unwrap();
        assert!(matches!(parse_xer_file(&path), Err(XerError::UnsupportedFile(_))));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.XER");
        assert!(matches!(parse_xer_file(&path), Err(XerError::Read { .. })));
    }

    #[test]
    fn test_file_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.xer");
        std::fs::write(&path, b"%T\tTASK\nT1\tDig\tdesc\xff\n").unwrap();
        let activities = parse_xer_file(&path).unwrap();
        assert_eq!(activities.len(), 1);
        assert!(activities[0].description.starts_with("desc"));
    }

    #[test]
    fn test_link_mode_from_str() {
        assert_eq!("Chain".parse::<LinkMode>(), Ok(LinkMode::Chain));
        assert_eq!("predecessors".parse::<LinkMode>(), Ok(LinkMode::Predecessors));
        assert!("tree".parse::<LinkMode>().is_err());
    }

    #[test]
    fn test_zero_duration_is_unset() {
        let doc = "%T\tTASK\nT1\tKickoff\tmeeting\t0\nT2\tDig\tdesc\t0.5\n";
        let activities = parse_xer(doc).unwrap();
        assert_eq!(activities[0].duration, None);
        assert_eq!(activities[1].duration, None);
    }

    #[test]
    fn test_bare_carriage_return_stays_in_field() {
        let doc = "%T\tTASK\nT1\tSlab\rpour\tdesc\t4\t2024-02-01\n";
        let activities = parse_xer(doc).unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].name, "Slab\rpour");
        assert_eq!(activities[0].duration, Some(4));
        assert_eq!(activities[0].start_date.as_deref(), Some("2024-02-01"));
    }
}
