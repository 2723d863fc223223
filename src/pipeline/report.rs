use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    Unchanged,
    Changed,
    /// Not rewritten: unreadable, unparsable or not writable
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub path: PathBuf,
    pub status: UnitStatus,
    /// Rule names in application order, one entry per change
    pub applied: Vec<&'static str>,
    pub passes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UnitReport {
    pub fn skipped(path: PathBuf, error: impl Into<String>) -> Self {
        Self {
            path,
            status: UnitStatus::Skipped,
            applied: Vec::new(),
            passes: 0,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub units: Vec<UnitReport>,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>, dry_run: bool, units: Vec<UnitReport>) -> Self {
        Self {
            started_at,
            dry_run,
            units,
        }
    }

    fn count(&self, status: UnitStatus) -> usize {
        self.units.iter().filter(|u| u.status == status).count()
    }

    pub fn changed(&self) -> usize {
        self.count(UnitStatus::Changed)
    }

    pub fn unchanged(&self) -> usize {
        self.count(UnitStatus::Unchanged)
    }

    pub fn skipped(&self) -> usize {
        self.count(UnitStatus::Skipped)
    }

    pub fn total_applications(&self) -> usize {
        self.units.iter().map(|u| u.applied.len()).sum()
    }

    pub fn unit(&self, path: &std::path::Path) -> Option<&UnitReport> {
        self.units.iter().find(|u| u.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str, status: UnitStatus, applied: Vec<&'static str>) -> UnitReport {
        UnitReport {
            path: PathBuf::from(name),
            status,
            applied,
            passes: 1,
            error: None,
        }
    }

    #[test]
    fn test_counts() {
        let report = RunReport::new(
            Utc::now(),
            false,
            vec![
                unit("a.php", UnitStatus::Changed, vec!["r", "r"]),
                unit("b.php", UnitStatus::Unchanged, vec![]),
                UnitReport::skipped(PathBuf::from("c.php"), "syntax error"),
            ],
        );
        assert_eq!(report.changed(), 1);
        assert_eq!(report.unchanged(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.total_applications(), 2);
        assert!(report.unit(std::path::Path::new("c.php")).is_some());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_value(unit("a.php", UnitStatus::Changed, vec![])).unwrap();
        assert_eq!(json["status"], "changed");
        assert!(json.get("error").is_none());
    }
}
