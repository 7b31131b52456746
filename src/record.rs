use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum CommitteeType {
    Senate,
    Assembly,
    Joint,
    Other,
}

impl CommitteeType {
    pub const ALL: [CommitteeType; 4] = [
        CommitteeType::Senate,
        CommitteeType::Assembly,
        CommitteeType::Joint,
        CommitteeType::Other,
    ];

    /// Feed path segment and table value.
    pub fn as_str(self) -> &'static str {
        match self {
            CommitteeType::Senate => "Senate",
            CommitteeType::Assembly => "Assembly",
            CommitteeType::Joint => "Joint",
            CommitteeType::Other => "Other",
        }
    }
}

impl fmt::Display for CommitteeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitteeType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommitteeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::CommitteeType(s.to_string()))
    }
}

/// One committee discovered in a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitteeMeta {
    pub name: String,
    pub committee_type: CommitteeType,
    pub link: String,
}

/// Structured roster extracted from one committee page.
/// Every field is `None` or a non-empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterRecord {
    pub header: Option<String>,
    pub chair: Option<String>,
    pub co_chair: Option<String>,
    pub vice_chair: Option<String>,
    pub committee_clerk: Option<String>,
    pub legislative_council_staff: Option<String>,
    pub member: Option<String>,
    pub other: Option<String>,
    pub hearings: Option<String>,
}

impl RosterRecord {
    /// Degraded record for pages that couldn't be read.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Fields in table column order.
    pub fn fields(&self) -> [Option<&str>; 9] {
        [
            self.header.as_deref(),
            self.chair.as_deref(),
            self.co_chair.as_deref(),
            self.vice_chair.as_deref(),
            self.committee_clerk.as_deref(),
            self.legislative_council_staff.as_deref(),
            self.member.as_deref(),
            self.other.as_deref(),
            self.hearings.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitteeRecord {
    pub meta: CommitteeMeta,
    pub roster: RosterRecord,
    pub topic: Option<String>,
}

impl CommitteeRecord {
    pub const COLUMNS: [&'static str; 13] = [
        "CommitteeName",
        "CommitteeType",
        "Link",
        "Header",
        "Chair",
        "CoChair",
        "ViceChair",
        "CommitteeClerk",
        "LegislativeCouncilStaff",
        "Member",
        "Other",
        "Hearings",
        "ComTopics",
    ];

    /// All 13 cells, `None` where absent.
    pub fn cells(&self) -> Vec<Option<&str>> {
        let mut cells = Vec::with_capacity(Self::COLUMNS.len());
        cells.push(Some(self.meta.name.as_str()));
        cells.push(Some(self.meta.committee_type.as_str()));
        cells.push(Some(self.meta.link.as_str()));
        cells.extend(self.roster.fields());
        cells.push(self.topic.as_deref());
        cells
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    ExtraHearingSections,
    MissingRole,
    MissingContent,
    FetchFailed,
    LayoutViolation,
}

/// A recoverable anomaly noticed while building a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    pub snippet: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>, snippet: impl Into<String>) -> Self {
        Warning {
            kind,
            message: message.into(),
            snippet: snippet.into(),
        }
    }
}

/// Join names with `"; "`, skipping blanks. Empty result → `None`.
pub fn join_names(names: &[String]) -> Option<String> {
    let joined = names
        .iter()
        .map(|n| n.as_str())
        .filter(|n| !n.trim().is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    non_empty(joined)
}

pub fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committee_type_parse() {
        assert_eq!("joint".parse::<CommitteeType>(), Ok(CommitteeType::Joint));
        assert_eq!(" Senate ".parse::<CommitteeType>(), Ok(CommitteeType::Senate));
        assert!(matches!(
            "Council".parse::<CommitteeType>(),
            Err(ConfigError::CommitteeType(_))
        ));
    }

    #[test]
    fn join_skips_blanks() {
        let names = vec!["Rep. A".to_string(), "".to_string(), "Sen. B".to_string()];
        assert_eq!(join_names(&names).as_deref(), Some("Rep. A; Sen. B"));
        assert_eq!(join_names(&[]), None);
        assert_eq!(join_names(&["  ".to_string()]), None);
    }

    #[test]
    fn absent_record_has_thirteen_cells() {
        let record = CommitteeRecord {
            meta: CommitteeMeta {
                name: "Senate Committee on Health".into(),
                committee_type: CommitteeType::Senate,
                link: "http://example.org/health".into(),
            },
            roster: RosterRecord::absent(),
            topic: None,
        };
        let cells = record.cells();
        assert_eq!(cells.len(), CommitteeRecord::COLUMNS.len());
        assert_eq!(cells[0], Some("Senate Committee on Health"));
        assert_eq!(cells[1], Some("Senate"));
        assert!(cells[3..].iter().all(|c| c.is_none()));
    }
}
