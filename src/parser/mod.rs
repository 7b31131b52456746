pub mod hearings;
pub mod roles;
pub mod segment;

use serde::Serialize;

use crate::error::LayoutError;
use crate::record::{non_empty, RosterRecord, Warning, WarningKind};
use roles::Buckets;
pub use segment::NameExceptions;

const HEARINGS_MARKER: &str = "Hearing Notices";
const MEMBERS_MARKER: &str = "Members";

/// Roster of one page plus the anomalies noticed while reading it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub record: RosterRecord,
    pub warnings: Vec<Warning>,
}

/// Page text → roster: segment, split off hearings and the member list,
/// then classify tagged and plain lines into role buckets.
pub fn extract(raw: &str, exceptions: &NameExceptions) -> Result<Extraction, LayoutError> {
    let mut warnings = Vec::new();
    let text = segment::prepare(raw, exceptions);

    let (body, hearings) = split_hearings(&text, &mut warnings);
    let (pre_members, members) = split_members(body)?;
    let (header, persons) = split_header(pre_members);

    let mut buckets = Buckets::default();
    if let Some(persons) = persons {
        roles::classify_persons(persons, &mut buckets, &mut warnings);
    }
    roles::classify_members(members, &mut buckets);

    Ok(Extraction {
        record: buckets.into_record(header, &hearings),
        warnings,
    })
}

/// Returns the text before "Hearing Notices" and the parsed hearings.
/// More than one marker is unexpected: hearings are dropped with a warning.
fn split_hearings<'a>(text: &'a str, warnings: &mut Vec<Warning>) -> (&'a str, Vec<String>) {
    let parts: Vec<&str> = text.split(HEARINGS_MARKER).collect();
    match parts.as_slice() {
        [body] => (*body, Vec::new()),
        [body, segment] => (*body, hearings::parse(segment)),
        [body, ..] => {
            warnings.push(Warning::new(
                WarningKind::ExtraHearingSections,
                format!("Hearing notices split page into {} parts, hearings skipped", parts.len()),
                text,
            ));
            (*body, Vec::new())
        }
        [] => (text, Vec::new()),
    }
}

fn split_members(text: &str) -> Result<(&str, &str), LayoutError> {
    let found = text.matches(MEMBERS_MARKER).count();
    if found != 1 {
        return Err(LayoutError::MembersMarker { found });
    }
    text.split_once(MEMBERS_MARKER)
        .ok_or(LayoutError::MembersMarker { found })
}

/// Blank-line separated chunks: the last one lists tagged persons,
/// anything before it is header prose.
fn split_header(text: &str) -> (Option<String>, Option<&str>) {
    let chunks: Vec<&str> = text
        .trim()
        .split("\n\n")
        .filter(|chunk| !chunk.is_empty())
        .collect();

    let Some((persons, rest)) = chunks.split_last() else {
        return (None, None);
    };
    let header = if rest.is_empty() {
        None
    } else {
        non_empty(
            rest.iter()
                .map(|chunk| chunk.trim_start())
                .collect::<Vec<_>>()
                .join(" "),
        )
    };
    (header, Some(*persons))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &str) -> Extraction {
        extract(raw, &NameExceptions::default()).unwrap()
    }

    fn assert_no_empty_fields(record: &RosterRecord) {
        for field in record.fields().into_iter().flatten() {
            assert!(!field.trim().is_empty(), "empty field in {:?}", record);
        }
    }

    #[test]
    fn header_and_persons() {
        let (header, persons) = split_header("Intro line\n\nJohn Smith (Chair)\nJane Doe");
        assert_eq!(header.as_deref(), Some("Intro line"));
        assert_eq!(persons, Some("John Smith (Chair)\nJane Doe"));
    }

    #[test]
    fn multiple_header_chunks_joined() {
        let (header, persons) = split_header("\nFirst\n\n  Second\n\n\n\nRep. A (Chair)\n");
        assert_eq!(header.as_deref(), Some("First Second"));
        assert_eq!(persons, Some("Rep. A (Chair)"));
    }

    #[test]
    fn single_chunk_has_no_header() {
        let (header, persons) = split_header("Rep. A (Chair)\nRep. B");
        assert_eq!(header, None);
        assert_eq!(persons, Some("Rep. A (Chair)\nRep. B"));
        assert_eq!(split_header("  \n"), (None, None));
    }

    #[test]
    fn members_marker_must_be_unique() {
        assert_eq!(
            split_members("no marker here"),
            Err(LayoutError::MembersMarker { found: 0 })
        );
        assert_eq!(
            split_members("Members\nMembers"),
            Err(LayoutError::MembersMarker { found: 2 })
        );
        assert_eq!(split_members("a\nMembers\nb"), Ok(("a\n", "\nb")));
    }

    #[test]
    fn health_fixture() {
        let raw = std::fs::read_to_string("tests/fixtures/health.txt").unwrap();
        let out = run(&raw);
        let r = &out.record;
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert_eq!(
            r.header.as_deref(),
            Some("The committee considers matters relating to public health.")
        );
        assert_eq!(r.chair.as_deref(), Some("Sen. Vukmir"));
        assert_eq!(r.co_chair, None);
        assert_eq!(r.vice_chair.as_deref(), Some("Sen. Nass"));
        assert_eq!(r.committee_clerk.as_deref(), Some("Ellen Bear (608) 266-2512"));
        assert_eq!(r.legislative_council_staff.as_deref(), Some("Rachel Letzing"));
        assert_eq!(r.member.as_deref(), Some("Sen. Moulton; Sen. Erpenbach"));
        assert_eq!(r.other.as_deref(), Some("(Vacant)"));
        assert_eq!(
            r.hearings.as_deref(),
            Some("Private10/4/2016 10:00 AM-Room 201SE; Public10/11/2016 1:00 PM-Room 300NE")
        );
        assert_no_empty_fields(r);
    }

    #[test]
    fn turnover_fixture_without_chairs() {
        let raw = std::fs::read_to_string("tests/fixtures/turnover.txt").unwrap();
        let out = run(&raw);
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings.iter().all(|w| w.kind == WarningKind::MissingRole));
        assert_eq!(out.record.chair, None);
        assert_eq!(out.record.header, None);
        assert_eq!(
            out.record.member.as_deref(),
            Some("Rep. Kremer; Rep. VanderMeer; Rep. Kremer; Rep. VanderMeer")
        );
        assert_no_empty_fields(&out.record);
    }

    #[test]
    fn short_prefix_surnames_survive_extraction() {
        let out = run(
            "Senate Committee on Labor and RegulatoryNotify\nSen. LeMahieu (Chair)Sen. Nass (Vice-Chair)\n\nMembers\nSen. LeMahieu (Chair)\nSen. Nass (Vice-Chair)\nSen. McDonald",
        );
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        let r = out.record;
        assert_eq!(r.chair.as_deref(), Some("Sen. LeMahieu"));
        assert_eq!(r.vice_chair.as_deref(), Some("Sen. Nass"));
        assert_eq!(r.member.as_deref(), Some("Sen. McDonald"));
    }

    #[test]
    fn repeated_members_heading_is_layout_error() {
        // older pages carried a second "Members" heading above the list
        let raw = "Senate Committee on HealthNotify\nSen. Vukmir (Chair)\n\nMembers\n\nMembers\nSen. Moulton";
        assert_eq!(
            extract(raw, &NameExceptions::default()),
            Err(LayoutError::MembersMarker { found: 2 })
        );
    }

    #[test]
    fn glued_roles_are_separated() {
        let out = run(
            "Assembly Committee on EducationNotify\nRep. Thiesfeldt (Chair)Rep. Kitchens (Vice-Chair)Committee Clerk Jon Bort\n\nMembers\nRep. Thiesfeldt (Chair)Rep. Kitchens (Vice-Chair)Rep. Pope",
        );
        let r = out.record;
        assert_eq!(r.chair.as_deref(), Some("Rep. Thiesfeldt"));
        assert_eq!(r.vice_chair.as_deref(), Some("Rep. Kitchens"));
        assert_eq!(r.committee_clerk.as_deref(), Some("Jon Bort"));
        assert_eq!(r.member.as_deref(), Some("Rep. Pope"));
        assert_eq!(r.hearings, None);
    }

    #[test]
    fn chair_listed_twice_appears_once() {
        let out = run("Notify\nRep. Smith (Chair)\n\nMembers\nRep. Smith (Chair)\nRep. Lee");
        assert_eq!(out.record.chair.as_deref(), Some("Rep. Smith"));
        assert_eq!(out.record.member.as_deref(), Some("Rep. Lee"));
    }

    #[test]
    fn repeated_hearing_marker_drops_hearings() {
        let out = run(
            "Notify\nRep. Smith (Chair)\n\nMembers\nRep. Lee\nHearing Notices\nPublic Session 1\nHearing Notices\nPublic Session 2",
        );
        assert_eq!(out.record.hearings, None);
        assert_eq!(out.record.member.as_deref(), Some("Rep. Lee"));
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].kind, WarningKind::ExtraHearingSections);
    }

    #[test]
    fn missing_members_marker_is_an_error() {
        let err = extract("Notify\nRep. Smith (Chair)", &NameExceptions::default()).unwrap_err();
        assert_eq!(err, LayoutError::MembersMarker { found: 0 });
    }

    #[test]
    fn page_without_preamble_marker() {
        let out = run("Rep. Smith (Chair)\n\nMembers\nRep. Lee");
        assert_eq!(out.record.chair.as_deref(), Some("Rep. Smith"));
        assert_eq!(out.record.member.as_deref(), Some("Rep. Lee"));
    }

    #[test]
    fn nothing_before_members() {
        let out = run("Notify\nMembers\nRep. Lee\n Vacant seat");
        assert!(out.warnings.is_empty());
        assert_eq!(out.record.header, None);
        assert_eq!(out.record.member.as_deref(), Some("Rep. Lee"));
        assert_eq!(out.record.other.as_deref(), Some("Vacant seat"));
        assert_no_empty_fields(&out.record);
    }
}
