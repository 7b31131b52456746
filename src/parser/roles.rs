use crate::record::{join_names, RosterRecord, Warning, WarningKind};

/// Tagged roles, in the order tags are tried against a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Chair,
    CoChair,
    ViceChair,
    CommitteeClerk,
    LegislativeCouncilStaff,
}

impl Role {
    pub const PRIORITY: [Role; 5] = [
        Role::Chair,
        Role::CoChair,
        Role::ViceChair,
        Role::CommitteeClerk,
        Role::LegislativeCouncilStaff,
    ];

    /// The only tags repeated in the plain member list.
    pub const CHAIR_FAMILY: [Role; 3] = [Role::Chair, Role::CoChair, Role::ViceChair];

    fn tag(self) -> &'static str {
        match self {
            Role::Chair => " (Chair)",
            Role::CoChair => " (Co-Chair)",
            Role::ViceChair => " (Vice-Chair)",
            Role::CommitteeClerk => "Committee Clerk ",
            Role::LegislativeCouncilStaff => "Legislative Council Staff ",
        }
    }

    pub fn bucket(self) -> Bucket {
        match self {
            Role::Chair => Bucket::Chair,
            Role::CoChair => Bucket::CoChair,
            Role::ViceChair => Bucket::ViceChair,
            Role::CommitteeClerk => Bucket::CommitteeClerk,
            Role::LegislativeCouncilStaff => Bucket::LegislativeCouncilStaff,
        }
    }

    /// Name carried by `line` if it holds this role's tag exactly once.
    /// Chairs are written "Name (Chair)", staff "Committee Clerk Name".
    fn name_in(self, line: &str) -> Option<&str> {
        let tag = self.tag();
        let (before, after) = line.split_once(tag)?;
        if after.contains(tag) {
            return None;
        }
        match self {
            Role::Chair | Role::CoChair | Role::ViceChair => Some(before),
            Role::CommitteeClerk | Role::LegislativeCouncilStaff => Some(after),
        }
    }
}

/// First role in `roles` whose tag splits the line.
fn match_role<'a>(line: &'a str, roles: &[Role]) -> Option<(Role, &'a str)> {
    roles
        .iter()
        .find_map(|&role| role.name_in(line).map(|name| (role, name)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Chair,
    CoChair,
    ViceChair,
    CommitteeClerk,
    LegislativeCouncilStaff,
    Member,
    Other,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Buckets {
    chair: Vec<String>,
    co_chair: Vec<String>,
    vice_chair: Vec<String>,
    committee_clerk: Vec<String>,
    legislative_council_staff: Vec<String>,
    member: Vec<String>,
    other: Vec<String>,
}

impl Buckets {
    pub fn get(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::Chair => &self.chair,
            Bucket::CoChair => &self.co_chair,
            Bucket::ViceChair => &self.vice_chair,
            Bucket::CommitteeClerk => &self.committee_clerk,
            Bucket::LegislativeCouncilStaff => &self.legislative_council_staff,
            Bucket::Member => &self.member,
            Bucket::Other => &self.other,
        }
    }

    fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<String> {
        match bucket {
            Bucket::Chair => &mut self.chair,
            Bucket::CoChair => &mut self.co_chair,
            Bucket::ViceChair => &mut self.vice_chair,
            Bucket::CommitteeClerk => &mut self.committee_clerk,
            Bucket::LegislativeCouncilStaff => &mut self.legislative_council_staff,
            Bucket::Member => &mut self.member,
            Bucket::Other => &mut self.other,
        }
    }

    fn push(&mut self, bucket: Bucket, name: &str) {
        self.get_mut(bucket).push(name.to_string());
    }

    fn push_unique(&mut self, bucket: Bucket, name: &str) {
        if !self.get(bucket).iter().any(|n| n == name) {
            self.push(bucket, name);
        }
    }

    pub fn into_record(self, header: Option<String>, hearings: &[String]) -> RosterRecord {
        RosterRecord {
            header,
            chair: join_names(&self.chair),
            co_chair: join_names(&self.co_chair),
            vice_chair: join_names(&self.vice_chair),
            committee_clerk: join_names(&self.committee_clerk),
            legislative_council_staff: join_names(&self.legislative_council_staff),
            member: join_names(&self.member),
            other: join_names(&self.other),
            hearings: join_names(hearings),
        }
    }
}

/// Which bucket an untagged line in the persons block continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoleState {
    /// No tagged line seen yet (happens on pages between sessions).
    Unassigned,
    Active(Role),
}

/// Classify the role-tagged lines above the member list.
pub fn classify_persons(block: &str, buckets: &mut Buckets, warnings: &mut Vec<Warning>) {
    let mut state = RoleState::Unassigned;

    for line in block.split('\n') {
        if line.is_empty() {
            continue;
        }

        if let Some((role, name)) = match_role(line, &Role::PRIORITY) {
            buckets.push(role.bucket(), name);
            state = RoleState::Active(role);
            continue;
        }

        // a name wrapped onto its own line
        let name = line.trim_start();
        match state {
            RoleState::Active(role) => buckets.push(role.bucket(), name),
            RoleState::Unassigned => {
                warnings.push(Warning::new(
                    WarningKind::MissingRole,
                    "Missing committee chairs, line added as member",
                    line,
                ));
                buckets.push(Bucket::Member, name);
            }
        }
    }
}

/// Classify the plain list after "Members". Chairs are listed again here;
/// those already recorded are skipped.
pub fn classify_members(text: &str, buckets: &mut Buckets) {
    for line in text.split('\n') {
        if line.is_empty() {
            continue;
        }

        if let Some((role, name)) = match_role(line, &Role::CHAIR_FAMILY) {
            buckets.push_unique(role.bucket(), name);
        } else if line.starts_with(' ') {
            buckets.push(Bucket::Other, line.trim());
        } else {
            buckets.push(Bucket::Member, line);
        }
    }
}

// ── Tests ──
