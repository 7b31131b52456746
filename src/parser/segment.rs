use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z)2][A-Z]").unwrap());
static GLUED_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])\(").unwrap());
static CRLF_INDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n *").unwrap());
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());

const PREAMBLE_MARKER: &str = "Notify";

/// Shortest word that can end a glued field. Keeps `LeMahieu` or `McDonald`
/// whole while `KremerRep` still splits.
const MIN_WORD_LEN: usize = 3;

/// Names with an inner capital that must not be broken apart, e.g. `VanderMeer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameExceptions {
    names: Vec<String>,
}

impl NameExceptions {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NameExceptions {
            names: names
                .into_iter()
                .map(Into::into)
                .filter(|n: &String| !n.is_empty())
                .collect(),
        }
    }

    /// Byte ranges of every occurrence of a protected name in `text`.
    fn spans(&self, text: &str) -> Vec<Range<usize>> {
        self.names
            .iter()
            .flat_map(|name| {
                text.match_indices(name.as_str())
                    .map(move |(start, _)| start..start + name.len())
            })
            .collect()
    }
}

impl Default for NameExceptions {
    fn default() -> Self {
        NameExceptions::new(["VanderMeer"])
    }
}

/// Stages 1–4: raw page text → line-segmented working text.
pub fn prepare(raw: &str, exceptions: &NameExceptions) -> String {
    let text = strip_preamble(raw);
    let text = split_words(text, exceptions);
    let text = space_parens(&text);
    normalize_lines(&text)
}

/// Drop everything up to and including the first "Notify".
pub fn strip_preamble(raw: &str) -> &str {
    raw.split_once(PREAMBLE_MARKER)
        .map(|(_, rest)| rest)
        .unwrap_or(raw)
        .trim()
}

/// Break fields that were glued together when the page was flattened:
/// a capital directly after a lowercase letter, `)` or `2` starts a new line,
/// unless the word before it is a short prefix or the split would land
/// inside a protected name.
pub fn split_words(text: &str, exceptions: &NameExceptions) -> String {
    let protected = exceptions.spans(text);
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut last = 0;

    for m in BOUNDARY_RE.find_iter(text) {
        // the preceding class is single-byte ASCII
        let split = m.start() + 1;
        if word_len_before(text, split) < MIN_WORD_LEN {
            continue;
        }
        if protected.iter().any(|r| r.start < split && split < r.end) {
            continue;
        }
        out.push_str(&text[last..split]);
        out.push('\n');
        last = split;
    }
    out.push_str(&text[last..]);
    out
}

fn word_len_before(text: &str, end: usize) -> usize {
    text.as_bytes()[..end]
        .iter()
        .rev()
        .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'(' | b')'))
        .count()
}

/// `Bear(608)` → `Bear (608)`.
pub fn space_parens(text: &str) -> String {
    GLUED_PAREN_RE.replace_all(text, "$1 (").into_owned()
}

pub fn normalize_lines(text: &str) -> String {
    let text = CRLF_INDENT_RE.replace_all(text, "\n");
    SPACES_RE.replace_all(&text, " ").into_owned()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_removed_through_marker() {
        assert_eq!(
            strip_preamble("Senate Committee on HealthNotify\n\n  Sen. Vukmir (Chair) "),
            "Sen. Vukmir (Chair)"
        );
    }

    #[test]
    fn preamble_missing_keeps_text() {
        assert_eq!(strip_preamble("  Members\nRep. Smith \n"), "Members\nRep. Smith");
    }

    #[test]
    fn preamble_only_first_marker() {
        assert_eq!(strip_preamble("aNotify b Notify c"), "b Notify c");
    }

    #[test]
    fn splits_after_lowercase_paren_and_two() {
        let ex = NameExceptions::default();
        assert_eq!(
            split_words("Sen. Vukmir (Chair)Sen. Nass", &ex),
            "Sen. Vukmir (Chair)\nSen. Nass"
        );
        assert_eq!(split_words("Rep. KremerRep. Jacque", &ex), "Rep. Kremer\nRep. Jacque");
        assert_eq!(split_words("266-2512Legislative", &ex), "266-2512\nLegislative");
    }

    #[test]
    fn no_split_after_space_hyphen_or_capital() {
        let ex = NameExceptions::default();
        for text in ["Rep. Smith", "Co-Chair", "AM Room", "2016 10:00 AM", "Room 201SE"] {
            assert_eq!(split_words(text, &ex), text);
        }
    }

    #[test]
    fn protected_name_not_split() {
        let ex = NameExceptions::default();
        assert_eq!(
            split_words("Rep. VanderMeer (Vice-Chair)Rep. Tittl", &ex),
            "Rep. VanderMeer (Vice-Chair)\nRep. Tittl"
        );
    }

    #[test]
    fn exceptions_are_configurable() {
        let ex = NameExceptions::new(["MacDonald"]);
        assert_eq!(split_words("Rep. MacDonald", &ex), "Rep. MacDonald");
        assert_eq!(split_words("Rep. VanderMeer", &ex), "Rep. Vander\nMeer");
        assert_eq!(
            split_words("Rep. MacDonald", &NameExceptions::new(Vec::<String>::new())),
            "Rep. Mac\nDonald"
        );
    }

    #[test]
    fn short_prefix_surnames_not_split() {
        let none = NameExceptions::new(Vec::<String>::new());
        for name in ["Sen. LeMahieu", "Rep. McDonald", "Rep. DeSmet", "Sen. LaSata"] {
            assert_eq!(split_words(name, &none), name);
        }
        assert_eq!(
            split_words("Sen. LeMahieu (Chair)Sen. Nass", &none),
            "Sen. LeMahieu (Chair)\nSen. Nass"
        );
        assert_eq!(split_words("Sen. LeMahieuSen. Nass", &none), "Sen. LeMahieu\nSen. Nass");
    }

    #[test]
    fn split_at_protected_name_edge() {
        // boundary right before a protected name is not inside it
        let ex = NameExceptions::default();
        assert_eq!(split_words("Rep. TittlVanderMeer", &ex), "Rep. Tittl\nVanderMeer");
    }

    #[test]
    fn paren_spacing() {
        assert_eq!(space_parens("Ellen Bear(608) 266-2512"), "Ellen Bear (608) 266-2512");
        assert_eq!(space_parens("Room (2)"), "Room (2)");
        assert_eq!(space_parens("(Chair)(x)"), "(Chair)(x)");
    }

    #[test]
    fn line_normalization() {
        assert_eq!(normalize_lines("a\r\n    b\r\nc"), "a\nb\nc");
        assert_eq!(normalize_lines("Rep.    Smith  (Chair)"), "Rep. Smith (Chair)");
        assert_eq!(normalize_lines("\n   (Vacant)"), "\n (Vacant)");
    }
}
