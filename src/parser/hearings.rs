const ENTRY_SEPARATOR: &str = "\n\n\n\n";

const SESSION_LABELS: &[(&str, &str)] = &[
    ("Executive Session ", "Private"),
    ("Public Session ", "Public"),
];

/// Flatten the text after "Hearing Notices" into one string per hearing.
pub fn parse(segment: &str) -> Vec<String> {
    let mut text = segment.to_string();
    for (label, short) in SESSION_LABELS {
        text = text.replace(label, short);
    }

    text.trim_start()
        .split(ENTRY_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.replace('\n', "-"))
        .collect()
}
