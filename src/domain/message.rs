use std::fmt;

/// Recognized commit categories, in the order they are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitCategory {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Chore,
    Ci,
}

impl CommitCategory {
    pub const ALL: [CommitCategory; 9] = [
        CommitCategory::Feat,
        CommitCategory::Fix,
        CommitCategory::Docs,
        CommitCategory::Style,
        CommitCategory::Refactor,
        CommitCategory::Perf,
        CommitCategory::Test,
        CommitCategory::Chore,
        CommitCategory::Ci,
    ];

    pub const DEFAULT: CommitCategory = CommitCategory::Refactor;

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitCategory::Feat => "feat",
            CommitCategory::Fix => "fix",
            CommitCategory::Docs => "docs",
            CommitCategory::Style => "style",
            CommitCategory::Refactor => "refactor",
            CommitCategory::Perf => "perf",
            CommitCategory::Test => "test",
            CommitCategory::Chore => "chore",
            CommitCategory::Ci => "ci",
        }
    }

    /// Comma separated token list used in the generation prompt.
    pub fn token_list() -> String {
        Self::ALL
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Matches a category token at the start of `text`, ignoring ASCII case.
    fn strip_from(text: &str) -> Option<(Self, &str)> {
        Self::ALL.iter().find_map(|category| {
            let token = category.as_str();
            let head = text.get(..token.len())?;
            head.eq_ignore_ascii_case(token)
                .then(|| (*category, &text[token.len()..]))
        })
    }
}

impl fmt::Display for CommitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-line commit message: `<category>: <description>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub category: CommitCategory,
    pub description: String,
}

impl CommitMessage {
    /// Coerces arbitrary generated text into a categorized message.
    ///
    /// Prefix matching is a plain case-insensitive `starts_with` in the order of
    /// [`CommitCategory::ALL`], so `"circle"` is read as `ci` + `"rcle"`. Text
    /// without a recognized token falls back to [`CommitCategory::DEFAULT`].
    /// Re-sanitizing an already sanitized message is not guaranteed to be a
    /// no-op.
    pub fn sanitize(raw: &str) -> Self {
        let line = first_line(raw);

        match CommitCategory::strip_from(line) {
            Some((category, rest)) => Self {
                category,
                description: strip_separator(rest).to_string(),
            },
            None => Self {
                category: CommitCategory::DEFAULT,
                description: line.to_string(),
            },
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.description.is_empty()
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.description)
    }
}

fn first_line(raw: &str) -> &str {
    raw.lines()
        .map(|line| line.trim().trim_matches('`').trim())
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Drops a conventional-commit separator left right after the token: an
/// attached `(scope)` and `!` only count when a `:` follows them.
fn strip_separator(rest: &str) -> &str {
    let mut marker = rest;
    if marker.starts_with('(') {
        if let Some(end) = marker.find(')') {
            marker = &marker[end + 1..];
        }
    }
    marker = marker.strip_prefix('!').unwrap_or(marker);

    let separator = if marker.len() == rest.len() {
        marker.trim_start().strip_prefix(':')
    } else {
        marker.strip_prefix(':')
    };
    separator.unwrap_or(rest).trim()
}
