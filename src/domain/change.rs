use std::fmt;

pub const DELETED_PLACEHOLDER: &str = "File was deleted.";
pub const EMPTY_DIFF_PLACEHOLDER: &str = "No textual diff available (binary or untracked file).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Modified,
    Added,
    Deleted,
    Renamed,
    Untracked,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Modified => "modified",
            ChangeKind::Added => "added",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Untracked => "untracked",
        }
    }

    /// Classifies the two-character `XY` marker of `git status --porcelain`.
    pub fn from_porcelain(marker: &str) -> Self {
        let mut chars = marker.chars();
        let index = chars.next().unwrap_or(' ');
        let worktree = chars.next().unwrap_or(' ');

        if index == '?' || worktree == '?' {
            ChangeKind::Untracked
        } else if index == 'R' || index == 'C' {
            ChangeKind::Renamed
        } else if index == 'D' || worktree == 'D' {
            ChangeKind::Deleted
        } else if index == 'A' {
            ChangeKind::Added
        } else {
            ChangeKind::Modified
        }
    }

    /// Classifies the status column of `git diff --name-status`.
    pub fn from_name_status(status: &str) -> Self {
        match status.chars().next() {
            Some('A') => ChangeKind::Added,
            Some('D') => ChangeKind::Deleted,
            Some('R') | Some('C') => ChangeKind::Renamed,
            _ => ChangeKind::Modified,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub path: String,
    pub kind: ChangeKind,
    /// Source path of a rename or copy.
    pub previous_path: Option<String>,
}

impl ChangeEntry {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            previous_path: None,
        }
    }

    pub fn renamed(previous_path: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            previous_path: Some(previous_path.into()),
            ..Self::new(path, ChangeKind::Renamed)
        }
    }

    /// Every path a commit of this entry has to cover.
    pub fn paths(&self) -> Vec<String> {
        self.previous_path
            .iter()
            .chain(std::iter::once(&self.path))
            .cloned()
            .collect()
    }

    /// Parses one line of `git status --porcelain` output.
    ///
    /// The first three characters are the status marker and its separator; the
    /// rest is the path, or `old -> new` for renames, in which case the new path
    /// wins.
    pub fn from_porcelain_line(line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }
        let kind = ChangeKind::from_porcelain(line.get(..2)?);
        let rest = line.get(3..)?.trim();
        if let (ChangeKind::Renamed, Some((old_path, new_path))) = (kind, rest.rsplit_once(" -> ")) {
            let (old_path, new_path) = (old_path.trim(), new_path.trim());
            if new_path.is_empty() {
                return None;
            }
            return Some(Self::renamed(unquote_path(old_path), unquote_path(new_path)));
        }
        if rest.is_empty() {
            return None;
        }
        Some(Self::new(unquote_path(rest), kind))
    }

    /// Parses one line of `git diff --cached --name-status` output.
    pub fn from_name_status_line(line: &str) -> Option<Self> {
        let mut fields = line.split('\t');
        let status = fields.next()?.trim();
        let paths: Vec<&str> = fields.map(str::trim).collect();
        let kind = ChangeKind::from_name_status(status);
        match (kind, paths.as_slice()) {
            _ if status.is_empty() => None,
            (ChangeKind::Renamed, [old_path, new_path]) if !new_path.is_empty() => {
                Some(Self::renamed(unquote_path(old_path), unquote_path(new_path)))
            }
            (_, [.., path]) if !path.is_empty() => Some(Self::new(unquote_path(path), kind)),
            _ => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.kind == ChangeKind::Deleted
    }
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.path)
    }
}

/// Undoes git's C-style quoting of paths with unusual characters.
fn unquote_path(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut iter = inner.bytes().peekable();
    while let Some(byte) = iter.next() {
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }
        match iter.next() {
            Some(b'n') => bytes.push(b'\n'),
            Some(b't') => bytes.push(b'\t'),
            Some(b'r') => bytes.push(b'\r'),
            Some(b'a') => bytes.push(0x07),
            Some(b'b') => bytes.push(0x08),
            Some(b'f') => bytes.push(0x0c),
            Some(b'v') => bytes.push(0x0b),
            Some(digit @ b'0'..=b'7') => {
                let mut value = u32::from(digit - b'0');
                for _ in 0..2 {
                    match iter.peek() {
                        Some(next @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(next - b'0');
                            iter.next();
                        }
                        _ => break,
                    }
                }
                bytes.push(value as u8);
            }
            Some(other) => bytes.push(other),
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub diff: String,
}

/// Ordered per-file diffs, rendered into the text handed to the generator.
#[derive(Debug, Clone, Default)]
pub struct DiffSummary {
    files: Vec<FileDiff>,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a file's diff, substituting a placeholder when git produced no text.
    pub fn push(&mut self, path: impl Into<String>, diff: impl Into<String>) {
        let diff = diff.into();
        let diff = if diff.trim().is_empty() {
            EMPTY_DIFF_PLACEHOLDER.to_string()
        } else {
            diff
        };
        self.files.push(FileDiff {
            path: path.into(),
            diff,
        });
    }

    pub fn push_deleted(&mut self, path: impl Into<String>) {
        self.files.push(FileDiff {
            path: path.into(),
            diff: DELETED_PLACEHOLDER.to_string(),
        });
    }

    pub fn files(&self) -> &[FileDiff] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn render(&self) -> String {
        self.files
            .iter()
            .map(|file| format!("[File: {}] Diff:\n{}", file.path, file.diff))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
