//! Search utilities for table data.

/// A search term folded once for case-insensitive matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    pub fn new(term: &str) -> Self {
        Self {
            raw: term.to_string(),
            folded: term.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Case-insensitive substring test against a rendered cell.
    pub fn matches(&self, cell: &str) -> bool {
        if self.folded.is_empty() {
            return true;
        }
        cell.to_lowercase().contains(&self.folded)
    }
}

/// Return all cell coordinates containing `query`.
pub fn find_matches(rows: &[Vec<String>], query: &str, ignore_case: bool) -> Vec<(usize, usize)> {
    if query.is_empty() {
        return Vec::new();
    }
    let term = SearchTerm::new(query);
    let mut out = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let hit = if ignore_case {
                term.matches(cell)
            } else {
                cell.contains(query)
            };
            if hit {
                out.push((r, c));
            }
        }
    }
    out
}

/// Advance to the next match index cycling to the start when at the end.
pub fn next_index(current: usize, matches: &[(usize, usize)]) -> usize {
    if matches.is_empty() {
        0
    } else {
        (current + 1) % matches.len()
    }
}

/// Move to the previous match index cycling to the end when at the start.
pub fn prev_index(current: usize, matches: &[(usize, usize)]) -> usize {
    if matches.is_empty() {
        0
    } else if current == 0 {
        matches.len() - 1
    } else {
        current - 1
    }
}
