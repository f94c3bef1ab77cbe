use curvelog_core::Commit;

/// The shared, append-only commit log. Insertion order is chronological and
/// the histories of different features interleave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitLog {
    commits: Vec<Commit>,
}

impl CommitLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Commit> {
        self.commits.get(index)
    }

    pub fn last(&self) -> Option<&Commit> {
        self.commits.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Commit> {
        self.commits.iter()
    }

    pub(crate) fn push(&mut self, commit: Commit) {
        self.commits.push(commit);
    }

    pub(crate) fn pop(&mut self) -> Option<Commit> {
        self.commits.pop()
    }

    /// Index of the nearest commit for `feature` strictly before `before`.
    pub fn previous_for_feature(&self, feature: &str, before: usize) -> Option<usize> {
        let end = before.min(self.commits.len());
        self.commits[..end]
            .iter()
            .rposition(|c| c.feature_name == feature)
    }

    /// Index of the most recent commit for `feature`.
    pub fn last_for_feature(&self, feature: &str) -> Option<usize> {
        self.previous_for_feature(feature, self.commits.len())
    }

    /// Index of the first commit for `feature`, its origin.
    pub fn origin_for_feature(&self, feature: &str) -> Option<usize> {
        self.commits.iter().position(|c| c.feature_name == feature)
    }
}

impl<'a> IntoIterator for &'a CommitLog {
    type Item = &'a Commit;
    type IntoIter = std::slice::Iter<'a, Commit>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.iter()
    }
}

/// LIFO stack of commits removed from the log tail by undo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedoBuffer {
    commits: Vec<Commit>,
}

impl RedoBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// The commit the next redo would restore.
    pub fn peek(&self) -> Option<&Commit> {
        self.commits.last()
    }

    pub(crate) fn push(&mut self, commit: Commit) {
        self.commits.push(commit);
    }

    pub(crate) fn pop(&mut self) -> Option<Commit> {
        self.commits.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.commits.clear();
    }
}
