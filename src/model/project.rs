/// A project grouping tasks. Priority drives display ordering and the
/// visual marking in listings; the `open` flag separates active projects
/// from the archived "hall of fame".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub priority: i64,
    pub open: bool,
}

impl Project {
    /// Starred at or above this priority.
    pub const STAR_THRESHOLD: i64 = 10;

    /// Listing marker: starred, muted, or plain.
    pub fn marker(&self) -> char {
        if self.priority >= Self::STAR_THRESHOLD {
            '*'
        } else if self.priority == 0 {
            '.'
        } else {
            ' '
        }
    }
}

/// Sparse project update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub priority: Option<i64>,
    pub open: Option<bool>,
}
