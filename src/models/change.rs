/// What a [`Change`] did to its key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Create => "create",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        }
    }
}

/// Before/after pair describing a create, update or delete of one record.
///
/// At least one side is always present. The fields are private so that a
/// `Change` can only be built through [`Change::created`], [`Change::updated`]
/// and [`Change::deleted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    before: Option<T>,
    after: Option<T>,
}

impl<T> Change<T> {
    pub fn created(after: T) -> Self {
        Self {
            before: None,
            after: Some(after),
        }
    }

    pub fn updated(
        before: T,
        after: T,
    ) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }

    pub fn deleted(before: T) -> Self {
        Self {
            before: Some(before),
            after: None,
        }
    }

    pub fn before(&self) -> Option<&T> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&T> {
        self.after.as_ref()
    }

    pub fn kind(&self) -> ChangeKind {
        match (&self.before, &self.after) {
            (None, Some(_)) => ChangeKind::Create,
            (Some(_), Some(_)) => ChangeKind::Update,
            (Some(_), None) => ChangeKind::Delete,
            (None, None) => unreachable!("Change constructed with neither before nor after"),
        }
    }

    pub fn into_parts(self) -> (Option<T>, Option<T>) {
        (self.before, self.after)
    }
}

pub type DesiredLRPChange = Change<super::DesiredLRP>;
pub type ActualLRPChange = Change<super::ActualLRP>;
