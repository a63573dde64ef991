use skirmish_shared::RemoteValue;

// PropertyChange
/// Sets one property of one game object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub object: String,
    pub property: String,
    pub old_value: RemoteValue,
    pub new_value: RemoteValue,
}

impl PropertyChange {
    pub fn new(
        object: impl Into<String>,
        property: impl Into<String>,
        old_value: impl Into<RemoteValue>,
        new_value: impl Into<RemoteValue>,
    ) -> Self {
        Self {
            object: object.into(),
            property: property.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }
}

// Change
/// A mutation of the shared game state, published to the session change log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Composite(Vec<Change>),
    Property(PropertyChange),
}

impl Change {
    pub fn composite(changes: impl IntoIterator<Item = Change>) -> Self {
        Change::Composite(changes.into_iter().collect())
    }

    /// A composite is empty when every child is; a property change never is
    pub fn is_empty(&self) -> bool {
        match self {
            Change::Composite(children) => children.iter().all(Change::is_empty),
            Change::Property(_) => false,
        }
    }

    /// The change that undoes this one
    pub fn invert(&self) -> Change {
        match self {
            Change::Composite(children) => {
                Change::Composite(children.iter().rev().map(Change::invert).collect())
            }
            Change::Property(change) => Change::Property(PropertyChange {
                object: change.object.clone(),
                property: change.property.clone(),
                old_value: change.new_value.clone(),
                new_value: change.old_value.clone(),
            }),
        }
    }

    /// Unwraps composites of exactly one child, at any depth
    pub fn flatten(self) -> Change {
        match self {
            Change::Composite(mut children) if children.len() == 1 => match children.pop() {
                Some(only) => only.flatten(),
                None => Change::Composite(children),
            },
            other => other,
        }
    }
}

impl From<PropertyChange> for Change {
    fn from(change: PropertyChange) -> Self {
        Change::Property(change)
    }
}
