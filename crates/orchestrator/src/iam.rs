//! Least-privilege permission declarations attached to the executor role.

/// One permission triple: a set of actions allowed on a set of resources.
///
/// Statements are scoped to exact resource identifiers — never wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStatement {
    /// Allowed actions, e.g. `kms:Decrypt`.
    pub actions: Vec<String>,
    /// Exact resource identifiers the actions apply to.
    pub resources: Vec<String>,
}

impl PolicyStatement {
    /// Construct a statement from action and resource lists.
    pub fn new<A, R>(actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` if this statement allows `action`.
    pub fn allows(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }
}
