/// Source of the current user's id, used to stamp outgoing status updates.
pub trait IdentityContext: Send + Sync {
    fn user_id(&self) -> String;
}

/// Fixed identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl IdentityContext for Identity {
    fn user_id(&self) -> String {
        self.user_id.clone()
    }
}
