//! Group creation flow. Validates the name and member roster before the
//! gateway call, mirroring what the service enforces.

use crate::domain::{DomainError, Group, GroupMember, Session};
use crate::ports::ExpenseGateway;
use crate::usecases::auth_service::is_valid_email;
use std::sync::Arc;
use tracing::info;

/// Roster cap enforced at entry time.
pub const MAX_GROUP_MEMBERS: usize = 10;

pub struct GroupService {
    gateway: Arc<dyn ExpenseGateway>,
}

impl GroupService {
    pub fn new(gateway: Arc<dyn ExpenseGateway>) -> Self {
        Self { gateway }
    }

    pub async fn groups(&self, session: &Session) -> Result<Vec<Group>, DomainError> {
        self.gateway.groups_for_user(session).await
    }

    /// Create a group with an initial roster. Returns the service's
    /// confirmation message.
    pub async fn create(
        &self,
        session: &Session,
        group_name: &str,
        members: &[GroupMember],
    ) -> Result<String, DomainError> {
        let group_name = group_name.trim();
        if group_name.is_empty() {
            return Err(DomainError::Input("Group name is required".to_string()));
        }
        if members.is_empty() {
            return Err(DomainError::Input(
                "A group needs at least one member".to_string(),
            ));
        }
        if members.len() > MAX_GROUP_MEMBERS {
            return Err(DomainError::Input(format!(
                "A group can have at most {} members",
                MAX_GROUP_MEMBERS
            )));
        }
        for member in members {
            if member.username.trim().is_empty() {
                return Err(DomainError::Input(
                    "Every member needs a username".to_string(),
                ));
            }
            if !is_valid_email(&member.email) {
                return Err(DomainError::Input(format!(
                    "Invalid email: {}",
                    member.email
                )));
            }
        }
        let message = self.gateway.create_group(session, group_name, members).await?;
        info!(group_name, members = members.len(), "group created");
        Ok(message)
    }
}
