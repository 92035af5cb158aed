//! Access control service implementation
//!
//! Role-based permission checks for the reservation and edit engines. The
//! acting identity comes from the external identity provider and is trusted;
//! this service only decides what that identity may do. Configured
//! supervisor ids override the stored role.

use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::models::user::{Actor, UserRole};
use crate::utils::errors::{PedalPlanError, Result};

/// Permission levels for backend operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Reserve spots and manage own reservations
    Client,
    /// Create and edit own events
    Organizer,
    /// Moderate events and confirm payments manually
    Administrator,
    /// Full access
    Supervisor,
}

#[derive(Clone)]
pub struct AuthService {
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Effective role for an actor, honoring the configured supervisor list
    pub fn effective_role(&self, actor: Actor) -> UserRole {
        if self.settings.access.supervisor_ids.contains(&actor.user_id) {
            UserRole::Supervisor
        } else {
            actor.role
        }
    }

    /// Administrators and supervisors hold privileged access
    pub fn is_privileged(&self, actor: Actor) -> bool {
        matches!(
            self.effective_role(actor),
            UserRole::Administrator | UserRole::Supervisor
        )
    }

    /// Check if an actor holds a permission level
    pub fn has_permission(&self, actor: Actor, required: Permission) -> bool {
        let granted = match self.effective_role(actor) {
            UserRole::Client => Permission::Client,
            UserRole::Organizer => Permission::Organizer,
            UserRole::Administrator => Permission::Administrator,
            UserRole::Supervisor => Permission::Supervisor,
        };

        Self::permission_includes(granted, required)
    }

    /// Require a permission level or return an error
    pub fn require_permission(&self, actor: Actor, required: Permission) -> Result<()> {
        if self.has_permission(actor, required) {
            debug!(user_id = actor.user_id, required = ?required, "Permission granted");
            Ok(())
        } else {
            warn!(user_id = actor.user_id, required = ?required, "Permission denied");
            Err(PedalPlanError::PermissionDenied(format!(
                "User {} lacks required permission: {:?}",
                actor.user_id, required
            )))
        }
    }

    /// Manual payment confirmation is restricted to privileged roles
    pub fn can_confirm_payment(&self, actor: Actor) -> bool {
        self.is_privileged(actor)
    }

    /// Reservation owners and privileged roles may cancel a reservation
    pub fn can_cancel_reservation(&self, actor: Actor, owner_id: i64) -> bool {
        actor.user_id == owner_id || self.is_privileged(actor)
    }

    /// Require that the actor owns the given record
    pub fn require_owner(&self, actor: Actor, owner_id: i64, what: &str) -> Result<()> {
        if actor.user_id == owner_id {
            Ok(())
        } else {
            warn!(
                user_id = actor.user_id,
                owner_id = owner_id,
                target = what,
                "Ownership check failed"
            );
            Err(PedalPlanError::PermissionDenied(format!(
                "User {} is not the owner of this {}",
                actor.user_id, what
            )))
        }
    }

    /// Get permission hierarchy
    pub fn get_permission_hierarchy() -> Vec<Permission> {
        vec![
            Permission::Client,
            Permission::Organizer,
            Permission::Administrator,
            Permission::Supervisor,
        ]
    }

    /// Check if permission A includes permission B
    pub fn permission_includes(higher: Permission, lower: Permission) -> bool {
        let hierarchy = Self::get_permission_hierarchy();
        let higher_level = hierarchy.iter().position(|&p| p == higher).unwrap_or(0);
        let lower_level = hierarchy.iter().position(|&p| p == lower).unwrap_or(0);

        higher_level >= lower_level
    }
}
