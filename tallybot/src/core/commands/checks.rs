use std::fmt::Write;

use twilight_model::{
    guild::Permissions,
    id::{marker::RoleMarker, Id},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckMode {
    /// Every requirement must be met
    All,
    /// At least one requirement must be met
    Some,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    #[error("missing permissions: {0:?}")]
    Missing(Permissions),
    #[error("requires one of the permissions: {0:?}")]
    NoneOf(Permissions),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    #[error("missing roles: {}", mentions(.0))]
    Missing(Vec<Id<RoleMarker>>),
    #[error("requires one of the roles: {}", mentions(.0))]
    NoneOf(Vec<Id<RoleMarker>>),
}

/// Administrators pass every permission check.
pub fn check_permissions(
    permissions: Permissions,
    required: Permissions,
    mode: CheckMode,
) -> Result<(), PermissionError> {
    if permissions.contains(Permissions::ADMINISTRATOR) {
        return Ok(());
    }

    match mode {
        CheckMode::All => {
            let missing = required - permissions;

            if missing.is_empty() {
                Ok(())
            } else {
                Err(PermissionError::Missing(missing))
            }
        }
        CheckMode::Some if required.is_empty() || permissions.intersects(required) => Ok(()),
        CheckMode::Some => Err(PermissionError::NoneOf(required)),
    }
}

/// On failure in [`CheckMode::All`] the missing roles are returned, in
/// [`CheckMode::Some`] all required roles.
///
/// Requiring some out of zero roles always fails.
pub fn check_roles(
    member_roles: &[Id<RoleMarker>],
    required: &[Id<RoleMarker>],
    mode: CheckMode,
) -> Result<(), RoleError> {
    match mode {
        CheckMode::All => {
            let missing: Vec<_> = required
                .iter()
                .filter(|role| !member_roles.contains(role))
                .copied()
                .collect();

            if missing.is_empty() {
                Ok(())
            } else {
                Err(RoleError::Missing(missing))
            }
        }
        CheckMode::Some if required.iter().any(|role| member_roles.contains(role)) => Ok(()),
        CheckMode::Some => Err(RoleError::NoneOf(required.to_vec())),
    }
}

fn mentions(roles: &[Id<RoleMarker>]) -> String {
    let mut s = String::with_capacity(roles.len() * 24);

    for (i, role) in roles.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }

        let _ = write!(s, "<@&{role}>");
    }

    s
}
