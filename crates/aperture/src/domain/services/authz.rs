//! Authority checks against a studio policy

use crate::domain::entities::StudioContext;
use crate::domain::errors::AuthorizationError;
use crate::domain::value_objects::Authority;

/// Fail unless `authority` is granted by the studio policy
pub fn require_authority(
    studio: &StudioContext,
    authority: Authority,
) -> Result<(), AuthorizationError> {
    if has_authority(studio, authority) {
        Ok(())
    } else {
        Err(AuthorizationError {
            authority,
            studio_id: studio.studio_id,
        })
    }
}

pub fn has_authority(studio: &StudioContext, authority: Authority) -> bool {
    studio.policy.authorities.contains(&authority)
}

/// Requested authorities that are not granted, in requested order
pub fn check_multiple_authorities(
    studio: &StudioContext,
    authorities: &[Authority],
) -> Vec<Authority> {
    authorities
        .iter()
        .copied()
        .filter(|a| !has_authority(studio, *a))
        .collect()
}
