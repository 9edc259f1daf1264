use devstart_core::identity::is_valid_dev_ens_name;
use devstart_core::ProjectIdentity;

use crate::error::{PreflightError, ValidationOutcome};

/// Reject identities whose ENS name is not `<label>.aragonpm.eth`. No I/O.
pub fn check_identity(identity: &ProjectIdentity) -> ValidationOutcome {
    if is_valid_dev_ens_name(identity.ens_like_name.as_str()) {
        Ok(())
    } else {
        Err(PreflightError::InvalidIdentityName {
            name: identity.ens_like_name.clone(),
        })
    }
}
