//! The admission rule for committee registrations.
//!
//! Stores gather the facts (committee capacity, current head count, whether the
//! matriculation number is already taken) inside whatever atomic section they
//! provide and let [`admit`] decide, so every store rejects in the same order.

use crate::error::RegistrationError;

/// Capacity and head count of a committee as seen inside the admission section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitteeSlot {
    pub max_members: i32,
    pub registered: i64,
}

impl CommitteeSlot {
    #[must_use]
    pub fn available_members(self) -> i64 {
        available_members(self.max_members, self.registered)
    }
}

#[must_use]
pub fn available_members(max_members: i32, registered: i64) -> i64 {
    i64::from(max_members) - registered
}

/// `committee` is `None` when the committee does not exist under the resolved event.
pub fn admit(
    committee: Option<CommitteeSlot>,
    already_registered: bool,
) -> Result<(), RegistrationError> {
    let committee = committee.ok_or(RegistrationError::InvalidSelection)?;
    if committee.available_members() <= 0 {
        return Err(RegistrationError::CapacityExceeded);
    }
    if already_registered {
        return Err(RegistrationError::DuplicateRegistrant);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn slot(max_members: i32, registered: i64) -> Option<CommitteeSlot> {
        Some(CommitteeSlot {
            max_members,
            registered,
        })
    }

    #[test]
    fn admits_when_space_is_left() {
        assert!(admit(slot(3, 0), false).is_ok());
        assert!(admit(slot(3, 2), false).is_ok());
    }

    #[test]
    fn unknown_committee_is_an_invalid_selection() {
        assert!(matches!(
            admit(None, true),
            Err(RegistrationError::InvalidSelection)
        ));
    }

    #[test]
    fn full_committee_is_rejected_before_the_duplicate_check() {
        assert!(matches!(
            admit(slot(1, 1), true),
            Err(RegistrationError::CapacityExceeded)
        ));
        assert!(matches!(
            admit(slot(2, 5), false),
            Err(RegistrationError::CapacityExceeded)
        ));
    }

    #[test]
    fn duplicate_registrant_is_rejected() {
        assert!(matches!(
            admit(slot(10, 1), true),
            Err(RegistrationError::DuplicateRegistrant)
        ));
    }

    #[test]
    fn availability_is_capacity_minus_head_count() {
        assert_eq!(available_members(5, 0), 5);
        assert_eq!(available_members(5, 3), 2);
        assert_eq!(available_members(1, 1), 0);
        assert_eq!(slot(4, 1).map(CommitteeSlot::available_members), Some(3));
    }
}
