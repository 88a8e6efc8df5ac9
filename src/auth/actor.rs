use crate::error::{AppError, AppResult};
use crate::model::{Role, StaffId, StaffMember};

/// The staff member on whose behalf a service call runs. Establishing who
/// that is (login, sessions) happens outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub staff_id: StaffId,
    pub role: Role,
}

impl From<&StaffMember> for Actor {
    fn from(member: &StaffMember) -> Self {
        Actor {
            staff_id: member.id,
            role: member.role,
        }
    }
}

impl Actor {
    pub fn new(staff_id: StaffId, role: Role) -> Self {
        Self { staff_id, role }
    }

    fn deny(&self, action: &'static str) -> AppError {
        AppError::AccessDenied {
            action,
            role: self.role,
        }
    }

    pub fn require_bursar(&self, action: &'static str) -> AppResult<()> {
        if self.role == Role::Bursar {
            Ok(())
        } else {
            Err(self.deny(action))
        }
    }

    /// Headteacher or deputy.
    pub fn require_school_admin(&self, action: &'static str) -> AppResult<()> {
        if self.role.is_school_admin() {
            Ok(())
        } else {
            Err(self.deny(action))
        }
    }

    /// Headteacher, deputy or bursar: the roles that read reports.
    pub fn require_management(&self, action: &'static str) -> AppResult<()> {
        if self.role.is_school_admin() || self.role == Role::Bursar {
            Ok(())
        } else {
            Err(self.deny(action))
        }
    }

    pub fn require_role(&self, role: Role, action: &'static str) -> AppResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(self.deny(action))
        }
    }

    /// Any role except student.
    pub fn require_staff(&self, action: &'static str) -> AppResult<()> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(self.deny(action))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bursar_only_actions() {
        assert!(Actor::new(1, Role::Bursar).require_bursar("pay").is_ok());
        let err = Actor::new(1, Role::Headteacher)
            .require_bursar("pay")
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::AccessDenied {
                action: "pay",
                role: Role::Headteacher
            }
        ));
    }

    #[test]
    fn management_includes_bursar_but_not_teachers() {
        for role in [Role::Headteacher, Role::Deputy, Role::Bursar] {
            assert!(Actor::new(1, role).require_management("report").is_ok());
        }
        for role in [Role::Teacher, Role::Student] {
            assert!(Actor::new(1, role).require_management("report").is_err());
        }
    }

    #[test]
    fn students_are_not_staff() {
        assert!(Actor::new(1, Role::Student).require_staff("check in").is_err());
        assert!(Actor::new(1, Role::Teacher).require_staff("check in").is_ok());
        assert!(Actor::new(1, Role::Bursar).require_school_admin("approve").is_err());
    }
}
