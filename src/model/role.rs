use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Headteacher,
    Deputy,
    Bursar,
}

impl Role {
    /// Roles that receive a monthly salary run.
    pub const SALARIED: [Role; 3] = [Role::Teacher, Role::Headteacher, Role::Deputy];

    /// Roles that see the administrative dashboard.
    pub fn is_school_admin(&self) -> bool {
        matches!(self, Role::Headteacher | Role::Deputy)
    }

    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Student)
    }

    pub fn is_salaried(&self) -> bool {
        Self::SALARIED.contains(self)
    }
}
