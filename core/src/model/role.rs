use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "admin")]
    Administrator,
    Technician,
    Customer,
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

/// Whoever is looking at the dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Viewer {
    pub name: String,
    pub role: Role,
}

impl Viewer {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }
}
