use crate::model::order::OrderRecord;
use crate::model::role::Role;
use anyhow::Result;
use uuid::Uuid;

pub trait OrderRepository {
    fn create(&self, order: OrderRecord) -> Result<OrderRecord>;
    fn get(&self, id: &Uuid) -> Result<Option<OrderRecord>>;
    fn update(&self, order: &OrderRecord) -> Result<()>;
    fn list(&self) -> Result<Vec<OrderRecord>>;

    fn list_by_status(&self, status: &str) -> Result<Vec<OrderRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|o| o.status == status)
            .collect())
    }
}

/// Maps a signed-in name to its role.
pub trait RoleDirectory {
    fn role_of(&self, name: &str) -> Role;
}
