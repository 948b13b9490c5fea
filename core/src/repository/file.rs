use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use uuid::Uuid;

use crate::model::order::OrderRecord;
use crate::repository::traits::OrderRepository;

const DEFAULT_FILE_NAME: &str = "orders.json";

/// Order collection kept as a single JSON array on disk.
#[derive(Clone)]
pub struct FileOrderRepository {
    file_path: PathBuf,
}

impl FileOrderRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;
        let path = data_dir.join(DEFAULT_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<OrderRecord>::new())?;
            writer.flush()?;
            log::info!("initialized order store at {}", path.display());
        }

        Ok(FileOrderRepository { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_orders(&self) -> Result<Vec<OrderRecord>> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("opening {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        let orders = serde_json::from_reader(reader)
            .with_context(|| format!("parsing {}", self.file_path.display()))?;
        Ok(orders)
    }

    fn write_orders(&self, orders: &[OrderRecord]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, orders)?;
        writer.flush()?;
        Ok(())
    }
}

impl OrderRepository for FileOrderRepository {
    fn create(&self, order: OrderRecord) -> Result<OrderRecord> {
        let mut orders = self.read_orders()?;
        orders.push(order.clone());
        self.write_orders(&orders)?;
        Ok(order)
    }

    fn get(&self, id: &Uuid) -> Result<Option<OrderRecord>> {
        Ok(self.read_orders()?.into_iter().find(|o| o.id == *id))
    }

    fn update(&self, order: &OrderRecord) -> Result<()> {
        let mut orders = self.read_orders()?;
        if let Some(pos) = orders.iter().position(|o| o.id == order.id) {
            orders[pos] = order.clone();
            self.write_orders(&orders)?;
            Ok(())
        } else {
            Err(anyhow!("Order with ID {} not found", order.id))
        }
    }

    fn list(&self) -> Result<Vec<OrderRecord>> {
        self.read_orders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::order::STATUS_COMPLETED;
    use tempfile::tempdir;

    #[test]
    fn test_create_update_and_reload() {
        let dir = tempdir().unwrap();
        let repo = FileOrderRepository::new(dir.path()).unwrap();
        assert!(repo.list().unwrap().is_empty());

        let order = repo
            .create(OrderRecord::new("ORDER1234".into(), "Ali".into()))
            .unwrap();
        repo.create(OrderRecord::new("ORDER5678".into(), "John".into()))
            .unwrap();

        let mut done = order.clone();
        done.status = STATUS_COMPLETED.to_string();
        repo.update(&done).unwrap();

        // A fresh handle sees what the first one wrote.
        let reopened = FileOrderRepository::new(dir.path()).unwrap();
        assert_eq!(reopened.list().unwrap().len(), 2);
        let completed = reopened.list_by_status(STATUS_COMPLETED).unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].order_id, "ORDER1234");
        assert_eq!(reopened.get(&order.id).unwrap(), Some(done));
    }

    #[test]
    fn test_update_missing_order_fails() {
        let dir = tempdir().unwrap();
        let repo = FileOrderRepository::new(dir.path()).unwrap();
        let ghost = OrderRecord::new("ORDER9999".into(), "Min".into());
        assert!(repo.update(&ghost).is_err());
        assert_eq!(repo.get(&ghost.id).unwrap(), None);
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = tempdir().unwrap();
        let repo = FileOrderRepository::new(dir.path()).unwrap();
        fs::write(repo.path(), "not json").unwrap();
        assert!(repo.list().is_err());
    }
}
