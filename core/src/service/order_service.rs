use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::OrderError;
use crate::model::order::{OrderRecord, StatusChange, STATUS_COMPLETED, STATUS_PENDING};
use crate::repository::OrderRepository;
use crate::service::notification::{CompletionNotifier, DeliveryOutcome, NotificationChannel};
use crate::time::to_timestamp;

/// Fields an administrator fills in when creating an order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub problem_description: String,
    pub service: String,
    pub quoted_price: String,
    pub assigned_technician: String,
    pub admin_notes: String,
}

impl NewOrder {
    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("customerName", &self.customer_name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("service", &self.service),
            ("quotedPrice", &self.quoted_price),
            ("assignedTechnician", &self.assigned_technician),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }
}

/// What the technician submits when closing a job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub work_done: Option<String>,
    pub extra_charges: Option<String>,
    /// Defaults to the quoted price when absent.
    pub final_amount: Option<String>,
    pub remarks: Option<String>,
}

pub struct OrderService<R: OrderRepository> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_order(&self, new: NewOrder, now: DateTime<Utc>) -> Result<OrderRecord, OrderError> {
        let missing = new.missing_fields();
        if !missing.is_empty() {
            return Err(OrderError::MissingFields(missing));
        }

        let id = Uuid::new_v4();
        let mut order = OrderRecord::new(order_number(&id), new.assigned_technician);
        order.id = id;
        order.customer_name = new.customer_name;
        order.phone = new.phone;
        order.address = new.address;
        order.problem_description = new.problem_description;
        order.service = new.service;
        order.quoted_price = new.quoted_price;
        order.admin_notes = new.admin_notes;
        order.created_at = Some(to_timestamp(now));

        let created = self.repo.create(order)?;
        log::info!(
            "created {} for {} ({})",
            created.order_id,
            created.customer_name,
            created.assigned_technician
        );
        Ok(created)
    }

    pub fn list_orders(&self) -> Result<Vec<OrderRecord>, OrderError> {
        Ok(self.repo.list()?)
    }

    pub fn pending_for(&self, technician: &str) -> Result<Vec<OrderRecord>, OrderError> {
        Ok(self
            .repo
            .list_by_status(STATUS_PENDING)?
            .into_iter()
            .filter(|o| o.assigned_technician == technician)
            .collect())
    }

    /// Looks an order up by document id or by its `ORDER####` number.
    pub fn find(&self, key: &str) -> Result<OrderRecord, OrderError> {
        if let Ok(id) = Uuid::parse_str(key) {
            return self.repo.get(&id)?.ok_or_else(|| OrderError::NotFound(key.to_string()));
        }
        self.repo
            .list()?
            .into_iter()
            .find(|o| o.order_id == key)
            .ok_or_else(|| OrderError::NotFound(key.to_string()))
    }

    pub fn complete_order(
        &self,
        id: &Uuid,
        completion: Completion,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, OrderError> {
        let before = self.repo.get(id)?.ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        if before.is_completed() {
            return Err(OrderError::AlreadyCompleted(before.order_id));
        }

        let mut after = before.clone();
        after.status = STATUS_COMPLETED.to_string();
        after.completed_at = Some(to_timestamp(now));
        after.final_amount = Some(Value::String(
            completion
                .final_amount
                .unwrap_or_else(|| before.quoted_price.clone()),
        ));
        after.work_done = completion.work_done;
        after.extra_charges = completion.extra_charges;
        after.remarks = completion.remarks;

        self.repo.update(&after)?;
        log::info!("{} completed by {}", after.order_id, after.assigned_technician);
        Ok(StatusChange { before, after })
    }

    /// Completes the job, sends the completion notice and flags the order as
    /// notified. Any delivery attempt sets the flag, even when every channel
    /// failed.
    pub fn complete_and_notify<P, F>(
        &self,
        id: &Uuid,
        completion: Completion,
        notifier: &CompletionNotifier<P, F>,
        now: DateTime<Utc>,
    ) -> Result<(StatusChange, DeliveryOutcome), OrderError>
    where
        P: NotificationChannel,
        F: NotificationChannel,
    {
        let change = self.complete_order(id, completion, now)?;
        let outcome = notifier.on_status_change(&change, now);
        if outcome.attempted() {
            self.mark_notified(&change.after.id, now)?;
        }
        Ok((change, outcome))
    }

    pub fn mark_notified(&self, id: &Uuid, now: DateTime<Utc>) -> Result<(), OrderError> {
        let mut order = self.repo.get(id)?.ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        order.notification_sent = true;
        order.notification_time = Some(to_timestamp(now));
        self.repo.update(&order)?;
        Ok(())
    }
}

/// `ORDER1000`..`ORDER9999`, derived from the document id.
pub fn order_number(id: &Uuid) -> String {
    format!("ORDER{}", 1000 + id.as_u128() % 9000)
}
