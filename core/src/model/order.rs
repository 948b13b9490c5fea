use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_COMPLETED: &str = "Completed";

/// A service order document as it sits in the order store.
///
/// Fields written by the entry and completion forms are kept loosely typed
/// (`String` timestamps, raw `Value` amount) because the store never
/// validated them. Consumers go through `input::parse_amount` and
/// `time::parse_timestamp` instead of reading them directly.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: Uuid,
    pub order_id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub problem_description: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub quoted_price: String,
    #[serde(default)]
    pub assigned_technician: String,
    #[serde(default)]
    pub admin_notes: String,
    pub status: String,

    // Completion form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_amount: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_done: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_charges: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,

    #[serde(default)]
    pub notification_sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_time: Option<String>,
}

impl OrderRecord {
    pub fn new(order_id: String, assigned_technician: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            customer_name: String::new(),
            phone: String::new(),
            address: String::new(),
            problem_description: String::new(),
            service: String::new(),
            quoted_price: String::new(),
            assigned_technician,
            admin_notes: String::new(),
            status: STATUS_PENDING.to_string(),
            final_amount: None,
            work_done: None,
            extra_charges: None,
            remarks: None,
            created_at: None,
            completed_at: None,
            notification_sent: false,
            notification_time: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

/// Before/after pair emitted whenever an order document is updated.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub before: OrderRecord,
    pub after: OrderRecord,
}

impl StatusChange {
    pub fn became_completed(&self) -> bool {
        !self.before.is_completed() && self.after.is_completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_store_document() {
        let doc = json!({
            "id": "6f1c2a9e-0c7b-4b8e-9a53-2f3d7a1b0c11",
            "orderId": "ORDER4821",
            "customerName": "Siti",
            "assignedTechnician": "Ali",
            "status": "Completed",
            "finalAmount": "180.50",
            "createdAt": "2025-03-01T08:00:00Z",
            "completedAt": "2025-03-01T11:30:00Z"
        });

        let order: OrderRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(order.order_id, "ORDER4821");
        assert_eq!(order.final_amount, Some(json!("180.50")));
        assert!(order.is_completed());
        assert!(!order.notification_sent);
        assert_eq!(order.notification_time, None);
        assert_eq!(order.phone, "");
    }

    #[test]
    fn test_status_change_only_fires_on_transition() {
        let mut before = OrderRecord::new("ORDER1000".into(), "Min".into());
        let mut after = before.clone();
        after.status = STATUS_COMPLETED.to_string();

        let change = StatusChange { before: before.clone(), after: after.clone() };
        assert!(change.became_completed());

        before.status = STATUS_COMPLETED.to_string();
        let change = StatusChange { before, after };
        assert!(!change.became_completed());
    }
}
