//! System settings singleton

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationPolicy {
    pub hours_before: i64,
    pub refund_percentage: i64,
}

/// Settings shipped with a fresh installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub system_name: String,
    pub business_hours: BusinessHours,
    /// Minutes per appointment.
    pub appointment_duration: i64,
    pub max_appointments_per_day: i64,
    pub max_appointments_per_coach: i64,
    pub cancellation_policy: CancellationPolicy,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            system_name: "Gym Management System".to_string(),
            business_hours: BusinessHours {
                start: "08:00".to_string(),
                end: "22:00".to_string(),
            },
            appointment_duration: 60,
            max_appointments_per_day: 8,
            max_appointments_per_coach: 2,
            cancellation_policy: CancellationPolicy {
                hours_before: 24,
                refund_percentage: 100,
            },
        }
    }
}

/// Process-wide settings document. Updates are a shallow merge: top-level
/// keys are overwritten and nested objects are replaced wholesale.
pub struct SettingsStore {
    document: RwLock<Map<String, Value>>,
}

impl SettingsStore {
    pub fn new(initial: &SystemSettings) -> Self {
        let document = match serde_json::to_value(initial) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self {
            document: RwLock::new(document),
        }
    }

    pub async fn get(&self) -> Map<String, Value> {
        self.document.read().await.clone()
    }

    pub async fn merge(&self, patch: Value) -> Result<Map<String, Value>, AppError> {
        let Value::Object(patch) = patch else {
            return Err(AppError::BadRequest(
                "Settings update must be a JSON object".to_string(),
            ));
        };

        let mut document = self.document.write().await;
        for (key, value) in patch {
            document.insert(key, value);
        }
        Ok(document.clone())
    }

    /// Configured appointment length in minutes, if it is a usable number.
    pub async fn appointment_minutes(&self) -> Option<i64> {
        self.document
            .read()
            .await
            .get("appointment_duration")
            .and_then(Value::as_i64)
            .filter(|m| *m > 0)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(&SystemSettings::default())
    }
}
