use anyhow::{anyhow, Result};
use reqwest::Method;
use tracing::{debug, error, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::BackendClient;

use crate::models::{HorariosResponse, SaveSummary};
use crate::services::week::WeekSchedule;

/// Loads and persists weekly schedules through the clinic REST API.
pub struct ScheduleService {
    client: BackendClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: BackendClient::new(config),
        }
    }

    /// Fetch the persisted week for an employee. Employees without saved
    /// slots come back as an all-inactive week.
    pub async fn load_week(&self, employee_id: Uuid) -> Result<WeekSchedule> {
        debug!("Loading schedule for employee {}", employee_id);

        let path = format!("/empleados/{}/horarios", employee_id);
        let payload: HorariosResponse = self.client.request(Method::GET, &path, None).await?;

        let week = WeekSchedule::from_payload(&payload);
        info!(
            "Loaded schedule for employee {}: {} active days",
            employee_id,
            week.days.iter().filter(|day| day.active).count()
        );
        Ok(week)
    }

    /// Persist the whole week: delete every stored record for the
    /// employee, then create one record per slot of every active day.
    /// There is no transaction across the two calls; if the create fails
    /// after the delete succeeded, the employee is left with no persisted
    /// schedule and the returned error says so.
    pub async fn save_week(&self, employee_id: Uuid, week: &WeekSchedule) -> Result<SaveSummary> {
        let records = week.to_records(employee_id);
        debug!(
            "Saving {} slot records for employee {}",
            records.len(),
            employee_id
        );

        let delete_path = format!("/empleados/{}/horarios", employee_id);
        self.client
            .request_no_content(Method::DELETE, &delete_path, None)
            .await?;

        let body = serde_json::to_value(&records)?;
        if let Err(e) = self
            .client
            .request_no_content(Method::POST, "/horarios/multiple", Some(body))
            .await
        {
            error!(
                "Create failed after delete, employee {} has no persisted schedule",
                employee_id
            );
            return Err(anyhow!(
                "Schedule save incomplete, the previous schedule was already removed: {}",
                e
            ));
        }

        info!(
            "Saved schedule for employee {}: {} records",
            employee_id,
            records.len()
        );
        Ok(SaveSummary {
            created: records.len(),
        })
    }
}
