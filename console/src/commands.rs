//! Console surface over the store. Each command renders its output as a
//! string so the binary only has to print it.

use chrono::NaiveDate;
use entity::Employee;
use platform_api::{ApiError, ApiResult, EmployeeForm};
use platform_authn::{AuthnService, SessionStore, SessionUser};
use platform_db::KvSlot;
use products_hr::{
    Bucket, EmployeeFilter, EmployeeStore, GroupAverage, GroupKey, Summary, Tenure, analytics,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    config::AppConfig,
    render::{EmployeeDetail, EmployeeTable, StatsView},
};

pub struct Console<S> {
    config: AppConfig,
    authn: AuthnService,
    slot: S,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub summary: Summary,
    pub by_department: Vec<Bucket>,
    pub by_status: Vec<Bucket>,
    pub top_positions: Vec<Bucket>,
    pub top_departments: Vec<Bucket>,
    pub salary_by_department: Vec<GroupAverage>,
    pub hires_by_month: Vec<Bucket>,
}

fn to_json<T: Serialize>(value: &T) -> ApiResult<String> {
    serde_json::to_string_pretty(value).map_err(|err| ApiError::internal(err.into()))
}

impl<S: KvSlot> Console<S> {
    pub fn new(config: AppConfig, authn: AuthnService, slot: S) -> Self {
        Self {
            config,
            authn,
            slot,
        }
    }

    fn sessions(&mut self) -> SessionStore<&mut S> {
        SessionStore::new(&mut self.slot)
    }

    /// Open the store on behalf of a signed-in user.
    fn store(&mut self) -> ApiResult<(SessionUser, EmployeeStore<&mut S>)> {
        let user = self.sessions().require()?;
        let store = EmployeeStore::open(&mut self.slot)?;
        Ok((user, store))
    }

    pub fn login(&mut self, email: &str, password: &str) -> ApiResult<String> {
        let mut sessions = SessionStore::new(&mut self.slot);
        let user = sessions.login(&self.authn, email, password)?;
        Ok(format!("Signed in as {} <{}>", user.name, user.email))
    }

    pub fn logout(&mut self) -> ApiResult<String> {
        self.sessions().logout()?;
        Ok("Signed out".to_string())
    }

    pub fn whoami(&mut self) -> ApiResult<String> {
        Ok(match self.sessions().current()? {
            Some(user) => format!(
                "{} <{}> ({}), signed in {}",
                user.name,
                user.email,
                user.role,
                user.signed_in_at.format("%Y-%m-%d %H:%M UTC")
            ),
            None => "Not signed in".to_string(),
        })
    }

    #[instrument(name = "console.list", skip(self))]
    pub fn list(&mut self, filter: &EmployeeFilter, json: bool) -> ApiResult<String> {
        let (_, store) = self.store()?;
        let found = filter.apply(store.list());
        if json {
            return to_json(&found);
        }
        if found.is_empty() {
            return Ok("No employees match".to_string());
        }
        let table = EmployeeTable {
            rows: &found,
            total: store.len(),
        };
        Ok(table.to_string())
    }

    pub fn show(&mut self, id: &str, today: NaiveDate, json: bool) -> ApiResult<String> {
        let (_, store) = self.store()?;
        let employee = store.get(id).ok_or_else(|| ApiError::not_found(id))?;
        let tenure = employee
            .hire_date
            .map(|hire_date| Tenure::between(hire_date, today));
        if json {
            #[derive(Serialize)]
            struct Detail<'a> {
                #[serde(flatten)]
                employee: &'a Employee,
                tenure: Option<Tenure>,
                tenure_label: Option<String>,
            }
            return to_json(&Detail {
                employee,
                tenure,
                tenure_label: tenure.map(|t| t.to_string()),
            });
        }
        Ok(EmployeeDetail { employee, tenure }.to_string())
    }

    #[instrument(name = "console.add", skip_all)]
    pub fn add(&mut self, form: EmployeeForm) -> ApiResult<String> {
        let data = form.into_new_employee()?;
        let (user, mut store) = self.store()?;
        let created = store.add_unique(data)?;
        info!(id = %created.id, by = %user.email, "employee created");
        Ok(format!("Created employee {}: {}", created.id, created.full_name()))
    }

    #[instrument(name = "console.update", skip(self, form))]
    pub fn update(&mut self, id: &str, form: EmployeeForm) -> ApiResult<String> {
        let patch = form.into_patch()?;
        let (user, mut store) = self.store()?;
        if !store.update(id, patch)? {
            return Err(ApiError::not_found(id));
        }
        info!(by = %user.email, "employee updated");
        let name = store.get(id).map(Employee::full_name).unwrap_or_default();
        Ok(format!("Updated employee {id}: {name}"))
    }

    #[instrument(name = "console.delete", skip(self))]
    pub fn delete(&mut self, id: &str) -> ApiResult<String> {
        let (user, mut store) = self.store()?;
        let name = store
            .get(id)
            .map(Employee::full_name)
            .ok_or_else(|| ApiError::not_found(id))?;
        store.delete(id)?;
        info!(by = %user.email, "employee deleted");
        Ok(format!("Deleted employee {id}: {name}"))
    }

    pub fn stats_report(&mut self) -> ApiResult<StatsReport> {
        let top_positions = self.config.top_positions;
        let top_departments = self.config.top_departments;
        let (_, store) = self.store()?;
        let list = store.list();
        Ok(StatsReport {
            summary: analytics::summarize(list),
            by_department: analytics::group_count(list, GroupKey::Department),
            by_status: analytics::group_count(list, GroupKey::Status),
            top_positions: analytics::top_n(list, GroupKey::Position, top_positions),
            top_departments: analytics::top_n(list, GroupKey::Department, top_departments),
            salary_by_department: analytics::average_by_group(
                list,
                GroupKey::Department,
                analytics::salary_of,
            ),
            hires_by_month: analytics::hires_by_month(list),
        })
    }

    pub fn stats(&mut self, json: bool) -> ApiResult<String> {
        let report = self.stats_report()?;
        if json {
            return to_json(&report);
        }
        Ok(StatsView(&report).to_string())
    }

    pub fn seed(&mut self) -> ApiResult<String> {
        let (user, mut store) = self.store()?;
        store.reset()?;
        info!(by = %user.email, "employee list reset to seed records");
        Ok(format!("Restored {} example employees", store.len()))
    }
}
