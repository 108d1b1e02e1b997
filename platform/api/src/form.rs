//! Employee form as a UI submits it: raw, untrimmed, possibly missing text.

use chrono::NaiveDate;
use entity::{EmployeePatch, EmployeeStatus, NewEmployee};
use platform_authn::looks_like_email;
use serde::Deserialize;
use tracing::debug;

use crate::{ApiError, ApiResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub salary: Option<String>,
    pub hire_date: Option<String>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub notes: Option<String>,
}

fn filled(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_email(value: String) -> ApiResult<String> {
    if looks_like_email(&value) {
        Ok(value)
    } else {
        Err(ApiError::InvalidInput(format!("{value:?} is not a valid email")))
    }
}

fn parse_date(value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ApiError::InvalidInput(format!("hire date {value:?} must look like YYYY-MM-DD"))
    })
}

fn parse_status(value: &Option<String>) -> Option<EmployeeStatus> {
    filled(value).map(|raw| EmployeeStatus::parse(&raw))
}

impl EmployeeForm {
    /// Validate a creation form. Required: first name, last name, email,
    /// position, department and hire date. Status defaults to Active.
    pub fn into_new_employee(self) -> ApiResult<NewEmployee> {
        let required = [
            ("first name", filled(&self.first_name)),
            ("last name", filled(&self.last_name)),
            ("email", filled(&self.email)),
            ("position", filled(&self.position)),
            ("department", filled(&self.department)),
            ("hire date", filled(&self.hire_date)),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            debug!(?missing, "employee form rejected");
            return Err(ApiError::InvalidInput(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        let [first_name, last_name, email, position, department, hire_date] =
            required.map(|(_, value)| value.unwrap_or_default());

        Ok(NewEmployee {
            first_name,
            last_name,
            email: parse_email(email)?,
            phone: filled(&self.phone).unwrap_or_default(),
            position,
            department,
            salary: filled(&self.salary).unwrap_or_default(),
            hire_date: parse_date(&hire_date)?,
            status: parse_status(&self.status).unwrap_or_default(),
            address: filled(&self.address),
            emergency_contact: filled(&self.emergency_contact),
            emergency_phone: filled(&self.emergency_phone),
            notes: filled(&self.notes),
        })
    }

    /// Build a partial update from the supplied fields. Required fields may
    /// not be blanked; a blank optional field clears it.
    pub fn into_patch(self) -> ApiResult<EmployeePatch> {
        fn required(name: &str, value: &Option<String>) -> ApiResult<Option<String>> {
            match value {
                None => Ok(None),
                Some(_) => filled(value)
                    .map(Some)
                    .ok_or_else(|| ApiError::InvalidInput(format!("{name} cannot be blank"))),
            }
        }

        fn optional(value: &Option<String>) -> Option<Option<String>> {
            value.as_ref().map(|_| filled(value))
        }

        let hire_date = match required("hire date", &self.hire_date)? {
            Some(raw) => Some(parse_date(&raw)?),
            None => None,
        };
        let email = match required("email", &self.email)? {
            Some(raw) => Some(parse_email(raw)?),
            None => None,
        };

        Ok(EmployeePatch {
            first_name: required("first name", &self.first_name)?,
            last_name: required("last name", &self.last_name)?,
            email,
            phone: self.phone.as_deref().map(|v| v.trim().to_string()),
            position: required("position", &self.position)?,
            department: required("department", &self.department)?,
            salary: self.salary.as_deref().map(|v| v.trim().to_string()),
            hire_date,
            status: parse_status(&self.status),
            address: optional(&self.address),
            emergency_contact: optional(&self.emergency_contact),
            emergency_phone: optional(&self.emergency_phone),
            notes: optional(&self.notes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> EmployeeForm {
        EmployeeForm {
            first_name: Some(" Lucía ".into()),
            last_name: Some("Fernández".into()),
            email: Some("lucia@empresa.com".into()),
            position: Some("Analista".into()),
            department: Some("Finanzas".into()),
            hire_date: Some("2024-02-29".into()),
            salary: Some("38000".into()),
            notes: Some("   ".into()),
            ..Default::default()
        }
    }

    #[test]
    fn complete_form_becomes_new_employee() {
        let employee = complete().into_new_employee().unwrap();
        assert_eq!(employee.first_name, "Lucía");
        assert_eq!(employee.hire_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(employee.status, EmployeeStatus::Active);
        assert_eq!(employee.phone, "");
        assert_eq!(employee.notes, None);
    }

    #[test]
    fn lists_every_missing_field() {
        let err = EmployeeForm {
            first_name: Some("Lucía".into()),
            email: Some("  ".into()),
            ..Default::default()
        }
        .into_new_employee()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad request: missing required fields: last name, email, position, department, hire date"
        );
    }

    #[test]
    fn rejects_bad_email_and_date() {
        let mut form = complete();
        form.email = Some("lucia-at-empresa".into());
        assert_eq!(form.into_new_employee().unwrap_err().code(), "INVALID_INPUT");

        let mut form = complete();
        form.hire_date = Some("29/02/2024".into());
        assert!(form.into_new_employee().unwrap_err().to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn spanish_status_is_accepted() {
        let mut form = complete();
        form.status = Some("Licencia".into());
        assert_eq!(form.into_new_employee().unwrap().status, EmployeeStatus::Leave);
    }

    #[test]
    fn patch_carries_only_supplied_fields() {
        let patch = EmployeeForm {
            salary: Some(" 52000 ".into()),
            notes: Some("".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(
            patch,
            EmployeePatch {
                salary: Some("52000".into()),
                notes: Some(None),
                ..Default::default()
            }
        );
        assert!(EmployeeForm::default().into_patch().unwrap().is_empty());
    }

    #[test]
    fn patch_refuses_blank_required_fields() {
        let err = EmployeeForm {
            last_name: Some(" ".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap_err();
        assert_eq!(err.to_string(), "bad request: last name cannot be blank");
    }
}
