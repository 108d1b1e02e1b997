use std::{convert::Infallible, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::lenient;

/// Department names offered by the employee form. Records may carry any other string.
pub const DEPARTMENTS: [&str; 7] = [
    "Tecnología",
    "Diseño",
    "Marketing",
    "Ventas",
    "Recursos Humanos",
    "Finanzas",
    "Gestión",
];

/// Opaque employee identifier, assigned once by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::text(deserializer).map(Self)
    }
}

impl EmployeeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of ids minted from timestamps or seed counters.
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EmployeeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for EmployeeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EmployeeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Vacation,
    Leave,
    Inactive,
    /// Any label outside the known set, kept verbatim. Never one of the
    /// stored labels matched by [`EmployeeStatus::from_stored`].
    Other(String),
}

impl EmployeeStatus {
    pub const KNOWN: [EmployeeStatus; 4] = [
        EmployeeStatus::Active,
        EmployeeStatus::Vacation,
        EmployeeStatus::Leave,
        EmployeeStatus::Inactive,
    ];

    /// Case-insensitive; also understands the Spanish labels older data was saved with.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "active" | "activo" => Self::Active,
            "vacation" | "vacaciones" => Self::Vacation,
            "leave" | "licencia" => Self::Leave,
            "inactive" | "inactivo" => Self::Inactive,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Exact match on a persisted label, English or Spanish. Anything else is
    /// kept as it was written.
    pub fn from_stored(raw: String) -> Self {
        match raw.as_str() {
            "Active" | "Activo" => Self::Active,
            "Vacation" | "Vacaciones" => Self::Vacation,
            "Leave" | "Licencia" => Self::Leave,
            "Inactive" | "Inactivo" => Self::Inactive,
            _ => Self::Other(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Vacation => "Vacation",
            Self::Leave => "Leave",
            Self::Inactive => "Inactive",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<'de> Deserialize<'de> for EmployeeStatus {
    /// `null` reads as the default status.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::scalar(deserializer)?
            .map(Self::from_stored)
            .unwrap_or_default())
    }
}

impl From<EmployeeStatus> for String {
    fn from(value: EmployeeStatus) -> Self {
        match value {
            EmployeeStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A stored employee. Decoding is lenient: missing or `null` fields take
/// their defaults and numbers are accepted where text is expected, so one
/// hand-edited record never makes the whole list unreadable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(deserialize_with = "lenient::text")]
    pub first_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub last_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::text")]
    pub position: String,
    #[serde(deserialize_with = "lenient::text")]
    pub department: String,
    /// Kept as entered; parsed only when aggregated.
    #[serde(deserialize_with = "lenient::text")]
    pub salary: String,
    /// `None` when the stored value is blank or not a date.
    #[serde(with = "lenient::date")]
    pub hire_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
    #[serde(
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
    #[serde(
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub emergency_contact: Option<String>,
    #[serde(
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub emergency_phone: Option<String>,
    #[serde(
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

impl Employee {
    pub fn new(id: EmployeeId, data: NewEmployee) -> Self {
        let NewEmployee {
            first_name,
            last_name,
            email,
            phone,
            position,
            department,
            salary,
            hire_date,
            status,
            address,
            emergency_contact,
            emergency_phone,
            notes,
        } = data;
        Self {
            id,
            first_name,
            last_name,
            email,
            phone,
            position,
            department,
            salary,
            hire_date: Some(hire_date),
            status,
            address,
            emergency_contact,
            emergency_phone,
            notes,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An employee as submitted for creation, before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub department: String,
    pub salary: String,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Field-level update. `None` leaves a field alone; for optional fields
/// `Some(None)` clears the value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub salary: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
    pub address: Option<Option<String>>,
    pub emergency_contact: Option<Option<String>>,
    pub emergency_phone: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, employee: &mut Employee) {
        fn merge<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        merge(&mut employee.first_name, self.first_name);
        merge(&mut employee.last_name, self.last_name);
        merge(&mut employee.email, self.email);
        merge(&mut employee.phone, self.phone);
        merge(&mut employee.position, self.position);
        merge(&mut employee.department, self.department);
        merge(&mut employee.salary, self.salary);
        if let Some(hire_date) = self.hire_date {
            employee.hire_date = Some(hire_date);
        }
        merge(&mut employee.status, self.status);
        merge(&mut employee.address, self.address);
        merge(&mut employee.emergency_contact, self.emergency_contact);
        merge(&mut employee.emergency_phone, self.emergency_phone);
        merge(&mut employee.notes, self.notes);
    }
}

impl From<NewEmployee> for EmployeePatch {
    fn from(value: NewEmployee) -> Self {
        Self {
            first_name: Some(value.first_name),
            last_name: Some(value.last_name),
            email: Some(value.email),
            phone: Some(value.phone),
            position: Some(value.position),
            department: Some(value.department),
            salary: Some(value.salary),
            hire_date: Some(value.hire_date),
            status: Some(value.status),
            address: Some(value.address),
            emergency_contact: Some(value.emergency_contact),
            emergency_phone: Some(value.emergency_phone),
            notes: Some(value.notes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Employee {
        Employee::new(
            EmployeeId::from("7"),
            NewEmployee {
                first_name: "Ana".into(),
                last_name: "García".into(),
                email: "ana.garcia@empresa.com".into(),
                phone: "+1 (555) 123-4567".into(),
                position: "Desarrolladora Frontend".into(),
                department: "Tecnología".into(),
                salary: "45000".into(),
                hire_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
                status: EmployeeStatus::Active,
                address: None,
                emergency_contact: Some("Carlos García".into()),
                emergency_phone: None,
                notes: None,
            },
        )
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], json!("7"));
        assert_eq!(value["firstName"], json!("Ana"));
        assert_eq!(value["hireDate"], json!("2023-01-15"));
        assert_eq!(value["status"], json!("Active"));
        assert_eq!(value["emergencyContact"], json!("Carlos García"));
        assert!(value.get("address").is_none());
    }

    #[test]
    fn reads_spanish_status_labels() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["status"] = json!("Vacaciones");
        let parsed: Employee = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.status, EmployeeStatus::Vacation);
        assert_eq!(EmployeeStatus::parse(" licencia "), EmployeeStatus::Leave);
        assert_eq!(
            EmployeeStatus::parse("Contractor"),
            EmployeeStatus::Other("Contractor".into())
        );
        assert_eq!(String::from(EmployeeStatus::Other("Contractor".into())), "Contractor");
    }

    #[test]
    fn unknown_status_labels_reload_verbatim() {
        for raw in [" Contractor ", "active", "VACACIONES", ""] {
            let mut employee = sample();
            employee.status = EmployeeStatus::from_stored(raw.to_string());
            assert_eq!(employee.status, EmployeeStatus::Other(raw.to_string()));
            let encoded = serde_json::to_string(&employee).unwrap();
            let decoded: Employee = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, employee);
        }
        assert_eq!(
            EmployeeStatus::from_stored("Licencia".into()),
            EmployeeStatus::Leave
        );
    }

    #[test]
    fn partial_record_decodes_with_defaults() {
        let raw = json!({
            "id": 17,
            "firstName": "Ana",
            "salary": 45000,
            "hireDate": "",
            "status": null,
            "notes": null
        });
        let parsed: Employee = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.id, "17");
        assert_eq!(parsed.first_name, "Ana");
        assert_eq!(parsed.department, "");
        assert_eq!(parsed.position, "");
        assert_eq!(parsed.salary, "45000");
        assert_eq!(parsed.hire_date, None);
        assert_eq!(parsed.status, EmployeeStatus::Active);
        assert_eq!(parsed.notes, None);

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["hireDate"], json!(""));
        assert_eq!(value["salary"], json!("45000"));
    }

    #[test]
    fn hire_date_accepts_timestamps_and_drops_garbage() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["hireDate"] = json!("2023-01-15T00:00:00.000Z");
        let parsed: Employee = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(parsed.hire_date, NaiveDate::from_ymd_opt(2023, 1, 15));

        value["hireDate"] = json!("someday");
        let parsed: Employee = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.hire_date, None);
    }

    #[test]
    fn missing_optional_fields_default_to_none() {
        let raw = json!({
            "id": "1",
            "firstName": "Ana",
            "lastName": "García",
            "email": "a@b.co",
            "phone": "",
            "position": "Dev",
            "department": "Tecnología",
            "salary": "",
            "hireDate": "2023-01-15",
            "status": "Activo"
        });
        let parsed: Employee = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.notes, None);
        assert!(parsed.status.is_active());
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut employee = sample();
        let before = employee.clone();
        EmployeePatch {
            salary: Some("50000".into()),
            emergency_contact: Some(None),
            ..Default::default()
        }
        .apply_to(&mut employee);

        assert_eq!(employee.salary, "50000");
        assert_eq!(employee.emergency_contact, None);
        assert_eq!(employee.first_name, before.first_name);
        assert_eq!(employee.hire_date, before.hire_date);
        assert_eq!(employee.id, before.id);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut employee = sample();
        let patch = EmployeePatch::default();
        assert!(patch.is_empty());
        patch.apply_to(&mut employee);
        assert_eq!(employee, sample());
    }
}
