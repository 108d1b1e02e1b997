use entity::{Employee, EmployeeStatus};

/// Dashboard list filter. Unset criteria match every record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of full name, email or position.
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeeFilter {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = sanitize(term.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = sanitize(department.into());
        self
    }

    pub fn status(mut self, status: EmployeeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            employee.full_name().to_lowercase().contains(&term)
                || employee.email.to_lowercase().contains(&term)
                || employee.position.to_lowercase().contains(&term)
        });
        let matches_department = self
            .department
            .as_deref()
            .is_none_or(|department| employee.department == department);
        let matches_status = self
            .status
            .as_ref()
            .is_none_or(|status| employee.status == *status);
        matches_search && matches_department && matches_status
    }

    /// Matching records in list order.
    pub fn apply<'a>(&self, employees: &'a [Employee]) -> Vec<&'a Employee> {
        employees.iter().filter(|e| self.matches(e)).collect()
    }
}

fn sanitize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
