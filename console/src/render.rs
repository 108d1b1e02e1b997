//! Plain-text views for the console. Each is a `Display` so callers can
//! `to_string()` or write it straight to stdout.

use std::fmt;

use entity::Employee;
use products_hr::{Bucket, Tenure, analytics};

use crate::commands::StatsReport;

fn date_label(employee: &Employee) -> String {
    employee
        .hire_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Filtered list with a header row and a `shown of total` footer.
pub struct EmployeeTable<'a> {
    pub rows: &'a [&'a Employee],
    pub total: usize,
}

impl fmt::Display for EmployeeTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<15} {:<26} {:<32} {:<26} {:<18} {:<10} HIRED",
            "ID", "NAME", "EMAIL", "POSITION", "DEPARTMENT", "STATUS"
        )?;
        for employee in self.rows {
            writeln!(
                f,
                "{:<15} {:<26} {:<32} {:<26} {:<18} {:<10} {}",
                employee.id,
                employee.full_name(),
                employee.email,
                employee.position,
                employee.department,
                employee.status,
                date_label(employee)
            )?;
        }
        write!(f, "{} of {} employees", self.rows.len(), self.total)
    }
}

pub struct EmployeeDetail<'a> {
    pub employee: &'a Employee,
    pub tenure: Option<Tenure>,
}

impl fmt::Display for EmployeeDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.employee;
        let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        writeln!(f, "{} ({})", e.full_name(), e.id)?;
        writeln!(f, "  Email:             {}", e.email)?;
        writeln!(f, "  Phone:             {}", e.phone)?;
        writeln!(f, "  Position:          {}", e.position)?;
        writeln!(f, "  Department:        {}", e.department)?;
        writeln!(f, "  Salary:            {}", e.salary)?;
        writeln!(f, "  Status:            {}", e.status)?;
        writeln!(f, "  Hire date:         {}", date_label(e))?;
        match self.tenure {
            Some(tenure) => writeln!(f, "  Tenure:            {tenure}")?,
            None => writeln!(f, "  Tenure:            -")?,
        }
        writeln!(f, "  Address:           {}", optional(&e.address))?;
        writeln!(
            f,
            "  Emergency contact: {} {}",
            optional(&e.emergency_contact),
            optional(&e.emergency_phone)
        )?;
        write!(f, "  Notes:             {}", optional(&e.notes))
    }
}

fn bucket_lines(title: &str, buckets: &[Bucket], total: usize) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    if buckets.is_empty() {
        lines.push("  (none)".to_string());
    }
    lines.extend(buckets.iter().map(|bucket| {
        format!(
            "  {:<26} {:>4}  {:>5.1}%",
            bucket.key,
            bucket.count,
            analytics::percent_of(bucket.count, total)
        )
    }));
    lines
}

/// Dashboard figures followed by one section per breakdown.
pub struct StatsView<'a>(pub &'a StatsReport);

impl fmt::Display for StatsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let summary = &report.summary;
        let total = summary.total;
        let mut lines = vec![
            format!("Employees:        {total}"),
            format!(
                "Active:           {} ({}% of total)",
                summary.active, summary.active_percent
            ),
            format!("On vacation:      {}", summary.on_vacation),
            format!("Departments:      {}", summary.department_count),
            format!("Average salary:   {:.0}", summary.average_salary),
            String::new(),
        ];
        lines.extend(bucket_lines("By department", &report.by_department, total));
        lines.extend(bucket_lines("By status", &report.by_status, total));
        lines.extend(bucket_lines("Top departments", &report.top_departments, total));
        lines.extend(bucket_lines("Top positions", &report.top_positions, total));
        lines.push("Average salary by department".to_string());
        lines.extend(
            report
                .salary_by_department
                .iter()
                .map(|group| format!("  {:<26} {:>10.0}", group.key, group.average)),
        );
        lines.extend(bucket_lines("Hires by month", &report.hires_by_month, total));
        f.write_str(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use products_hr::seed::seed_employees;

    #[test]
    fn table_lists_rows_and_footer() {
        let seeds = seed_employees();
        let rows: Vec<&Employee> = seeds.iter().take(2).collect();
        let text = EmployeeTable { rows: &rows, total: 3 }.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID "));
        assert!(lines[1].starts_with("1 ") && lines[1].contains("Ana García"));
        assert!(lines[1].ends_with("2023-01-15"));
        assert_eq!(lines[3], "2 of 3 employees");
    }

    #[test]
    fn detail_without_hire_date_shows_dashes() {
        let mut employee = seed_employees().remove(2);
        employee.hire_date = None;
        employee.notes = None;
        let text = EmployeeDetail {
            employee: &employee,
            tenure: None,
        }
        .to_string();
        assert!(text.contains("  Hire date:         -\n"));
        assert!(text.contains("  Tenure:            -\n"));
        assert!(text.ends_with("  Notes:             -"));

        let tenure = Tenure::between(
            NaiveDate::from_ymd_opt(2022, 8, 10).unwrap(),
            NaiveDate::from_ymd_opt(2023, 9, 15).unwrap(),
        );
        let text = EmployeeDetail {
            employee: &seed_employees()[2],
            tenure: Some(tenure),
        }
        .to_string();
        assert!(text.contains("  Tenure:            1 año, 1 mes\n"));
    }
}
