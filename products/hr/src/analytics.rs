//! Derived statistics over an employee list.
//!
//! Everything here is a pure function of its input slice: no caching, no
//! access to the store. An empty list always yields zeros or empty vectors.

use std::collections::HashMap;

use chrono::Datelike;
use entity::Employee;
use serde::Serialize;

/// Label used for records whose grouping field is blank.
pub const UNSPECIFIED: &str = "Unspecified";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKey {
    Department,
    Status,
    Position,
}

impl GroupKey {
    pub fn label<'a>(&self, employee: &'a Employee) -> &'a str {
        let raw = match self {
            GroupKey::Department => employee.department.as_str(),
            GroupKey::Status => employee.status.as_str(),
            GroupKey::Position => employee.position.as_str(),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() { UNSPECIFIED } else { trimmed }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub key: String,
    pub count: usize,
}

impl Bucket {
    fn new(key: &str, count: usize) -> Self {
        Self {
            key: key.to_string(),
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupAverage {
    pub key: String,
    pub count: usize,
    pub total: f64,
    pub average: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub on_vacation: usize,
    /// Rounded to the nearest whole percent.
    pub active_percent: u32,
    pub department_count: usize,
    pub average_salary: f64,
}

/// Parse a stored amount the way a lenient form would: the longest leading
/// numeric prefix counts, anything else is zero.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return if value.is_finite() { value } else { 0.0 };
    }

    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return 0.0;
    }
    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn salary_of(employee: &Employee) -> f64 {
    parse_amount(&employee.salary)
}

/// Share of `count` in `total`, in percent. Zero when `total` is zero.
pub fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

/// Count records per key, buckets in first-seen order.
pub fn group_count(employees: &[Employee], key: GroupKey) -> Vec<Bucket> {
    count_labels(employees.iter().map(|e| key.label(e)))
}

fn count_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<Bucket> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();
    for label in labels {
        match index.get(label) {
            Some(&slot) => buckets[slot].count += 1,
            None => {
                index.insert(label, buckets.len());
                buckets.push(Bucket::new(label, 1));
            }
        }
    }
    buckets
}

/// The `n` largest buckets; equal counts keep first-seen order.
pub fn top_n(employees: &[Employee], key: GroupKey, n: usize) -> Vec<Bucket> {
    let mut buckets = group_count(employees, key);
    // stable sort
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(n);
    buckets
}

/// Mean of `value` per group, in first-seen group order.
pub fn average_by_group<F>(employees: &[Employee], key: GroupKey, value: F) -> Vec<GroupAverage>
where
    F: Fn(&Employee) -> f64,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupAverage> = Vec::new();
    for employee in employees {
        let label = key.label(employee);
        let amount = value(employee);
        let slot = *index.entry(label).or_insert_with(|| {
            groups.push(GroupAverage {
                key: label.to_string(),
                count: 0,
                total: 0.0,
                average: 0.0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.count += 1;
        group.total += amount;
    }
    for group in &mut groups {
        group.average = group.total / group.count as f64;
    }
    groups
}

pub fn summarize(employees: &[Employee]) -> Summary {
    let total = employees.len();
    if total == 0 {
        return Summary::default();
    }
    let active = employees.iter().filter(|e| e.status.is_active()).count();
    let on_vacation = employees
        .iter()
        .filter(|e| matches!(e.status, entity::EmployeeStatus::Vacation))
        .count();
    let department_count = group_count(employees, GroupKey::Department).len();
    let salary_total: f64 = employees.iter().map(salary_of).sum();

    Summary {
        total,
        active,
        on_vacation,
        active_percent: percent_of(active, total).round() as u32,
        department_count,
        average_salary: salary_total / total as f64,
    }
}

/// Hires per calendar month (`YYYY-MM`), oldest first. Records without a
/// hire date are left out.
pub fn hires_by_month(employees: &[Employee]) -> Vec<Bucket> {
    let mut months: Vec<(i32, u32)> = employees
        .iter()
        .filter_map(|e| e.hire_date)
        .map(|date| (date.year(), date.month()))
        .collect();
    months.sort_unstable();
    let labels: Vec<String> = months
        .into_iter()
        .map(|(year, month)| format!("{year:04}-{month:02}"))
        .collect();
    count_labels(labels.iter().map(String::as_str))
}
