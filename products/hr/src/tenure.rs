use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Time in the company, in 30-day months. Derived for display, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tenure {
    pub days: i64,
    pub months: i64,
    pub years: i64,
}

impl Tenure {
    /// Whole days between the two dates regardless of order; months are
    /// `days / 30` and years `months / 12`, both floored.
    pub fn between(hire_date: NaiveDate, today: NaiveDate) -> Self {
        let days = (today - hire_date).num_days().abs();
        let months = days / 30;
        Self {
            days,
            months,
            years: months / 12,
        }
    }

    /// Months left over after whole years.
    pub fn remainder_months(&self) -> i64 {
        self.months % 12
    }
}

fn plural(count: i64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

impl fmt::Display for Tenure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.years >= 1 {
            write!(
                f,
                "{}, {}",
                plural(self.years, "año", "años"),
                plural(self.remainder_months(), "mes", "meses")
            )
        } else {
            f.write_str(&plural(self.months, "mes", "meses"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn thirteen_months_reads_one_year_one_month() {
        let today = ymd(2026, 10, 19);
        let hired = today.checked_sub_months(Months::new(13)).unwrap();
        let tenure = Tenure::between(hired, today);
        assert_eq!(tenure.years, 1);
        assert_eq!(tenure.remainder_months(), 1);
        assert_eq!(tenure.to_string(), "1 año, 1 mes");
    }

    #[test]
    fn under_a_year_reports_months_only() {
        let tenure = Tenure::between(ymd(2026, 5, 1), ymd(2026, 10, 19));
        assert_eq!(tenure.days, 171);
        assert_eq!(tenure.to_string(), "5 meses");
        assert_eq!(Tenure::between(ymd(2026, 9, 1), ymd(2026, 10, 5)).to_string(), "1 mes");
        assert_eq!(Tenure::between(ymd(2026, 10, 1), ymd(2026, 10, 19)).to_string(), "0 meses");
    }

    #[test]
    fn plural_years_and_zero_remainder() {
        let tenure = Tenure::between(ymd(2024, 1, 1), ymd(2026, 1, 1));
        assert_eq!(tenure.days, 731);
        assert_eq!(tenure.months, 24);
        assert_eq!(tenure.to_string(), "2 años, 0 meses");
    }

    #[test]
    fn future_hire_date_counts_absolute_distance() {
        let tenure = Tenure::between(ymd(2026, 12, 19), ymd(2026, 10, 19));
        assert_eq!(tenure.days, 61);
        assert_eq!(tenure.months, 2);
    }
}
