//! HR vertical slice: the employee store and the read-only projections
//! the dashboard and analytics views are built from.

pub mod analytics;
pub mod filter;
pub mod seed;
pub mod store;
pub mod tenure;

pub use analytics::{Bucket, GroupAverage, GroupKey, Summary, UNSPECIFIED};
pub use filter::EmployeeFilter;
pub use store::{EMPLOYEES_KEY, EmployeeStore, StoreError, StoreResult};
pub use tenure::Tenure;
