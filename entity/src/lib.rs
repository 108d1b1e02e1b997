//! Record types persisted by the HR suite.

pub mod employees;
mod lenient;

pub use employees::{
    DEPARTMENTS, Employee, EmployeeId, EmployeePatch, EmployeeStatus, NewEmployee,
};
