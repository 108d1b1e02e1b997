//! Example records written to an empty slot on first start.

use chrono::NaiveDate;
use entity::{Employee, EmployeeId, EmployeeStatus};

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn seed_employees() -> Vec<Employee> {
    vec![
        Employee {
            id: EmployeeId::from("1"),
            first_name: "Ana".into(),
            last_name: "García".into(),
            email: "ana.garcia@empresa.com".into(),
            phone: "+1 (555) 123-4567".into(),
            position: "Desarrolladora Frontend".into(),
            department: "Tecnología".into(),
            salary: "45000".into(),
            hire_date: date(2023, 1, 15),
            status: EmployeeStatus::Active,
            address: Some("123 Main Street, Ciudad, Estado 12345".into()),
            emergency_contact: Some("Carlos García".into()),
            emergency_phone: Some("+1 (555) 987-6543".into()),
            notes: Some(
                "Especialista en React y TypeScript. Excelente trabajo en equipo y comunicación."
                    .into(),
            ),
        },
        Employee {
            id: EmployeeId::from("2"),
            first_name: "Carlos".into(),
            last_name: "Rodríguez".into(),
            email: "carlos.rodriguez@empresa.com".into(),
            phone: "+1 (555) 234-5678".into(),
            position: "Diseñador UX/UI".into(),
            department: "Diseño".into(),
            salary: "42000".into(),
            hire_date: date(2023, 3, 20),
            status: EmployeeStatus::Active,
            address: Some("456 Oak Avenue, Ciudad, Estado 12345".into()),
            emergency_contact: Some("María Rodríguez".into()),
            emergency_phone: Some("+1 (555) 876-5432".into()),
            notes: Some("Experto en diseño de interfaces y experiencia de usuario.".into()),
        },
        Employee {
            id: EmployeeId::from("3"),
            first_name: "María".into(),
            last_name: "López".into(),
            email: "maria.lopez@empresa.com".into(),
            phone: "+1 (555) 345-6789".into(),
            position: "Gerente de Proyecto".into(),
            department: "Gestión".into(),
            salary: "55000".into(),
            hire_date: date(2022, 8, 10),
            status: EmployeeStatus::Vacation,
            address: Some("789 Pine Street, Ciudad, Estado 12345".into()),
            emergency_contact: Some("Juan López".into()),
            emergency_phone: Some("+1 (555) 765-4321".into()),
            notes: Some(
                "Líder experimentada con excelentes habilidades de gestión de proyectos.".into(),
            ),
        },
    ]
}
