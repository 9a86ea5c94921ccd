//! Fake employee records for trying templates without real data.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Employee, ReportMonth};

const FIRST_NAMES: &[&str] = &[
    "Atageldi", "Merdan", "Aynur", "Kerim", "Jennet", "Serdar", "Ogulgerek", "Maksat", "Gülälek",
    "Döwran",
];

const LAST_NAMES: &[&str] = &[
    "Orazow", "Annayew", "Saparow", "Muhammedow", "Berdiýew", "Ataýew", "Gurbansähedow",
    "Baýramow", "Meredow",
];

const POSITIONS: &[&str] = &[
    "Backend Developer",
    "Frontend Developer",
    "Project Manager",
    "QA Engineer",
    "HR Specialist",
    "DevOps Engineer",
    "Accountant",
    "Designer",
    "System Administrator",
    "Team Lead",
];

/// Weighted towards a normal working day.
const SYMBOLS: &[&str] = &["8", "8", "8", "8", "W", "P", "A", "L"];

pub fn generate_employees<R: Rng + ?Sized>(count: usize, month: ReportMonth, rng: &mut R) -> Vec<Employee> {
    (1..=count)
        .map(|n| {
            let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Employee");
            let last = LAST_NAMES.choose(rng).copied().unwrap_or("");
            let position = POSITIONS.choose(rng).copied().unwrap_or("");

            Employee {
                id: n as u32,
                full_name: format!("{} {}", first, last).trim().to_string(),
                table_id: format!("{:03}", n),
                job_position: position.to_string(),
                attendance: (0..month.days())
                    .map(|_| SYMBOLS.choose(rng).copied().unwrap_or("8").to_string())
                    .collect(),
            }
        })
        .collect()
}
