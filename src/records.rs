//! Employee and legend records read from CSV files.
//!
//! Employees: `id,name,table_id,position,<one column per day>`.
//! Marks: `name,key`. Both files start with a header row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::domain::{Employee, Mark};
use crate::error::{Error, Result, ResultExt};

const EMPLOYEE_FIELDS: usize = 4;

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

pub fn read_employees<R: Read>(input: R) -> Result<Vec<Employee>> {
    let mut employees = Vec::new();

    for record in csv_reader(input).records() {
        let record = record?;
        let line = line_of(&record);
        if record.len() < EMPLOYEE_FIELDS {
            return Err(Error::InvalidRecord {
                line,
                details: format!(
                    "expected at least {} fields, found {}",
                    EMPLOYEE_FIELDS,
                    record.len()
                ),
            });
        }

        let id = record[0].parse::<u32>().map_err(|_| Error::InvalidRecord {
            line,
            details: format!("employee id \"{}\" is not a number", &record[0]),
        })?;

        employees.push(Employee {
            id,
            full_name: record[1].to_string(),
            table_id: record[2].to_string(),
            job_position: record[3].to_string(),
            attendance: record.iter().skip(EMPLOYEE_FIELDS).map(str::to_string).collect(),
        });
    }

    Ok(employees)
}

pub fn load_employees(path: &Path) -> Result<Vec<Employee>> {
    let employees = read_employees(open(path)?).context(|| path.display().to_string())?;
    log::debug!("{}: {} employees", path.display(), employees.len());
    Ok(employees)
}

pub fn read_marks<R: Read>(input: R) -> Result<Vec<Mark>> {
    csv_reader(input)
        .records()
        .map(|record| {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(name), Some(key)) if !key.is_empty() => Ok(Mark::new(name, key)),
                _ => Err(Error::InvalidRecord {
                    line: line_of(&record),
                    details: "expected name,key".to_string(),
                }),
            }
        })
        .collect()
}

pub fn load_marks(path: &Path) -> Result<Vec<Mark>> {
    read_marks(open(path)?).context(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_employees_with_attendance() {
        let data = "id,name,table_id,position,1,2,3\n\
                    7, Jennet Orazowa ,007,Accountant,8,W,\n";

        let employees = read_employees(data.as_bytes()).unwrap();
        assert_eq!(
            employees,
            vec![Employee {
                id: 7,
                full_name: "Jennet Orazowa".to_string(),
                table_id: "007".to_string(),
                job_position: "Accountant".to_string(),
                attendance: vec!["8".to_string(), "W".to_string(), String::new()],
            }]
        );
    }

    #[test]
    fn test_bad_id_reports_line() {
        let data = "id,name,table_id,position\n1,A,001,Dev\nx,B,002,QA\n";

        let err = read_employees(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { line: 3, .. }), "{:?}", err);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let data = "id,name,table_id,position\n1,A\n";
        assert!(matches!(
            read_employees(data.as_bytes()),
            Err(Error::InvalidRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_load_marks_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name,key").unwrap();
        writeln!(file, "Sick leave,Y").unwrap();
        writeln!(file, "Worked hours,8").unwrap();

        let marks = load_marks(file.path()).unwrap();
        assert_eq!(marks, vec![Mark::new("Sick leave", "Y"), Mark::new("Worked hours", "8")]);
    }

    #[test]
    fn test_mark_without_key_is_rejected() {
        let data = "name,key\nVacation,\n";
        assert!(matches!(
            read_marks(data.as_bytes()),
            Err(Error::InvalidRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_employees(Path::new("/nonexistent/staff.csv")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
