use chrono::{Datelike, Local, Month, NaiveDate};

use crate::error::{Error, Result};

/// One employee row of the attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: u32,
    pub full_name: String,
    pub table_id: String,
    pub job_position: String,
    /// One symbol per day of the report month.
    pub attendance: Vec<String>,
}

/// An attendance legend entry, e.g. ("Business trip", "W").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    pub name: String,
    pub key: String,
}

impl Mark {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }

    /// Numeric keys ("8", "12") stand for worked hours, not legend symbols.
    pub fn is_numeric(&self) -> bool {
        !self.key.is_empty() && self.key.chars().all(|c| c.is_ascii_digit())
    }
}

/// The month a sheet is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportMonth {
    first_day: NaiveDate,
}

impl ReportMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| Error::InvalidMonth(format!("{:04}-{:02}", year, month)))
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            first_day: today.with_day(1).unwrap_or(today),
        }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth(text.to_string());
        let (year, month) = text.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn days(&self) -> u32 {
        let (year, month) = match self.month() {
            12 => (self.year() + 1, 1),
            m => (self.year(), m + 1),
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    pub fn name(&self) -> &'static str {
        Month::try_from(self.month() as u8)
            .map(|m| m.name())
            .unwrap_or("")
    }
}

/// Legend entries used when no marks file is given.
pub fn default_marks() -> Vec<Mark> {
    [
        ("Dynç alyş we baýramçylyk günler", "B"),
        ("Kanuna laýyk işe gelmezlik", "C"),
        ("Gulluk iş saparlary", "W"),
        ("Nobatdaky we goşmaça rugsatlar", "O"),
        ("Işe ýarawsyzlyk (kesel, karantin we ş.m.)", "Y"),
        ("Gowrelilik sebäpli rugsat", "O"),
        ("Emdiryän eneleriň ýeňillikli sagatlary", "I"),
        ("Saglyga zyýanly önümçilikde işleýän işleriň ýeňillikli sagatlary", "ÝS"),
        ("Iş wagtyndan daşary edilen işiň sagatlary", "IWI"),
        ("Bütin smena boýunça işsiz durmaklyk", "ID"),
        ("Smeniň içindäki işsiz durmaklyk", "IID"),
        ("Sebäpsiz işden galmak", "S"),
        ("Işe gijä galmak we işden wagtyndan öň gitmek", "SIG"),
        ("Kärhanañ çäginden daşary gulluk tabşyryklaryny ýerine ýetirmek", "ÇDG"),
        ("Administrasiýañ rugsady boýunça işe gelmezlik", "AR"),
    ]
    .into_iter()
    .map(|(name, key)| Mark::new(name, key))
    .collect()
}
