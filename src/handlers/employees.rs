use crate::coord::CellPos;
use crate::domain::{Employee, ReportMonth};
use crate::error::{Error, Result, ResultExt};
use crate::ledger::EmployeeBlock;
use crate::registry::{CellRef, Handler, PassContext, PassKind};
use crate::styles::StyleRole;

pub const EMPLOYEES_PLACEHOLDER: &str = "{{start_process}}";

/// The fixed descriptive columns written before the attendance block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeColumn {
    Id,
    FullName,
    TableId,
    JobPosition,
}

impl EmployeeColumn {
    /// Columns in sheet order. To add a column, append it here.
    pub const ALL: [EmployeeColumn; 4] = [
        EmployeeColumn::Id,
        EmployeeColumn::FullName,
        EmployeeColumn::TableId,
        EmployeeColumn::JobPosition,
    ];

    pub fn value(&self, employee: &Employee) -> String {
        match self {
            EmployeeColumn::Id => employee.id.to_string(),
            EmployeeColumn::FullName => employee.full_name.clone(),
            EmployeeColumn::TableId => employee.table_id.clone(),
            EmployeeColumn::JobPosition => employee.job_position.clone(),
        }
    }

    pub fn style(&self) -> StyleRole {
        StyleRole::Centered
    }
}

/// Column where attendance starts for an employee section beginning at `employee_col`.
pub fn attendance_start_col(employee_col: u32) -> u32 {
    employee_col + EmployeeColumn::ALL.len() as u32
}

/// Replaces the `{{start_process}}` template row with one row per employee
/// and records the written block for later formula passes.
#[derive(Debug, Clone)]
pub struct EmployeeHandler<'a> {
    employees: &'a [Employee],
    days: u32,
}

impl<'a> EmployeeHandler<'a> {
    /// Fails if any employee's attendance does not cover exactly the days of `month`.
    pub fn new(employees: &'a [Employee], month: ReportMonth) -> Result<Self> {
        let days = month.days();
        if let Some(employee) = employees.iter().find(|e| e.attendance.len() != days as usize) {
            return Err(Error::AttendanceLength {
                id: employee.id,
                actual: employee.attendance.len(),
                expected: days,
            });
        }
        Ok(Self { employees, days })
    }

    fn write_row(
        &self,
        ctx: &mut PassContext<'_>,
        sheet: &str,
        pos: CellPos,
        employee: &Employee,
    ) -> Result<()> {
        for (offset, column) in EmployeeColumn::ALL.iter().enumerate() {
            let at = CellPos::new(pos.row, pos.col + offset as u32);
            ctx.book
                .set_text(sheet, at, &column.value(employee))
                .context(|| format!("column {:?}", column))?;

            let style = ctx.style(column.style())?;
            ctx.book
                .set_style(sheet, at.into(), style)
                .context(|| format!("style column {:?}", column))?;
        }

        let centered = ctx.style(StyleRole::Centered)?;
        let start = attendance_start_col(pos.col);
        for (day, symbol) in employee.attendance.iter().enumerate() {
            let at = CellPos::new(pos.row, start + day as u32);
            ctx.book
                .set_text(sheet, at, symbol)
                .context(|| format!("attendance day {}", day + 1))?;
            ctx.book.set_style(sheet, at.into(), centered)?;
        }

        Ok(())
    }
}

impl Handler for EmployeeHandler<'_> {
    fn kind(&self) -> PassKind {
        PassKind::Structural
    }

    fn handle(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()> {
        let sheet = cell.sheet;
        let CellPos { row, col } = cell.pos;
        let count = self.employees.len() as u32;

        ctx.remove_rows(sheet, row, 1)
            .context(|| "remove template row")?;
        ctx.sweep_tail_rows(sheet, count)
            .context(|| "clear rows at the end of the sheet")?;
        ctx.insert_rows(sheet, row, count)
            .context(|| "insert employee rows")?;

        for (i, employee) in self.employees.iter().enumerate() {
            self.write_row(ctx, sheet, CellPos::new(row + i as u32, col), employee)
                .context(|| format!("employee {}", employee.id))?;
        }

        // recorded even when empty: summary cells below it are then cleared
        ctx.ledger.record(EmployeeBlock {
            sheet: sheet.to_string(),
            first_row: row,
            count,
            attendance_col: attendance_start_col(col),
            days: self.days,
        });
        log::info!("{}: wrote {} employee rows at row {}", sheet, count, row + 1);

        Ok(())
    }
}
