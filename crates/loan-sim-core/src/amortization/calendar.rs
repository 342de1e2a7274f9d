//! Optional calendar dates for schedule rows.
//!
//! The schedule itself only knows installment indices; callers that want
//! due dates attach them here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schedule::ScheduleRow;
use crate::error::LoanSimError;
use crate::LoanSimResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedScheduleRow {
    pub due_date: NaiveDate,
    #[serde(flatten)]
    pub row: ScheduleRow,
}

/// Pair each row with a due date one month after the previous one, the
/// first installment falling on `first_due`. Days past a short month's end
/// clamp to its last day (Jan 31 -> Feb 28).
pub fn attach_due_dates(
    rows: &[ScheduleRow],
    first_due: NaiveDate,
) -> LoanSimResult<Vec<DatedScheduleRow>> {
    rows.iter()
        .map(|row| {
            let offset = chrono::Months::new(row.installment.saturating_sub(1));
            let due_date = first_due.checked_add_months(offset).ok_or_else(|| {
                LoanSimError::invalid(
                    "first_due",
                    format!("Due date out of range for installment {}", row.installment),
                )
            })?;
            Ok(DatedScheduleRow {
                due_date,
                row: row.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::schedule::build_schedule;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_due_dates() {
        let rows = build_schedule(dec!(1200), dec!(0.06), 3).unwrap();
        let dated = attach_due_dates(&rows, date(2025, 3, 15)).unwrap();
        let dates: Vec<NaiveDate> = dated.iter().map(|d| d.due_date).collect();
        assert_eq!(dates, vec![date(2025, 3, 15), date(2025, 4, 15), date(2025, 5, 15)]);
        assert_eq!(dated[2].row, rows[2]);
    }

    #[test]
    fn test_month_end_clamps_without_drifting() {
        let rows = build_schedule(dec!(1200), dec!(0.06), 3).unwrap();
        let dated = attach_due_dates(&rows, date(2024, 1, 31)).unwrap();
        assert_eq!(dated[1].due_date, date(2024, 2, 29));
        assert_eq!(dated[2].due_date, date(2024, 3, 31));
    }
}
