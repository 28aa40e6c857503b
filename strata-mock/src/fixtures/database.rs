use chrono::{NaiveDate, NaiveDateTime};
use strata_core::{Column, Table};

fn minute(m: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2023, 1, 1).and_then(|d| d.and_hms_opt(0, m, 0))
}

/// Database tables served by `MockDatabase`, keyed by table name.
///
/// `line1` and `line2` carry `DATETIME` keys the way a MySQL read returns
/// them; `status` keeps its stamps as text.
pub fn by_table(name: &str) -> Option<Table> {
    let table = match name {
        "line1" => Table::new(vec![
            Column::temporal("Timestamp", [minute(0), minute(2), minute(4)]),
            Column::numeric("Temperature", [20.5, 21.0, 21.5]),
        ]),
        "line2" => Table::new(vec![
            Column::temporal("Time", [minute(1), minute(2), minute(5)]),
            Column::numeric("Pressure", [101.2, 101.4, 101.1]),
        ]),
        "status" => Table::new(vec![
            Column::text("Timestamp", ["2023-01-01 00:00", "2023-01-01 00:03"]),
            Column::text("State", ["running", "idle"]),
        ]),
        _ => return None,
    };
    table.ok()
}
