use chrono::NaiveDate;
use sqlparser::ast::{
    self, Expr, FromTable, ObjectNamePart, SetExpr, Statement, TableFactor, TableObject, Value,
    ValueWithSpan,
};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use ulid::Ulid;

use crate::model::*;

/// Parsed command from SQL input.
#[derive(Debug, PartialEq)]
pub enum Command {
    InsertAppointment {
        id: Ulid,
        start: Ms,
        duration_min: Option<u32>,
        worker_id: Ulid,
        client_id: Ulid,
        service_id: Ulid,
        status: Option<AppointmentStatus>,
        notes: Option<String>,
    },
    UpdateAppointment {
        id: Ulid,
        start: Option<Ms>,
        duration_min: Option<u32>,
        status: Option<AppointmentStatus>,
    },
    DeleteAppointment {
        id: Ulid,
    },
    InsertBlockedSlot {
        id: Ulid,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        reason: Option<String>,
    },
    DeleteBlockedSlot {
        id: Ulid,
    },
    UpdateConfig {
        open: Option<TimeOfDay>,
        close: Option<TimeOfDay>,
        buffer_min: Option<u32>,
    },
    SelectAppointments {
        start: Ms,
        end: Ms,
    },
    SelectBlockedSlots {
        date: NaiveDate,
    },
    SelectConfig,
    SelectOpenings {
        date: NaiveDate,
        min_duration: Option<u32>,
    },
}

pub fn parse_sql(sql: &str) -> Result<Command, SqlError> {
    let dialect = PostgreSqlDialect {};
    let stmts = Parser::parse_sql(&dialect, sql).map_err(|e| SqlError::Parse(e.to_string()))?;
    if stmts.is_empty() {
        return Err(SqlError::Empty);
    }

    match &stmts[0] {
        Statement::Insert(insert) => parse_insert(insert),
        Statement::Update {
            table,
            assignments,
            selection,
            ..
        } => parse_update(table, assignments, selection),
        Statement::Delete(delete) => parse_delete(delete),
        Statement::Query(query) => parse_select(query),
        other => Err(SqlError::Unsupported(format!("{other}"))),
    }
}

fn parse_insert(insert: &ast::Insert) -> Result<Command, SqlError> {
    let table = insert_table_name(insert)?;
    let values = extract_insert_values(insert)?;

    match table.as_str() {
        "appointments" => {
            if values.len() < 6 {
                return Err(SqlError::WrongArity("appointments", 6, values.len()));
            }
            Ok(Command::InsertAppointment {
                id: parse_ulid(&values[0])?,
                start: parse_i64(&values[1])?,
                duration_min: parse_u32_or_null(&values[2])?,
                worker_id: parse_ulid(&values[3])?,
                client_id: parse_ulid(&values[4])?,
                service_id: parse_ulid(&values[5])?,
                status: if values.len() >= 7 {
                    parse_status_or_null(&values[6])?
                } else {
                    None
                },
                notes: if values.len() >= 8 {
                    parse_string_or_null(&values[7])?
                } else {
                    None
                },
            })
        }
        "blocked_slots" => {
            if values.len() < 4 {
                return Err(SqlError::WrongArity("blocked_slots", 4, values.len()));
            }
            Ok(Command::InsertBlockedSlot {
                id: parse_ulid(&values[0])?,
                date: parse_date(&values[1])?,
                start: parse_time(&values[2])?,
                end: parse_time(&values[3])?,
                reason: if values.len() >= 5 {
                    parse_string_or_null(&values[4])?
                } else {
                    None
                },
            })
        }
        _ => Err(SqlError::UnknownTable(table)),
    }
}

fn parse_update(
    table: &ast::TableWithJoins,
    assignments: &[ast::Assignment],
    selection: &Option<Expr>,
) -> Result<Command, SqlError> {
    let table = table_factor_name(&table.relation)?;

    match table.as_str() {
        "appointments" => {
            let id = extract_where_id(selection)?;
            let (mut start, mut duration_min, mut status) = (None, None, None);
            for assignment in assignments {
                match assignment_column(assignment)?.as_str() {
                    "start" => start = Some(parse_i64(&assignment.value)?),
                    "duration" => duration_min = Some(parse_u32(&assignment.value)?),
                    "status" => status = Some(parse_status(&assignment.value)?),
                    other => return Err(SqlError::UnknownColumn(other.to_string())),
                }
            }
            Ok(Command::UpdateAppointment {
                id,
                start,
                duration_min,
                status,
            })
        }
        "config" => {
            let (mut open, mut close, mut buffer_min) = (None, None, None);
            for assignment in assignments {
                match assignment_column(assignment)?.as_str() {
                    "open_time" => open = Some(parse_time(&assignment.value)?),
                    "close_time" => close = Some(parse_time(&assignment.value)?),
                    "buffer" => buffer_min = Some(parse_u32(&assignment.value)?),
                    other => return Err(SqlError::UnknownColumn(other.to_string())),
                }
            }
            Ok(Command::UpdateConfig {
                open,
                close,
                buffer_min,
            })
        }
        _ => Err(SqlError::UnknownTable(table)),
    }
}

fn parse_delete(delete: &ast::Delete) -> Result<Command, SqlError> {
    let table = delete_table_name(delete)?;
    let id = extract_where_id(&delete.selection)?;

    match table.as_str() {
        "appointments" => Ok(Command::DeleteAppointment { id }),
        "blocked_slots" => Ok(Command::DeleteBlockedSlot { id }),
        _ => Err(SqlError::UnknownTable(table)),
    }
}

fn parse_select(query: &ast::Query) -> Result<Command, SqlError> {
    let select = match query.body.as_ref() {
        SetExpr::Select(s) => s,
        _ => return Err(SqlError::Unsupported("non-SELECT query".into())),
    };

    if select.from.is_empty() {
        return Err(SqlError::Parse("SELECT without FROM".into()));
    }
    let table = table_factor_name(&select.from[0].relation)?;

    match table.as_str() {
        "appointments" => {
            let (mut start, mut end) = (None, None);
            if let Some(selection) = &select.selection {
                extract_range_filters(selection, &mut start, &mut end)?;
            }
            Ok(Command::SelectAppointments {
                start: start.ok_or(SqlError::MissingFilter("start"))?,
                end: end.ok_or(SqlError::MissingFilter("end"))?,
            })
        }
        "blocked_slots" => {
            let mut date = None;
            if let Some(selection) = &select.selection {
                extract_day_filters(selection, &mut date, &mut None)?;
            }
            Ok(Command::SelectBlockedSlots {
                date: date.ok_or(SqlError::MissingFilter("date"))?,
            })
        }
        "config" => Ok(Command::SelectConfig),
        "openings" => {
            let (mut date, mut min_duration) = (None, None);
            if let Some(selection) = &select.selection {
                extract_day_filters(selection, &mut date, &mut min_duration)?;
            }
            Ok(Command::SelectOpenings {
                date: date.ok_or(SqlError::MissingFilter("date"))?,
                min_duration,
            })
        }
        _ => Err(SqlError::UnknownTable(table)),
    }
}

/// `start >= a AND "end" <= b` filters for the appointments range scan.
fn extract_range_filters(
    expr: &Expr,
    start: &mut Option<Ms>,
    end: &mut Option<Ms>,
) -> Result<(), SqlError> {
    if let Expr::BinaryOp { left, op, right } = expr {
        match op {
            ast::BinaryOperator::And => {
                extract_range_filters(left, start, end)?;
                extract_range_filters(right, start, end)?;
            }
            ast::BinaryOperator::GtEq => {
                if expr_column_name(left).as_deref() == Some("start") {
                    *start = Some(parse_i64(right)?);
                }
            }
            ast::BinaryOperator::LtEq => {
                if expr_column_name(left).as_deref() == Some("end") {
                    *end = Some(parse_i64(right)?);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// `date = 'YYYY-MM-DD'` plus the optional `min_duration = N` filter.
fn extract_day_filters(
    expr: &Expr,
    date: &mut Option<NaiveDate>,
    min_duration: &mut Option<u32>,
) -> Result<(), SqlError> {
    if let Expr::BinaryOp { left, op, right } = expr {
        match op {
            ast::BinaryOperator::And => {
                extract_day_filters(left, date, min_duration)?;
                extract_day_filters(right, date, min_duration)?;
            }
            ast::BinaryOperator::Eq => {
                let col = expr_column_name(left);
                if col.as_deref() == Some("date") {
                    *date = Some(parse_date(right)?);
                } else if col.as_deref() == Some("min_duration") {
                    *min_duration = Some(parse_u32(right)?);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────

fn object_name_last(name: &ast::ObjectName) -> Option<String> {
    name.0.last().and_then(|part| match part {
        ObjectNamePart::Identifier(ident) => Some(ident.value.to_lowercase()),
        _ => None,
    })
}

fn insert_table_name(insert: &ast::Insert) -> Result<String, SqlError> {
    match &insert.table {
        TableObject::TableName(name) => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("unsupported table object in INSERT".into())),
    }
}

fn delete_table_name(delete: &ast::Delete) -> Result<String, SqlError> {
    let tables_with_joins = match &delete.from {
        FromTable::WithFromKeyword(t) | FromTable::WithoutKeyword(t) => t,
    };
    if let Some(first) = tables_with_joins.first() {
        table_factor_name(&first.relation)
    } else {
        Err(SqlError::Parse("DELETE without table".into()))
    }
}

fn table_factor_name(tf: &TableFactor) -> Result<String, SqlError> {
    match tf {
        TableFactor::Table { name, .. } => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("complex table expression".into())),
    }
}

fn extract_insert_values(insert: &ast::Insert) -> Result<Vec<Expr>, SqlError> {
    let body = insert
        .source
        .as_ref()
        .ok_or(SqlError::Parse("no VALUES".into()))?;
    match body.body.as_ref() {
        SetExpr::Values(values) => match values.rows.as_slice() {
            [] => Err(SqlError::Parse("empty VALUES".into())),
            [row] => Ok(row.clone()),
            _ => Err(SqlError::Unsupported("multi-row INSERT".into())),
        },
        _ => Err(SqlError::Parse("expected VALUES".into())),
    }
}

fn assignment_column(assignment: &ast::Assignment) -> Result<String, SqlError> {
    match &assignment.target {
        ast::AssignmentTarget::ColumnName(name) => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty column name".into()))
        }
        _ => Err(SqlError::Parse("unsupported assignment target".into())),
    }
}

fn extract_where_id(selection: &Option<Expr>) -> Result<Ulid, SqlError> {
    let sel = selection.as_ref().ok_or(SqlError::MissingFilter("id"))?;
    match sel {
        Expr::BinaryOp {
            left,
            op: ast::BinaryOperator::Eq,
            right,
        } => {
            if expr_column_name(left).as_deref() == Some("id") {
                parse_ulid(right)
            } else {
                Err(SqlError::MissingFilter("id"))
            }
        }
        _ => Err(SqlError::MissingFilter("id")),
    }
}

fn expr_column_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.to_lowercase()),
        Expr::CompoundIdentifier(parts) => parts.last().map(|i| i.value.to_lowercase()),
        _ => None,
    }
}

fn extract_value(expr: &Expr) -> Option<&Value> {
    match expr {
        Expr::Value(ValueWithSpan { value, .. }) => Some(value),
        _ => None,
    }
}

fn parse_ulid(expr: &Expr) -> Result<Ulid, SqlError> {
    if let Some(value) = extract_value(expr) {
        match value {
            Value::SingleQuotedString(s) | Value::Number(s, _) => {
                Ulid::from_string(s).map_err(|e| SqlError::Parse(format!("bad ULID: {e}")))
            }
            _ => Err(SqlError::Parse(format!("expected string, got {value:?}"))),
        }
    } else {
        Err(SqlError::Parse(format!("expected value, got {expr:?}")))
    }
}

fn parse_i64(expr: &Expr) -> Result<i64, SqlError> {
    if let Some(value) = extract_value(expr) {
        match value {
            Value::Number(s, _) | Value::SingleQuotedString(s) => s
                .parse()
                .map_err(|e| SqlError::Parse(format!("bad i64: {e}"))),
            _ => Err(SqlError::Parse(format!("expected number, got {value:?}"))),
        }
    } else if let Expr::UnaryOp {
        op: ast::UnaryOperator::Minus,
        expr,
    } = expr
    {
        Ok(-parse_i64(expr)?)
    } else {
        Err(SqlError::Parse(format!("expected value, got {expr:?}")))
    }
}

fn parse_u32(expr: &Expr) -> Result<u32, SqlError> {
    let v = parse_i64(expr)?;
    u32::try_from(v).map_err(|_| SqlError::Parse(format!("{v} out of u32 range")))
}

fn parse_u32_or_null(expr: &Expr) -> Result<Option<u32>, SqlError> {
    match extract_value(expr) {
        Some(Value::Null) => Ok(None),
        _ => Ok(Some(parse_u32(expr)?)),
    }
}

fn parse_string(expr: &Expr) -> Result<String, SqlError> {
    if let Some(Value::SingleQuotedString(s)) = extract_value(expr) {
        Ok(s.clone())
    } else {
        Err(SqlError::Parse(format!("expected string, got {expr:?}")))
    }
}

fn parse_string_or_null(expr: &Expr) -> Result<Option<String>, SqlError> {
    match extract_value(expr) {
        Some(Value::Null) => Ok(None),
        _ => Ok(Some(parse_string(expr)?)),
    }
}

fn parse_time(expr: &Expr) -> Result<TimeOfDay, SqlError> {
    parse_string(expr)?
        .parse()
        .map_err(|e| SqlError::Parse(format!("{e}")))
}

fn parse_date(expr: &Expr) -> Result<NaiveDate, SqlError> {
    let s = parse_string(expr)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|e| SqlError::Parse(format!("bad date {s:?}: {e}")))
}

fn parse_status(expr: &Expr) -> Result<AppointmentStatus, SqlError> {
    parse_string(expr)?
        .parse()
        .map_err(|e| SqlError::Parse(format!("{e}")))
}

fn parse_status_or_null(expr: &Expr) -> Result<Option<AppointmentStatus>, SqlError> {
    match extract_value(expr) {
        Some(Value::Null) => Ok(None),
        _ => Ok(Some(parse_status(expr)?)),
    }
}

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SqlError {
    Parse(String),
    Empty,
    Unsupported(String),
    UnknownTable(String),
    UnknownColumn(String),
    WrongArity(&'static str, usize, usize),
    MissingFilter(&'static str),
}

impl std::fmt::Display for SqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlError::Parse(s) => write!(f, "parse error: {s}"),
            SqlError::Empty => write!(f, "empty query"),
            SqlError::Unsupported(s) => write!(f, "unsupported: {s}"),
            SqlError::UnknownTable(t) => write!(f, "unknown table: {t}"),
            SqlError::UnknownColumn(c) => write!(f, "unknown column: {c}"),
            SqlError::WrongArity(t, expected, got) => {
                write!(f, "{t}: expected {expected} values, got {got}")
            }
            SqlError::MissingFilter(col) => write!(f, "missing filter: {col}"),
        }
    }
}

impl std::error::Error for SqlError {}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "01ARZ3NDEKTSV4RRFFQ69G5FAV";

    #[test]
    fn parse_insert_appointment_minimal() {
        let sql = format!(
            "INSERT INTO appointments (id, start, duration, worker_id, client_id, service_id) \
             VALUES ('{ID}', 1751464800000, NULL, '{ID}', '{ID}', '{ID}')"
        );
        let cmd = parse_sql(&sql).unwrap();
        match cmd {
            Command::InsertAppointment {
                id,
                start,
                duration_min,
                status,
                notes,
                ..
            } => {
                assert_eq!(id.to_string(), ID);
                assert_eq!(start, 1751464800000);
                assert_eq!(duration_min, None);
                assert_eq!(status, None);
                assert_eq!(notes, None);
            }
            _ => panic!("expected InsertAppointment, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_insert_appointment_full() {
        let sql = format!(
            "INSERT INTO appointments (id, start, duration, worker_id, client_id, service_id, status, notes) \
             VALUES ('{ID}', 1751464800000, 45, '{ID}', '{ID}', '{ID}', 'CONFIRMED', 'primera visita')"
        );
        let cmd = parse_sql(&sql).unwrap();
        match cmd {
            Command::InsertAppointment {
                duration_min,
                status,
                notes,
                ..
            } => {
                assert_eq!(duration_min, Some(45));
                assert_eq!(status, Some(AppointmentStatus::Confirmed));
                assert_eq!(notes.as_deref(), Some("primera visita"));
            }
            _ => panic!("expected InsertAppointment, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_insert_appointment_too_few_values() {
        let sql = format!("INSERT INTO appointments (id, start) VALUES ('{ID}', 1000)");
        assert!(matches!(
            parse_sql(&sql),
            Err(SqlError::WrongArity("appointments", 6, 2))
        ));
    }

    #[test]
    fn parse_update_appointment() {
        let sql =
            format!("UPDATE appointments SET start = 1751464800000, status = 'CANCELLED' WHERE id = '{ID}'");
        let cmd = parse_sql(&sql).unwrap();
        match cmd {
            Command::UpdateAppointment {
                id,
                start,
                duration_min,
                status,
            } => {
                assert_eq!(id.to_string(), ID);
                assert_eq!(start, Some(1751464800000));
                assert_eq!(duration_min, None);
                assert_eq!(status, Some(AppointmentStatus::Cancelled));
            }
            _ => panic!("expected UpdateAppointment, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_update_appointment_requires_id() {
        let sql = "UPDATE appointments SET start = 1000";
        assert!(matches!(parse_sql(sql), Err(SqlError::MissingFilter("id"))));
    }

    #[test]
    fn parse_update_appointment_unknown_column() {
        let sql = format!("UPDATE appointments SET color = 'red' WHERE id = '{ID}'");
        assert!(matches!(parse_sql(&sql), Err(SqlError::UnknownColumn(_))));
    }

    #[test]
    fn parse_delete_appointment() {
        let sql = format!("DELETE FROM appointments WHERE id = '{ID}'");
        let cmd = parse_sql(&sql).unwrap();
        assert!(matches!(cmd, Command::DeleteAppointment { .. }));
    }

    #[test]
    fn parse_insert_blocked_slot() {
        let sql = format!(
            "INSERT INTO blocked_slots (id, date, start_time, end_time, reason) \
             VALUES ('{ID}', '2025-07-02', '14:00', '15:00', 'Mantenimiento')"
        );
        let cmd = parse_sql(&sql).unwrap();
        match cmd {
            Command::InsertBlockedSlot {
                date,
                start,
                end,
                reason,
                ..
            } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
                assert_eq!(start.to_string(), "14:00");
                assert_eq!(end.to_string(), "15:00");
                assert_eq!(reason.as_deref(), Some("Mantenimiento"));
            }
            _ => panic!("expected InsertBlockedSlot, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_insert_blocked_slot_without_reason() {
        let sql = format!(
            "INSERT INTO blocked_slots (id, date, start_time, end_time) \
             VALUES ('{ID}', '2025-07-02', '14:00', '15:00')"
        );
        match parse_sql(&sql).unwrap() {
            Command::InsertBlockedSlot { reason, .. } => assert_eq!(reason, None),
            cmd => panic!("expected InsertBlockedSlot, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_blocked_slot_bad_time_rejected() {
        let sql = format!(
            "INSERT INTO blocked_slots (id, date, start_time, end_time) \
             VALUES ('{ID}', '2025-07-02', '25:00', '26:00')"
        );
        assert!(matches!(parse_sql(&sql), Err(SqlError::Parse(_))));
    }

    #[test]
    fn parse_update_config() {
        let sql = "UPDATE config SET open_time = '10:00', close_time = '20:00', buffer = 15";
        let cmd = parse_sql(sql).unwrap();
        match cmd {
            Command::UpdateConfig {
                open,
                close,
                buffer_min,
            } => {
                assert_eq!(open.unwrap().to_string(), "10:00");
                assert_eq!(close.unwrap().to_string(), "20:00");
                assert_eq!(buffer_min, Some(15));
            }
            _ => panic!("expected UpdateConfig, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_update_config_partial() {
        let sql = "UPDATE config SET buffer = 0";
        match parse_sql(sql).unwrap() {
            Command::UpdateConfig {
                open,
                close,
                buffer_min,
            } => {
                assert_eq!(open, None);
                assert_eq!(close, None);
                assert_eq!(buffer_min, Some(0));
            }
            cmd => panic!("expected UpdateConfig, got {cmd:?}"),
        }
    }

    #[test]
    fn parse_select_appointments() {
        let sql = "SELECT * FROM appointments WHERE start >= 1000 AND \"end\" <= 2000";
        let cmd = parse_sql(sql).unwrap();
        assert_eq!(cmd, Command::SelectAppointments { start: 1000, end: 2000 });
    }

    #[test]
    fn parse_select_appointments_missing_filter() {
        let sql = "SELECT * FROM appointments WHERE start >= 1000";
        assert!(matches!(parse_sql(sql), Err(SqlError::MissingFilter("end"))));
    }

    #[test]
    fn parse_select_blocked_slots() {
        let sql = "SELECT * FROM blocked_slots WHERE date = '2025-07-02'";
        let cmd = parse_sql(sql).unwrap();
        assert_eq!(
            cmd,
            Command::SelectBlockedSlots {
                date: NaiveDate::from_ymd_opt(2025, 7, 2).unwrap()
            }
        );
    }

    #[test]
    fn parse_select_config() {
        assert_eq!(parse_sql("SELECT * FROM config").unwrap(), Command::SelectConfig);
    }

    #[test]
    fn parse_select_openings() {
        let sql = "SELECT * FROM openings WHERE date = '2025-07-02' AND min_duration = 30";
        let cmd = parse_sql(sql).unwrap();
        assert_eq!(
            cmd,
            Command::SelectOpenings {
                date: NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
                min_duration: Some(30),
            }
        );
    }

    #[test]
    fn parse_unknown_table_errors() {
        let sql = format!("INSERT INTO workers (id) VALUES ('{ID}')");
        assert!(matches!(parse_sql(&sql), Err(SqlError::UnknownTable(_))));
        assert!(matches!(
            parse_sql("SELECT * FROM workers"),
            Err(SqlError::UnknownTable(_))
        ));
    }

    #[test]
    fn parse_multi_row_insert_unsupported() {
        let sql = format!(
            "INSERT INTO blocked_slots (id, date, start_time, end_time) \
             VALUES ('{ID}', '2025-07-02', '14:00', '15:00'), ('{ID}', '2025-07-03', '14:00', '15:00')"
        );
        assert!(matches!(parse_sql(&sql), Err(SqlError::Unsupported(_))));
    }

    #[test]
    fn parse_empty_errors() {
        assert!(matches!(parse_sql(""), Err(SqlError::Empty)));
    }

    #[test]
    fn parse_negative_start_allowed() {
        let sql = format!(
            "INSERT INTO appointments (id, start, duration, worker_id, client_id, service_id) \
             VALUES ('{ID}', -1000, 60, '{ID}', '{ID}', '{ID}')"
        );
        match parse_sql(&sql).unwrap() {
            Command::InsertAppointment { start, .. } => assert_eq!(start, -1000),
            cmd => panic!("expected InsertAppointment, got {cmd:?}"),
        }
    }
}
