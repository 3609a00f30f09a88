use std::fmt::Debug;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::Sink;
use futures::stream;
use pgwire::api::auth::cleartext::CleartextPasswordAuthStartupHandler;
use pgwire::api::auth::{DefaultServerParameterProvider, StartupHandler};
use pgwire::api::copy::CopyHandler;
use pgwire::api::portal::{Format, Portal};
use pgwire::api::query::{ExtendedQueryHandler, SimpleQueryHandler};
use pgwire::api::results::{
    DataRowEncoder, DescribePortalResponse, DescribeStatementResponse, FieldFormat, FieldInfo,
    QueryResponse, Response, Tag,
};
use pgwire::api::stmt::{QueryParser, StoredStatement};
use pgwire::api::store::PortalStore;
use pgwire::api::{ClientInfo, ClientPortalStore, NoopHandler, PgWireServerHandlers, Type};
use pgwire::error::{ErrorInfo, PgWireError, PgWireResult};
use pgwire::messages::PgWireBackendMessage;
use pgwire::tokio::TlsAcceptor;
use tokio::net::TcpStream;

use crate::auth::CitasAuthSource;
use crate::model::*;
use crate::observability;
use crate::schedule::{ScheduleError, Scheduler};
use crate::sql::{self, Command};

pub struct CitasHandler {
    scheduler: Arc<Scheduler>,
    query_parser: Arc<CitasQueryParser>,
}

impl CitasHandler {
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self {
            scheduler,
            query_parser: Arc::new(CitasQueryParser),
        }
    }

    async fn execute_command(&self, cmd: Command) -> PgWireResult<Vec<Response>> {
        let label = observability::command_label(&cmd);
        let started = Instant::now();
        let result = self.dispatch(cmd).await;
        metrics::histogram!(observability::QUERY_DURATION_SECONDS, "command" => label)
            .record(started.elapsed().as_secs_f64());
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(observability::QUERIES_TOTAL, "command" => label, "status" => status)
            .increment(1);
        result
    }

    async fn dispatch(&self, cmd: Command) -> PgWireResult<Vec<Response>> {
        match cmd {
            Command::InsertAppointment {
                id,
                start,
                duration_min,
                worker_id,
                client_id,
                service_id,
                status,
                notes,
            } => {
                let appointment = Appointment {
                    id,
                    start,
                    // The caller materializes defaults; the engine never
                    // invents them.
                    duration_min: duration_min.unwrap_or(60),
                    status: status.unwrap_or(AppointmentStatus::Pending),
                    worker_id,
                    client_id,
                    service_id,
                    notes,
                };
                self.scheduler
                    .book_appointment(appointment)
                    .await
                    .map_err(schedule_err)?;
                Ok(vec![Response::Execution(Tag::new("INSERT").with_rows(1))])
            }
            Command::UpdateAppointment {
                id,
                start,
                duration_min,
                status,
            } => {
                self.scheduler
                    .update_appointment(id, start, duration_min, status)
                    .await
                    .map_err(schedule_err)?;
                Ok(vec![Response::Execution(Tag::new("UPDATE").with_rows(1))])
            }
            Command::DeleteAppointment { id } => {
                self.scheduler
                    .remove_appointment(id)
                    .await
                    .map_err(schedule_err)?;
                Ok(vec![Response::Execution(Tag::new("DELETE").with_rows(1))])
            }
            Command::InsertBlockedSlot {
                id,
                date,
                start,
                end,
                reason,
            } => {
                self.scheduler
                    .block_slot(id, date, start, end, reason)
                    .await
                    .map_err(schedule_err)?;
                Ok(vec![Response::Execution(Tag::new("INSERT").with_rows(1))])
            }
            Command::DeleteBlockedSlot { id } => {
                self.scheduler
                    .unblock_slot(id)
                    .await
                    .map_err(schedule_err)?;
                Ok(vec![Response::Execution(Tag::new("DELETE").with_rows(1))])
            }
            Command::UpdateConfig {
                open,
                close,
                buffer_min,
            } => {
                self.scheduler
                    .update_config(open, close, buffer_min)
                    .await
                    .map_err(schedule_err)?;
                Ok(vec![Response::Execution(Tag::new("UPDATE").with_rows(1))])
            }
            Command::SelectAppointments { start, end } => {
                let appointments = self
                    .scheduler
                    .appointments_in_range(start, end)
                    .await
                    .map_err(schedule_err)?;

                let schema = Arc::new(appointments_schema());
                let rows: Vec<PgWireResult<_>> = appointments
                    .into_iter()
                    .map(|appt| {
                        let mut encoder = DataRowEncoder::new(schema.clone());
                        encoder.encode_field(&appt.id.to_string())?;
                        encoder.encode_field(&appt.start)?;
                        encoder.encode_field(&(appt.duration_min as i32))?;
                        encoder.encode_field(&appt.status.to_string())?;
                        encoder.encode_field(&appt.worker_id.to_string())?;
                        encoder.encode_field(&appt.client_id.to_string())?;
                        encoder.encode_field(&appt.service_id.to_string())?;
                        encoder.encode_field(&appt.notes)?;
                        Ok(encoder.take_row())
                    })
                    .collect();

                Ok(vec![Response::Query(QueryResponse::new(
                    schema,
                    stream::iter(rows),
                ))])
            }
            Command::SelectBlockedSlots { date } => {
                let slots = self.scheduler.blocked_slots_on(date).await;

                let schema = Arc::new(blocked_slots_schema());
                let rows: Vec<PgWireResult<_>> = slots
                    .into_iter()
                    .map(|slot| {
                        let mut encoder = DataRowEncoder::new(schema.clone());
                        encoder.encode_field(&slot.id.to_string())?;
                        encoder.encode_field(&slot.date.to_string())?;
                        encoder.encode_field(&slot.start.to_string())?;
                        encoder.encode_field(&slot.end.to_string())?;
                        encoder.encode_field(&slot.reason)?;
                        Ok(encoder.take_row())
                    })
                    .collect();

                Ok(vec![Response::Query(QueryResponse::new(
                    schema,
                    stream::iter(rows),
                ))])
            }
            Command::SelectConfig => {
                let config = self.scheduler.config().await;

                let schema = Arc::new(config_schema());
                let mut encoder = DataRowEncoder::new(schema.clone());
                encoder.encode_field(&config.open.to_string())?;
                encoder.encode_field(&config.close.to_string())?;
                encoder.encode_field(&(config.buffer_min as i32))?;
                let rows = vec![Ok(encoder.take_row())];

                Ok(vec![Response::Query(QueryResponse::new(
                    schema,
                    stream::iter(rows),
                ))])
            }
            Command::SelectOpenings { date, min_duration } => {
                let openings = self.scheduler.free_windows(date, min_duration).await;

                let schema = Arc::new(openings_schema());
                let date_str = date.to_string();
                let rows: Vec<PgWireResult<_>> = openings
                    .into_iter()
                    .map(|opening| {
                        let mut encoder = DataRowEncoder::new(schema.clone());
                        encoder.encode_field(&date_str)?;
                        encoder.encode_field(&opening.start.to_string())?;
                        encoder.encode_field(&opening.end.to_string())?;
                        Ok(encoder.take_row())
                    })
                    .collect();

                Ok(vec![Response::Query(QueryResponse::new(
                    schema,
                    stream::iter(rows),
                ))])
            }
        }
    }
}

fn appointments_schema() -> Vec<FieldInfo> {
    vec![
        FieldInfo::new("id".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("start".into(), None, None, Type::INT8, FieldFormat::Text),
        FieldInfo::new("duration".into(), None, None, Type::INT4, FieldFormat::Text),
        FieldInfo::new("status".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("worker_id".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("client_id".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("service_id".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("notes".into(), None, None, Type::VARCHAR, FieldFormat::Text),
    ]
}

fn blocked_slots_schema() -> Vec<FieldInfo> {
    vec![
        FieldInfo::new("id".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("date".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("start_time".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("end_time".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("reason".into(), None, None, Type::VARCHAR, FieldFormat::Text),
    ]
}

fn config_schema() -> Vec<FieldInfo> {
    vec![
        FieldInfo::new("open_time".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("close_time".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("buffer".into(), None, None, Type::INT4, FieldFormat::Text),
    ]
}

fn openings_schema() -> Vec<FieldInfo> {
    vec![
        FieldInfo::new("date".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("start_time".into(), None, None, Type::VARCHAR, FieldFormat::Text),
        FieldInfo::new("end_time".into(), None, None, Type::VARCHAR, FieldFormat::Text),
    ]
}

/// Result schema of a statement, judged from its text — needed where only
/// the unparsed statement is at hand (Describe messages).
fn statement_schema(stmt: &str) -> Vec<FieldInfo> {
    let upper = stmt.to_uppercase();
    if !upper.trim_start().starts_with("SELECT") {
        return vec![];
    }
    if upper.contains("APPOINTMENTS") {
        appointments_schema()
    } else if upper.contains("BLOCKED_SLOTS") {
        blocked_slots_schema()
    } else if upper.contains("OPENINGS") {
        openings_schema()
    } else if upper.contains("CONFIG") {
        config_schema()
    } else {
        vec![]
    }
}

#[async_trait]
impl SimpleQueryHandler for CitasHandler {
    async fn do_query<C>(&self, _client: &mut C, query: &str) -> PgWireResult<Vec<Response>>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        let cmd = sql::parse_sql(query).map_err(sql_err)?;
        self.execute_command(cmd).await
    }
}

// ── Extended Query Protocol ──────────────────────────────────────

#[derive(Debug)]
pub struct CitasQueryParser;

#[async_trait]
impl QueryParser for CitasQueryParser {
    type Statement = String;

    async fn parse_sql<C>(
        &self,
        _client: &C,
        sql: &str,
        _types: &[Option<Type>],
    ) -> PgWireResult<String>
    where
        C: ClientInfo + Unpin + Send + Sync,
    {
        Ok(sql.to_string())
    }

    fn get_parameter_types(&self, stmt: &String) -> PgWireResult<Vec<Type>> {
        Ok(vec![Type::VARCHAR; count_params(stmt)])
    }

    fn get_result_schema(
        &self,
        stmt: &String,
        _column_format: Option<&Format>,
    ) -> PgWireResult<Vec<FieldInfo>> {
        Ok(statement_schema(stmt))
    }
}

#[async_trait]
impl ExtendedQueryHandler for CitasHandler {
    type Statement = String;
    type QueryParser = CitasQueryParser;

    fn query_parser(&self) -> Arc<Self::QueryParser> {
        self.query_parser.clone()
    }

    async fn do_query<C>(
        &self,
        _client: &mut C,
        portal: &Portal<Self::Statement>,
        _max_rows: usize,
    ) -> PgWireResult<Response>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::PortalStore: PortalStore<Statement = Self::Statement>,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        let sql = substitute_params(portal);
        let cmd = sql::parse_sql(&sql).map_err(sql_err)?;
        let mut responses = self.execute_command(cmd).await?;
        Ok(responses.remove(0))
    }

    async fn do_describe_statement<C>(
        &self,
        _client: &mut C,
        target: &StoredStatement<Self::Statement>,
    ) -> PgWireResult<DescribeStatementResponse>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::PortalStore: PortalStore<Statement = Self::Statement>,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        let param_types = vec![Type::VARCHAR; count_params(&target.statement)];
        Ok(DescribeStatementResponse::new(
            param_types,
            statement_schema(&target.statement),
        ))
    }

    async fn do_describe_portal<C>(
        &self,
        _client: &mut C,
        target: &Portal<Self::Statement>,
    ) -> PgWireResult<DescribePortalResponse>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::PortalStore: PortalStore<Statement = Self::Statement>,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        Ok(DescribePortalResponse::new(statement_schema(
            &target.statement.statement,
        )))
    }
}

/// Count the highest $N parameter placeholder in the SQL string.
fn count_params(sql: &str) -> usize {
    let mut max = 0usize;
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            i += 1;
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i > start
                && let Ok(n) = sql[start..i].parse::<usize>()
                && n > max {
                    max = n;
                }
        } else {
            i += 1;
        }
    }
    max
}

/// Substitute $1, $2, ... placeholders with bound parameter values (text format).
fn substitute_params(portal: &Portal<String>) -> String {
    let sql = portal.statement.statement.to_string();
    let params = &portal.parameters;
    let mut result = sql;

    for (i, param) in params.iter().enumerate().rev() {
        let placeholder = format!("${}", i + 1);
        let value = match param {
            Some(bytes) => {
                let text = String::from_utf8_lossy(bytes);
                format!("'{}'", text.replace('\'', "''"))
            }
            None => "NULL".to_string(),
        };
        result = result.replace(&placeholder, &value);
    }

    result
}

// ── Factory ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct CitasFactory {
    handler: Arc<CitasHandler>,
    auth_handler:
        Arc<CleartextPasswordAuthStartupHandler<CitasAuthSource, DefaultServerParameterProvider>>,
    noop: Arc<NoopHandler>,
}

impl CitasFactory {
    pub fn new(scheduler: Arc<Scheduler>, password: String) -> Self {
        let auth_source = CitasAuthSource::new(password);
        let param_provider = DefaultServerParameterProvider::default();
        Self {
            handler: Arc::new(CitasHandler::new(scheduler)),
            auth_handler: Arc::new(CleartextPasswordAuthStartupHandler::new(
                auth_source,
                param_provider,
            )),
            noop: Arc::new(NoopHandler),
        }
    }
}

impl PgWireServerHandlers for CitasFactory {
    fn simple_query_handler(&self) -> Arc<impl SimpleQueryHandler> {
        self.handler.clone()
    }

    fn extended_query_handler(&self) -> Arc<impl ExtendedQueryHandler> {
        self.handler.clone()
    }

    fn startup_handler(&self) -> Arc<impl StartupHandler> {
        self.auth_handler.clone()
    }

    fn copy_handler(&self) -> Arc<impl CopyHandler> {
        self.noop.clone()
    }
}

/// Drive one client connection over the Postgres wire protocol.
pub async fn process_connection(
    socket: TcpStream,
    scheduler: Arc<Scheduler>,
    password: String,
    tls: Option<TlsAcceptor>,
) -> io::Result<()> {
    let factory = CitasFactory::new(scheduler, password);
    pgwire::tokio::process_socket(socket, tls, factory).await
}

fn schedule_err(e: ScheduleError) -> PgWireError {
    let code = match &e {
        // Conflicts surface as exclusion violations, infrastructure faults
        // as internal errors, everything else as a generic raised exception.
        ScheduleError::SchedulingConflict { .. } | ScheduleError::BlockedSlotConflict { .. } => {
            "23P01"
        }
        ScheduleError::WalError(_) => "XX000",
        _ => "P0001",
    };
    PgWireError::UserError(Box::new(ErrorInfo::new(
        "ERROR".into(),
        code.into(),
        e.to_string(),
    )))
}

fn sql_err(e: crate::sql::SqlError) -> PgWireError {
    PgWireError::UserError(Box::new(ErrorInfo::new(
        "ERROR".into(),
        "42601".into(),
        e.to_string(),
    )))
}
