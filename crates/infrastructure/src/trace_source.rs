//! CSV trace source
//!
//! Turns solver result files into validated traces. A per-instance file holds
//! the events of one run; a combined file holds every run of a configuration,
//! told apart by its problem and instance columns.

use csv::{ReaderBuilder, StringRecord, Trim};
use solverbench_common::InputConfig;
use solverbench_domain::{
    CorruptTraceError, InstanceKey, SchemaError, SolutionPoint, Trace, TraceError,
};
use std::collections::BTreeMap;
use std::io::Read;

/// Column name accepted in place of the instance column of combined files
pub const INSTANCE_COLUMN_ALIAS: &str = "flatzinc";

/// Column names used to read trace files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSchema {
    pub time_column: String,
    pub objective_column: String,
    /// Rows are filtered on this column when the file has it
    pub event_column: String,
    /// Event value marking a solution row
    pub solution_event: String,
    pub problem_column: String,
    pub instance_column: String,
}

impl Default for TraceSchema {
    fn default() -> Self {
        Self::from(&InputConfig::default())
    }
}

impl From<&InputConfig> for TraceSchema {
    fn from(config: &InputConfig) -> Self {
        Self {
            time_column: config.time_column.clone(),
            objective_column: config.objective_column.clone(),
            event_column: config.event_column.clone(),
            solution_event: config.solution_event.clone(),
            problem_column: config.problem_column.clone(),
            instance_column: config.instance_column.clone(),
        }
    }
}

/// Positions of the columns of one file
struct ColumnIndex {
    time: usize,
    objective: usize,
    event: Option<usize>,
    /// Columns forwarded into each point's extra map
    extra: Vec<(usize, String)>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, schema: &TraceSchema, keys: &[usize]) -> Result<Self, SchemaError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let time = position(&schema.time_column);
        let objective = position(&schema.objective_column);
        let (time, objective) = match (time, objective) {
            (Some(time), Some(objective)) => (time, objective),
            _ => {
                let columns = [&schema.time_column, &schema.objective_column]
                    .into_iter()
                    .zip([time, objective])
                    .filter(|(_, found)| found.is_none())
                    .map(|(name, _)| name.clone())
                    .collect();
                return Err(SchemaError::MissingColumns { columns });
            }
        };
        let event = position(&schema.event_column);

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(index, _)| {
                *index != time && *index != objective && Some(*index) != event && !keys.contains(index)
            })
            .map(|(index, name)| (index, name.to_string()))
            .collect();

        Ok(Self {
            time,
            objective,
            event,
            extra,
        })
    }

    /// Parse one record, `None` for non-solution events
    fn point(
        &self,
        record: &StringRecord,
        row: usize,
        schema: &TraceSchema,
    ) -> Result<Option<SolutionPoint>, CorruptTraceError> {
        if let Some(event) = self.event {
            if record.get(event) != Some(schema.solution_event.as_str()) {
                return Ok(None);
            }
        }

        let time = parse_value(record, self.time, row, &schema.time_column)?;
        let objective = parse_value(record, self.objective, row, &schema.objective_column)?;

        let mut point = SolutionPoint::new(time, objective);
        for (index, name) in &self.extra {
            if let Some(value) = record.get(*index) {
                point = point.with_extra(name.clone(), value);
            }
        }
        Ok(Some(point))
    }
}

fn parse_value(
    record: &StringRecord,
    index: usize,
    row: usize,
    column: &str,
) -> Result<f64, CorruptTraceError> {
    let raw = record.get(index).unwrap_or_default();
    raw.parse::<f64>()
        .map_err(|_| CorruptTraceError::Unparsable {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn reader<R: Read>(source: R, flexible: bool) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(flexible)
        .from_reader(source)
}

fn read_error(row: usize, error: csv::Error) -> TraceError {
    match error.kind() {
        csv::ErrorKind::Io(_) => TraceError::Source {
            path: String::new(),
            message: error.to_string(),
        },
        _ => TraceError::Corrupt(CorruptTraceError::MalformedRecord {
            row,
            message: error.to_string(),
        }),
    }
}

/// Parse the trace of one run.
///
/// An empty or header-only source gives an empty trace.
pub fn parse_trace<R: Read>(source: R, schema: &TraceSchema) -> Result<Trace, TraceError> {
    let mut reader = reader(source, false);
    let headers = reader.headers().map_err(|e| read_error(0, e))?.clone();
    if headers.is_empty() {
        return Ok(Trace::empty());
    }

    let columns = ColumnIndex::resolve(&headers, schema, &[])?;

    let mut points = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        let record = record.map_err(|e| read_error(row, e))?;
        if let Some(point) = columns.point(&record, row, schema)? {
            points.push(point);
        }
    }

    Ok(Trace::new(points)?)
}

/// Split a combined results file into one trace per instance.
///
/// A missing column rejects the whole file. A bad row, including one with
/// the wrong number of fields, only rejects the instance it belongs to.
pub fn split_combined<R: Read>(
    source: R,
    schema: &TraceSchema,
) -> Result<BTreeMap<InstanceKey, Result<Trace, TraceError>>, TraceError> {
    // Field counts are checked per row so the error lands on the row's instance
    let mut reader = reader(source, true);
    let headers = reader.headers().map_err(|e| read_error(0, e))?.clone();
    if headers.is_empty() {
        return Ok(BTreeMap::new());
    }

    let position = |name: &str| headers.iter().position(|h| h == name);
    let problem = position(&schema.problem_column).ok_or_else(|| SchemaError::MissingKeyColumn {
        column: schema.problem_column.clone(),
    })?;
    let instance = position(&schema.instance_column)
        .or_else(|| position(INSTANCE_COLUMN_ALIAS))
        .ok_or_else(|| SchemaError::MissingKeyColumn {
            column: schema.instance_column.clone(),
        })?;

    let columns = ColumnIndex::resolve(&headers, schema, &[problem, instance])?;

    let mut grouped: BTreeMap<InstanceKey, Result<Vec<SolutionPoint>, TraceError>> =
        BTreeMap::new();
    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        let record = record.map_err(|e| read_error(row, e))?;
        let key = InstanceKey::new(
            record.get(problem).unwrap_or_default(),
            record.get(instance).unwrap_or_default(),
        );

        let entry = grouped.entry(key).or_insert_with(|| Ok(Vec::new()));
        if entry.is_err() {
            continue;
        }
        if record.len() != headers.len() {
            *entry = Err(TraceError::Corrupt(CorruptTraceError::MalformedRecord {
                row,
                message: format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    record.len()
                ),
            }));
            continue;
        }
        match columns.point(&record, row, schema) {
            Ok(Some(point)) => {
                if let Ok(points) = entry {
                    points.push(point);
                }
            }
            Ok(None) => {}
            Err(error) => *entry = Err(error.into()),
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(key, points)| (key, points.and_then(|p| Trace::new(p).map_err(TraceError::from))))
        .collect())
}
