//! Ledger backed by the Google Sheets v4 REST API.

use super::{
    config::SheetsConfig,
    errors::{LedgerError, LedgerResult},
    models::{ChangeRecord, PlayerRecord, parse_timestamp},
    repository::Ledger,
    schema::{ChangesField, LedgerSchema, PoolsField},
};
use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Response of a `values.get` call
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Ledger reading and writing the league spreadsheet
pub struct SheetsLedger {
    client: reqwest::Client,
    config: SheetsConfig,
    schema: LedgerSchema,
}

impl SheetsLedger {
    /// Create a new spreadsheet ledger
    ///
    /// # Arguments
    ///
    /// * `config` - Spreadsheet id, token and API endpoint
    /// * `schema` - Column layout; validated here
    ///
    /// # Errors
    ///
    /// * `LedgerError::Schema` - The layout or API base is unusable
    /// * `LedgerError::Http` - The HTTP client could not be built
    pub fn new(config: SheetsConfig, schema: LedgerSchema) -> LedgerResult<Self> {
        schema.validate()?;
        Url::parse(&config.api_base)
            .map_err(|e| LedgerError::Schema(format!("invalid Sheets API base: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            schema,
        })
    }

    /// Schema in use
    pub fn schema(&self) -> &LedgerSchema {
        &self.schema
    }

    fn url(&self, segments: &[&str]) -> LedgerResult<Url> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| LedgerError::Schema(format!("invalid Sheets API base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| LedgerError::Schema("Sheets API base cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn values_url(&self, range: &str, suffix: &str) -> LedgerResult<Url> {
        let range = format!("{range}{suffix}");
        self.url(&[self.config.spreadsheet_id.as_str(), "values", range.as_str()])
    }

    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> LedgerResult<Value> {
        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.config.access_token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(LedgerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    async fn get_values(&self, range: &str) -> LedgerResult<Vec<Vec<Value>>> {
        let mut url = self.values_url(range, "")?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "FORMATTED_VALUE");
        let body = self.send(Method::GET, url, None).await?;
        let range: ValueRange = serde_json::from_value(body).map_err(|e| LedgerError::Api {
            status: 200,
            message: format!("unexpected values payload: {e}"),
        })?;
        Ok(range.values)
    }

    async fn update_cell(&self, field: PoolsField, row: u32, value: &str) -> LedgerResult<()> {
        let range = self.schema.pools_cell(field, row);
        let mut url = self.values_url(&range, "")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        self.send(Method::PUT, url, Some(json!({ "values": [[value]] })))
            .await?;
        log::debug!("Wrote {range} = {value}");
        Ok(())
    }
}

/// Text of a cell, empty when the row is shorter than the span
fn cell_text(row: &[Value], offset: usize) -> String {
    match row.get(offset) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Parse player rows read over the pools span
pub(crate) fn parse_players(
    schema: &LedgerSchema,
    rows: &[Vec<Value>],
) -> LedgerResult<Vec<PlayerRecord>> {
    let span = schema.pools_span()?;
    let offset = |field| schema.pools_index(field).map(|index| span.offset(index));
    let (id_at, name_at, current_at, starting_at) = (
        offset(PoolsField::OwnerId)?,
        offset(PoolsField::Name)?,
        offset(PoolsField::CurrentPool)?,
        offset(PoolsField::StartingPool)?,
    );

    let mut players = Vec::new();
    for (position, row) in (schema.pools_first_row..).zip(rows) {
        let owner_id = cell_text(row, id_at);
        if owner_id.is_empty() {
            continue;
        }
        players.push(PlayerRecord {
            row: position,
            owner_id,
            name: cell_text(row, name_at),
            current_pool: non_empty(cell_text(row, current_at)),
            starting_pool: non_empty(cell_text(row, starting_at)),
        });
    }
    Ok(players)
}

/// Parse change-log rows read over the change-log span
pub(crate) fn parse_changes(
    schema: &LedgerSchema,
    rows: &[Vec<Value>],
) -> LedgerResult<Vec<ChangeRecord>> {
    let span = schema.changes_span()?;
    let offset = |field| schema.changes_index(field).map(|index| span.offset(index));
    let (time_at, player_at, op_at, value_at) = (
        offset(ChangesField::Timestamp)?,
        offset(ChangesField::Player)?,
        offset(ChangesField::Operation)?,
        offset(ChangesField::Value)?,
    );

    let mut changes = Vec::with_capacity(rows.len());
    for (position, row) in (schema.changes_first_row..).zip(rows) {
        let player_name = cell_text(row, player_at);
        let operation = cell_text(row, op_at);
        if player_name.is_empty() || operation.is_empty() {
            continue;
        }
        match operation.parse() {
            Ok(operation) => changes.push(ChangeRecord {
                timestamp: parse_timestamp(&cell_text(row, time_at)),
                player_name,
                operation,
                value: cell_text(row, value_at),
            }),
            Err(e) => log::warn!("Skipping change-log row {position}: {e}"),
        }
    }
    Ok(changes)
}

/// Lay a record out over the change-log span
pub(crate) fn change_row(schema: &LedgerSchema, record: &ChangeRecord) -> LedgerResult<Vec<String>> {
    let span = schema.changes_span()?;
    let mut row = vec![String::new(); span.width()];
    for (field, value) in [
        (ChangesField::Timestamp, record.timestamp_cell()),
        (ChangesField::Player, record.player_name.clone()),
        (ChangesField::Operation, record.operation.to_string()),
        (ChangesField::Value, record.value.clone()),
    ] {
        row[span.offset(schema.changes_index(field)?)] = value;
    }
    Ok(row)
}

#[async_trait]
impl Ledger for SheetsLedger {
    async fn players(&self) -> LedgerResult<Vec<PlayerRecord>> {
        let rows = self.get_values(&self.schema.pools_read_range()?).await?;
        parse_players(&self.schema, &rows)
    }

    async fn changes(&self) -> LedgerResult<Vec<ChangeRecord>> {
        let rows = self.get_values(&self.schema.changes_read_range()?).await?;
        parse_changes(&self.schema, &rows)
    }

    async fn append_change(&self, record: &ChangeRecord) -> LedgerResult<()> {
        let row = change_row(&self.schema, record)?;
        let mut url = self.values_url(&self.schema.changes_append_range()?, ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");
        self.send(Method::POST, url, Some(json!({ "values": [row] })))
            .await?;
        log::info!(
            "Appended change: {} {} {}",
            record.player_name,
            record.operation,
            record.value
        );
        Ok(())
    }

    async fn set_current_pool(&self, row: u32, reference: &str) -> LedgerResult<()> {
        self.update_cell(PoolsField::CurrentPool, row, reference)
            .await
    }

    async fn set_starting_pool(&self, row: u32, reference: &str) -> LedgerResult<()> {
        self.update_cell(PoolsField::StartingPool, row, reference)
            .await
    }

    async fn flag_current_pool(&self, row: u32) -> LedgerResult<()> {
        // Formatting requests address cells by zero-based indices, not A1.
        let column = self.schema.pools_index(PoolsField::CurrentPool)?;
        let body = json!({
            "requests": [{
                "updateCells": {
                    "rows": [{
                        "values": [{
                            "userEnteredFormat": {
                                "backgroundColorStyle": {
                                    "rgbColor": { "red": 1, "green": 0, "blue": 0, "alpha": 1 }
                                }
                            }
                        }]
                    }],
                    "fields": "userEnteredFormat",
                    "range": {
                        "sheetId": self.config.pools_tab_id,
                        "startRowIndex": row.saturating_sub(1),
                        "endRowIndex": row,
                        "startColumnIndex": column,
                        "endColumnIndex": column + 1,
                    }
                }
            }]
        });
        let target = format!("{}:batchUpdate", self.config.spreadsheet_id);
        let url = self.url(&[target.as_str()])?;
        self.send(Method::POST, url, Some(body)).await?;
        log::warn!("Flagged current pool cell of row {row}");
        Ok(())
    }

    async fn health_check(&self) -> LedgerResult<()> {
        let mut url = self.url(&[self.config.spreadsheet_id.as_str()])?;
        url.query_pairs_mut().append_pair("fields", "spreadsheetId");
        self.send(Method::GET, url, None).await?;
        Ok(())
    }
}
