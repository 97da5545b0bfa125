use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::cell::CellValue;
use crate::sheet::a1::{CellRef, RangeRef};
use crate::sheet::traits::{validate_grid, RangeWrite, TabularStore};

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Google Sheets v4 REST implementation of [`TabularStore`].
///
/// Authenticates with a pre-issued OAuth bearer token (service-account
/// token minting happens outside this crate). Writes use the
/// `USER_ENTERED` input option so numeric cell values land as real
/// numbers rather than left-aligned text.
pub struct SheetsStore {
    client: Client,
    spreadsheet_id: String,
    token: String,
}

impl SheetsStore {
    pub fn new(spreadsheet_id: impl Into<String>, token: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
        }
    }

    fn values_url(&self, suffix: &str) -> String {
        format!("{BASE_URL}/{}/values/{suffix}", self.spreadsheet_id)
    }

    async fn check_response(
        resp: reqwest::Response,
        operation: &str,
        context: &str,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = match resp.json::<ApiErrorEnvelope>().await {
            Ok(env) => env.error.message,
            Err(_) => format!("HTTP {status}"),
        };

        // The values API reports an unknown worksheet as a range-parse
        // failure; surface it as the distinct "sheet missing" signal.
        if status == StatusCode::BAD_REQUEST && message.contains("Unable to parse range") {
            return Err(CoreError::WorksheetNotFound(context.to_string()));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CoreError::Store {
                operation: operation.to_string(),
                message: format!("authentication rejected: {message}"),
            });
        }

        Err(CoreError::Store {
            operation: operation.to_string(),
            message,
        })
    }

    async fn get_values(&self, range_a1: &str) -> Result<Vec<Vec<String>>, CoreError> {
        let url = self.values_url(range_a1);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = Self::check_response(resp, "read", range_a1).await?;

        let body: ValueRangeResponse = resp.json().await.map_err(|e| CoreError::Store {
            operation: "read".into(),
            message: format!("failed to parse response for {range_a1}: {e}"),
        })?;

        Ok(body
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(json_cell_to_string).collect())
            .collect())
    }

    /// Resolve a worksheet title to its numeric sheet id (needed by
    /// the structural row-insert request).
    async fn sheet_id(&self, title: &str) -> Result<i64, CoreError> {
        let url = format!(
            "{BASE_URL}/{}?fields=sheets.properties",
            self.spreadsheet_id
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = Self::check_response(resp, "metadata", title).await?;

        let body: SpreadsheetMeta = resp.json().await.map_err(|e| CoreError::Store {
            operation: "metadata".into(),
            message: format!("failed to parse spreadsheet metadata: {e}"),
        })?;

        body.sheets
            .into_iter()
            .find(|s| s.properties.title == title)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| CoreError::WorksheetNotFound(title.to_string()))
    }
}

fn json_cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── Sheets API wire types ───────────────────────────────────────────

#[derive(Deserialize)]
struct ValueRangeResponse {
    values: Option<Vec<Vec<serde_json::Value>>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody {
    range: String,
    values: Vec<Vec<CellValue>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateValuesBody {
    value_input_option: &'static str,
    data: Vec<ValueRangeBody>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[async_trait]
impl TabularStore for SheetsStore {
    async fn read_column(&self, range: &RangeRef) -> Result<Vec<String>, CoreError> {
        let rows = self.get_values(&range.to_string()).await?;
        // The API elides trailing empty rows; pad back out so callers
        // can index by ledger slot.
        let mut column: Vec<String> = rows
            .into_iter()
            .map(|row| row.into_iter().next().unwrap_or_default())
            .collect();
        column.resize(range.row_count(), String::new());
        Ok(column)
    }

    async fn read_cell(&self, cell: &CellRef) -> Result<Option<String>, CoreError> {
        let rows = self.get_values(&cell.to_string()).await?;
        let value = rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next());
        Ok(value.filter(|v| !v.is_empty()))
    }

    async fn read_range(&self, range: &RangeRef) -> Result<Vec<Vec<String>>, CoreError> {
        self.get_values(&range.to_string()).await
    }

    async fn write_range(
        &self,
        range: &RangeRef,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), CoreError> {
        validate_grid(range, &values)?;

        let range_a1 = range.to_string();
        let url = format!(
            "{}?valueInputOption=USER_ENTERED",
            self.values_url(&range_a1)
        );
        let body = ValueRangeBody {
            range: range_a1.clone(),
            values,
        };
        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::check_response(resp, "write", &range_a1).await?;
        Ok(())
    }

    async fn write_batch(&self, writes: Vec<RangeWrite>) -> Result<(), CoreError> {
        if writes.is_empty() {
            return Ok(());
        }
        for w in &writes {
            validate_grid(&w.range, &w.values)?;
        }

        let url = format!(
            "{BASE_URL}/{}/values:batchUpdate",
            self.spreadsheet_id
        );
        let body = BatchUpdateValuesBody {
            value_input_option: "USER_ENTERED",
            data: writes
                .into_iter()
                .map(|w| ValueRangeBody {
                    range: w.range.to_string(),
                    values: w.values,
                })
                .collect(),
        };
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::check_response(resp, "batch write", "values:batchUpdate").await?;
        Ok(())
    }

    async fn insert_row(
        &self,
        sheet: &str,
        row: u32,
        values: Vec<CellValue>,
    ) -> Result<(), CoreError> {
        let sheet_id = self.sheet_id(sheet).await?;

        // Structural insert first (shifts existing rows down), then a
        // plain value write into the freshly opened row.
        let url = format!("{BASE_URL}/{}:batchUpdate", self.spreadsheet_id);
        let body = serde_json::json!({
            "requests": [{
                "insertDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row - 1,
                        "endIndex": row,
                    },
                    "inheritFromBefore": false,
                }
            }]
        });
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::check_response(resp, "insert row", sheet).await?;

        let width = values.len().max(1) as u32;
        let range = RangeRef::new(sheet, 1, row, width, row);
        self.write_range(&range, vec![values]).await
    }
}
