//! Live adapter for the `SheetSource` port using the Google Sheets v4 REST API.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::google_auth::GoogleAuth;
use super::http::{read_json, BlockingHttp};
use crate::error::PortError;
use crate::ports::{InputMode, SheetSource};
use crate::sheet::CellValue;

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// One spreadsheet, addressed by its ID.
pub struct SheetsClient {
    http: BlockingHttp,
    auth: GoogleAuth,
    spreadsheet_id: String,
}

/// `ValueRange` resource as read from the API.
#[derive(Deserialize)]
struct ValueRangeResponse {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// `ValueRange` resource as written to the API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: &'a [Vec<CellValue>],
}

impl SheetsClient {
    /// Creates a client for `spreadsheet_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be set up.
    pub fn new(auth: GoogleAuth, spreadsheet_id: impl Into<String>) -> Result<Self, PortError> {
        Ok(Self { http: BlockingHttp::new()?, auth, spreadsheet_id: spreadsheet_id.into() })
    }

    fn values_url(&self, range: &str) -> Result<Url, PortError> {
        values_url(&self.spreadsheet_id, range)
    }
}

fn values_url(spreadsheet_id: &str, range: &str) -> Result<Url, PortError> {
    let mut url = Url::parse(SHEETS_API_URL)?;
    url.path_segments_mut()
        .map_err(|()| "Sheets API URL cannot take path segments")?
        .extend([spreadsheet_id, "values", range]);
    Ok(url)
}

impl SheetSource for SheetsClient {
    fn read_range(&self, range: &str) -> Result<Vec<Vec<Value>>, PortError> {
        let token = self.auth.access_token(&self.http)?;
        let request = self.http.client().get(self.values_url(range)?).bearer_auth(token);
        let body: ValueRangeResponse = self.http.block_on(async move {
            let response = request.send().await.map_err(|e| -> PortError {
                format!("Sheets API request failed: {e}").into()
            })?;
            read_json("Sheets", response).await
        })?;
        Ok(body.values)
    }

    fn write_range(
        &self,
        range: &str,
        values: &[Vec<CellValue>],
        mode: InputMode,
    ) -> Result<(), PortError> {
        let token = self.auth.access_token(&self.http)?;
        let body = ValueRangeBody { range, major_dimension: "ROWS", values };
        let request = self
            .http
            .client()
            .put(self.values_url(range)?)
            .query(&[("valueInputOption", mode.as_api_str())])
            .bearer_auth(token)
            .json(&body);
        self.http.block_on(async move {
            let response = request.send().await.map_err(|e| -> PortError {
                format!("Sheets API request failed: {e}").into()
            })?;
            read_json::<Value>("Sheets", response).await.map(drop)
        })
    }
}
