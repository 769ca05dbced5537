// Google Sheets v4 REST backend.

use super::{BackendMode, Row, SheetBackend};
use crate::error::{StoreError, StoreResult};
use crate::infra::config::SheetsConfig;
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Row>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: AppendUpdates,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

pub struct GoogleSheetsBackend {
    http: Client,
    config: SheetsConfig,
}

impl GoogleSheetsBackend {
    pub fn new(config: SheetsConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Protocol(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    fn token(&self) -> StoreResult<&str> {
        self.config
            .access_token
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("GOOGLE_SHEETS_ACCESS_TOKEN is not set".to_string()))
    }

    /// `{api_base}/spreadsheets/{id}` followed by `segments`.
    fn endpoint(&self, id_suffix: &str, segments: &[&str]) -> StoreResult<Url> {
        let mut url = Url::parse(&self.config.api_base).map_err(|e| {
            StoreError::Unavailable(format!("invalid GOOGLE_SHEETS_API_BASE: {}", e))
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                StoreError::Unavailable("GOOGLE_SHEETS_API_BASE cannot be a base URL".to_string())
            })?;
            path.pop_if_empty()
                .push("spreadsheets")
                .push(&format!("{}{}", self.config.spreadsheet_id, id_suffix))
                .extend(segments);
        }
        Ok(url)
    }

    async fn call(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, &str)],
        body: Option<JsonValue>,
    ) -> StoreResult<JsonValue> {
        let token = self.token()?;
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(token)
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, url = %url, error = %e, "Sheets request failed");
            StoreError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(%method, url = %url, %status, "Sheets request rejected");
            return Err(map_status(status, &text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| StoreError::Protocol(format!("invalid JSON from Sheets API: {}", e)))
    }

    async fn sheet_id(&self, sheet: &str) -> StoreResult<i64> {
        let url = self.endpoint("", &[])?;
        let meta = self
            .call(Method::GET, url, &[("fields", "sheets.properties")], None)
            .await?;
        let meta: SpreadsheetMeta = decode(meta)?;
        meta.sheets
            .into_iter()
            .find(|s| s.properties.title == sheet)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| StoreError::Unavailable(format!("sheet '{}' not found in spreadsheet", sheet)))
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: JsonValue) -> StoreResult<T> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::Protocol(format!("unexpected Sheets API response: {}", e)))
}

fn map_status(status: StatusCode, body: &str) -> StoreError {
    let detail: String = body.chars().take(200).collect();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::Unavailable(format!("credentials rejected ({})", status))
        }
        StatusCode::NOT_FOUND => StoreError::Unavailable("spreadsheet not found".to_string()),
        // A range naming a tab that does not exist.
        StatusCode::BAD_REQUEST if body.contains("Unable to parse range") => {
            StoreError::Unavailable(format!("sheet tab missing: {}", detail))
        }
        s if s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS => {
            StoreError::Unavailable(format!("Sheets API returned {}", s))
        }
        s => StoreError::Protocol(format!("Sheets API returned {}: {}", s, detail)),
    }
}

/// Spreadsheet column letters: 1 -> `A`, 27 -> `AA`.
pub fn column_letter(mut n: usize) -> String {
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Quoted sheet reference, optionally narrowed to columns `A..=last_col` of one row.
pub fn a1_range(sheet: &str, row: Option<(u32, usize)>) -> String {
    let quoted = format!("'{}'", sheet.replace('\'', "''"));
    match row {
        Some((r, width)) => format!("{}!A{}:{}{}", quoted, r, column_letter(width.max(1)), r),
        None => quoted,
    }
}

/// First row number of an A1 range such as `'User'!A7:C7`.
pub fn range_start_row(range: &str) -> Option<u32> {
    let cells = range.rsplit('!').next()?;
    let first = cells.split(':').next()?;
    let digits: String = first.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[async_trait]
impl SheetBackend for GoogleSheetsBackend {
    async fn read_rows(&self, sheet: &str) -> StoreResult<Vec<Row>> {
        let url = self.endpoint("", &["values", &a1_range(sheet, None)])?;
        let body = self
            .call(
                Method::GET,
                url,
                &[("valueRenderOption", "UNFORMATTED_VALUE")],
                None,
            )
            .await?;
        let range: ValueRange = decode(body)?;
        tracing::debug!(sheet, rows = range.values.len(), "Read sheet");
        Ok(range.values)
    }

    async fn append_row(&self, sheet: &str, next_row: u32, cells: Row) -> StoreResult<u32> {
        // OVERWRITE never inserts rows; past the end of the grid it still grows the sheet.
        let target = format!("{}:append", a1_range(sheet, Some((next_row, cells.len()))));
        let url = self.endpoint("", &["values", &target])?;
        let body = self
            .call(
                Method::POST,
                url,
                &[("valueInputOption", "RAW"), ("insertDataOption", "OVERWRITE")],
                Some(json!({ "values": [cells] })),
            )
            .await?;
        let appended: AppendResponse = decode(body)?;
        let row = range_start_row(&appended.updates.updated_range).ok_or_else(|| {
            StoreError::Protocol(format!(
                "cannot read row from updatedRange '{}'",
                appended.updates.updated_range
            ))
        })?;
        tracing::debug!(sheet, row, "Appended row");
        Ok(row)
    }

    async fn update_row(&self, sheet: &str, row: u32, cells: Row) -> StoreResult<()> {
        let range = a1_range(sheet, Some((row, cells.len())));
        let url = self.endpoint("", &["values", &range])?;
        self.call(
            Method::PUT,
            url,
            &[("valueInputOption", "RAW")],
            Some(json!({ "range": range, "majorDimension": "ROWS", "values": [cells] })),
        )
        .await?;
        tracing::debug!(sheet, row, "Updated row");
        Ok(())
    }

    async fn delete_row(&self, sheet: &str, row: u32) -> StoreResult<()> {
        if row == 0 {
            return Err(StoreError::NotFound { row_index: row });
        }
        let sheet_id = self.sheet_id(sheet).await?;
        let url = self.endpoint(":batchUpdate", &[])?;
        let request = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row - 1,
                        "endIndex": row
                    }
                }
            }]
        });
        self.call(Method::POST, url, &[], Some(request)).await?;
        tracing::debug!(sheet, row, "Deleted row");
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let url = self.endpoint("", &[])?;
        self.call(Method::GET, url, &[("fields", "spreadsheetId")], None)
            .await
            .map(|_| ())
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Person, SheetEntity};
    use crate::storage::sheet::RowStoreAdapter;
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{HeaderMap, Uri};
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// One request as the fake Sheets API received it.
    #[derive(Debug, Clone)]
    struct Seen {
        method: Method,
        path: String,
        query: String,
        auth: String,
        body: JsonValue,
    }

    type Reply = Arc<dyn Fn(&Seen) -> (StatusCode, JsonValue) + Send + Sync>;

    #[derive(Clone)]
    struct FakeSheets {
        seen: Arc<Mutex<Vec<Seen>>>,
        reply: Reply,
    }

    impl FakeSheets {
        fn requests(&self) -> Vec<Seen> {
            self.seen.lock().unwrap().clone()
        }
    }

    async fn answer(
        State(fake): State<FakeSheets>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> (StatusCode, Json<JsonValue>) {
        let seen = Seen {
            method,
            path: uri.path().to_string(),
            query: uri.query().unwrap_or_default().to_string(),
            auth: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string(),
            body: serde_json::from_slice(&body).unwrap_or(JsonValue::Null),
        };
        let (status, payload) = (fake.reply)(&seen);
        fake.seen.lock().unwrap().push(seen);
        (status, Json(payload))
    }

    async fn fake_sheets(
        reply: impl Fn(&Seen) -> (StatusCode, JsonValue) + Send + Sync + 'static,
    ) -> (GoogleSheetsBackend, FakeSheets) {
        let fake = FakeSheets {
            seen: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(reply),
        };
        let app = Router::new().fallback(answer).with_state(fake.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let backend = GoogleSheetsBackend::new(SheetsConfig {
            spreadsheet_id: "sid".to_string(),
            access_token: Some("tok".to_string()),
            api_base: format!("http://{}/v4", addr),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        (backend, fake)
    }

    /// Answers values.get with `rows` and echoes the requested row on append.
    fn sheet_with(rows: JsonValue) -> impl Fn(&Seen) -> (StatusCode, JsonValue) + Send + Sync {
        move |seen: &Seen| {
            if seen.method == Method::GET {
                return (StatusCode::OK, json!({ "values": rows.clone() }));
            }
            let range = seen
                .path
                .trim_start_matches("/v4/spreadsheets/sid/values/")
                .trim_end_matches(":append")
                .to_string();
            (StatusCode::OK, json!({ "updates": { "updatedRange": range } }))
        }
    }

    fn unauthenticated() -> GoogleSheetsBackend {
        GoogleSheetsBackend::new(SheetsConfig {
            spreadsheet_id: "sheet-id".to_string(),
            access_token: None,
            api_base: "http://127.0.0.1:9/v4".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(3), "C");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
    }

    #[test]
    fn ranges() {
        assert_eq!(a1_range("User", None), "'User'");
        assert_eq!(a1_range("User", Some((4, 3))), "'User'!A4:C4");
        assert_eq!(a1_range("Bob's", None), "'Bob''s'");
        assert_eq!(range_start_row("'User'!A7:C7"), Some(7));
        assert_eq!(range_start_row("Product!A12:C12"), Some(12));
        assert_eq!(range_start_row("Product"), None);
    }

    #[test]
    fn endpoint_layout() {
        let backend = unauthenticated();
        let url = backend.endpoint("", &["values", "'User':append"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9/v4/spreadsheets/sheet-id/values/'User':append"
        );
        let url = backend.endpoint(":batchUpdate", &[]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/v4/spreadsheets/sheet-id:batchUpdate");
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, ""),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_REQUEST, "bad range"),
            StoreError::Protocol(_)
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_REQUEST, "Unable to parse range: 'User'"),
            StoreError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn missing_token_is_unavailable() {
        let backend = unauthenticated();
        assert!(matches!(backend.ping().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            backend.read_rows("User").await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn read_rows_requests_unformatted_values() {
        let (backend, fake) = fake_sheets(sheet_with(json!([["Name"], ["Ana"]]))).await;
        let rows = backend.read_rows("User").await.unwrap();
        assert_eq!(rows, vec![vec![json!("Name")], vec![json!("Ana")]]);

        let seen = fake.requests();
        assert_eq!(seen[0].path, "/v4/spreadsheets/sid/values/'User'");
        assert_eq!(seen[0].query, "valueRenderOption=UNFORMATTED_VALUE");
        assert_eq!(seen[0].auth, "Bearer tok");
    }

    #[tokio::test]
    async fn append_row_targets_the_requested_row() {
        let (backend, fake) = fake_sheets(sheet_with(json!([]))).await;
        let row = backend
            .append_row("User", 5, vec![json!("Ana"), json!("123"), json!("a@x.com")])
            .await
            .unwrap();
        assert_eq!(row, 5);

        let seen = fake.requests();
        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(seen[0].path, "/v4/spreadsheets/sid/values/'User'!A5:C5:append");
        assert!(seen[0].query.contains("insertDataOption=OVERWRITE"));
        assert!(seen[0].query.contains("valueInputOption=RAW"));
        assert_eq!(seen[0].body, json!({ "values": [["Ana", "123", "a@x.com"]] }));
    }

    #[tokio::test]
    async fn append_row_without_updated_range_is_protocol_error() {
        let (backend, _fake) = fake_sheets(|_| (StatusCode::OK, json!({ "updates": {} }))).await;
        assert!(matches!(
            backend.append_row("User", 2, vec![json!("x")]).await,
            Err(StoreError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn update_row_overwrites_exact_range() {
        let (backend, fake) = fake_sheets(|_| (StatusCode::OK, json!({}))).await;
        backend
            .update_row("Product", 3, vec![json!("Mesa"), json!(10.5), json!("Mesa de jantar")])
            .await
            .unwrap();

        let seen = fake.requests();
        assert_eq!(seen[0].method, Method::PUT);
        assert_eq!(seen[0].path, "/v4/spreadsheets/sid/values/'Product'!A3:C3");
        assert_eq!(seen[0].query, "valueInputOption=RAW");
        assert_eq!(seen[0].body["range"], json!("'Product'!A3:C3"));
        assert_eq!(seen[0].body["values"], json!([["Mesa", 10.5, "Mesa de jantar"]]));
    }

    #[tokio::test]
    async fn delete_row_resolves_sheet_id_then_deletes_dimension() {
        let (backend, fake) = fake_sheets(|seen| {
            if seen.method == Method::GET {
                (
                    StatusCode::OK,
                    json!({ "sheets": [
                        { "properties": { "sheetId": 0, "title": "Product" } },
                        { "properties": { "sheetId": 7, "title": "User" } }
                    ] }),
                )
            } else {
                (StatusCode::OK, json!({ "replies": [{}] }))
            }
        })
        .await;
        backend.delete_row("User", 3).await.unwrap();

        let seen = fake.requests();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].path, "/v4/spreadsheets/sid");
        assert_eq!(seen[0].query, "fields=sheets.properties");
        assert_eq!(seen[1].path, "/v4/spreadsheets/sid:batchUpdate");
        assert_eq!(
            seen[1].body["requests"][0]["deleteDimension"]["range"],
            json!({ "sheetId": 7, "dimension": "ROWS", "startIndex": 2, "endIndex": 3 })
        );
    }

    #[tokio::test]
    async fn http_failures_map_to_store_errors() {
        let (backend, _fake) =
            fake_sheets(|_| (StatusCode::UNAUTHORIZED, json!({ "error": "expired" }))).await;
        assert!(matches!(backend.ping().await, Err(StoreError::Unavailable(_))));

        let (backend, _fake) =
            fake_sheets(|_| (StatusCode::BAD_GATEWAY, json!({}))).await;
        assert!(matches!(
            backend.read_rows("User").await,
            Err(StoreError::Unavailable(_))
        ));

        let (backend, _fake) = fake_sheets(|_| {
            (StatusCode::BAD_REQUEST, json!({ "error": { "message": "Invalid value" } }))
        })
        .await;
        assert!(matches!(
            backend.update_row("User", 2, vec![json!("x")]).await,
            Err(StoreError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn missing_tab_is_unavailable_for_every_operation() {
        let (backend, _fake) = fake_sheets(|seen| {
            if seen.path == "/v4/spreadsheets/sid" {
                (
                    StatusCode::OK,
                    json!({ "sheets": [{ "properties": { "sheetId": 0, "title": "Product" } }] }),
                )
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": { "code": 400, "message": "Unable to parse range: 'User'" } }),
                )
            }
        })
        .await;
        assert!(matches!(
            backend.read_rows("User").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            backend.append_row("User", 2, vec![json!("x")]).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            backend.update_row("User", 2, vec![json!("x")]).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            backend.delete_row("User", 2).await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn adapter_appends_past_a_blank_row() {
        let rows = json!([["Name", "CPF", "Email"], ["Ana", "111", "a@x.com"], [], ["Bia", "222", "b@x.com"]]);
        let (backend, fake) = fake_sheets(sheet_with(rows)).await;
        let adapter = RowStoreAdapter::new(Arc::new(backend), "User", Person::columns());
        let row = adapter
            .append(vec![json!("Caio"), json!("333"), json!("c@x.com")])
            .await
            .unwrap();
        assert_eq!(row, 5);
        let append = fake
            .requests()
            .into_iter()
            .find(|s| s.method == Method::POST)
            .unwrap();
        assert_eq!(append.path, "/v4/spreadsheets/sid/values/'User'!A5:C5:append");
    }

    #[tokio::test]
    async fn adapter_rejects_append_reported_inside_the_table() {
        let (backend, _fake) = fake_sheets(|seen| {
            if seen.method == Method::GET {
                (
                    StatusCode::OK,
                    json!({ "values": [["Name", "CPF", "Email"], ["Ana", "111", "a@x.com"], [], ["Bia", "222", "b@x.com"]] }),
                )
            } else {
                (StatusCode::OK, json!({ "updates": { "updatedRange": "'User'!A3:C3" } }))
            }
        })
        .await;
        let adapter = RowStoreAdapter::new(Arc::new(backend), "User", Person::columns());
        assert!(matches!(
            adapter
                .append(vec![json!("Caio"), json!("333"), json!("c@x.com")])
                .await,
            Err(StoreError::Protocol(_))
        ));
    }
}
