// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{column_index, SheetError, SheetStore};
use crate::config::settings::SheetSettings;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Google Sheets 后端
///
/// 通过 Sheets v4 REST API 读写，使用配置中已签发的 OAuth 访问令牌
pub struct GoogleSheetStore {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    worksheet_index: usize,
    access_token: String,
    domain_column: String,
    result_column: String,
}

impl GoogleSheetStore {
    /// 从配置创建
    ///
    /// # 返回值
    ///
    /// 缺少电子表格ID或访问令牌、列引用非法时返回 `SheetError::Config`
    pub fn from_settings(settings: &SheetSettings) -> Result<Self, SheetError> {
        let spreadsheet_id = settings
            .spreadsheet_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| SheetError::Config("sheet.spreadsheet_id is required".to_string()))?;
        let access_token = settings
            .access_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| SheetError::Config("sheet.access_token is required".to_string()))?;

        column_index(&settings.domain_column)?;
        column_index(&settings.result_column)?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
            worksheet_index: settings.worksheet_index,
            access_token,
            domain_column: settings.domain_column.trim().to_uppercase(),
            result_column: settings.result_column.trim().to_uppercase(),
        })
    }

    /// 按序号解析工作表标题
    async fn worksheet_title(&self) -> Result<String, SheetError> {
        let url = format!("{}/spreadsheets/{}", self.base_url, self.spreadsheet_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("fields", "sheets.properties")])
            .send()
            .await?;

        let metadata: SpreadsheetMetadata = check_status(response).await?.json().await?;

        let title = metadata
            .sheets
            .iter()
            .find(|sheet| sheet.properties.index == self.worksheet_index)
            .or_else(|| metadata.sheets.get(self.worksheet_index))
            .map(|sheet| sheet.properties.title.clone())
            .ok_or(SheetError::WorksheetNotFound(self.worksheet_index))?;

        debug!("Resolved worksheet {} to '{}'", self.worksheet_index, title);
        Ok(title)
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }
}

/// 取每行首个单元格，丢弃空白值
///
/// # 返回值
///
/// 非空域名以及被跳过的行数
fn non_blank_cells(rows: Vec<Vec<String>>) -> (Vec<String>, usize) {
    let total = rows.len();
    let cells: Vec<String> = rows
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .filter(|cell| !cell.trim().is_empty())
        .collect();
    let skipped = total - cells.len();
    (cells, skipped)
}

/// A1 表示法的区域，工作表标题总是加引号
fn a1_range(title: &str, cells: &str) -> String {
    format!("'{}'!{}", title.replace('\'', "''"), cells)
}

async fn check_status(response: Response) -> Result<Response, SheetError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(SheetError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SheetStore for GoogleSheetStore {
    async fn load_domains(&self) -> Result<Vec<String>, SheetError> {
        let title = self.worksheet_title().await?;
        let column = &self.domain_column;
        let range = a1_range(&title, &format!("{}2:{}", column, column));

        let response = self
            .client
            .get(self.values_url(&range))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let values: ValueRange = check_status(response).await?.json().await?;

        let (domains, skipped) = non_blank_cells(values.values);
        if skipped > 0 {
            warn!(
                "Skipped {} blank rows in '{}'; results are written contiguously from row 2 and \
                 will not line up with domains below a gap",
                skipped, title
            );
        }

        info!("Loaded {} domains from '{}'", domains.len(), title);
        Ok(domains)
    }

    async fn write_results(&self, results: &[String]) -> Result<(), SheetError> {
        if results.is_empty() {
            return Ok(());
        }

        let title = self.worksheet_title().await?;
        let column = &self.result_column;
        let range = a1_range(
            &title,
            &format!("{}2:{}{}", column, column, results.len() + 1),
        );

        let body = ValueRange {
            range: Some(range.clone()),
            major_dimension: Some("ROWS".to_string()),
            values: results.iter().map(|r| vec![r.clone()]).collect(),
        };

        let response = self
            .client
            .put(self.values_url(&range))
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;

        info!("Wrote {} results to {}", results.len(), range);
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "Google Sheet {} (worksheet {})",
            self.spreadsheet_id, self.worksheet_index
        )
    }
}

#[cfg(test)]
#[path = "google_sheets_test.rs"]
mod tests;
