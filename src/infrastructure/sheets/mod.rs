// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod csv_sheet;
pub mod google_sheets;

use crate::config::settings::{SheetBackend, SheetSettings};
use async_trait::async_trait;
use thiserror::Error;

pub use csv_sheet::CsvSheetStore;
pub use google_sheets::GoogleSheetStore;

/// 表格访问错误
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet configuration error: {0}")]
    Config(String),

    #[error("Invalid column reference: {0}")]
    InvalidColumn(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Worksheet {0} not found")]
    WorksheetNotFound(usize),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Expected {expected} result rows but the sheet has {actual}")]
    RowCountMismatch { expected: usize, actual: usize },
}

/// 域名来源与结果写回
///
/// 读取指定列的域名（跳过表头、过滤空白），
/// 并把结果按顺序一次性写回结果列
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// 读取域名列表
    async fn load_domains(&self) -> Result<Vec<String>, SheetError>;

    /// 批量写回结果
    ///
    /// # 参数
    ///
    /// * `results` - 与 `load_domains` 返回列表逐位对齐的结果字符串
    async fn write_results(&self, results: &[String]) -> Result<(), SheetError>;

    /// 用于日志的描述
    fn describe(&self) -> String;
}

/// 将列字母转换为从0开始的序号
///
/// `A` → 0，`B` → 1，`AA` → 26
pub fn column_index(column: &str) -> Result<usize, SheetError> {
    let column = column.trim();
    if column.is_empty() || !column.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SheetError::InvalidColumn(column.to_string()));
    }

    let mut index = 0usize;
    for c in column.chars() {
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(digit))
            .ok_or_else(|| SheetError::InvalidColumn(column.to_string()))?;
    }
    Ok(index - 1)
}

/// 按配置构建表格后端
pub fn build_sheet_store(settings: &SheetSettings) -> Result<Box<dyn SheetStore>, SheetError> {
    match settings.backend {
        SheetBackend::Google => Ok(Box::new(GoogleSheetStore::from_settings(settings)?)),
        SheetBackend::Csv => Ok(Box::new(CsvSheetStore::from_settings(settings)?)),
    }
}
