// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{column_index, SheetError, SheetStore};
use crate::config::settings::SheetSettings;
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

const RESULT_HEADER: &str = "Result";

/// CSV 文件后端
///
/// 第一行为表头。结果按顺序写入非空域名所在行的结果列，
/// 其余列原样保留。
pub struct CsvSheetStore {
    path: PathBuf,
    domain_column: usize,
    result_column: usize,
}

impl CsvSheetStore {
    pub fn new(path: impl Into<PathBuf>, domain_column: usize, result_column: usize) -> Self {
        Self {
            path: path.into(),
            domain_column,
            result_column,
        }
    }

    pub fn from_settings(settings: &SheetSettings) -> Result<Self, SheetError> {
        let path = settings
            .csv_path
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| SheetError::Config("sheet.csv_path is required".to_string()))?;

        Ok(Self::new(
            path,
            column_index(&settings.domain_column)?,
            column_index(&settings.result_column)?,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<(StringRecord, Vec<StringRecord>), SheetError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok((headers, rows))
    }

    /// 在同一目录暂存新内容，写入成功后才替换原文件
    ///
    /// `fill` 失败时原文件保持不变，暂存文件随之删除
    fn replace_file<F>(&self, fill: F) -> Result<(), SheetError>
    where
        F: FnOnce(&mut NamedTempFile) -> Result<(), SheetError>,
    {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        fill(&mut staged)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|e| SheetError::Io(e.error))?;
        Ok(())
    }

    fn has_domain(&self, row: &StringRecord) -> bool {
        row.get(self.domain_column)
            .map(|cell| !cell.trim().is_empty())
            .unwrap_or(false)
    }
}

/// 把 `value` 写入第 `index` 列，必要时补齐空列
fn set_cell(record: &StringRecord, index: usize, value: &str) -> StringRecord {
    let mut cells: Vec<&str> = record.iter().collect();
    if cells.len() <= index {
        cells.resize(index + 1, "");
    }
    cells[index] = value;
    StringRecord::from(cells)
}

#[async_trait]
impl SheetStore for CsvSheetStore {
    async fn load_domains(&self) -> Result<Vec<String>, SheetError> {
        let (_, rows) = self.read_all()?;

        let domains: Vec<String> = rows
            .iter()
            .filter(|row| self.has_domain(row))
            .filter_map(|row| row.get(self.domain_column).map(str::to_string))
            .collect();

        info!("Loaded {} domains from {}", domains.len(), self.path.display());
        Ok(domains)
    }

    async fn write_results(&self, results: &[String]) -> Result<(), SheetError> {
        if results.is_empty() {
            return Ok(());
        }

        let (headers, rows) = self.read_all()?;

        let domain_rows = rows.iter().filter(|row| self.has_domain(row)).count();
        if domain_rows < results.len() {
            return Err(SheetError::RowCountMismatch {
                expected: results.len(),
                actual: domain_rows,
            });
        }

        let header_value = headers
            .get(self.result_column)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(RESULT_HEADER)
            .to_string();
        let headers = set_cell(&headers, self.result_column, &header_value);

        let mut pending = results.iter();
        let updated: Vec<StringRecord> = rows
            .iter()
            .map(|row| {
                if self.has_domain(row) {
                    if let Some(result) = pending.next() {
                        return set_cell(row, self.result_column, result);
                    }
                }
                row.clone()
            })
            .collect();

        self.replace_file(|staged| {
            let mut writer = WriterBuilder::new().flexible(true).from_writer(staged);
            writer.write_record(&headers)?;
            for row in &updated {
                writer.write_record(row)?;
            }
            writer.flush()?;
            Ok(())
        })?;

        info!("Wrote {} results to {}", results.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}
