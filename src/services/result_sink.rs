//! 结果写入服务 - 业务能力层
//!
//! 只负责把采集结果写成工作簿，不关心采集流程。
//! 表格结构是对外约定：
//! - `主评论`：商品名称 | 规格 | 评论序号 | 评论内容 | 爬取时间
//! - `追评`：商品名称 | 规格 | 评论对序号 | 原评论 | 追评 | 爬取时间

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::info;

use crate::error::{HarvestError, Result};
use crate::models::record::RunResult;

pub const PRIMARY_SHEET: &str = "主评论";
pub const PAIRED_SHEET: &str = "追评";

const PRIMARY_HEADER: [&str; 5] = ["商品名称", "规格", "评论序号", "评论内容", "爬取时间"];
const PAIRED_HEADER: [&str; 6] = ["商品名称", "规格", "评论对序号", "原评论", "追评", "爬取时间"];

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 结果写入
pub trait ResultSink {
    /// 写入一次运行的全部结果，返回生成的文件
    fn write(&self, results: &[RunResult]) -> Result<Vec<PathBuf>>;
}

/// 主评论表（含表头）
pub fn primary_rows(results: &[RunResult]) -> Vec<Vec<String>> {
    let mut rows = vec![PRIMARY_HEADER.iter().map(|h| h.to_string()).collect()];
    for result in results {
        for (index, record) in result.primary_records.iter().enumerate() {
            rows.push(vec![
                result.target.name.clone(),
                record.spec.clone().unwrap_or_default(),
                format!("评论{}", index + 1),
                record.text.clone(),
                record.captured_at.format(TIME_FORMAT).to_string(),
            ]);
        }
    }
    rows
}

/// 追评表（含表头）
pub fn paired_rows(results: &[RunResult]) -> Vec<Vec<String>> {
    let mut rows = vec![PAIRED_HEADER.iter().map(|h| h.to_string()).collect()];
    for result in results {
        for (index, record) in result.paired_records.iter().enumerate() {
            rows.push(vec![
                result.target.name.clone(),
                record.spec.clone().unwrap_or_default(),
                format!("评论对{}", index + 1),
                record.original_text.clone().unwrap_or_default(),
                record.follow_up_text.clone().unwrap_or_default(),
                record.captured_at.format(TIME_FORMAT).to_string(),
            ]);
        }
    }
    rows
}

/// 生成文件名
pub fn workbook_file_name(now: DateTime<Local>) -> String {
    format!("淘宝评论结果_{}.xlsx", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// 工作簿写入
///
/// 按目标的输出目录分组，每个目录一个工作簿
pub struct WorkbookSink {
    created_at: DateTime<Local>,
}

impl WorkbookSink {
    pub fn new() -> Self {
        Self {
            created_at: Local::now(),
        }
    }

    /// 使用固定时间（文件名由它决定）
    pub fn with_time(created_at: DateTime<Local>) -> Self {
        Self { created_at }
    }

    fn write_dir(&self, dir: &Path, results: &[RunResult]) -> Result<PathBuf> {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| HarvestError::sink(dir.display().to_string(), e))?;
            info!("📁 创建目录: {}", dir.display());
        }

        let path = dir.join(workbook_file_name(self.created_at));
        let path_label = path.display().to_string();

        let mut workbook = Workbook::new();
        let primary = primary_rows(results);
        let paired = paired_rows(results);

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(PRIMARY_SHEET)
            .map_err(|e| HarvestError::sink(&path_label, e))?;
        write_rows(sheet, &primary).map_err(|e| HarvestError::sink(&path_label, e))?;

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(PAIRED_SHEET)
            .map_err(|e| HarvestError::sink(&path_label, e))?;
        write_rows(sheet, &paired).map_err(|e| HarvestError::sink(&path_label, e))?;

        workbook
            .save(&path)
            .map_err(|e| HarvestError::sink(&path_label, e))?;

        info!("💾 结果已保存到: {}", path.display());
        info!("📊 主评论数量: {}", primary.len() - 1);
        info!("📊 追评对数量: {}", paired.len() - 1);
        Ok(path)
    }
}

impl Default for WorkbookSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSink for WorkbookSink {
    fn write(&self, results: &[RunResult]) -> Result<Vec<PathBuf>> {
        let mut groups: IndexMap<&str, Vec<RunResult>> = IndexMap::new();
        for result in results {
            groups
                .entry(result.target.output_dir())
                .or_default()
                .push(result.clone());
        }

        groups
            .iter()
            .map(|(dir, group)| self.write_dir(Path::new(dir), group))
            .collect()
    }
}

fn write_rows(sheet: &mut Worksheet, rows: &[Vec<String>]) -> std::result::Result<(), rust_xlsxwriter::XlsxError> {
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, cell.as_str())?;
        }
    }
    Ok(())
}
