//! 抽取策略 - 业务能力层
//!
//! 一个策略负责一种记录结构：给定页面快照，产出本次调用内已去重的记录。
//! 策略本身无状态，跨周期的累积由引擎负责。

use chrono::{DateTime, Local};
use std::collections::HashSet;

use crate::error::Result;
use crate::infrastructure::surface::{ElementQuery, ElementSnapshot};
use crate::models::record::{Keyed, PairedRecord, Phase, PrimaryRecord};
use crate::models::site_profile::{SiteProfile, PART_CONTENT, PART_FOLLOW_UP, PART_ORIGINAL};
use crate::services::text_filter::TextFilter;

/// 抽取策略
pub trait ExtractionStrategy {
    type Record: Keyed + Clone;

    fn phase(&self) -> Phase;

    /// 需要从页面读取的元素
    fn query(&self) -> &ElementQuery;

    fn extract(
        &self,
        snapshots: &[ElementSnapshot],
        origin: &str,
        captured_at: DateTime<Local>,
    ) -> Vec<Self::Record>;
}

/// 主评论策略
pub struct PrimaryItemStrategy {
    query: ElementQuery,
    filter: TextFilter,
}

impl PrimaryItemStrategy {
    pub fn new(profile: &SiteProfile) -> Result<Self> {
        Ok(Self {
            query: profile.primary_query.clone(),
            filter: TextFilter::new(&profile.filter)?,
        })
    }
}

impl ExtractionStrategy for PrimaryItemStrategy {
    type Record = PrimaryRecord;

    fn phase(&self) -> Phase {
        Phase::Primary
    }

    fn query(&self) -> &ElementQuery {
        &self.query
    }

    fn extract(
        &self,
        snapshots: &[ElementSnapshot],
        origin: &str,
        captured_at: DateTime<Local>,
    ) -> Vec<PrimaryRecord> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for snapshot in snapshots {
            let text = snapshot.text.trim();
            if !self.filter.accept(text) {
                continue;
            }
            let record = PrimaryRecord {
                text: text.to_string(),
                spec: snapshot
                    .annotation
                    .as_deref()
                    .and_then(|raw| self.filter.clean_spec(raw)),
                origin: origin.to_string(),
                captured_at,
            };
            if seen.insert(record.identity()) {
                records.push(record);
            }
        }

        records
    }
}

/// 原评论 + 追评策略
pub struct PairedItemStrategy {
    query: ElementQuery,
    filter: TextFilter,
}

impl PairedItemStrategy {
    pub fn new(profile: &SiteProfile) -> Result<Self> {
        Ok(Self {
            query: profile.paired_query.clone(),
            filter: TextFilter::new(&profile.filter)?,
        })
    }

    fn first_accepted(&self, texts: &[String]) -> Option<String> {
        texts
            .first()
            .map(|t| t.trim())
            .filter(|t| self.filter.accept(t))
            .map(str::to_string)
    }
}

impl ExtractionStrategy for PairedItemStrategy {
    type Record = PairedRecord;

    fn phase(&self) -> Phase {
        Phase::Paired
    }

    fn query(&self) -> &ElementQuery {
        &self.query
    }

    fn extract(
        &self,
        snapshots: &[ElementSnapshot],
        origin: &str,
        captured_at: DateTime<Local>,
    ) -> Vec<PairedRecord> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for snapshot in snapshots {
            let mut original = self.first_accepted(snapshot.part(PART_ORIGINAL));

            let follow_up: String = snapshot
                .part(PART_FOLLOW_UP)
                .iter()
                .map(|t| t.trim())
                .collect();
            let follow_up = (!follow_up.is_empty()).then_some(follow_up);

            // 原评论被过滤掉但有追评时，退回到条目里第一个正文
            if original.is_none() && follow_up.is_some() {
                original = self.first_accepted(snapshot.part(PART_CONTENT));
            }

            if original.is_none() && follow_up.is_none() {
                continue;
            }

            let record = PairedRecord {
                original_text: original,
                follow_up_text: follow_up,
                spec: snapshot
                    .annotation
                    .as_deref()
                    .and_then(|raw| self.filter.clean_spec(raw)),
                origin: origin.to_string(),
                captured_at,
            };
            if seen.insert(record.identity()) {
                records.push(record);
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn snapshot(text: &str, annotation: Option<&str>) -> ElementSnapshot {
        ElementSnapshot {
            text: text.to_string(),
            annotation: annotation.map(str::to_string),
            parts: HashMap::new(),
        }
    }

    fn item(original: &[&str], follow_up: &[&str], content: &[&str]) -> ElementSnapshot {
        let to_vec = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let mut parts = HashMap::new();
        parts.insert(PART_ORIGINAL.to_string(), to_vec(original));
        parts.insert(PART_FOLLOW_UP.to_string(), to_vec(follow_up));
        parts.insert(PART_CONTENT.to_string(), to_vec(content));
        ElementSnapshot {
            text: String::new(),
            annotation: Some("2025-10-23已购：大杯/热".to_string()),
            parts,
        }
    }

    #[test]
    fn test_primary_filters_and_dedupes() {
        let strategy = PrimaryItemStrategy::new(&SiteProfile::default()).unwrap();
        let snapshots = vec![
            snapshot("  咖啡很香，回购第三次了  ", Some("2025年10月22日已购：中杯")),
            snapshot("该用户觉得商品非常好", None),
            snapshot("咖啡很香，回购第三次了", None),
            snapshot("好喝", None),
            snapshot("包装很用心，发货也快", None),
        ];

        let records = strategy.extract(&snapshots, "https://item.taobao.com/1", Local::now());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "咖啡很香，回购第三次了");
        assert_eq!(records[0].spec.as_deref(), Some("中杯"));
        assert_eq!(records[1].text, "包装很用心，发货也快");
        assert_eq!(records[1].spec, None);
    }

    #[test]
    fn test_paired_keeps_either_side() {
        let strategy = PairedItemStrategy::new(&SiteProfile::default()).unwrap();
        let snapshots = vec![
            item(&["原评论写得很认真"], &["用了一周", "依然很好"], &["原评论写得很认真"]),
            item(&["原评论只有正文没有追评"], &[], &[]),
            item(&[], &[], &[]),
        ];

        let records = strategy.extract(&snapshots, "origin", Local::now());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].original_text.as_deref(), Some("原评论写得很认真"));
        assert_eq!(records[0].follow_up_text.as_deref(), Some("用了一周依然很好"));
        assert_eq!(records[0].spec.as_deref(), Some("大杯/热"));
        assert_eq!(records[1].follow_up_text, None);
    }

    #[test]
    fn test_paired_falls_back_to_first_content() {
        let strategy = PairedItemStrategy::new(&SiteProfile::default()).unwrap();
        let snapshots = vec![
            item(&[], &["追评：喝完了再来买"], &["第一个正文也是原评论", "追评：喝完了再来买"]),
            item(&["该用户觉得商品非常好"], &["追评内容也不错呀"], &["该用户觉得商品非常好"]),
        ];

        let records = strategy.extract(&snapshots, "origin", Local::now());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].original_text.as_deref(), Some("第一个正文也是原评论"));
        assert_eq!(records[1].original_text, None);
        assert_eq!(records[1].follow_up_text.as_deref(), Some("追评内容也不错呀"));
    }

    #[test]
    fn test_missing_parts_never_fail() {
        let strategy = PairedItemStrategy::new(&SiteProfile::default()).unwrap();
        let records = strategy.extract(&[ElementSnapshot::default()], "origin", Local::now());
        assert!(records.is_empty());
    }
}
