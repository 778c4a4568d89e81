//! # 报告数据模型
//!
//! 按 puck 分组、保持发现顺序的最终数据模型，以及渲染所需的上下文。
//!
//! JSON 中 `pucks` 序列化为有序映射 `{ puck: [record, ...] }`，
//! 键的顺序即目录发现顺序。
//!
//! ## 依赖关系
//! - 被 `pipeline/builder.rs` 创建
//! - 被 `report/` 渲染与导出

use super::collection::CollectionRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 一个 puck 及其全部 collection
#[derive(Debug, Clone, PartialEq)]
pub struct PuckGroup {
    pub puck: String,
    pub collections: Vec<CollectionRecord>,
}

/// 最终报告数据模型
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    #[serde(with = "puck_map")]
    pub pucks: Vec<PuckGroup>,
    pub csv_loaded: bool,
}

impl ReportModel {
    pub fn puck_keys(&self) -> impl Iterator<Item = &str> {
        self.pucks.iter().map(|g| g.puck.as_str())
    }

    #[cfg(test)]
    pub fn get(&self, puck: &str) -> Option<&[CollectionRecord]> {
        self.pucks
            .iter()
            .find(|g| g.puck == puck)
            .map(|g| g.collections.as_slice())
    }

    /// 遍历 (puck, record)
    pub fn records(&self) -> impl Iterator<Item = (&str, &CollectionRecord)> {
        self.pucks
            .iter()
            .flat_map(|g| g.collections.iter().map(move |r| (g.puck.as_str(), r)))
    }

    pub fn num_collections(&self) -> usize {
        self.pucks.iter().map(|g| g.collections.len()).sum()
    }
}

/// 渲染上下文，与模型一同交给渲染器
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub report_title: String,
    pub csv_loaded: bool,
    /// 报告生成时间（由调用方注入）
    pub generated_at: NaiveDateTime,
}

/// `Vec<PuckGroup>` <-> 有序 JSON 映射
mod puck_map {
    use super::{CollectionRecord, PuckGroup};
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(pucks: &[PuckGroup], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(pucks.len()))?;
        for group in pucks {
            map.serialize_entry(&group.puck, &group.collections)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PuckGroup>, D::Error> {
        deserializer.deserialize_map(PuckMapVisitor)
    }

    struct PuckMapVisitor;

    impl<'de> Visitor<'de> for PuckMapVisitor {
        type Value = Vec<PuckGroup>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map from puck key to a list of collection records")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut pucks: Vec<PuckGroup> = Vec::new();
            while let Some((puck, collections)) =
                access.next_entry::<String, Vec<CollectionRecord>>()?
            {
                if pucks.iter().any(|g| g.puck == puck) {
                    return Err(serde::de::Error::custom(format!(
                        "duplicate puck key '{}'",
                        puck
                    )));
                }
                pucks.push(PuckGroup { puck, collections });
            }
            Ok(pucks)
        }
    }
}
