// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/report/analysis.rs - 损伤统计与维修紧急度
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::collections::BTreeSet;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{report::DamageRecord, severity::SeverityTier};

// 损伤数量达到该值即判定为高紧急度
const HIGH_URGENCY_COUNT: usize = 4;
const MEDIUM_URGENCY_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RepairUrgency {
  #[serde(rename = "Baixa")]
  Low,
  #[serde(rename = "Média")]
  Medium,
  #[serde(rename = "Alta")]
  High,
}

/// 各严重程度的数量，三个键始终存在
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCount {
  pub mild: usize,
  pub moderate: usize,
  pub severe: usize,
}

impl SeverityCount {
  pub fn get(&self, tier: SeverityTier) -> usize {
    match tier {
      SeverityTier::Mild => self.mild,
      SeverityTier::Moderate => self.moderate,
      SeverityTier::Severe => self.severe,
    }
  }

  fn bump(&mut self, tier: SeverityTier) {
    match tier {
      SeverityTier::Mild => self.mild += 1,
      SeverityTier::Moderate => self.moderate += 1,
      SeverityTier::Severe => self.severe += 1,
    }
  }

  pub fn total(&self) -> usize {
    self.mild + self.moderate + self.severe
  }
}

impl Serialize for SeverityCount {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(SeverityTier::ALL.len()))?;
    for tier in SeverityTier::ALL {
      map.serialize_entry(tier.label(), &self.get(tier))?;
    }
    map.end()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageAnalysis {
  pub total_damages: usize,
  pub severity_count: SeverityCount,
  /// 出现过的损伤类型显示名，去重并排序
  pub damage_types: BTreeSet<&'static str>,
  pub repair_urgency: RepairUrgency,
}

/// 优先级级联：先判高，再判中，否则为低
pub fn repair_urgency(total_damages: usize, severity_count: &SeverityCount) -> RepairUrgency {
  if severity_count.severe > 0 || total_damages >= HIGH_URGENCY_COUNT {
    RepairUrgency::High
  } else if severity_count.moderate > 0 || total_damages >= MEDIUM_URGENCY_COUNT {
    RepairUrgency::Medium
  } else {
    RepairUrgency::Low
  }
}

pub fn aggregate(records: &[DamageRecord]) -> DamageAnalysis {
  let mut severity_count = SeverityCount::default();
  let mut damage_types = BTreeSet::new();

  for record in records {
    severity_count.bump(record.severity);
    damage_types.insert(record.damage_type.display());
  }

  let total_damages = records.len();
  DamageAnalysis {
    total_damages,
    repair_urgency: repair_urgency(total_damages, &severity_count),
    severity_count,
    damage_types,
  }
}
