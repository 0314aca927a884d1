// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/taxonomy.rs - 损伤类别映射
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

use serde::{Serialize, Serializer};

use crate::model::WithLabel;

/// 损伤类型，序列化为机器键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DamageType {
  Dent,
  Scratch,
  Crack,
  ShatteredGlass,
  BrokenLamp,
  FlatTire,
  Unknown,
}

// 下标即检测器类别索引（CarDD 类别顺序）
const CLASS_TABLE: [DamageType; 6] = [
  DamageType::Dent,
  DamageType::Scratch,
  DamageType::Crack,
  DamageType::ShatteredGlass,
  DamageType::BrokenLamp,
  DamageType::FlatTire,
];

impl DamageType {
  pub const KNOWN: [DamageType; 6] = CLASS_TABLE;

  pub fn from_class_index(index: i64) -> Self {
    usize::try_from(index)
      .ok()
      .and_then(|i| CLASS_TABLE.get(i))
      .copied()
      .unwrap_or(DamageType::Unknown)
  }

  pub fn key(&self) -> &'static str {
    match self {
      DamageType::Dent => "dent",
      DamageType::Scratch => "scratch",
      DamageType::Crack => "crack",
      DamageType::ShatteredGlass => "shattered_glass",
      DamageType::BrokenLamp => "broken_lamp",
      DamageType::FlatTire => "flat_tire",
      DamageType::Unknown => "unknown",
    }
  }

  pub fn display(&self) -> &'static str {
    match self {
      DamageType::Dent => "Amassado",
      DamageType::Scratch => "Risco",
      DamageType::Crack => "Rachadura",
      DamageType::ShatteredGlass => "Vidro Quebrado",
      DamageType::BrokenLamp => "Lâmpada Quebrada",
      DamageType::FlatTire => "Pneu Vazio",
      DamageType::Unknown => "Desconhecido",
    }
  }
}

impl Serialize for DamageType {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.key())
  }
}

impl WithLabel for DamageType {
  fn to_label_str(&self) -> String {
    self.display().to_string()
  }

  fn from_label_id(id: i64) -> Self {
    DamageType::from_class_index(id)
  }
}

/// 检测器类别索引到损伤类型；未知索引不报错
pub fn map(class_index: i64) -> DamageType {
  DamageType::from_class_index(class_index)
}
