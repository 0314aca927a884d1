// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/location.rs - 损伤部位映射
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

use crate::taxonomy::DamageType;

/// 车辆部位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocationLabel {
  BodyPaint,
  WindshieldGlass,
  Lighting,
  Tire,
  Unknown,
}

impl LocationLabel {
  pub fn label(&self) -> &'static str {
    match self {
      LocationLabel::BodyPaint => "Carroceria/Pintura",
      LocationLabel::WindshieldGlass => "Para-brisa/Vidros",
      LocationLabel::Lighting => "Faróis/Lanternas",
      LocationLabel::Tire => "Rodas",
      LocationLabel::Unknown => "N/A",
    }
  }
}

impl Serialize for LocationLabel {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.label())
  }
}

pub fn locate(damage_type: DamageType) -> LocationLabel {
  match damage_type {
    DamageType::ShatteredGlass => LocationLabel::WindshieldGlass,
    DamageType::BrokenLamp => LocationLabel::Lighting,
    DamageType::FlatTire => LocationLabel::Tire,
    DamageType::Dent | DamageType::Scratch | DamageType::Crack => LocationLabel::BodyPaint,
    DamageType::Unknown => LocationLabel::Unknown,
  }
}
