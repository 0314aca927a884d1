// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/severity.rs - 损伤严重程度分级
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

use crate::model::ImageDimensions;

/// 严重程度，声明顺序即大小顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeverityTier {
  Mild,
  Moderate,
  Severe,
}

impl SeverityTier {
  pub const ALL: [SeverityTier; 3] = [
    SeverityTier::Mild,
    SeverityTier::Moderate,
    SeverityTier::Severe,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      SeverityTier::Mild => "Leve",
      SeverityTier::Moderate => "Moderado",
      SeverityTier::Severe => "Severo",
    }
  }
}

impl Serialize for SeverityTier {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.label())
  }
}

// 各档下界（含），按升序排列
const CONFIDENCE_BANDS: [(f32, SeverityTier); 3] = [
  (0.0, SeverityTier::Mild),
  (0.5, SeverityTier::Moderate),
  (0.8, SeverityTier::Severe),
];

const AREA_BANDS: [(f64, SeverityTier); 3] = [
  (0.0, SeverityTier::Mild),
  (0.02, SeverityTier::Moderate),
  (0.08, SeverityTier::Severe),
];

fn band<T: PartialOrd + Copy>(value: T, bands: &[(T, SeverityTier)]) -> SeverityTier {
  bands
    .iter()
    .rev()
    .find(|(lower, _)| value >= *lower)
    .map(|(_, tier)| *tier)
    .unwrap_or(SeverityTier::Mild)
}

pub fn confidence_tier(confidence: f32) -> SeverityTier {
  band(confidence, &CONFIDENCE_BANDS)
}

pub fn area_tier(relative_area: f64) -> SeverityTier {
  band(relative_area, &AREA_BANDS)
}

/// 边框面积占整幅图像的比例
pub fn relative_area(bbox: &[f32; 4], dims: ImageDimensions) -> f64 {
  let image_area = dims.area();
  if image_area <= 0.0 {
    return 0.0;
  }
  let width = (bbox[2] - bbox[0]).max(0.0) as f64;
  let height = (bbox[3] - bbox[1]).max(0.0) as f64;
  width * height / image_area
}

/// 置信度与相对面积各自分级，取较重的一档
pub fn classify(confidence: f32, bbox: &[f32; 4], dims: ImageDimensions) -> SeverityTier {
  confidence_tier(confidence).max(area_tier(relative_area(bbox, dims)))
}
