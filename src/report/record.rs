// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/report/record.rs - 损伤记录构建
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

use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeStruct};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
  location::{self, LocationLabel},
  model::{ImageDimensions, RawDetection},
  severity::{self, SeverityTier},
  taxonomy::{self, DamageType},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
  #[error("第 {index} 个检测的边框无效: {bbox:?}")]
  InvalidBBox { index: usize, bbox: [f32; 4] },
  #[error("第 {index} 个检测的边框超出图像范围 {width}x{height}: {bbox:?}")]
  OutOfBounds {
    index: usize,
    bbox: [f32; 4],
    width: u32,
    height: u32,
  },
  #[error("第 {index} 个检测的置信度无效: {confidence}")]
  InvalidConfidence { index: usize, confidence: f32 },
}

/// 报告内的损伤编号，从 1 开始，格式为 `DMG_001`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DamageId(u32);

impl DamageId {
  pub fn new(seq: u32) -> Self {
    Self(seq)
  }
}

impl fmt::Display for DamageId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "DMG_{:03}", self.0)
  }
}

impl Serialize for DamageId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageRecord {
  pub damage_id: DamageId,
  pub damage_type: DamageType,
  pub confidence: f32,
  pub severity: SeverityTier,
  pub location: LocationLabel,
  pub bbox: [f32; 4],
}

impl Serialize for DamageRecord {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("DamageRecord", 7)?;
    state.serialize_field("damage_id", &self.damage_id)?;
    state.serialize_field("class", &self.damage_type)?;
    state.serialize_field("class_display", self.damage_type.display())?;
    state.serialize_field("confidence", &self.confidence)?;
    state.serialize_field("severity", &self.severity)?;
    state.serialize_field("location", &self.location)?;
    state.serialize_field("bbox", &self.bbox)?;
    state.end()
  }
}

fn validate(index: usize, det: &RawDetection, dims: ImageDimensions) -> Result<(), RecordError> {
  let confidence = det.confidence;
  if !(0.0..=1.0).contains(&confidence) {
    return Err(RecordError::InvalidConfidence { index, confidence });
  }

  let [x_min, y_min, x_max, y_max] = det.bbox;
  if det.bbox.iter().any(|v| !v.is_finite()) || x_min >= x_max || y_min >= y_max {
    return Err(RecordError::InvalidBBox {
      index,
      bbox: det.bbox,
    });
  }

  if x_min < 0.0 || y_min < 0.0 || x_max > dims.width as f32 || y_max > dims.height as f32 {
    return Err(RecordError::OutOfBounds {
      index,
      bbox: det.bbox,
      width: dims.width,
      height: dims.height,
    });
  }

  Ok(())
}

/// 按检测顺序为每个检测生成一条记录，编号从 `DMG_001` 开始
///
/// 不重排、不去重、不合并重叠边框。任一检测违反边框约束时整体失败，不做裁剪。
pub fn build_records(
  detections: &[RawDetection],
  dims: ImageDimensions,
) -> Result<Vec<DamageRecord>, RecordError> {
  let mut records = Vec::with_capacity(detections.len());
  let mut seq = 0u32;

  for (index, det) in detections.iter().enumerate() {
    validate(index, det, dims).inspect_err(|e| error!("检测数据校验失败: {}", e))?;

    seq += 1;
    let damage_type = taxonomy::map(det.class_index);
    let record = DamageRecord {
      damage_id: DamageId::new(seq),
      damage_type,
      confidence: det.confidence,
      severity: severity::classify(det.confidence, &det.bbox, dims),
      location: location::locate(damage_type),
      bbox: det.bbox,
    };
    debug!("生成损伤记录: {:?}", record);
    records.push(record);
  }

  Ok(records)
}
