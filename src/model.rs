// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/model.rs - 检测器边界定义
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
use std::sync::OnceLock;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::location::LocationLabel;
use crate::severity::SeverityTier;
use crate::taxonomy::DamageType;

pub trait WithLabel: Sized + std::fmt::Debug {
  fn to_label_str(&self) -> String;
  fn from_label_id(id: i64) -> Self;
}

/// 检测器输出的单个目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
  pub class_index: i64,
  pub confidence: f32,
  pub bbox: [f32; 4], // [x_min, y_min, x_max, y_max]，源图像像素坐标
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
  pub width: u32,
  pub height: u32,
}

impl ImageDimensions {
  pub fn new(width: u32, height: u32) -> Self {
    Self { width, height }
  }

  pub fn area(&self) -> f64 {
    self.width as f64 * self.height as f64
  }
}

impl From<&RgbImage> for ImageDimensions {
  fn from(image: &RgbImage) -> Self {
    let (width, height) = image.dimensions();
    Self { width, height }
  }
}

#[derive(Error, Debug)]
pub enum DetectionError {
  #[error("检测器不可用: {0}")]
  Unavailable(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("检测结果解析错误: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("路径解码错误: {0}")]
  PathDecodeError(#[from] std::string::FromUtf8Error),
}

/// 外部目标检测器：一张图像进，一组检测结果出
pub trait Detector {
  fn detect(&self, image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError>;
}

impl<D: Detector + ?Sized> Detector for &D {
  fn detect(&self, image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError> {
    (**self).detect(image)
  }
}

/// 进程级检测器槽位
///
/// 初始化只发生一次，之后只读，可在并发请求间共享。
/// 初始化之前调用 `detect` 会得到 [`DetectionError::Unavailable`]。
pub struct DetectorSlot<D> {
  inner: OnceLock<D>,
}

impl<D> Default for DetectorSlot<D> {
  fn default() -> Self {
    Self::new()
  }
}

impl<D> DetectorSlot<D> {
  pub const fn new() -> Self {
    Self {
      inner: OnceLock::new(),
    }
  }

  /// 装载检测器；若已装载则返回传入的检测器
  pub fn init(&self, detector: D) -> Result<(), D> {
    self.inner.set(detector)?;
    info!("检测器已装载");
    Ok(())
  }

  pub fn is_loaded(&self) -> bool {
    self.inner.get().is_some()
  }

  pub fn get(&self) -> Result<&D, DetectionError> {
    self
      .inner
      .get()
      .ok_or_else(|| DetectionError::Unavailable("模型尚未加载".to_string()))
  }
}

impl<D: Detector> Detector for DetectorSlot<D> {
  fn detect(&self, image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError> {
    let detector = self.get().inspect_err(|_| warn!("检测请求到达时模型尚未加载"))?;
    detector.detect(image)
  }
}

/// 模型类别与分级信息
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
  pub model_type: String,
  pub model_file: String,
  pub classes: Vec<&'static str>,
  pub total_classes: usize,
  pub severity_levels: Vec<SeverityTier>,
  pub locations: Vec<LocationLabel>,
}

impl ModelInfo {
  pub fn describe() -> Self {
    let classes: Vec<&'static str> = DamageType::KNOWN.iter().map(|t| t.display()).collect();
    let locations: BTreeSet<LocationLabel> = DamageType::KNOWN
      .iter()
      .map(|t| crate::location::locate(*t))
      .collect();

    Self {
      model_type: "YOLOv8".to_string(),
      model_file: "car_damage_best.pt".to_string(),
      total_classes: classes.len(),
      classes,
      severity_levels: SeverityTier::ALL.to_vec(),
      locations: locations.into_iter().collect(),
    }
  }
}

mod json_detections;
pub use self::json_detections::JsonDetections;

#[cfg(test)]
mod tests {
  use super::*;

  struct Fixed(Vec<RawDetection>);

  impl Detector for Fixed {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError> {
      Ok(self.0.clone())
    }
  }

  #[test]
  fn empty_slot_is_unavailable() {
    let slot: DetectorSlot<Fixed> = DetectorSlot::new();
    assert!(!slot.is_loaded());
    let err = slot.detect(&RgbImage::new(4, 4)).unwrap_err();
    assert!(matches!(err, DetectionError::Unavailable(_)));
  }

  #[test]
  fn slot_delegates_after_init() {
    let slot = DetectorSlot::new();
    let det = RawDetection {
      class_index: 0,
      confidence: 0.9,
      bbox: [0.0, 0.0, 2.0, 2.0],
    };
    assert!(slot.init(Fixed(vec![det.clone()])).is_ok());
    assert!(slot.is_loaded());
    assert!(slot.init(Fixed(Vec::new())).is_err());
    assert_eq!(slot.detect(&RgbImage::new(4, 4)).unwrap(), vec![det]);
  }

  #[test]
  fn model_info_lists_known_classes() {
    let info = ModelInfo::describe();
    assert_eq!(info.total_classes, 6);
    assert!(info.classes.contains(&"Amassado"));
    assert!(!info.locations.contains(&LocationLabel::Unknown));
    assert_eq!(info.severity_levels.len(), 3);
  }
}
