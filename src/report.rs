// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/report.rs - 巡检报告组装
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

use image::RgbImage;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
  config::InspectConfig,
  model::{DetectionError, Detector, ImageDimensions, RawDetection},
  output::{Annotate, RenderError},
};

mod analysis;
mod record;

pub use self::analysis::{DamageAnalysis, RepairUrgency, SeverityCount, aggregate, repair_urgency};
pub use self::record::{DamageId, DamageRecord, RecordError, build_records};

/// 车辆信息缺省时的占位文本
pub const NOT_PROVIDED: &str = "Não informado";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionInfo {
  pub timestamp: String,
  pub inspector: String,
  pub version: String,
  pub model: String,
  pub original_filename: String,
}

fn or_not_provided<S: Serializer>(
  value: &Option<String>,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(value.as_deref().unwrap_or(NOT_PROVIDED))
}

/// 调用方提供的车辆信息，原样透传
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleInfo {
  #[serde(serialize_with = "or_not_provided")]
  pub plate: Option<String>,
  #[serde(serialize_with = "or_not_provided")]
  pub model: Option<String>,
  #[serde(serialize_with = "or_not_provided")]
  pub year: Option<String>,
  #[serde(serialize_with = "or_not_provided")]
  pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
  pub inspection_info: InspectionInfo,
  pub vehicle_info: VehicleInfo,
  pub damage_analysis: DamageAnalysis,
  pub damages: Vec<DamageRecord>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub annotated_image: Option<String>,
}

#[derive(Error, Debug)]
pub enum InspectError {
  #[error("检测数据无效: {0}")]
  Validation(#[from] RecordError),
  #[error("检测失败: {0}")]
  Detection(#[from] DetectionError),
  #[error("标注图像生成失败: {0}")]
  Render(#[from] RenderError),
}

/// 供传输层映射状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Validation,
  Unavailable,
  Internal,
}

impl InspectError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      InspectError::Validation(_) => ErrorKind::Validation,
      InspectError::Detection(_) => ErrorKind::Unavailable,
      InspectError::Render(_) => ErrorKind::Internal,
    }
  }
}

/// 由检测结果组装报告
///
/// 只有检测数据违反边框约束时才失败；未知类别走 `unknown` 兜底。
/// `include_annotated_image` 为假时不会调用 `annotator`。
pub fn assemble<A: Annotate + ?Sized>(
  inspection_info: InspectionInfo,
  vehicle_info: VehicleInfo,
  image: &RgbImage,
  detections: &[RawDetection],
  include_annotated_image: bool,
  annotator: &A,
) -> Result<InspectionReport, InspectError> {
  let dims = ImageDimensions::from(image);
  let damages = build_records(detections, dims)?;
  let damage_analysis = aggregate(&damages);
  debug!(
    "损伤统计: 共 {} 处, 紧急度 {:?}",
    damage_analysis.total_damages, damage_analysis.repair_urgency
  );

  let annotated_image = if include_annotated_image {
    Some(annotator.annotate(image, &damages)?)
  } else {
    None
  };

  Ok(InspectionReport {
    inspection_info,
    vehicle_info,
    damage_analysis,
    damages,
    annotated_image,
  })
}

/// 一次巡检请求
#[derive(Debug, Clone)]
pub struct InspectRequest {
  pub image: RgbImage,
  pub filename: String,
  pub vehicle: VehicleInfo,
  pub include_annotated_image: bool,
}

/// 检测器 + 标注器 + 元数据配置，对每个请求独立组装报告
pub struct Inspector<D, A> {
  detector: D,
  annotator: A,
  config: InspectConfig,
}

impl<D: Detector, A: Annotate> Inspector<D, A> {
  pub fn new(detector: D, annotator: A) -> Self {
    Self {
      detector,
      annotator,
      config: InspectConfig::default(),
    }
  }

  pub fn with_config(mut self, config: InspectConfig) -> Self {
    self.config = config;
    self
  }

  pub fn inspect(&self, request: &InspectRequest) -> Result<InspectionReport, InspectError> {
    let now = std::time::Instant::now();
    let detections = self.detector.detect(&request.image)?;
    info!(
      "检测完成: {} 个目标，耗时 {:.2?}",
      detections.len(),
      now.elapsed()
    );

    let report = assemble(
      self.config.stamp(request.filename.as_str()),
      request.vehicle.clone(),
      &request.image,
      &detections,
      request.include_annotated_image,
      &self.annotator,
    )?;
    info!("报告组装完成，耗时 {:.2?}", now.elapsed());
    Ok(report)
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;
  use crate::{severity::SeverityTier, taxonomy::DamageType};

  #[derive(Default)]
  struct CountingAnnotator {
    calls: Cell<usize>,
  }

  impl Annotate for CountingAnnotator {
    fn annotate(&self, _image: &RgbImage, records: &[DamageRecord]) -> Result<String, RenderError> {
      self.calls.set(self.calls.get() + 1);
      Ok(format!("data:image/jpeg;base64,{}", records.len()))
    }
  }

  struct Unavailable;

  impl Detector for Unavailable {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError> {
      Err(DetectionError::Unavailable("模型尚未加载".to_string()))
    }
  }

  struct Fixed(Vec<RawDetection>);

  impl Detector for Fixed {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError> {
      Ok(self.0.clone())
    }
  }

  fn info() -> InspectionInfo {
    InspectConfig::default().stamp("car.jpg")
  }

  fn det(class_index: i64, confidence: f32, bbox: [f32; 4]) -> RawDetection {
    RawDetection {
      class_index,
      confidence,
      bbox,
    }
  }

  #[test]
  fn annotation_skipped_when_not_requested() {
    let annotator = CountingAnnotator::default();
    let image = RgbImage::new(100, 100);
    let report = assemble(
      info(),
      VehicleInfo::default(),
      &image,
      &[det(0, 0.9, [0.0, 0.0, 10.0, 10.0])],
      false,
      &annotator,
    )
    .unwrap();
    assert_eq!(annotator.calls.get(), 0);
    assert!(report.annotated_image.is_none());
    let value = serde_json::to_value(&report).unwrap();
    assert!(value.get("annotated_image").is_none());
  }

  #[test]
  fn annotation_included_when_requested() {
    let annotator = CountingAnnotator::default();
    let image = RgbImage::new(100, 100);
    let report = assemble(info(), VehicleInfo::default(), &image, &[], true, &annotator).unwrap();
    assert_eq!(annotator.calls.get(), 1);
    assert_eq!(
      report.annotated_image.as_deref(),
      Some("data:image/jpeg;base64,0")
    );
  }

  #[test]
  fn invalid_detection_aborts_without_rendering() {
    let annotator = CountingAnnotator::default();
    let image = RgbImage::new(100, 100);
    let err = assemble(
      info(),
      VehicleInfo::default(),
      &image,
      &[det(0, 0.9, [50.0, 0.0, 10.0, 10.0])],
      true,
      &annotator,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(annotator.calls.get(), 0);
  }

  #[test]
  fn vehicle_info_passes_through() {
    let vehicle = VehicleInfo {
      plate: Some("ABC-1234".to_string()),
      model: Some("Toyota Corolla".to_string()),
      year: Some("2020".to_string()),
      color: None,
    };
    let value = serde_json::to_value(&vehicle).unwrap();
    assert_eq!(
      value,
      serde_json::json!({
        "plate": "ABC-1234",
        "model": "Toyota Corolla",
        "year": "2020",
        "color": NOT_PROVIDED,
      })
    );
  }

  #[test]
  fn inspector_propagates_unavailable_detector() {
    let inspector = Inspector::new(Unavailable, CountingAnnotator::default());
    let request = InspectRequest {
      image: RgbImage::new(10, 10),
      filename: "car.jpg".to_string(),
      vehicle: VehicleInfo::default(),
      include_annotated_image: true,
    };
    let err = inspector.inspect(&request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
  }

  #[test]
  fn inspector_builds_report_from_detector() {
    let detector = Fixed(vec![det(0, 0.85, [0.0, 0.0, 40.0, 25.0])]);
    let inspector = Inspector::new(detector, CountingAnnotator::default())
      .with_config(InspectConfig::default().with_inspector("Equipe B"));
    let request = InspectRequest {
      image: RgbImage::new(100, 100),
      filename: "frente.png".to_string(),
      vehicle: VehicleInfo::default(),
      include_annotated_image: false,
    };
    let report = inspector.inspect(&request).unwrap();
    assert_eq!(report.inspection_info.inspector, "Equipe B");
    assert_eq!(report.inspection_info.original_filename, "frente.png");
    assert_eq!(report.damages[0].damage_type, DamageType::Dent);
    assert_eq!(report.damages[0].severity, SeverityTier::Severe);
    assert_eq!(report.damage_analysis.repair_urgency, RepairUrgency::High);
  }
}
