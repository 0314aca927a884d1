// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/model/json_detections.rs - 预计算检测结果回放
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
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{DetectionError, Detector, RawDetection},
  url_file_path,
};

/// 从 JSON 文件读取检测器输出，不依赖推理运行时
///
/// 文件内容为 `[{"class_index": 0, "confidence": 0.9, "bbox": [x0, y0, x1, y1]}, ...]`。
#[derive(Debug, Clone)]
pub struct JsonDetections {
  items: Vec<RawDetection>,
}

impl FromUrlWithScheme for JsonDetections {
  const SCHEME: &'static str = "detections";
}

impl FromUrl for JsonDetections {
  type Error = DetectionError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(DetectionError::SchemeMismatch(format!(
        "期望方案 '{}', 实际方案 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    let path = url_file_path(url)?;
    info!("加载检测结果文件: {}", path.display());
    let data = std::fs::read(&path)?;
    Self::from_slice(&data)
  }
}

impl JsonDetections {
  pub fn from_slice(data: &[u8]) -> Result<Self, DetectionError> {
    let items: Vec<RawDetection> = serde_json::from_slice(data)?;
    debug!("检测结果数量: {}", items.len());
    Ok(Self { items })
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

impl Detector for JsonDetections {
  fn detect(&self, _image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError> {
    Ok(self.items.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_detection_array() {
    let json = br#"[
      {"class_index": 0, "confidence": 0.85, "bbox": [10.0, 10.0, 50.0, 40.0]},
      {"class_index": 42, "confidence": 0.3, "bbox": [1, 2, 3, 4]}
    ]"#;
    let detections = JsonDetections::from_slice(json).unwrap();
    assert_eq!(detections.len(), 2);
    let items = detections.detect(&RgbImage::new(64, 64)).unwrap();
    assert_eq!(items[1].class_index, 42);
    assert_eq!(items[1].bbox, [1.0, 2.0, 3.0, 4.0]);
  }

  #[test]
  fn rejects_wrong_scheme() {
    let url = Url::parse("image:///tmp/car.jpg").unwrap();
    assert!(matches!(
      JsonDetections::from_url(&url),
      Err(DetectionError::SchemeMismatch(_))
    ));
  }

  #[test]
  fn reads_file_from_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dets.json");
    std::fs::write(&path, "[]").unwrap();
    let url = Url::from_file_path(&path).unwrap();
    let mut url_str = url.to_string();
    url_str.replace_range(..4, "detections");
    let detections = JsonDetections::from_url(&Url::parse(&url_str).unwrap()).unwrap();
    assert!(detections.is_empty());
  }

  #[test]
  fn reads_file_with_spaced_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("detecções lado esquerdo.json");
    std::fs::write(
      &path,
      r#"[{"class_index": 4, "confidence": 0.7, "bbox": [0, 0, 5, 5]}]"#,
    )
    .unwrap();
    let url = Url::parse(&format!("detections://{}", path.display())).unwrap();
    let detections = JsonDetections::from_url(&url).unwrap();
    assert_eq!(detections.len(), 1);
  }

  #[test]
  fn missing_file_is_io_error() {
    let url = Url::parse("detections:///nonexistent/cheshang/dets.json").unwrap();
    assert!(matches!(
      JsonDetections::from_url(&url),
      Err(DetectionError::IoError(_))
    ));
  }
}
