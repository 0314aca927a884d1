// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/config.rs - 巡检元数据配置
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

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::report::InspectionInfo;

pub const DEFAULT_INSPECTOR: &str = "Sistema IA YOLO API";
pub const DEFAULT_VERSION: &str = "2.0.0";
pub const DEFAULT_MODEL: &str = "YOLOv8 (car_damage_best.pt)";

// 与 ISO-8601 本地时间一致，精确到微秒
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
  pub inspector: String,
  pub version: String,
  pub model: String,
}

impl Default for InspectConfig {
  fn default() -> Self {
    Self {
      inspector: DEFAULT_INSPECTOR.to_string(),
      version: DEFAULT_VERSION.to_string(),
      model: DEFAULT_MODEL.to_string(),
    }
  }
}

impl InspectConfig {
  pub fn with_inspector(mut self, inspector: impl Into<String>) -> Self {
    self.inspector = inspector.into();
    self
  }

  /// 以当前本地时间生成一次巡检的元数据
  pub fn stamp(&self, original_filename: impl Into<String>) -> InspectionInfo {
    InspectionInfo {
      timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
      inspector: self.inspector.clone(),
      version: self.version.clone(),
      model: self.model.clone(),
      original_filename: original_filename.into(),
    }
  }
}
