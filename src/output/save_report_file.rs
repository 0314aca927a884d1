// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/output/save_report_file.rs - 保存报告文件
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

use std::path::{Path, PathBuf};

use base64::Engine;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Render, draw::DATA_URI_PREFIX},
  report::InspectionReport,
  url_file_path,
};

#[derive(Error, Debug)]
pub enum SaveReportFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("标注图像解码错误: {0}")]
  Base64Error(#[from] base64::DecodeError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("路径解码错误: {0}")]
  PathDecodeError(#[from] std::string::FromUtf8Error),
}

/// 把报告写成 JSON 文件
///
/// `json:///path/report.json?pretty&image=/path/annotated.jpg`
pub struct SaveReportFileOutput {
  path: PathBuf,
  pretty: bool,
  image_path: Option<PathBuf>,
}

impl FromUrlWithScheme for SaveReportFileOutput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for SaveReportFileOutput {
  type Error = SaveReportFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveReportFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    let pretty = uri.query_pairs().any(|(k, _)| k == "pretty");
    let image_path = uri
      .query_pairs()
      .find(|(k, _)| k == "image")
      .map(|(_, v)| PathBuf::from(v.as_ref()));

    Ok(SaveReportFileOutput {
      path: url_file_path(uri)?,
      pretty,
      image_path,
    })
  }
}

fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)?;
  }
  Ok(())
}

impl SaveReportFileOutput {
  fn save_annotated_image(&self, path: &Path, data_uri: &str) -> Result<(), SaveReportFileError> {
    let Some(payload) = data_uri.strip_prefix(DATA_URI_PREFIX) else {
      warn!("标注图像不是 JPEG 数据 URI，跳过保存");
      return Ok(());
    };
    let jpeg = base64::engine::general_purpose::STANDARD.decode(payload)?;
    ensure_parent(path)?;
    std::fs::write(path, jpeg)?;
    info!("保存标注图像到文件: {}", path.display());
    Ok(())
  }
}

impl Render<InspectionReport> for SaveReportFileOutput {
  type Error = SaveReportFileError;

  fn render_result(&self, report: &InspectionReport) -> Result<(), Self::Error> {
    let json = if self.pretty {
      serde_json::to_vec_pretty(report)?
    } else {
      serde_json::to_vec(report)?
    };

    ensure_parent(&self.path)?;
    std::fs::write(&self.path, json)?;
    info!("保存报告到文件: {}", self.path.display());

    if let (Some(path), Some(uri)) = (&self.image_path, &report.annotated_image) {
      self.save_annotated_image(path, uri)?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_query_options() {
    let url = Url::parse("json:///tmp/out/report.json?pretty&image=/tmp/out/a.jpg").unwrap();
    let output = SaveReportFileOutput::from_url(&url).unwrap();
    assert_eq!(output.path, PathBuf::from("/tmp/out/report.json"));
    assert!(output.pretty);
    assert_eq!(output.image_path, Some(PathBuf::from("/tmp/out/a.jpg")));
  }

  #[test]
  fn decodes_spaced_output_path() {
    let url = Url::parse("json:///tmp/saída/meu relatorio.json?image=/tmp/saída/foto anotada.jpg")
      .unwrap();
    let output = SaveReportFileOutput::from_url(&url).unwrap();
    assert_eq!(output.path, PathBuf::from("/tmp/saída/meu relatorio.json"));
    assert!(!output.pretty);
    assert_eq!(
      output.image_path,
      Some(PathBuf::from("/tmp/saída/foto anotada.jpg"))
    );
  }

  #[test]
  fn rejects_other_schemes() {
    let url = Url::parse("image:///tmp/out.jpg").unwrap();
    assert!(matches!(
      SaveReportFileOutput::from_url(&url),
      Err(SaveReportFileError::SchemeMismatch(_))
    ));
  }
}
