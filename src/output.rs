// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/output.rs - 输出定义
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
use thiserror::Error;

use crate::report::DamageRecord;

pub trait Render<Output>: Sized {
  type Error;
  fn render_result(&self, result: &Output) -> Result<(), Self::Error>;
}

/// 在输入图像的副本上标注损伤，返回可内联传输的编码图像
pub trait Annotate {
  fn annotate(&self, image: &RgbImage, records: &[DamageRecord]) -> Result<String, RenderError>;
}

impl<A: Annotate + ?Sized> Annotate for &A {
  fn annotate(&self, image: &RgbImage, records: &[DamageRecord]) -> Result<String, RenderError> {
    (**self).annotate(image, records)
  }
}

#[derive(Error, Debug)]
pub enum RenderError {
  #[error("字体加载错误: {0}")]
  FontError(#[from] ab_glyph::InvalidFont),
  #[error("图像编码错误: {0}")]
  ImageError(#[from] image::ImageError),
}

pub mod draw;
pub use self::draw::SeverityDraw;

mod save_report_file;
pub use self::save_report_file::{SaveReportFileError, SaveReportFileOutput};
