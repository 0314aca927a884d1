// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, input::InputImage, url_file_path};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
  #[error("Path decoding error: {0}")]
  PathDecodeError(#[from] std::string::FromUtf8Error),
}

/// 单张图像输入，迭代时只产出一次
pub struct ImageFileInput {
  image: Option<InputImage>,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemaMismatch);
    }

    let path = url_file_path(url)?;
    let image = ImageReader::open(&path)?.decode()?.to_rgb8();
    let filename = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();
    debug!("读取图像 {}: {}x{}", filename, image.width(), image.height());

    Ok(Self::from_image(filename, image))
  }
}

impl ImageFileInput {
  pub fn from_image(filename: impl Into<String>, image: RgbImage) -> Self {
    Self {
      image: Some(InputImage {
        filename: filename.into(),
        image,
      }),
    }
  }

  /// 解码上传的图像内容，格式由内容推断
  pub fn from_bytes(
    filename: impl Into<String>,
    bytes: &[u8],
  ) -> Result<Self, ImageFileInputError> {
    let image = image::load_from_memory(bytes)?.to_rgb8();
    Ok(Self::from_image(filename, image))
  }
}

impl Iterator for ImageFileInput {
  type Item = InputImage;

  fn next(&mut self) -> Option<Self::Item> {
    self.image.take()
  }
}
