// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/output/draw.rs - 损伤标注图像
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

use ab_glyph::{FontArc, PxScale};
use base64::Engine;
use image::{Rgb, RgbImage, codecs::jpeg::JpegEncoder};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::debug;

use crate::{
  model::WithLabel,
  output::{Annotate, RenderError},
  report::DamageRecord,
  severity::SeverityTier,
};

// 文本渲染常量
const LABEL_FONT_SIZE: f32 = 18.0;
const LABEL_PADDING: i32 = 2;
const LABEL_TEXT_COLOR: [u8; 3] = [255, 255, 255]; // 白色
const BOX_THICKNESS: i32 = 2;

pub const JPEG_QUALITY: u8 = 85;
pub const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

pub fn severity_color(tier: SeverityTier) -> Rgb<u8> {
  match tier {
    SeverityTier::Mild => Rgb([0, 200, 0]),       // 绿色
    SeverityTier::Moderate => Rgb([255, 165, 0]), // 橙色
    SeverityTier::Severe => Rgb([255, 0, 0]),     // 红色
  }
}

/// 标签文字：损伤显示名加置信度百分比，如 `Amassado 87%`
fn label_text(record: &DamageRecord) -> String {
  format!(
    "{} {:.0}%",
    record.damage_type.to_label_str(),
    record.confidence * 100.0
  )
}

/// 按严重程度着色的标注工具
pub struct SeverityDraw {
  font: FontArc,
  font_scale: PxScale,
  quality: u8,
}

impl SeverityDraw {
  pub fn new() -> Result<Self, RenderError> {
    let font_data = include_bytes!("../../assets/DejaVuSans.ttf");
    let font = FontArc::try_from_slice(font_data)?;

    Ok(Self {
      font,
      font_scale: PxScale::from(LABEL_FONT_SIZE),
      quality: JPEG_QUALITY,
    })
  }

  pub fn with_quality(mut self, quality: u8) -> Self {
    self.quality = quality.clamp(1, 100);
    self
  }

  /// 在图像上绘制所有损伤的边框和标签
  pub fn draw_records_on_image(&self, image: &mut RgbImage, records: &[DamageRecord]) {
    for record in records {
      self.draw_bbox_with_label(image, record);
    }
  }

  // bbox 为像素坐标 [x_min, y_min, x_max, y_max]
  fn draw_bbox_with_label(&self, image: &mut RgbImage, record: &DamageRecord) {
    let (w, h) = (image.width() as i32, image.height() as i32);
    if w == 0 || h == 0 {
      return;
    }

    let bbox = &record.bbox;
    let x_min = (bbox[0].floor() as i32).clamp(0, w - 1);
    let y_min = (bbox[1].floor() as i32).clamp(0, h - 1);
    let x_max = (bbox[2].ceil() as i32 - 1).clamp(0, w - 1);
    let y_max = (bbox[3].ceil() as i32 - 1).clamp(0, h - 1);

    if x_min > x_max || y_min > y_max {
      return;
    }

    let color = severity_color(record.severity);

    // 边框加粗，逐层向内收缩
    for t in 0..BOX_THICKNESS {
      let width = x_max - x_min + 1 - 2 * t;
      let height = y_max - y_min + 1 - 2 * t;
      if width <= 0 || height <= 0 {
        break;
      }
      let rect = Rect::at(x_min + t, y_min + t).of_size(width as u32, height as u32);
      draw_hollow_rect_mut(image, rect, color);
    }

    let label = label_text(record);
    let (text_w, text_h) = text_size(self.font_scale, &self.font, &label);
    let label_w = text_w as i32 + 2 * LABEL_PADDING;
    let label_h = text_h as i32 + 2 * LABEL_PADDING;

    // 标签放在边框上方，空间不够时贴住图像顶部
    let label_x = x_min;
    let label_y = (y_min - label_h).max(0);

    let rect = Rect::at(label_x, label_y).of_size(label_w.max(1) as u32, label_h.max(1) as u32);
    draw_filled_rect_mut(image, rect, color);
    draw_text_mut(
      image,
      Rgb(LABEL_TEXT_COLOR),
      label_x + LABEL_PADDING,
      label_y + LABEL_PADDING,
      self.font_scale,
      &self.font,
      &label,
    );
  }
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, RenderError> {
  let mut buffer = Vec::new();
  JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(image)?;
  Ok(buffer)
}

pub fn to_data_uri(jpeg: &[u8]) -> String {
  format!(
    "{}{}",
    DATA_URI_PREFIX,
    base64::engine::general_purpose::STANDARD.encode(jpeg)
  )
}

impl Annotate for SeverityDraw {
  fn annotate(&self, image: &RgbImage, records: &[DamageRecord]) -> Result<String, RenderError> {
    let mut canvas = image.clone();
    self.draw_records_on_image(&mut canvas, records);
    let jpeg = encode_jpeg(&canvas, self.quality)?;
    debug!("标注图像编码完成: {} 字节", jpeg.len());
    Ok(to_data_uri(&jpeg))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{location::locate, report::DamageId, taxonomy::DamageType};

  fn record(severity: SeverityTier, bbox: [f32; 4]) -> DamageRecord {
    DamageRecord {
      damage_id: DamageId::new(1),
      damage_type: DamageType::Dent,
      confidence: 0.87,
      severity,
      location: locate(DamageType::Dent),
      bbox,
    }
  }

  #[test]
  fn label_shows_display_name_and_percent() {
    assert_eq!(
      label_text(&record(SeverityTier::Mild, [0.0, 0.0, 1.0, 1.0])),
      "Amassado 87%"
    );

    let unknown = DamageRecord {
      damage_type: DamageType::Unknown,
      confidence: 0.5,
      location: locate(DamageType::Unknown),
      ..record(SeverityTier::Moderate, [0.0, 0.0, 1.0, 1.0])
    };
    assert_eq!(label_text(&unknown), "Desconhecido 50%");
  }

  #[test]
  fn severity_colors_are_distinct() {
    let colors: Vec<_> = SeverityTier::ALL.iter().map(|t| severity_color(*t)).collect();
    assert_ne!(colors[0], colors[1]);
    assert_ne!(colors[1], colors[2]);
    assert_ne!(colors[0], colors[2]);
  }

  #[test]
  fn box_is_stroked_in_severity_color() {
    let draw = SeverityDraw::new().unwrap();
    let mut image = RgbImage::new(100, 100);
    draw.draw_records_on_image(
      &mut image,
      &[record(SeverityTier::Severe, [10.0, 60.0, 50.0, 90.0])],
    );

    let red = severity_color(SeverityTier::Severe);
    assert_eq!(*image.get_pixel(10, 80), red);
    assert_eq!(*image.get_pixel(11, 80), red);
    assert_eq!(*image.get_pixel(30, 89), red);
    assert_eq!(*image.get_pixel(49, 75), red);
    assert_eq!(*image.get_pixel(30, 75), Rgb([0, 0, 0]));
  }

  #[test]
  fn annotate_leaves_source_untouched() {
    let draw = SeverityDraw::new().unwrap();
    let source = RgbImage::from_pixel(64, 48, Rgb([12, 34, 56]));
    let before = source.clone();
    let uri = draw
      .annotate(&source, &[record(SeverityTier::Mild, [0.0, 0.0, 64.0, 48.0])])
      .unwrap();
    assert_eq!(source, before);

    let payload = uri.strip_prefix(DATA_URI_PREFIX).unwrap();
    let jpeg = base64::engine::general_purpose::STANDARD
      .decode(payload)
      .unwrap();
    let decoded = image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
  }

  #[test]
  fn tiny_and_edge_boxes_do_not_panic() {
    let draw = SeverityDraw::new().unwrap();
    let mut image = RgbImage::new(8, 8);
    draw.draw_records_on_image(
      &mut image,
      &[
        record(SeverityTier::Moderate, [0.2, 0.2, 0.8, 0.8]),
        record(SeverityTier::Severe, [0.0, 0.0, 8.0, 8.0]),
        record(SeverityTier::Mild, [7.0, 7.0, 8.0, 8.0]),
      ],
    );
    assert!(draw.annotate(&RgbImage::new(1, 1), &[]).is_ok());

    let low = SeverityDraw::new().unwrap().with_quality(0);
    assert!(low.annotate(&image, &[]).unwrap().starts_with(DATA_URI_PREFIX));
  }
}
