// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/args.rs - 项目参数配置
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

use clap::Parser;
use url::Url;

use cheshang::report::VehicleInfo;

/// Cheshang 车辆损伤巡检
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入图像，例如 image:///data/car.jpg
  #[arg(long, value_name = "SOURCE", required_unless_present = "model_info")]
  pub input: Option<Url>,

  /// 检测器输出，例如 detections:///data/car.json
  #[arg(long, value_name = "DETECTIONS", required_unless_present = "model_info")]
  pub detections: Option<Url>,

  /// 报告输出路径
  /// 支持参数:
  /// - pretty: 格式化 JSON
  /// - image=<path>: 同时保存标注图像
  #[arg(long, value_name = "OUTPUT", default_value = "json:///dev/stdout")]
  pub output: Url,

  /// 在报告中附带标注图像
  #[arg(long)]
  pub annotate: bool,

  /// 车牌
  #[arg(long)]
  pub plate: Option<String>,

  /// 车型
  #[arg(long)]
  pub vehicle_model: Option<String>,

  /// 年份
  #[arg(long)]
  pub year: Option<String>,

  /// 颜色
  #[arg(long)]
  pub color: Option<String>,

  /// 巡检人标识
  #[arg(long)]
  pub inspector: Option<String>,

  /// 打印模型类别信息后退出
  #[arg(long)]
  pub model_info: bool,
}

impl Args {
  pub fn vehicle(&self) -> VehicleInfo {
    VehicleInfo {
      plate: self.plate.clone(),
      model: self.vehicle_model.clone(),
      year: self.year.clone(),
      color: self.color.clone(),
    }
  }
}
