// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cheshang::{
  FromUrl,
  config::InspectConfig,
  input::ImageFileInput,
  model::{DetectorSlot, JsonDetections, ModelInfo},
  output::{SaveReportFileOutput, SeverityDraw},
  task::{OneShotTask, Task},
};

static DETECTOR: DetectorSlot<JsonDetections> = DetectorSlot::new();

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args = args::Args::parse();

  if args.model_info {
    println!("{}", serde_json::to_string_pretty(&ModelInfo::describe())?);
    return Ok(());
  }

  let input_url = args.input.as_ref().context("缺少 --input")?;
  let detections_url = args.detections.as_ref().context("缺少 --detections")?;

  info!("输入来源: {}", input_url);
  info!("检测结果: {}", detections_url);
  info!("输出路径: {}", args.output);

  if DETECTOR.init(JsonDetections::from_url(detections_url)?).is_err() {
    anyhow::bail!("检测器重复装载");
  }

  let input = ImageFileInput::from_url(input_url)?;
  let output = SaveReportFileOutput::from_url(&args.output)?;

  let mut config = InspectConfig::default();
  if let Some(inspector) = &args.inspector {
    config = config.with_inspector(inspector.as_str());
  }

  OneShotTask::new(SeverityDraw::new()?)
    .with_config(config)
    .with_vehicle(args.vehicle())
    .with_annotated_image(args.annotate)
    .run_task(input, &DETECTOR, output)
}
