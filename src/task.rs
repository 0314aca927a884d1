// 该文件是 Cheshang （车伤巡检） 项目的一部分。
// src/task.rs - 巡检任务
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

use tracing::info;

use crate::{
  config::InspectConfig,
  input::InputImage,
  model::Detector,
  output::{Annotate, Render},
  report::{InspectRequest, InspectionReport, Inspector, VehicleInfo},
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error>;
}

/// 取一张图像，检测、组装报告并输出
pub struct OneShotTask<A> {
  annotator: A,
  config: InspectConfig,
  vehicle: VehicleInfo,
  include_annotated_image: bool,
}

impl<A: Annotate> OneShotTask<A> {
  pub fn new(annotator: A) -> Self {
    Self {
      annotator,
      config: InspectConfig::default(),
      vehicle: VehicleInfo::default(),
      include_annotated_image: false,
    }
  }

  pub fn with_config(mut self, config: InspectConfig) -> Self {
    self.config = config;
    self
  }

  pub fn with_vehicle(mut self, vehicle: VehicleInfo) -> Self {
    self.vehicle = vehicle;
    self
  }

  pub fn with_annotated_image(mut self, include: bool) -> Self {
    self.include_annotated_image = include;
    self
  }
}

impl<
  A: Annotate,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = InputImage>,
  M: Detector,
  O: Render<InspectionReport, Error = RE>,
> Task<I, M, O> for OneShotTask<A>
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, model: M, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let InputImage { filename, image } = input
      .next()
      .ok_or_else(|| anyhow::anyhow!("没有输入图像"))?;
    info!("输入图像获取成功: {} ({}x{})", filename, image.width(), image.height());

    let request = InspectRequest {
      image,
      filename,
      vehicle: self.vehicle,
      include_annotated_image: self.include_annotated_image,
    };
    let inspector = Inspector::new(model, self.annotator).with_config(self.config);

    let now = std::time::Instant::now();
    let report = inspector.inspect(&request)?;
    info!(
      "巡检完成: {} 处损伤, 紧急度 {:?}, 耗时 {:.2?}",
      report.damage_analysis.total_damages,
      report.damage_analysis.repair_urgency,
      now.elapsed()
    );

    output.render_result(&report)?;
    info!("报告输出完成");

    Ok(())
  }
}
