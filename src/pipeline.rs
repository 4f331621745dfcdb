// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/pipeline.rs - 计数流水线
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
use tracing::{debug, info};

use crate::DenominationResolver;
use crate::calibrate::{CalibrateError, calibrate};
use crate::denomination::{DEFAULT_TOLERANCE_MM, DenominationTable};
use crate::segment::{Circle, SegmentError, SegmentParams, Segmenter};

/// 已分类的硬币圆
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifiedCircle {
  /// 检测到的圆
  pub circle: Circle,
  /// 换算出的直径（毫米）
  pub diameter_mm: f64,
  /// 识别出的面值，容差之外为 `None`
  pub denomination: Option<u32>,
}

impl ClassifiedCircle {
  /// 计入总额的金额，未识别的硬币按零计。
  pub fn contribution(&self) -> f64 {
    self.denomination.map_or(0.0, f64::from)
  }
}

/// 一次计数的完整结果
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountingResult {
  /// 识别出面值的硬币总额
  pub total: f64,
  /// 检测到的所有圆，按检测顺序排列
  pub coins: Vec<ClassifiedCircle>,
}

impl CountingResult {
  pub fn is_empty(&self) -> bool {
    self.coins.is_empty()
  }

  /// 识别出面值的硬币数量。
  pub fn matched_count(&self) -> usize {
    self
      .coins
      .iter()
      .filter(|c| c.denomination.is_some())
      .count()
  }
}

#[derive(Error, Debug)]
pub enum CountError {
  #[error("分割失败: {0}")]
  Segment(#[from] SegmentError),
  #[error("标定被取消")]
  CalibrationCancelled,
  #[error("标定失败: {0}")]
  Calibrate(#[from] CalibrateError),
}

/// 硬币计数器：把分割、标定、分类、汇总串成一次调用。
pub struct CoinCounter {
  segmenter: Segmenter,
  table: DenominationTable,
  tolerance_mm: f64,
}

impl Default for CoinCounter {
  fn default() -> Self {
    CoinCounter {
      segmenter: Segmenter::new(),
      table: DenominationTable::default(),
      tolerance_mm: DEFAULT_TOLERANCE_MM,
    }
  }
}

impl CoinCounter {
  pub fn new() -> Self {
    CoinCounter::default()
  }

  pub fn with_table(mut self, table: DenominationTable) -> Self {
    self.table = table;
    self
  }

  pub fn with_tolerance(mut self, tolerance_mm: f64) -> Self {
    self.tolerance_mm = tolerance_mm;
    self
  }

  pub fn with_segment_params(mut self, params: SegmentParams) -> Self {
    self.segmenter = Segmenter::with_params(params);
    self
  }

  pub fn table(&self) -> &DenominationTable {
    &self.table
  }

  /// 对一张图像计数。
  ///
  /// 没有检测到圆时直接返回空结果，不发起标定。否则取半径最大的
  /// 圆（相同半径取先检测到的）向 `resolver` 询问面值完成标定，再
  /// 逐圆分类汇总。标定被取消或失败时整次计数失败，不产生部分结果。
  pub fn count(
    &self,
    image: &RgbImage,
    resolver: &mut dyn DenominationResolver,
  ) -> Result<CountingResult, CountError> {
    info!("开始计数...");
    let now = std::time::Instant::now();
    let circles = self.segmenter.segment(image)?;
    info!("分割完成，耗时: {:.2?}", now.elapsed());

    if circles.is_empty() {
      info!("图像中没有检测到硬币");
      return Ok(CountingResult::default());
    }

    let mut largest = circles[0];
    for c in &circles[1..] {
      if c.radius_px > largest.radius_px {
        largest = *c;
      }
    }
    debug!("标定参考圆: {:?}", largest);

    let value = resolver
      .resolve(largest.radius_px)
      .ok_or(CountError::CalibrationCancelled)?;
    let calibration = calibrate(&self.table, largest.radius_px, value)?;

    let mut total = 0.0;
    let mut coins = Vec::with_capacity(circles.len());
    for circle in circles {
      let diameter_mm = calibration.diameter_mm(circle.radius_px);
      let denomination = self.table.classify(diameter_mm, self.tolerance_mm);
      match denomination {
        Some(v) => total += f64::from(v),
        None => debug!("直径 {:.2} mm 的圆不在容差内，不计入总额", diameter_mm),
      }
      coins.push(ClassifiedCircle { circle, diameter_mm, denomination });
    }

    info!("计数完成: {} 个圆，总额 {:.2}", coins.len(), total);
    Ok(CountingResult { total, coins })
  }
}
