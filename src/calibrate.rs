// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/calibrate.rs - 像素到毫米的标定
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

use thiserror::Error;
use tracing::info;

use crate::denomination::DenominationTable;

/// 像素到毫米的换算关系。
///
/// 由单个参考圆标定：比例 = 参考直径（毫米）/ 参考直径（像素）。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
  mm_per_px: f64,
}

#[derive(Error, Debug)]
pub enum CalibrateError {
  #[error("未知面值: {0}")]
  UnknownDenomination(u32),
  #[error("参考圆半径无效: {0} px")]
  InvalidRadius(u32),
}

impl Calibration {
  pub fn mm_per_px(&self) -> f64 {
    self.mm_per_px
  }

  /// 像素半径换算为毫米直径。
  pub fn diameter_mm(&self, radius_px: u32) -> f64 {
    f64::from(radius_px) * 2.0 * self.mm_per_px
  }
}

/// 以一枚已知面值的硬币为参考，标定像素到毫米的比例。
pub fn calibrate(
  table: &DenominationTable,
  radius_px: u32,
  value: u32,
) -> Result<Calibration, CalibrateError> {
  if radius_px == 0 {
    return Err(CalibrateError::InvalidRadius(radius_px));
  }
  let diameter_mm = table
    .diameter_mm(value)
    .ok_or(CalibrateError::UnknownDenomination(value))?;
  let mm_per_px = diameter_mm / (f64::from(radius_px) * 2.0);
  info!(
    "标定完成: 参考面值 {} ({} mm), 半径 {} px, 比例 {:.4} mm/px",
    value, diameter_mm, radius_px, mm_per_px
  );
  Ok(Calibration { mm_per_px })
}
