// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/annotate.rs - 计数结果可视化
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

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_text_mut};
use thiserror::Error;
use tracing::warn;

use crate::pipeline::CountingResult;

// 标注渲染常量
const LABEL_FONT_SIZE: f32 = 24.0;
const MATCHED_COLOR: Rgb<u8> = Rgb([0, 220, 0]);
const UNMATCHED_COLOR: Rgb<u8> = Rgb([220, 0, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// 常见发行版里 DejaVuSans 的安装位置
const SYSTEM_FONT_PATHS: [&str; 3] = [
  "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/TTF/DejaVuSans.ttf",
  "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

#[derive(Error, Debug)]
pub enum AnnotateError {
  #[error("读取字体文件失败: {0}")]
  Io(#[from] std::io::Error),
  #[error("字体文件无效: {0}")]
  InvalidFont(#[from] ab_glyph::InvalidFont),
}

/// 计数结果可视化工具。
///
/// 识别出面值的硬币画绿圈并标出面值，识别不了的画红圈。没有可用
/// 字体时退化为只画圈。
pub struct Annotator {
  /// 标签字体，缺省时不画文字
  font: Option<FontArc>,
  /// 字体大小
  font_scale: PxScale,
}

impl Default for Annotator {
  fn default() -> Self {
    Annotator::new()
  }
}

impl Annotator {
  /// 创建一个不带字体的可视化工具。
  pub fn new() -> Self {
    Annotator {
      font: None,
      font_scale: PxScale::from(LABEL_FONT_SIZE),
    }
  }

  /// 从指定的字体文件创建。
  pub fn with_font_file(path: &Path) -> Result<Self, AnnotateError> {
    let data = std::fs::read(path)?;
    let font = FontArc::try_from_vec(data)?;
    Ok(Annotator {
      font: Some(font),
      font_scale: PxScale::from(LABEL_FONT_SIZE),
    })
  }

  /// 在常见路径里找一个系统字体，找不到就退化为只画圈。
  pub fn with_system_font() -> Self {
    for path in SYSTEM_FONT_PATHS {
      if let Ok(annotator) = Annotator::with_font_file(Path::new(path)) {
        return annotator;
      }
    }
    warn!("没有找到可用的系统字体，标注时只画圈不写面值");
    Annotator::new()
  }

  pub fn has_font(&self) -> bool {
    self.font.is_some()
  }

  /// 在输入图像的副本上画出计数结果。
  pub fn render(&self, image: &RgbImage, result: &CountingResult) -> RgbImage {
    let mut output = image.clone();
    for coin in &result.coins {
      let color = if coin.denomination.is_some() {
        MATCHED_COLOR
      } else {
        UNMATCHED_COLOR
      };
      let center = (coin.circle.center_x, coin.circle.center_y);
      let radius = coin.circle.radius_px as i32;

      draw_hollow_circle_mut(&mut output, center, radius, color);
      // 再画一圈增加可见度
      if radius > 1 {
        draw_hollow_circle_mut(&mut output, center, radius - 1, color);
      }

      if let (Some(value), Some(font)) = (coin.denomination, self.font.as_ref()) {
        let label = format_value(value);
        let x = coin.circle.center_x - radius / 2;
        let y = coin.circle.center_y + radius / 4;
        draw_text_mut(&mut output, LABEL_COLOR, x, y, self.font_scale, font, &label);
      }
    }
    output
  }
}

/// 面值排成两位小数、逗号作小数点的标签，例如 5 -> "5,00"。
fn format_value(value: u32) -> String {
  format!("{:.2}", f64::from(value)).replace('.', ",")
}
