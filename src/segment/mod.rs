// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/segment/mod.rs - 硬币分割流水线
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

pub mod geometry;
pub mod watershed;

use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use imageproc::distance_transform::{Norm, euclidean_squared_distance_transform};
use imageproc::filter::bilateral::GaussianEuclideanColorDistance;
use imageproc::gradients::sobel_gradients;
use imageproc::morphology::{close, dilate, open};
use imageproc::region_labelling::{Connectivity, connected_components};
use thiserror::Error;
use tracing::debug;

use crate::segment::geometry::{contour_area, min_enclosing_circle};

const DEFAULT_BILATERAL_RADIUS: u8 = 4;
const DEFAULT_BILATERAL_SIGMA_COLOR: f32 = 75.0;
const DEFAULT_BILATERAL_SIGMA_SPATIAL: f32 = 75.0;
const DEFAULT_MORPH_RADIUS: u8 = 2;
const DEFAULT_MORPH_ITERATIONS: u8 = 2;
const DEFAULT_SURE_BG_ITERATIONS: u8 = 3;
const DEFAULT_FG_DISTANCE_FRACTION: f64 = 0.5;
const DEFAULT_MIN_REGION_AREA: u32 = 400;
const DEFAULT_MIN_CONTOUR_AREA: f64 = 400.0;
const DEFAULT_MIN_RADIUS_PX: f64 = 8.0;

/// 分割参数，默认值按数百万像素的俯拍照片调校。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentParams {
  /// 双边滤波半径（像素），窗口宽度为 2r+1
  pub bilateral_radius: u8,
  /// 双边滤波颜色域 sigma
  pub bilateral_sigma_color: f32,
  /// 双边滤波空间域 sigma
  pub bilateral_sigma_spatial: f32,
  /// 形态学结构元半径（L1 球）
  pub morph_radius: u8,
  /// 开闭运算迭代次数
  pub morph_iterations: u8,
  /// 确定背景的膨胀迭代次数
  pub sure_bg_iterations: u8,
  /// 确定前景的距离阈值（相对最大距离的比例）
  pub fg_distance_fraction: f64,
  /// 标记区域的最小面积（像素）
  pub min_region_area: u32,
  /// 轮廓的最小面积（像素平方）
  pub min_contour_area: f64,
  /// 外接圆的最小半径（像素）
  pub min_radius_px: f64,
}

impl Default for SegmentParams {
  fn default() -> Self {
    SegmentParams {
      bilateral_radius: DEFAULT_BILATERAL_RADIUS,
      bilateral_sigma_color: DEFAULT_BILATERAL_SIGMA_COLOR,
      bilateral_sigma_spatial: DEFAULT_BILATERAL_SIGMA_SPATIAL,
      morph_radius: DEFAULT_MORPH_RADIUS,
      morph_iterations: DEFAULT_MORPH_ITERATIONS,
      sure_bg_iterations: DEFAULT_SURE_BG_ITERATIONS,
      fg_distance_fraction: DEFAULT_FG_DISTANCE_FRACTION,
      min_region_area: DEFAULT_MIN_REGION_AREA,
      min_contour_area: DEFAULT_MIN_CONTOUR_AREA,
      min_radius_px: DEFAULT_MIN_RADIUS_PX,
    }
  }
}

/// 检测到的硬币圆
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Circle {
  /// 圆心 x 坐标（像素）
  pub center_x: i32,
  /// 圆心 y 坐标（像素）
  pub center_y: i32,
  /// 半径（像素）
  pub radius_px: u32,
}

#[derive(Error, Debug)]
pub enum SegmentError {
  #[error("图像尺寸无效: {width}x{height}")]
  DegenerateImage { width: u32, height: u32 },
}

/// 硬币分割器。
///
/// 假定硬币整体比背景暗（浅色桌面上的俯拍照片），输出的圆按标记
/// 扫描顺序排列，同一输入的结果完全确定。
#[derive(Clone, Debug, Default)]
pub struct Segmenter {
  params: SegmentParams,
}

impl Segmenter {
  pub fn new() -> Self {
    Segmenter::default()
  }

  pub fn with_params(params: SegmentParams) -> Self {
    Segmenter { params }
  }

  pub fn params(&self) -> &SegmentParams {
    &self.params
  }

  /// 分割图像并返回每枚硬币的外接圆。
  ///
  /// 流程：双边滤波、Otsu 反向二值化、开闭运算去噪、距离变换取
  /// 确定前景、连通域标记、分水岭分离粘连硬币、逐标记提取外接圆。
  pub fn segment(&self, image: &RgbImage) -> Result<Vec<Circle>, SegmentError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
      return Err(SegmentError::DegenerateImage { width, height });
    }
    debug!("开始分割 {}x{} 的图像", width, height);

    // 1. 灰度化并做保边去噪
    let gray = image::imageops::grayscale(image);
    let smoothed = imageproc::filter::bilateral_filter(
      &gray,
      self.params.bilateral_radius,
      self.params.bilateral_sigma_spatial,
      GaussianEuclideanColorDistance::new(self.params.bilateral_sigma_color),
    );

    // 2. Otsu 反向二值化，暗的硬币变为前景
    let level = otsu_level(&smoothed);
    debug!("Otsu 阈值: {}", level);
    let mask = threshold(&smoothed, level, ThresholdType::BinaryInverted);

    // 3. 先开后闭，去掉孤立噪点并填上硬币内的花纹孔洞
    let k = self
      .params
      .morph_radius
      .saturating_mul(self.params.morph_iterations);
    let cleaned = close(&open(&mask, Norm::L1, k), Norm::L1, k);

    // 4. 膨胀得到确定背景之内的区域
    let bg_k = self
      .params
      .morph_radius
      .saturating_mul(self.params.sure_bg_iterations);
    let sure_bg = dilate(&cleaned, Norm::L1, bg_k);

    // 5. 距离变换取硬币核心：距背景超过最大距离一半的像素。
    //    距离变换度量的是到最近非零像素的距离，因此先取反。
    let mut inverted = cleaned.clone();
    for p in inverted.pixels_mut() {
      p.0[0] = 255 - p.0[0];
    }
    let dist_sq = euclidean_squared_distance_transform(&inverted);
    let max_sq = dist_sq.as_raw().iter().fold(0.0f64, |acc, &d| acc.max(d));
    debug!("距离变换最大值: {:.1} px", max_sq.sqrt());
    let frac_sq = self.params.fg_distance_fraction * self.params.fg_distance_fraction;
    let thresh_sq = frac_sq * max_sq;
    let mut sure_fg = GrayImage::new(width, height);
    for (p, &d) in sure_fg.pixels_mut().zip(dist_sq.as_raw().iter()) {
      if d > thresh_sq {
        p.0[0] = 255;
      }
    }

    // 6. 硬币核心的连通域作为种子，整体加一把 1 留给背景盆地
    let components = connected_components(&sure_fg, Connectivity::Eight, Luma([0u8]));
    let labeled_count = components.as_raw().iter().copied().max().unwrap_or(0);
    debug!("标记连通域数量: {}", labeled_count);
    let mut markers: Vec<i32> = components.as_raw().iter().map(|&l| l as i32 + 1).collect();

    // 7. 确定背景与确定前景之间是留给分水岭的未知区域
    for (m, (&bg, &fg)) in markers
      .iter_mut()
      .zip(sure_bg.as_raw().iter().zip(sure_fg.as_raw().iter()))
    {
      if bg != 0 && fg == 0 {
        *m = watershed::UNKNOWN;
      }
    }

    // 8. 以梯度幅值为高度场执行分水岭
    let elevation = sobel_gradients(&smoothed);
    watershed::flood(
      elevation.as_raw(),
      &mut markers,
      width as usize,
      height as usize,
    );

    // 9. 逐标记提取外接圆，过滤掉太小的区域
    let mut circles = Vec::new();
    for label in 2..=labeled_count + 1 {
      let label_i32 = label as i32;
      let mut mask = GrayImage::new(width, height);
      let mut area = 0u32;
      for (p, &m) in mask.pixels_mut().zip(markers.iter()) {
        if m == label_i32 {
          p.0[0] = 255;
          area += 1;
        }
      }
      if area < self.params.min_region_area {
        debug!("标记 {} 的区域太小: {} px", label, area);
        continue;
      }

      let contours = find_contours::<i32>(&mask);
      let mut best: Option<(f64, usize)> = None;
      for (i, contour) in contours.iter().enumerate() {
        if contour.border_type != BorderType::Outer {
          continue;
        }
        let contour_px = contour_area(&contour.points);
        if best.is_none_or(|(best_px, _)| contour_px > best_px) {
          best = Some((contour_px, i));
        }
      }
      let Some((contour_px, index)) = best else {
        continue;
      };
      if contour_px < self.params.min_contour_area {
        debug!("标记 {} 的轮廓面积太小: {:.0}", label, contour_px);
        continue;
      }

      let Some(enclosing) = min_enclosing_circle(&contours[index].points) else {
        continue;
      };
      if enclosing.radius < self.params.min_radius_px {
        debug!("标记 {} 的外接圆太小: r = {:.1} px", label, enclosing.radius);
        continue;
      }

      circles.push(Circle {
        center_x: enclosing.center_x as i32,
        center_y: enclosing.center_y as i32,
        radius_px: enclosing.radius as u32,
      });
    }

    debug!("检测到 {} 个圆", circles.len());
    Ok(circles)
  }
}
