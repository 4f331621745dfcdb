// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/segment/geometry.rs - 轮廓面积与最小外接圆
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

use imageproc::point::Point;

/// 包含判定的浮点余量
const CONTAIN_EPS: f64 = 1e-7;

/// 最小外接圆，坐标与半径均为亚像素精度。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnclosingCircle {
  pub center_x: f64,
  pub center_y: f64,
  pub radius: f64,
}

impl EnclosingCircle {
  fn contains(&self, p: (f64, f64)) -> bool {
    let dx = p.0 - self.center_x;
    let dy = p.1 - self.center_y;
    (dx * dx + dy * dy).sqrt() <= self.radius + CONTAIN_EPS
  }
}

/// 鞋带公式计算闭合轮廓的面积（像素平方）。
pub fn contour_area(points: &[Point<i32>]) -> f64 {
  if points.len() < 3 {
    return 0.0;
  }
  let mut doubled = 0i64;
  for (i, p) in points.iter().enumerate() {
    let q = points[(i + 1) % points.len()];
    doubled += i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y);
  }
  doubled.abs() as f64 / 2.0
}

/// 求点集的最小外接圆。
///
/// 增量法：逐点检查是否落在当前圆内，出圈的点必在新的最小圆边界上，
/// 再对其前缀重复该推理。不做随机打乱，结果对同一输入完全确定。
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Option<EnclosingCircle> {
  if points.is_empty() {
    return None;
  }
  let pts: Vec<(f64, f64)> = points
    .iter()
    .map(|p| (f64::from(p.x), f64::from(p.y)))
    .collect();

  let mut circle = EnclosingCircle {
    center_x: pts[0].0,
    center_y: pts[0].1,
    radius: 0.0,
  };
  for i in 1..pts.len() {
    if circle.contains(pts[i]) {
      continue;
    }
    // pts[i] 在最小圆边界上
    circle = EnclosingCircle {
      center_x: pts[i].0,
      center_y: pts[i].1,
      radius: 0.0,
    };
    for j in 0..i {
      if circle.contains(pts[j]) {
        continue;
      }
      // pts[i] 与 pts[j] 都在边界上
      circle = circle_from_two(pts[i], pts[j]);
      for k in 0..j {
        if circle.contains(pts[k]) {
          continue;
        }
        circle = circle_from_three(pts[i], pts[j], pts[k]);
      }
    }
  }
  Some(circle)
}

fn circle_from_two(a: (f64, f64), b: (f64, f64)) -> EnclosingCircle {
  let center_x = (a.0 + b.0) / 2.0;
  let center_y = (a.1 + b.1) / 2.0;
  let radius = (b.0 - a.0).hypot(b.1 - a.1) / 2.0;
  EnclosingCircle { center_x, center_y, radius }
}

/// 过三点的外接圆；三点共线时退化为最远点对的直径圆。
fn circle_from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> EnclosingCircle {
  let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
  if d.abs() < 1e-9 {
    let ab = (b.0 - a.0).hypot(b.1 - a.1);
    let ac = (c.0 - a.0).hypot(c.1 - a.1);
    let bc = (c.0 - b.0).hypot(c.1 - b.1);
    return if ab >= ac && ab >= bc {
      circle_from_two(a, b)
    } else if ac >= bc {
      circle_from_two(a, c)
    } else {
      circle_from_two(b, c)
    };
  }
  let a2 = a.0 * a.0 + a.1 * a.1;
  let b2 = b.0 * b.0 + b.1 * b.1;
  let c2 = c.0 * c.0 + c.1 * c.1;
  let center_x = (a2 * (b.1 - c.1) + b2 * (c.1 - a.1) + c2 * (a.1 - b.1)) / d;
  let center_y = (a2 * (c.0 - b.0) + b2 * (a.0 - c.0) + c2 * (b.0 - a.0)) / d;
  let radius = (a.0 - center_x).hypot(a.1 - center_y);
  EnclosingCircle { center_x, center_y, radius }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn p(x: i32, y: i32) -> Point<i32> {
    Point::new(x, y)
  }

  #[test]
  fn area_of_simple_shapes() {
    assert_eq!(contour_area(&[]), 0.0);
    assert_eq!(contour_area(&[p(0, 0), p(5, 5)]), 0.0);
    let square = [p(0, 0), p(10, 0), p(10, 10), p(0, 10)];
    assert_eq!(contour_area(&square), 100.0);
    let triangle = [p(0, 0), p(4, 0), p(0, 3)];
    assert_eq!(contour_area(&triangle), 6.0);
  }

  #[test]
  fn area_ignores_orientation() {
    let cw = [p(0, 0), p(0, 10), p(10, 10), p(10, 0)];
    assert_eq!(contour_area(&cw), 100.0);
  }

  #[test]
  fn circle_of_empty_set() {
    assert!(min_enclosing_circle(&[]).is_none());
  }

  #[test]
  fn circle_of_single_point() {
    let c = min_enclosing_circle(&[p(7, 9)]).unwrap();
    assert_eq!((c.center_x, c.center_y, c.radius), (7.0, 9.0, 0.0));
  }

  #[test]
  fn circle_of_two_points_is_diameter() {
    let c = min_enclosing_circle(&[p(0, 0), p(10, 0)]).unwrap();
    assert!((c.center_x - 5.0).abs() < 1e-9);
    assert!((c.center_y - 0.0).abs() < 1e-9);
    assert!((c.radius - 5.0).abs() < 1e-9);
  }

  #[test]
  fn circle_of_square_corners() {
    let c = min_enclosing_circle(&[p(0, 0), p(10, 0), p(10, 10), p(0, 10)]).unwrap();
    assert!((c.center_x - 5.0).abs() < 1e-6);
    assert!((c.center_y - 5.0).abs() < 1e-6);
    assert!((c.radius - 50.0_f64.sqrt()).abs() < 1e-6);
  }

  #[test]
  fn circle_of_collinear_points() {
    let c = min_enclosing_circle(&[p(0, 0), p(4, 0), p(10, 0)]).unwrap();
    assert!((c.center_x - 5.0).abs() < 1e-9);
    assert!((c.radius - 5.0).abs() < 1e-9);
  }

  #[test]
  fn circle_covers_ring_samples() {
    // 半径 25、圆心 (30, 30) 的圆上取整后的八个采样点
    let ring = [
      p(55, 30),
      p(48, 48),
      p(30, 55),
      p(12, 48),
      p(5, 30),
      p(12, 12),
      p(30, 5),
      p(48, 12),
    ];
    let c = min_enclosing_circle(&ring).unwrap();
    for q in &ring {
      let dx = f64::from(q.x) - c.center_x;
      let dy = f64::from(q.y) - c.center_y;
      assert!(dx.hypot(dy) <= c.radius + 1e-6);
    }
    assert!(c.radius >= 24.9 && c.radius <= 25.6, "radius = {}", c.radius);
    assert!((c.center_x - 30.0).abs() < 0.6);
    assert!((c.center_y - 30.0).abs() < 0.6);
  }
}
