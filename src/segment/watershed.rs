// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/segment/watershed.rs - 基于标记的分水岭变换
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

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// 两个盆地相遇处的分界线标记
pub const RIDGE: i32 = -1;
/// 待淹没的未知区域标记
pub const UNKNOWN: i32 = 0;

/// 标记控制的分水岭淹没。
///
/// `labels` 为行优先的标记图：正值是种子盆地，[`UNKNOWN`] 是待分配
/// 区域。淹没从所有种子边界同时开始，按高度从低到高扩张；同一高度
/// 按入队先后处理，因此在平坦区域两个盆地会等距推进。只有一个盆地
/// 到达的像素并入该盆地，两个盆地同时到达的像素记为 [`RIDGE`]，
/// 且不再向外扩张。
pub fn flood(elevation: &[u16], labels: &mut [i32], width: usize, height: usize) {
  debug_assert_eq!(elevation.len(), width * height);
  debug_assert_eq!(labels.len(), width * height);
  if width == 0 || height == 0 {
    return;
  }

  let mut heap: BinaryHeap<Reverse<(u16, u64, usize)>> = BinaryHeap::new();
  let mut queued = vec![false; labels.len()];
  let mut seq = 0u64;
  let mut nbuf = [0usize; 4];

  // 把所有种子的未知邻居入队
  for idx in 0..labels.len() {
    if labels[idx] <= UNKNOWN {
      continue;
    }
    let n = neighbors(idx, width, height, &mut nbuf);
    for &nb in &nbuf[..n] {
      if labels[nb] == UNKNOWN && !queued[nb] {
        queued[nb] = true;
        heap.push(Reverse((elevation[nb], seq, nb)));
        seq += 1;
      }
    }
  }

  while let Some(Reverse((_, _, idx))) = heap.pop() {
    let mut label = UNKNOWN;
    let mut conflict = false;
    let n = neighbors(idx, width, height, &mut nbuf);
    for &nb in &nbuf[..n] {
      let l = labels[nb];
      if l > UNKNOWN {
        if label == UNKNOWN {
          label = l;
        } else if label != l {
          conflict = true;
        }
      }
    }

    if conflict {
      // 多个盆地同时到达，划为分界线
      labels[idx] = RIDGE;
      continue;
    }
    if label == UNKNOWN {
      // 入队条件保证至少有一个种子邻居
      continue;
    }

    labels[idx] = label;
    for &nb in &nbuf[..n] {
      if labels[nb] == UNKNOWN && !queued[nb] {
        queued[nb] = true;
        heap.push(Reverse((elevation[nb], seq, nb)));
        seq += 1;
      }
    }
  }
}

/// 写出 idx 的四邻域下标，返回个数。
fn neighbors(idx: usize, width: usize, height: usize, out: &mut [usize; 4]) -> usize {
  let x = idx % width;
  let y = idx / width;
  let mut n = 0;
  if x > 0 {
    out[n] = idx - 1;
    n += 1;
  }
  if x + 1 < width {
    out[n] = idx + 1;
    n += 1;
  }
  if y > 0 {
    out[n] = idx - width;
    n += 1;
  }
  if y + 1 < height {
    out[n] = idx + width;
    n += 1;
  }
  n
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flat_strip_splits_at_midline() {
    // 7x3 的平坦高度场，左右两列是不同的种子
    let width = 7;
    let height = 3;
    let elevation = vec![0u16; width * height];
    let mut labels = vec![UNKNOWN; width * height];
    for y in 0..height {
      labels[y * width] = 2;
      labels[y * width + width - 1] = 3;
    }

    flood(&elevation, &mut labels, width, height);

    for y in 0..height {
      assert_eq!(&labels[y * width..y * width + 3], &[2, 2, 2]);
      assert_eq!(labels[y * width + 3], RIDGE);
      assert_eq!(&labels[y * width + 4..(y + 1) * width], &[3, 3, 3]);
    }
  }

  #[test]
  fn ridge_lands_on_centered_wall() {
    let elevation = vec![0, 0, 0, 0, 9, 0, 0, 0, 0];
    let mut labels = vec![UNKNOWN; 9];
    labels[0] = 2;
    labels[8] = 3;

    flood(&elevation, &mut labels, 9, 1);

    assert_eq!(labels, vec![2, 2, 2, 2, RIDGE, 3, 3, 3, 3]);
  }

  #[test]
  fn ridge_lands_on_offset_wall() {
    // 高墙不在中间：低处先被淹没，分界线仍落在高度最大处
    let elevation = vec![0, 0, 9, 0, 0, 0, 0, 0, 0];
    let mut labels = vec![UNKNOWN; 9];
    labels[0] = 2;
    labels[8] = 3;

    flood(&elevation, &mut labels, 9, 1);

    assert_eq!(labels, vec![2, 2, RIDGE, 3, 3, 3, 3, 3, 3]);
  }

  #[test]
  fn no_seeds_leaves_labels_untouched() {
    let elevation = vec![0u16; 12];
    let mut labels = vec![UNKNOWN; 12];

    flood(&elevation, &mut labels, 4, 3);

    assert!(labels.iter().all(|&l| l == UNKNOWN));
  }

  #[test]
  fn single_seed_fills_everything() {
    let elevation = vec![0u16; 16];
    let mut labels = vec![UNKNOWN; 16];
    labels[5] = 2;

    flood(&elevation, &mut labels, 4, 4);

    assert!(labels.iter().all(|&l| l == 2));
  }
}
