// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/denomination.rs - 面值表与直径分类
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
use tracing::debug;

/// 默认分类容差（毫米）
pub const DEFAULT_TOLERANCE_MM: f64 = 1.5;

/// 默认面值表：俄罗斯卢布流通硬币的面值与参考直径（毫米）。
///
/// 注意 10 卢布硬币比 5 卢布硬币小，直径与面值并不单调。
pub const RUBLE_COINS: [(u32, f64); 4] = [(1, 20.5), (2, 23.0), (5, 25.0), (10, 22.0)];

/// 面值表条目
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DenominationEntry {
  /// 面值
  pub value: u32,
  /// 参考直径（毫米）
  pub diameter_mm: f64,
}

#[derive(Error, Debug)]
pub enum DenominationTableError {
  #[error("面值表为空")]
  Empty,
  #[error("面值 {0} 的参考直径无效: {1}")]
  InvalidDiameter(u32, f64),
  #[error("面值 {0} 重复")]
  DuplicateValue(u32),
}

/// 面值表：按面值升序保存各面值的参考直径。
#[derive(Clone, Debug)]
pub struct DenominationTable {
  entries: Vec<DenominationEntry>,
}

impl Default for DenominationTable {
  fn default() -> Self {
    let entries = RUBLE_COINS
      .iter()
      .map(|&(value, diameter_mm)| DenominationEntry { value, diameter_mm })
      .collect();
    DenominationTable { entries }
  }
}

impl DenominationTable {
  /// 校验条目并构造面值表，条目按面值升序排列。
  pub fn new(mut entries: Vec<DenominationEntry>) -> Result<Self, DenominationTableError> {
    if entries.is_empty() {
      return Err(DenominationTableError::Empty);
    }
    for entry in &entries {
      if !entry.diameter_mm.is_finite() || entry.diameter_mm <= 0.0 {
        return Err(DenominationTableError::InvalidDiameter(
          entry.value,
          entry.diameter_mm,
        ));
      }
    }
    entries.sort_by_key(|entry| entry.value);
    for pair in entries.windows(2) {
      if pair[0].value == pair[1].value {
        return Err(DenominationTableError::DuplicateValue(pair[0].value));
      }
    }
    Ok(DenominationTable { entries })
  }

  pub fn entries(&self) -> &[DenominationEntry] {
    &self.entries
  }

  /// 查询某面值的参考直径。
  pub fn diameter_mm(&self, value: u32) -> Option<f64> {
    self
      .entries
      .iter()
      .find(|entry| entry.value == value)
      .map(|entry| entry.diameter_mm)
  }

  /// 按直径分类：取与实测直径差值最小且小于容差的面值。
  ///
  /// 差值比较使用严格小于，因此相同差值时保留先出现（面值较小）的
  /// 条目；没有条目落在容差之内时返回 `None`。
  pub fn classify(&self, diameter_mm: f64, tolerance_mm: f64) -> Option<u32> {
    let mut best = None;
    let mut min_diff = tolerance_mm;
    for entry in &self.entries {
      let diff = (diameter_mm - entry.diameter_mm).abs();
      if diff < min_diff {
        min_diff = diff;
        best = Some(entry.value);
      }
    }
    debug!(
      "直径 {:.2} mm 分类结果: {:?} (容差 {} mm)",
      diameter_mm, best, tolerance_mm
    );
    best
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classify_exact_reference_diameters() {
    let table = DenominationTable::default();
    for &(value, diameter_mm) in &RUBLE_COINS {
      assert_eq!(table.classify(diameter_mm, DEFAULT_TOLERANCE_MM), Some(value));
    }
  }

  #[test]
  fn classify_picks_nearest_not_ordinal() {
    let table = DenominationTable::default();
    // 22.3 mm 离 10 卢布（22.0 mm）最近，而不是顺序靠后的 5 卢布（25.0 mm）
    assert_eq!(table.classify(22.3, DEFAULT_TOLERANCE_MM), Some(10));
    // 21.16 mm 离 1 卢布（20.5 mm）最近
    assert_eq!(table.classify(21.16, DEFAULT_TOLERANCE_MM), Some(1));
  }

  #[test]
  fn classify_outside_tolerance_is_none() {
    let table = DenominationTable::default();
    assert_eq!(table.classify(30.0, DEFAULT_TOLERANCE_MM), None);
    assert_eq!(table.classify(10.0, DEFAULT_TOLERANCE_MM), None);
  }

  #[test]
  fn classify_zero_tolerance_rejects_everything() {
    let table = DenominationTable::default();
    assert_eq!(table.classify(23.0, 0.0), None);
    assert_eq!(table.classify(23.4, 0.0), None);
  }

  #[test]
  fn classify_tie_keeps_first_entry() {
    let entries = vec![
      DenominationEntry { value: 1, diameter_mm: 20.0 },
      DenominationEntry { value: 2, diameter_mm: 22.0 },
    ];
    let table = DenominationTable::new(entries).unwrap();
    // 21.0 与两个条目的差值都是 1.0，保留面值较小的条目
    assert_eq!(table.classify(21.0, DEFAULT_TOLERANCE_MM), Some(1));
  }

  #[test]
  fn table_sorted_by_value() {
    let entries = vec![
      DenominationEntry { value: 10, diameter_mm: 22.0 },
      DenominationEntry { value: 1, diameter_mm: 20.5 },
      DenominationEntry { value: 5, diameter_mm: 25.0 },
    ];
    let table = DenominationTable::new(entries).unwrap();
    let values: Vec<u32> = table.entries().iter().map(|e| e.value).collect();
    assert_eq!(values, vec![1, 5, 10]);
  }

  #[test]
  fn table_rejects_bad_input() {
    assert!(matches!(
      DenominationTable::new(Vec::new()),
      Err(DenominationTableError::Empty)
    ));
    assert!(matches!(
      DenominationTable::new(vec![DenominationEntry { value: 1, diameter_mm: 0.0 }]),
      Err(DenominationTableError::InvalidDiameter(1, _))
    ));
    assert!(matches!(
      DenominationTable::new(vec![
        DenominationEntry { value: 1, diameter_mm: 20.5 },
        DenominationEntry { value: 1, diameter_mm: 21.5 },
      ]),
      Err(DenominationTableError::DuplicateValue(1))
    ));
  }

  #[test]
  fn diameter_lookup() {
    let table = DenominationTable::default();
    assert_eq!(table.diameter_mm(2), Some(23.0));
    assert_eq!(table.diameter_mm(3), None);
  }
}
