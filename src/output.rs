// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/output.rs - 标注图像与记录文件输出
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

use std::path::{Path, PathBuf};

use chrono::Local;
use image::RgbImage;
use thiserror::Error;
use tracing::warn;

use crate::pipeline::CountingResult;

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("记录序列化错误: {0}")]
  RecordError(#[from] serde_json::Error),
}

/// 保存标注图像，返回实际写入的路径。
///
/// `target` 是已存在的目录时在其中生成带时间戳的文件名，否则按文件
/// 路径保存并按需创建父目录，保存格式由扩展名决定。
pub fn save_annotated(target: &Path, image: &RgbImage) -> Result<PathBuf, OutputError> {
  let path = if target.is_dir() {
    target.join(format!(
      "coins-{}.png",
      Local::now().format("%Y%m%d-%H%M%S")
    ))
  } else {
    if let Some(parent) = target.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    target.to_path_buf()
  };

  image.save(&path)?;
  warn!("保存图像到文件: {}", path.display());
  Ok(path)
}

/// 把计数结果写成 JSON 记录文件。
pub fn write_record(path: &Path, result: &CountingResult) -> Result<(), OutputError> {
  let coins: Vec<serde_json::Value> = result
    .coins
    .iter()
    .map(|c| {
      serde_json::json!({
        "x": c.circle.center_x,
        "y": c.circle.center_y,
        "radius_px": c.circle.radius_px,
        "diameter_mm": c.diameter_mm,
        "denomination": c.denomination,
      })
    })
    .collect();
  let record = serde_json::json!({
    "total": result.total,
    "coins": coins,
  });

  std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
  warn!("保存计数记录到文件: {}", path.display());
  Ok(())
}
