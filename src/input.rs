// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/input.rs - 图像文件输入
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

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum InputError {
  #[error("I/O error: {0}")]
  IoError(std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(image::ImageError),
}

impl From<std::io::Error> for InputError {
  fn from(err: std::io::Error) -> Self {
    InputError::IoError(err)
  }
}

impl From<image::ImageError> for InputError {
  fn from(err: image::ImageError) -> Self {
    InputError::ImageLoadError(err)
  }
}

/// 读取照片文件并转成 RGB 图像。
pub fn load_image(path: &Path) -> Result<RgbImage, InputError> {
  info!("读取图像文件: {}", path.display());
  let image = ImageReader::open(path)?.decode()?;
  debug!("图像尺寸: {}x{}", image.width(), image.height());
  Ok(image.into())
}

/// 解码内存中的照片字节。
pub fn load_image_from_memory(bytes: &[u8]) -> Result<RgbImage, InputError> {
  let image = image::load_from_memory(bytes)?;
  Ok(image.into())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  #[test]
  fn decodes_png_from_memory() {
    let img = RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
    let mut buffer = Vec::new();
    img
      .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
      .unwrap();

    let decoded = load_image_from_memory(&buffer).unwrap();
    assert_eq!(decoded.dimensions(), (4, 3));
    assert_eq!(*decoded.get_pixel(0, 0), image::Rgb([10, 20, 30]));
  }

  #[test]
  fn garbage_bytes_fail_to_decode() {
    assert!(matches!(
      load_image_from_memory(&[0, 1, 2, 3]),
      Err(InputError::ImageLoadError(_))
    ));
  }

  #[test]
  fn missing_file_is_io_error() {
    assert!(matches!(
      load_image(Path::new("/no/such/image.png")),
      Err(InputError::IoError(_))
    ));
  }
}
