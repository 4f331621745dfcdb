// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/args.rs - 项目参数配置
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

use std::path::PathBuf;

use clap::Parser;

/// Dianbi 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入照片路径
  /// 支持格式: *.jpg, *.jpeg, *.png
  #[arg(long, value_name = "FILE")]
  pub input: PathBuf,

  /// 标注图像输出路径
  /// 指向已存在的目录时按时间戳命名文件，缺省时写入当前目录
  #[arg(long, value_name = "OUTPUT")]
  pub output: Option<PathBuf>,

  /// 跳过交互标定，直接把最大的圆按该面值标定
  #[arg(long, value_name = "VALUE")]
  pub value: Option<u32>,

  /// 直径分类容差（毫米）
  #[arg(long, default_value = "1.5", value_name = "MM")]
  pub tolerance: f64,

  /// 标注面值用的 TTF 字体文件，缺省时在系统里找
  #[arg(long, value_name = "FONT")]
  pub font: Option<PathBuf>,

  /// 把计数结果另存为 JSON 记录文件
  #[arg(long, value_name = "RECORD")]
  pub record: Option<PathBuf>,
}
