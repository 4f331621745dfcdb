// 该文件是 Dianbi （点币成金） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use dianbi::DenominationResolver;
use dianbi::annotate::Annotator;
use dianbi::pipeline::CoinCounter;

/// 终端交互标定：打印最大圆的半径，从标准输入读面值。
struct PromptResolver {
  values: Vec<u32>,
}

impl DenominationResolver for PromptResolver {
  fn resolve(&mut self, radius_px: u32) -> Option<u32> {
    println!();
    println!("找到的最大圆半径为 {} px，请输入这枚硬币的面值以标定比例。", radius_px);
    println!("可选面值: {:?}，直接回车表示取消。", self.values);
    print!("> ");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    std::io::stdin().read_line(&mut line).ok()?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
      return None;
    }
    trimmed.parse().ok()
  }
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  println!("Dianbi 硬币计数");
  println!("===============");
  println!("输入图像: {}", args.input.display());
  println!("分类容差: {} mm", args.tolerance);
  println!();

  if args.tolerance <= 0.0 {
    return Err(anyhow::anyhow!("分类容差必须为正数: {}", args.tolerance));
  }

  let counter = CoinCounter::new().with_tolerance(args.tolerance);

  // 指定面值时在分割前先查表
  if let Some(value) = args.value
    && counter.table().diameter_mm(value).is_none()
  {
    return Err(anyhow::anyhow!("未知面值: {}", value));
  }

  println!("正在读取图像...");
  let image = dianbi::input::load_image(&args.input)?;
  println!("图像尺寸: {}x{}", image.width(), image.height());

  println!("开始检测...");
  let result = match args.value {
    Some(value) => {
      let mut resolver = move |radius_px: u32| {
        info!("使用参数指定的面值 {} 标定半径 {} px 的参考圆", value, radius_px);
        Some(value)
      };
      counter.count(&image, &mut resolver)?
    }
    None => {
      let values = counter.table().entries().iter().map(|e| e.value).collect();
      let mut resolver = PromptResolver { values };
      counter.count(&image, &mut resolver)?
    }
  };

  if result.is_empty() {
    println!();
    println!("图像中没有找到硬币。");
    return Ok(());
  }

  println!();
  for (i, coin) in result.coins.iter().enumerate() {
    match coin.denomination {
      Some(value) => println!(
        "  {}. 圆心 ({}, {}), 半径 {} px, 直径 {:.2} mm -> {} 卢布",
        i + 1,
        coin.circle.center_x,
        coin.circle.center_y,
        coin.circle.radius_px,
        coin.diameter_mm,
        value
      ),
      None => println!(
        "  {}. 圆心 ({}, {}), 半径 {} px, 直径 {:.2} mm -> 无法识别",
        i + 1,
        coin.circle.center_x,
        coin.circle.center_y,
        coin.circle.radius_px,
        coin.diameter_mm
      ),
    }
  }
  println!();
  println!("共识别 {} / {} 枚硬币", result.matched_count(), result.coins.len());
  println!("总金额: {:.2} 卢布", result.total);

  // 标注结果图
  let annotator = match &args.font {
    Some(path) => Annotator::with_font_file(path)?,
    None => Annotator::with_system_font(),
  };
  let annotated = annotator.render(&image, &result);
  let target = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
  let saved = dianbi::output::save_annotated(&target, &annotated)?;
  println!("标注图像: {}", saved.display());

  if let Some(record) = &args.record {
    dianbi::output::write_record(record, &result)?;
    println!("计数记录: {}", record.display());
  }

  Ok(())
}
