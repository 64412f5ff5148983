use crate::progress::Progress;
use anyhow::{anyhow, bail, Result};
use image::RgbImage;
use ndarray::{ArrayView1, ArrayView2, ArrayView3, ArrayView4};
use std::fs;
use std::path::Path;

// ImageNet channel statistics. The training block normalizes with these and
// the conversion applies them in reverse.
const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];
const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

// Filename indices are padded to at least five digits, wider when the
// combined sample count needs more.
const MIN_PAD_WIDTH: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
   Training,
   Val,
   Test,
}

impl Split {
   pub fn name(&self) -> &'static str {
      match self {
         Split::Training => "training",
         Split::Val => "val",
         Split::Test => "test",
      }
   }
}

/// Writes samples as class-sorted JPEGs plus one index manifest per split.
/// Progress is reported through the capability passed into `convert_split`;
/// the converter keeps no counters of its own.
pub struct Converter<'a> {
   out_dir: &'a Path,
   classes: &'a [String],
   pad_width: usize,
}

impl<'a> Converter<'a> {
   pub fn new(out_dir: &'a Path, classes: &'a [String], total_samples: usize) -> Converter<'a> {
      Converter {
         out_dir,
         classes,
         pad_width: pad_width(total_samples),
      }
   }

   /// Converts every sample of one split in index order. The split directory
   /// and its manifest are produced even when the split is empty. Any encode
   /// or write failure aborts the run; there is no per-sample recovery.
   pub fn convert_split(
      &self,
      images: ArrayView4<f32>,
      labels: ArrayView2<f32>,
      split: Split,
      progress: &Progress,
   ) -> Result<()> {
      let split_dir = self
         .out_dir
         .join("dataset")
         .join(format!("{}_set", split.name()))
         .join(format!("{}_set", split.name()));
      fs::create_dir_all(&split_dir)?;

      let mut manifest = Vec::with_capacity(images.dim().0);

      for (i, sample) in images.outer_iter().enumerate() {
         let (width, height, _) = sample.dim();
         let pixels = denormalize(sample, &CHANNEL_STD, &CHANNEL_MEAN)?;
         let img = RgbImage::from_raw(width as u32, height as u32, pixels)
            .ok_or_else(|| anyhow!("pixel buffer does not match {}x{} rgb image", width, height))?;

         let class_index = argmax(labels.row(i));
         let class_label = &self.classes[class_index];

         let class_dir = split_dir.join(class_label);
         fs::create_dir_all(&class_dir)?;

         let filename = image_filename(class_label, i, self.pad_width);
         img.save(class_dir.join(&filename))?;

         manifest.push(format!("{}/{} {}", class_label, filename, class_index));
         progress.tick();
      }

      fs::write(
         self.out_dir.join("dataset").join(format!("{}.txt", split.name())),
         manifest.join("\n"),
      )?;

      Ok(())
   }
}

/// Reverses the per-channel affine normalization and rescales to u8, without
/// touching the source view. The statistics tables are keyed by channel, so
/// a dump whose channel count disagrees with them is rejected instead of
/// silently converting garbage.
fn denormalize(sample: ArrayView3<f32>, std: &[f32], mean: &[f32]) -> Result<Vec<u8>> {
   let channels = sample.dim().2;
   if channels != std.len() || channels != mean.len() {
      bail!(
         "expected {} image channels, but dump has {}",
         std.len(),
         channels
      );
   }

   let mut pixels = Vec::with_capacity(sample.len());
   for ((_, _, c), &value) in sample.indexed_iter() {
      let unscaled = value * std[c] + mean[c];
      pixels.push((unscaled * 255.0).round().clamp(0.0, 255.0) as u8);
   }
   Ok(pixels)
}

/// First maximum wins when label components tie.
fn argmax(row: ArrayView1<f32>) -> usize {
   let mut best = 0;
   for (i, &value) in row.iter().enumerate() {
      if value > row[best] {
         best = i;
      }
   }
   best
}

fn image_filename(class_label: &str, index: usize, pad_width: usize) -> String {
   format!("{}.{:0width$}.jpg", class_label, index, width = pad_width)
}

fn pad_width(total_samples: usize) -> usize {
   total_samples.to_string().len().max(MIN_PAD_WIDTH)
}
