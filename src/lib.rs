pub mod convert;
pub mod dataset;
pub mod patcher;
pub mod progress;
pub mod specs;

use anyhow::{bail, Result};
use crate::convert::{Converter, Split};
use crate::dataset::Dataset;
use crate::progress::Progress;
use crate::specs::TrainingSpec;
use ndarray::{Array2, Array4};
use std::fs;
use std::path::Path;

pub struct ExportOptions {
   pub epochs: u32,
   pub learning_rate: f64,
}

/// Runs the full conversion: class-sorted JPEGs, split manifests, class list
/// and the TAO training spec. Splits run in fixed order (training, val, then
/// the always-empty test split). An existing output directory is destroyed
/// and recreated; validation failures abort before anything is written.
pub fn export(data_dir: &Path, out_dir: &Path, opts: &ExportOptions) -> Result<()> {
   let dataset = Dataset::load(&data_dir)?;

   if dataset.width() != dataset.height() {
      bail!(
         "image input size should be square, but was {}x{}",
         dataset.width(),
         dataset.height()
      );
   }

   if out_dir.is_dir() {
      fs::remove_dir_all(out_dir)?;
   }

   println!("Transforming Edge Impulse data format into something compatible with TAO");

   let classes = dataset.classes();
   let total = dataset.total_samples()?;
   let converter = Converter::new(out_dir, &classes, total);
   let progress = Progress::new(total)?;

   converter.convert_split(
      dataset.train_images.view4()?,
      dataset.train_labels.view(),
      Split::Training,
      &progress,
   )?;
   converter.convert_split(
      dataset.test_images.view4()?,
      dataset.test_labels.view(),
      Split::Val,
      &progress,
   )?;

   // The pipeline never fills the test split, but its directory and manifest
   // are still expected downstream.
   let no_images =
      Array4::<f32>::zeros((0, dataset.width(), dataset.height(), dataset.channels()));
   let no_labels = Array2::<f32>::zeros((0, dataset.class_count()));
   converter.convert_split(no_images.view(), no_labels.view(), Split::Test, &progress)?;
   progress.finish();

   println!("Transforming Edge Impulse data format into something compatible with TAO OK");
   println!();

   specs::write_classes(out_dir, &classes)?;
   specs::write_spec(
      out_dir,
      &TrainingSpec {
         channels: dataset.channels(),
         width: dataset.width(),
         height: dataset.height(),
         learning_rate: opts.learning_rate,
         epochs: opts.epochs,
      },
   )?;

   Ok(())
}
