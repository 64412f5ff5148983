mod npy;

pub use npy::MappedNpy;

use anyhow::Result;
use ndarray::Array2;
use std::path::Path;

const IMAGE_FILENAMES: [&str; 2] = ["X_split_train.npy", "X_split_test.npy"];
const LABEL_FILENAMES: [&str; 2] = ["Y_split_train.npy", "Y_split_test.npy"];

/// The four array dumps an Edge Impulse training block leaves in its data
/// directory: train/test images and one-hot train/test labels.
///
/// Image geometry comes from the training image dump, the class count from
/// the training label dump.
pub struct Dataset {
   pub train_images: MappedNpy,
   pub test_images: MappedNpy,
   pub train_labels: Array2<f32>,
   pub test_labels: Array2<f32>,
   width: usize,
   height: usize,
   channels: usize,
}

impl Dataset {
   pub fn load<P: AsRef<Path>>(data_dir: &P) -> Result<Dataset> {
      let data_dir = data_dir.as_ref();

      let train_images = MappedNpy::open(&data_dir.join(IMAGE_FILENAMES[0]))?;
      let test_images = MappedNpy::open(&data_dir.join(IMAGE_FILENAMES[1]))?;
      let train_labels = npy::read_labels(&data_dir.join(LABEL_FILENAMES[0]))?;
      let test_labels = npy::read_labels(&data_dir.join(LABEL_FILENAMES[1]))?;

      let (_, width, height, channels) = train_images.view4()?.dim();

      Ok(Dataset {
         train_images,
         test_images,
         train_labels,
         test_labels,
         width,
         height,
         channels,
      })
   }

   pub fn width(&self) -> usize {
      self.width
   }

   pub fn height(&self) -> usize {
      self.height
   }

   pub fn channels(&self) -> usize {
      self.channels
   }

   pub fn class_count(&self) -> usize {
      self.train_labels.ncols()
   }

   /// Synthetic label names: "class0", "class1", ... The dumps carry no
   /// human-readable names, only one-hot columns.
   pub fn classes(&self) -> Vec<String> {
      (0..self.class_count()).map(|n| format!("class{}", n)).collect()
   }

   /// Combined train + test sample count, used for progress totals and the
   /// filename index padding.
   pub fn total_samples(&self) -> Result<usize> {
      Ok(self.train_images.view4()?.dim().0 + self.test_images.view4()?.dim().0)
   }
}
