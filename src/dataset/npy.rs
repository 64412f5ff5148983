use anyhow::{Context, Result};
use memmap2::Mmap;
use ndarray::{Array2, ArrayView4};
use ndarray_npy::{ReadNpyExt, ViewNpyExt};
use std::fs::File;
use std::path::Path;

/// A .npy dump kept on disk and accessed through a read-only memory map.
///
/// Image dumps can be larger than available memory, so no sample data is
/// copied until the converter asks for it; the array view borrows straight
/// from the mapping.
pub struct MappedNpy {
   mmap: Mmap,
}

impl MappedNpy {
   pub fn open<P: AsRef<Path>>(path: &P) -> Result<MappedNpy> {
      let path = path.as_ref();
      let file =
         File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
      // The dumps are written once by the training pipeline and never
      // modified while we read them.
      let mmap = unsafe { Mmap::map(&file) }
         .with_context(|| format!("failed to mmap {}", path.display()))?;
      Ok(MappedNpy { mmap })
   }

   /// View over a (count, width, height, channels) f32 dump.
   pub fn view4(&self) -> Result<ArrayView4<'_, f32>> {
      let view = ArrayView4::<f32>::view_npy(&self.mmap)?;
      Ok(view)
   }
}

/// Label dumps are small; read them fully.
pub fn read_labels<P: AsRef<Path>>(path: &P) -> Result<Array2<f32>> {
   let path = path.as_ref();
   let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
   let labels = Array2::<f32>::read_npy(file)?;
   Ok(labels)
}
