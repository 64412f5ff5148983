use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Console progress over the combined sample count. Handed to the converter
/// as a capability so the conversion code carries no shared counters of its
/// own. Redraws are throttled; progress is observational only.
pub struct Progress {
   bar: ProgressBar,
}

impl Progress {
   pub fn new(total_samples: usize) -> Result<Progress> {
      let bar = ProgressBar::with_draw_target(
         Some(total_samples as u64),
         ProgressDrawTarget::stdout_with_hz(1),
      );
      bar.set_style(
         ProgressStyle::default_bar()
            .template("[{pos}/{len}] Converting images... [{wide_bar:.green}] ({eta})")?
            .progress_chars("#>-"),
      );
      Ok(Progress { bar })
   }

   pub fn tick(&self) {
      self.bar.inc(1);
   }

   pub fn finish(&self) {
      self.bar.finish();
   }
}
