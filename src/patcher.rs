use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Known install locations of the TAO MobileNet template.
pub const BACKBONE_TEMPLATE_PATHS: [&str; 2] = [
   "/usr/local/lib/python3.8/dist-packages/nvidia_tao_tf1/core/templates/mobilenet.py",
   "/home/ubuntu/nvidia_tao_tf1/core/templates/mobilenet.py",
];

/// Rewrites every `alpha=<number>,` occurrence to the supplied width
/// multiplier, leaving all other lines untouched, and reports how many
/// lines changed. Pure text transform; the caller decides where the result
/// goes.
pub fn rewrite_alpha(source: &str, alpha: f64) -> (String, usize) {
   let pattern = Regex::new(r"alpha=([\d\.]+),").expect("alpha pattern is valid");
   let mut replaced = 0;

   let lines: Vec<String> = source
      .split('\n')
      .map(|line| match pattern.captures(line) {
         Some(caps) => {
            replaced += 1;
            line.replace(
               &format!("alpha={},", &caps[1]),
               &format!("alpha={},", alpha),
            )
         }
         None => line.to_string(),
      })
      .collect();

   (lines.join("\n"), replaced)
}

/// Patches the first candidate path that exists, in place. `Ok(None)` means
/// no template was found; callers are expected to warn and carry on, since
/// the template only exists inside a TAO install.
pub fn patch_backbone_template(paths: &[&str], alpha: f64) -> Result<Option<PathBuf>> {
   for candidate in paths {
      let path = Path::new(candidate);
      if !path.exists() {
         continue;
      }

      let source = fs::read_to_string(path)?;
      let (patched, _) = rewrite_alpha(&source, alpha);
      fs::write(path, patched)?;
      return Ok(Some(path.to_path_buf()));
   }
   Ok(None)
}
