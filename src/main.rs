use anyhow::Result;
use clap::Parser;
use ei_tao_export::patcher::{self, BACKBONE_TEMPLATE_PATHS};
use ei_tao_export::{export, ExportOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ei-tao-export")]
#[command(about = "Edge Impulse => TAO image classification")]
struct Cli {
   /// Directory holding the X/Y split dumps
   #[arg(long)]
   data_directory: PathBuf,

   /// Directory the TAO dataset and specs are written to
   #[arg(long)]
   out_directory: PathBuf,

   /// Number of training epochs written into the spec
   #[arg(long)]
   epochs: u32,

   /// SGD learning rate written into the spec
   #[arg(long)]
   learning_rate: f64,

   /// MobileNet width multiplier patched into the TAO template
   #[arg(long)]
   alpha: f64,
}

fn main() -> Result<()> {
   let cli = Cli::parse();

   export(
      &cli.data_directory,
      &cli.out_directory,
      &ExportOptions {
         epochs: cli.epochs,
         learning_rate: cli.learning_rate,
      },
   )?;

   // Best effort: the template only exists inside a TAO install.
   match patcher::patch_backbone_template(&BACKBONE_TEMPLATE_PATHS, cli.alpha)? {
      Some(path) => println!("Set MobileNet alpha to {} in {}", cli.alpha, path.display()),
      None => {
         println!();
         println!("WARN: Could not find mobilenet training template");
         println!();
      }
   }

   Ok(())
}
