use anyhow::Result;
use std::fs;
use std::path::Path;

/// Values substituted into the TAO classification spec; everything else in
/// the document is a fixed constant.
pub struct TrainingSpec {
   pub channels: usize,
   pub width: usize,
   pub height: usize,
   pub learning_rate: f64,
   pub epochs: u32,
}

/// Writes the class-label list the manifests refer to.
pub fn write_classes(out_dir: &Path, classes: &[String]) -> Result<()> {
   fs::write(out_dir.join("dataset").join("classes.txt"), classes.join("\n"))?;
   Ok(())
}

/// Writes the training spec to specs/custom.yaml under the output directory.
pub fn write_spec(out_dir: &Path, spec: &TrainingSpec) -> Result<()> {
   let specs_dir = out_dir.join("specs");
   fs::create_dir_all(&specs_dir)?;
   fs::write(specs_dir.join("custom.yaml"), render_spec(out_dir, spec))?;
   Ok(())
}

pub fn render_spec(out_dir: &Path, spec: &TrainingSpec) -> String {
   format!(
      r#"model_config {{
  # Model Architecture can be chosen from:
  # ['resnet', 'vgg', 'googlenet', 'alexnet']
  arch: "mobilenet_v1"
  # for resnet --> n_layers can be [10, 18, 50]
  # for vgg --> n_layers can be [16, 19]
  n_layers: 10
  use_batch_norm: True
  use_bias: False
  all_projections: False
  use_pooling: True
  retain_head: True
  resize_interpolation_method: BICUBIC
  # if you want to use the pretrained model,
  # image size should be "3,224,224"
  # otherwise, it can be "3, X, Y", where X,Y >= 16
  input_image_size: "{channels},{width},{height}"
}}
train_config {{
  train_dataset_path: "{train_path}"
  val_dataset_path: "{val_path}"
  # Only ['sgd', 'adam'] are supported for optimizer
  optimizer {{
      sgd {{
      lr: {lr}
      decay: 0.0
      momentum: 0.9
      nesterov: False
      }}
  }}
  batch_size_per_gpu: 50
  n_epochs: {epochs}
  # Number of CPU cores for loading data
  n_workers: 16
  lr_config {{
      cosine {{
      learning_rate: 0.04
      soft_start: 0.0
      }}
  }}
  # regularizer
  reg_config {{
      # regularizer type can be "L1", "L2" or "None".
      type: "None"
      # if the type is not "None",
      # scope can be either "Conv2D" or "Dense" or both.
      scope: "Conv2D,Dense"
      # 0 < weight decay < 1
      weight_decay: 0.0001
  }}
  enable_random_crop: True
  enable_center_crop: True
  enable_color_augmentation: True
  mixup_alpha: 0.2
  label_smoothing: 0.1
  preprocess_mode: "torch"
}}
"#,
      channels = spec.channels,
      width = spec.width,
      height = spec.height,
      train_path = format!("{}/dataset/training_set/training_set/", out_dir.display()),
      val_path = format!("{}/dataset/val_set/val_set/", out_dir.display()),
      lr = spec.learning_rate,
      epochs = spec.epochs,
   )
}
