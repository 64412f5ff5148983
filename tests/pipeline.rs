use ei_tao_export::{export, ExportOptions};
use ndarray::{Array2, Array4};
use ndarray_npy::WriteNpyExt;
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

fn write_dumps(
   dir: &Path,
   x_train: &Array4<f32>,
   x_test: &Array4<f32>,
   y_train: &Array2<f32>,
   y_test: &Array2<f32>,
) {
   x_train
      .write_npy(File::create(dir.join("X_split_train.npy")).unwrap())
      .unwrap();
   x_test
      .write_npy(File::create(dir.join("X_split_test.npy")).unwrap())
      .unwrap();
   y_train
      .write_npy(File::create(dir.join("Y_split_train.npy")).unwrap())
      .unwrap();
   y_test
      .write_npy(File::create(dir.join("Y_split_test.npy")).unwrap())
      .unwrap();
}

fn one_hot(rows: &[usize], class_count: usize) -> Array2<f32> {
   let mut labels = Array2::<f32>::zeros((rows.len(), class_count));
   for (i, &class) in rows.iter().enumerate() {
      labels[[i, class]] = 1.0;
   }
   labels
}

fn opts() -> ExportOptions {
   ExportOptions {
      epochs: 5,
      learning_rate: 0.01,
   }
}

#[test]
fn exports_the_full_dataset_layout() {
   let data = tempdir().unwrap();
   let out = tempdir().unwrap();
   let out_dir = out.path().join("export");

   let x_train = Array4::<f32>::zeros((3, 4, 4, 3));
   let x_test = Array4::<f32>::zeros((1, 4, 4, 3));
   let y_train = one_hot(&[3, 0, 1], 4);
   let y_test = one_hot(&[2], 4);
   write_dumps(data.path(), &x_train, &x_test, &y_train, &y_test);

   export(data.path(), &out_dir, &opts()).unwrap();

   // One JPEG per sample, under the sample's class directory.
   let training_set = out_dir.join("dataset/training_set/training_set");
   assert!(training_set.join("class3/class3.00000.jpg").is_file());
   assert!(training_set.join("class0/class0.00001.jpg").is_file());
   assert!(training_set.join("class1/class1.00002.jpg").is_file());

   let val_set = out_dir.join("dataset/val_set/val_set");
   assert!(val_set.join("class2/class2.00000.jpg").is_file());

   // One manifest line per sample, class index appended.
   let training_manifest = fs::read_to_string(out_dir.join("dataset/training.txt")).unwrap();
   assert_eq!(
      training_manifest,
      "class3/class3.00000.jpg 3\nclass0/class0.00001.jpg 0\nclass1/class1.00002.jpg 1"
   );
}

#[test]
fn manifest_lines_reference_the_written_files() {
   let data = tempdir().unwrap();
   let out = tempdir().unwrap();
   let out_dir = out.path().join("export");

   let x_train = Array4::<f32>::zeros((2, 4, 4, 3));
   let x_test = Array4::<f32>::zeros((1, 4, 4, 3));
   let y_train = one_hot(&[1, 1], 3);
   let y_test = one_hot(&[0], 3);
   write_dumps(data.path(), &x_train, &x_test, &y_train, &y_test);

   export(data.path(), &out_dir, &opts()).unwrap();

   for split in ["training", "val"] {
      let manifest =
         fs::read_to_string(out_dir.join("dataset").join(format!("{}.txt", split))).unwrap();
      let split_dir = out_dir
         .join("dataset")
         .join(format!("{}_set", split))
         .join(format!("{}_set", split));

      for line in manifest.lines() {
         let (relative, _class_index) = line.rsplit_once(' ').unwrap();
         assert!(split_dir.join(relative).is_file(), "missing {}", relative);
      }
   }
}

#[test]
fn test_split_is_empty_but_present() {
   let data = tempdir().unwrap();
   let out = tempdir().unwrap();
   let out_dir = out.path().join("export");

   let x_train = Array4::<f32>::zeros((1, 4, 4, 3));
   let x_test = Array4::<f32>::zeros((1, 4, 4, 3));
   write_dumps(data.path(), &x_train, &x_test, &one_hot(&[0], 2), &one_hot(&[1], 2));

   export(data.path(), &out_dir, &opts()).unwrap();

   let test_manifest = out_dir.join("dataset/test.txt");
   assert!(test_manifest.is_file());
   assert_eq!(fs::read_to_string(&test_manifest).unwrap(), "");

   let test_set = out_dir.join("dataset/test_set/test_set");
   assert!(test_set.is_dir());
   assert_eq!(fs::read_dir(&test_set).unwrap().count(), 0);
}

#[test]
fn writes_class_list_and_training_spec() {
   let data = tempdir().unwrap();
   let out = tempdir().unwrap();
   let out_dir = out.path().join("export");

   let x_train = Array4::<f32>::zeros((1, 8, 8, 3));
   let x_test = Array4::<f32>::zeros((1, 8, 8, 3));
   write_dumps(data.path(), &x_train, &x_test, &one_hot(&[0], 4), &one_hot(&[3], 4));

   export(data.path(), &out_dir, &opts()).unwrap();

   let classes = fs::read_to_string(out_dir.join("dataset/classes.txt")).unwrap();
   assert_eq!(classes, "class0\nclass1\nclass2\nclass3");

   let spec = fs::read_to_string(out_dir.join("specs/custom.yaml")).unwrap();
   assert!(spec.contains("input_image_size: \"3,8,8\""));
   assert!(spec.contains("lr: 0.01"));
   assert!(spec.contains("n_epochs: 5"));
   assert!(spec.contains(&format!(
      "train_dataset_path: \"{}/dataset/training_set/training_set/\"",
      out_dir.display()
   )));
}

#[test]
fn non_square_images_abort_before_any_output() {
   let data = tempdir().unwrap();
   let out = tempdir().unwrap();
   let out_dir = out.path().join("export");

   fs::create_dir_all(&out_dir).unwrap();
   fs::write(out_dir.join("sentinel.txt"), "untouched").unwrap();

   let x_train = Array4::<f32>::zeros((2, 32, 48, 3));
   let x_test = Array4::<f32>::zeros((1, 32, 48, 3));
   write_dumps(data.path(), &x_train, &x_test, &one_hot(&[0, 1], 2), &one_hot(&[0], 2));

   let err = export(data.path(), &out_dir, &opts()).unwrap_err();
   assert!(err.to_string().contains("32x48"));

   // The output directory was not destroyed and nothing was written to it.
   assert_eq!(
      fs::read_to_string(out_dir.join("sentinel.txt")).unwrap(),
      "untouched"
   );
   assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 1);
}

#[test]
fn missing_dump_is_an_error() {
   let data = tempdir().unwrap();
   let out = tempdir().unwrap();

   // Only the train image dump exists.
   Array4::<f32>::zeros((1, 4, 4, 3))
      .write_npy(File::create(data.path().join("X_split_train.npy")).unwrap())
      .unwrap();

   assert!(export(data.path(), &out.path().join("export"), &opts()).is_err());
}

#[test]
fn rerun_removes_stale_output() {
   let data = tempdir().unwrap();
   let out = tempdir().unwrap();
   let out_dir = out.path().join("export");

   let x_train = Array4::<f32>::zeros((1, 4, 4, 3));
   let x_test = Array4::<f32>::zeros((1, 4, 4, 3));
   write_dumps(data.path(), &x_train, &x_test, &one_hot(&[0], 2), &one_hot(&[1], 2));

   export(data.path(), &out_dir, &opts()).unwrap();

   let stale = out_dir.join("dataset/training_set/training_set/class1/class1.99999.jpg");
   fs::create_dir_all(stale.parent().unwrap()).unwrap();
   fs::write(&stale, "stale").unwrap();

   export(data.path(), &out_dir, &opts()).unwrap();

   assert!(!stale.exists());
   assert!(out_dir
      .join("dataset/training_set/training_set/class0/class0.00000.jpg")
      .is_file());
}
