// Tests for mimic-data: Batch draws, importers, DataCollector

use std::collections::BTreeSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use mimic_core::{Error, ErrorKind};
use mimic_data::formats::{build_cifar_bytes, build_idx1_bytes, build_idx3_bytes};
use mimic_data::{
    sample_indices, Batch, CifarImporter, CsvFormat, CsvImporter, DataCollector, Importer,
    MnistImporter, RawTextImporter, Sample,
};

// Helpers

fn numbered_batch(n: usize, batch_size: usize) -> Batch<usize, usize> {
    let mut batch = Batch::with_batch_size(batch_size).unwrap();
    for i in 0..n {
        batch.insert(Sample::new(i * 10, i % 3));
    }
    batch
}

fn indices(samples: &[Sample<usize, usize>]) -> Vec<usize> {
    sample_indices(samples).into_iter().map(|i| i.unwrap()).collect()
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn mnist_files(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let images: Vec<Vec<u8>> = (0..5u8).map(|i| vec![i * 50; 4]).collect();
    let refs: Vec<&[u8]> = images.iter().map(|v| v.as_slice()).collect();
    let data = write(dir, "images.idx3", &build_idx3_bytes(&refs, 2, 2));
    let labels = write(dir, "labels.idx1", &build_idx1_bytes(&[4, 0, 4, 1, 9]));
    (data, labels)
}

// Sequential draws

#[test]
fn test_epoch_completeness() {
    for (size, batch_size) in [(6, 2), (6, 3), (7, 7), (8, 4), (5, 1)] {
        let mut batch = numbered_batch(size, batch_size);
        let calls = (size + batch_size - 1) / batch_size;

        let mut first_epoch = Vec::new();
        for _ in 0..calls {
            first_epoch.extend(indices(&batch.next_training_batch().unwrap()));
        }
        let unique: BTreeSet<usize> = first_epoch.iter().copied().collect();
        assert_eq!(first_epoch.len(), size);
        assert_eq!(unique, (0..size).collect::<BTreeSet<_>>());

        let mut second_epoch = Vec::new();
        for _ in 0..calls {
            second_epoch.extend(indices(&batch.next_training_batch().unwrap()));
        }
        assert_eq!(first_epoch, second_epoch);
    }
}

#[test]
fn test_wrap_scenario() {
    let mut batch = numbered_batch(3, 2);
    assert_eq!(indices(&batch.next_training_batch().unwrap()), vec![0, 1]);
    assert_eq!(indices(&batch.next_training_batch().unwrap()), vec![2, 0]);
    assert_eq!(indices(&batch.next_training_batch().unwrap()), vec![1, 2]);
}

#[test]
fn test_batch_larger_than_partition_is_clipped() {
    let mut batch = numbered_batch(3, 10);
    assert!(batch.is_last_batch());
    assert_eq!(indices(&batch.next_training_batch().unwrap()), vec![0, 1, 2]);
    assert_eq!(batch.default_partition().next_sample_index(), 0);
}

#[test]
fn test_set_next_sample_index() {
    let mut batch = numbered_batch(5, 2);
    batch.set_next_sample_index(4).unwrap();
    assert_eq!(indices(&batch.next_training_batch().unwrap()), vec![4, 0]);
    let err = batch.set_next_sample_index(5).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { index: 5, len: 5 }));
}

#[test]
fn test_get_sample_out_of_range() {
    let batch = numbered_batch(4, 2);
    for i in [4, 5, 100, usize::MAX] {
        assert_eq!(batch.get_sample(i).unwrap_err().kind(), ErrorKind::OutOfRange);
    }
    assert_eq!(*batch.get_sample(3).unwrap().data(), 30);
}

#[test]
fn test_zero_batch_size_rejected() {
    let mut batch = numbered_batch(3, 1);
    assert_eq!(batch.set_batch_size(0).unwrap_err().kind(), ErrorKind::Configuration);
    assert!(Batch::<u8, u8>::with_batch_size(0).is_err());
}

// Random draws

#[test]
fn test_random_batch_reproducible() {
    let batch = numbered_batch(50, 8);
    let run = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..4)
            .map(|_| indices(&batch.random_batch(&mut rng).unwrap()))
            .collect::<Vec<_>>()
    };
    let a = run(42);
    let b = run(42);
    assert_eq!(a, b);
    assert!(a.iter().all(|draw| draw.len() == 8));
    assert!(a.iter().flatten().all(|&i| i < 50));
}

#[test]
fn test_random_batch_leaves_cursor_alone() {
    let mut batch = numbered_batch(10, 3);
    batch.next_training_batch().unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    batch.random_batch(&mut rng).unwrap();
    batch.random_sample(&mut rng).unwrap();
    assert_eq!(batch.default_partition().next_sample_index(), 3);
    assert_eq!(indices(&batch.next_training_batch().unwrap()), vec![3, 4, 5]);
}

#[test]
fn test_draws_from_empty_partition_fail() {
    let mut batch: Batch<u8, u8> = Batch::new();
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(batch.next_training_batch().unwrap_err().kind(), ErrorKind::OutOfRange);
    assert_eq!(batch.random_batch(&mut rng).unwrap_err().kind(), ErrorKind::OutOfRange);
}

// Importers

#[test]
fn test_mnist_import_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let (data, labels) = mnist_files(dir.path());

    let mut importer = MnistImporter::default();
    importer.set_data_filename(&data);
    importer.set_labels_filename(&labels).unwrap();
    importer.import().unwrap();

    let batch = importer.batch();
    assert_eq!(batch.len(), 5);
    assert_eq!(batch.class_count(), 4);
    let third = batch.get_sample(2).unwrap();
    assert_eq!(*third.label(), 4);
    assert_eq!(third.index(), Some(2));
    assert!((third.data()[[1, 1]] - 100.0 / 255.0).abs() < 1e-6);
}

#[test]
fn test_import_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let (data, labels) = mnist_files(dir.path());

    let load = || {
        let mut importer = MnistImporter::default();
        importer.set_data_filename(&data);
        importer.set_labels_filename(&labels).unwrap();
        importer.import().unwrap();
        importer.into_batch()
    };
    let (a, b) = (load(), load());
    assert_eq!(a.len(), b.len());
    for i in 0..a.len() {
        let (x, y) = (a.get_sample(i).unwrap(), b.get_sample(i).unwrap());
        assert_eq!(x.label(), y.label());
        assert_eq!(x.data(), y.data());
        assert_eq!(x.index(), y.index());
    }
}

#[test]
fn test_reimport_resets_batch() {
    let dir = tempfile::tempdir().unwrap();
    let (data, labels) = mnist_files(dir.path());

    let mut importer = MnistImporter::default();
    importer.set_data_filename(&data);
    importer.set_labels_filename(&labels).unwrap();
    importer.import().unwrap();
    importer.import().unwrap();
    assert_eq!(importer.batch().len(), 5);
}

#[test]
fn test_failed_import_leaves_batch_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (data, _) = mnist_files(dir.path());
    let short_labels = write(dir.path(), "short.idx1", &build_idx1_bytes(&[1, 2]));

    let mut importer = MnistImporter::default();
    importer.set_data_filename(&data);
    importer.set_labels_filename(&short_labels).unwrap();
    let err = importer.import().unwrap_err();
    assert!(matches!(err, Error::CountMismatch { data: 5, labels: 2 }));
    assert!(importer.batch().is_empty());
}

#[test]
fn test_missing_file_is_import_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut importer = RawTextImporter::default();
    importer.set_data_filename(dir.path().join("absent.txt"));
    let err = importer.import().unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert_eq!(err.kind(), ErrorKind::Import);
}

#[test]
fn test_mnist_requires_labels_filename() {
    let dir = tempfile::tempdir().unwrap();
    let (data, _) = mnist_files(dir.path());
    let mut importer = MnistImporter::default();
    importer.set_data_filename(&data);
    assert_eq!(importer.import().unwrap_err().kind(), ErrorKind::Configuration);
}

#[test]
fn test_cifar_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "data_batch_1.bin", &build_cifar_bytes(&[(3, 0), (8, 255)]));

    let mut importer = CifarImporter::default();
    importer.set_data_filename(&path);
    importer.import().unwrap();
    let batch = importer.batch();
    assert_eq!(batch.len(), 2);
    assert_eq!(*batch.get_sample(1).unwrap().label(), 8);
    assert_eq!(batch.get_sample(1).unwrap().data().dim(), (3, 32, 32));
}

#[test]
fn test_raw_text_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "corpus.txt", b"hello");

    let mut importer = RawTextImporter::default();
    importer.set_data_filename(&path);
    importer.set_samples_limit(Some(4));
    importer.import().unwrap();
    let text: String = importer.batch().labels().collect();
    assert_eq!(text, "hell");
    assert_eq!(importer.batch().class_count(), 3);
}

#[test]
fn test_csv_import_into_named_partition() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "iris.csv", b"f0,f1,class\n0.5,1.5,2\n2.5,3.5,0\n");

    let batch = Batch::with_partitions(&["train", "test"], 1).unwrap();
    let mut importer = CsvImporter::with_batch(CsvFormat::default(), batch);
    importer.set_data_filename(&path);
    importer.set_partition("test").unwrap();
    importer.import().unwrap();

    let test = importer.batch().partition("test").unwrap();
    assert_eq!(test.len(), 2);
    assert_eq!(*test.get_sample(0).unwrap().label(), 2);
    assert_eq!(test.get_sample(1).unwrap().data().dim(), (2, 1));
    assert!(importer.batch().partition("train").unwrap().is_empty());
}

// Shared payloads

#[test]
fn test_drawn_samples_share_payloads() {
    let mut batch = numbered_batch(2, 2);
    let first = batch.next_training_batch().unwrap();
    let again = batch.batch_at(&[0]).unwrap();
    assert!(std::sync::Arc::ptr_eq(
        &first[0].shared_data(),
        &again[0].shared_data()
    ));
}

// DataCollector

#[test]
fn test_collector_is_independent_of_batch() {
    let mut batch = numbered_batch(4, 2);
    let mut collector = DataCollector::new();
    for _ in 0..3 {
        for s in batch.next_training_batch().unwrap() {
            collector.observe(*s.label(), *s.data());
        }
    }
    assert_eq!(collector.observations(&0), &[0, 30, 0]);
    assert_eq!(collector.observations(&1), &[10, 10]);
    assert_eq!(collector.observations(&2), &[20]);
    assert_eq!(batch.len(), 4);
}
