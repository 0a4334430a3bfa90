//! Dataset loading, feature selection, and train/test splitting.
//!
//! A [`DataSet`] is built either from a CSV source (header row names the
//! features, types are inferred from the first data row) or directly from
//! in-memory input/target pairs. CSV-backed sets pick their input columns
//! with [`DataSet::set_input_features`] and are materialized into pairs by
//! [`DataSet::split_with_rng`]; the remaining numeric columns become the
//! targets and text columns are dropped. Training and test membership are
//! index views into one pair list, never copies.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureType {
    Numeric,
    Text,
}

/// One training example.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPair {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

#[derive(Debug, Clone)]
enum Field {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct DataSet {
    feature_names: Vec<String>,
    feature_types: Vec<FeatureType>,
    rows: Vec<Vec<Field>>,
    /// Column indices selected as inputs, in selection order.
    input_features: Vec<usize>,
    pairs: Vec<DataPair>,
    training: Vec<usize>,
    test: Vec<usize>,
    input_dim: usize,
    target_dim: usize,
}

impl DataSet {
    /// Parse a CSV source. The first row is the header; column types are
    /// inferred from the first data row and every later row is validated
    /// against them. Line numbers in errors are 1-based and count the
    /// header.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let feature_names: Vec<String> = csv_reader
            .headers()
            .map_err(|_| Error::InvalidCsvRow { line: 1 })?
            .iter()
            .map(str::to_owned)
            .collect();
        if feature_names.is_empty() {
            return Err(Error::InvalidFeatureCount);
        }

        let mut feature_types: Vec<FeatureType> = Vec::new();
        let mut rows: Vec<Vec<Field>> = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let line = index + 2;
            let record = record.map_err(|_| Error::InvalidCsvRow { line })?;
            if record.len() != feature_names.len() {
                return Err(Error::InconsistentColumnCount {
                    line,
                    expected: feature_names.len(),
                    got: record.len(),
                });
            }

            if feature_types.is_empty() {
                feature_types = record
                    .iter()
                    .map(|cell| match cell.parse::<f64>() {
                        Ok(_) => FeatureType::Numeric,
                        Err(_) => FeatureType::Text,
                    })
                    .collect();
            }

            let mut row = Vec::with_capacity(record.len());
            for (cell, kind) in record.iter().zip(&feature_types) {
                match kind {
                    FeatureType::Numeric => {
                        let value = cell
                            .parse::<f64>()
                            .map_err(|_| Error::InvalidCsvRow { line })?;
                        row.push(Field::Number(value));
                    }
                    FeatureType::Text => row.push(Field::Text(cell.to_owned())),
                }
            }
            rows.push(row);
        }

        Ok(Self {
            feature_names,
            feature_types,
            rows,
            input_features: Vec::new(),
            pairs: Vec::new(),
            training: Vec::new(),
            test: Vec::new(),
            input_dim: 0,
            target_dim: 0,
        })
    }

    /// [`from_csv_reader`](Self::from_csv_reader) over a file on disk.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_csv_reader(File::open(path)?)
    }

    /// Build a dataset directly from input/target pairs.
    ///
    /// All inputs must share one dimension and all targets another; every
    /// pair starts in the training view.
    pub fn from_pairs(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Self> {
        if inputs.is_empty() || inputs.len() != targets.len() {
            return Err(Error::MatrixDimensionMismatch {
                expected: inputs.len(),
                got: targets.len(),
            });
        }
        let input_dim = inputs[0].len();
        let target_dim = targets[0].len();
        if input_dim == 0 || target_dim == 0 {
            return Err(Error::ZeroDimensionMatrix);
        }

        let mut pairs = Vec::with_capacity(inputs.len());
        for (input, target) in inputs.into_iter().zip(targets) {
            if input.len() != input_dim {
                return Err(Error::WrongInputSize {
                    expected: input_dim,
                    got: input.len(),
                });
            }
            if target.len() != target_dim {
                return Err(Error::WrongOutputSize {
                    expected: target_dim,
                    got: target.len(),
                });
            }
            pairs.push(DataPair { input, target });
        }

        let training = (0..pairs.len()).collect();
        Ok(Self {
            feature_names: Vec::new(),
            feature_types: Vec::new(),
            rows: Vec::new(),
            input_features: Vec::new(),
            pairs,
            training,
            test: Vec::new(),
            input_dim,
            target_dim,
        })
    }

    /// Choose which columns feed the network, by header name.
    ///
    /// Fails with `InvalidFeatureCount` when the selection is empty, names
    /// an unknown or non-numeric column, repeats a column, or would leave no
    /// numeric column to act as a target. A dataset with no data rows has no
    /// inferred column types, so every selection is rejected.
    pub fn set_input_features(&mut self, names: &[&str]) -> Result<()> {
        if names.is_empty() {
            return Err(Error::InvalidFeatureCount);
        }
        // Column types only exist once at least one data row has been seen.
        if self.feature_types.len() != self.feature_names.len() {
            return Err(Error::InvalidFeatureCount);
        }

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let index = self
                .feature_names
                .iter()
                .position(|n| n == name)
                .ok_or(Error::InvalidFeatureCount)?;
            if self.feature_types[index] != FeatureType::Numeric {
                return Err(Error::InvalidFeatureCount);
            }
            if selected.contains(&index) {
                return Err(Error::InvalidFeatureCount);
            }
            selected.push(index);
        }

        let has_target = self
            .feature_types
            .iter()
            .enumerate()
            .any(|(i, &t)| t == FeatureType::Numeric && !selected.contains(&i));
        if !has_target {
            return Err(Error::InvalidFeatureCount);
        }

        self.input_features = selected;
        Ok(())
    }

    /// Materialize the rows into pairs and divide them into training and
    /// test views.
    ///
    /// `training_split` is the training fraction, in `(0, 1]`. Each pair is
    /// assigned by a coin flip weighted by the split, bounded by quotas so
    /// the final counts always match `round(split * len)`. Requires
    /// [`set_input_features`](Self::set_input_features) first.
    pub fn split_with_rng<R: Rng + ?Sized>(
        &mut self,
        training_split: f64,
        rng: &mut R,
    ) -> Result<()> {
        if self.input_features.is_empty() {
            return Err(Error::NoInputFeaturesSpecified);
        }
        if !training_split.is_finite() || training_split <= 0.0 || training_split > 1.0 {
            return Err(Error::InvalidTrainingSplit);
        }

        let target_columns: Vec<usize> = self
            .feature_types
            .iter()
            .enumerate()
            .filter(|&(i, &t)| t == FeatureType::Numeric && !self.input_features.contains(&i))
            .map(|(i, _)| i)
            .collect();

        self.pairs = self
            .rows
            .iter()
            .map(|row| DataPair {
                input: self.input_features.iter().map(|&i| numeric(&row[i])).collect(),
                target: target_columns.iter().map(|&i| numeric(&row[i])).collect(),
            })
            .collect();
        self.input_dim = self.input_features.len();
        self.target_dim = target_columns.len();

        let total = self.pairs.len();
        let training_quota = ((training_split * total as f64).round() as usize).min(total);
        self.training = Vec::with_capacity(training_quota);
        self.test = Vec::with_capacity(total - training_quota);
        for index in 0..total {
            let to_training = if self.training.len() == training_quota {
                false
            } else if self.test.len() == total - training_quota {
                true
            } else {
                rng.gen_bool(training_split)
            };
            if to_training {
                self.training.push(index);
            } else {
                self.test.push(index);
            }
        }
        Ok(())
    }

    /// [`split_with_rng`](Self::split_with_rng) with a seeded `StdRng`.
    pub fn split_with_seed(&mut self, training_split: f64, seed: u64) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.split_with_rng(training_split, &mut rng)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub fn training_len(&self) -> usize {
        self.training.len()
    }

    #[inline]
    pub fn test_len(&self) -> usize {
        self.test.len()
    }

    pub fn training_pairs(&self) -> impl Iterator<Item = &DataPair> {
        self.training.iter().map(move |&i| &self.pairs[i])
    }

    pub fn test_pairs(&self) -> impl Iterator<Item = &DataPair> {
        self.test.iter().map(move |&i| &self.pairs[i])
    }

    #[inline]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[inline]
    pub fn feature_types(&self) -> &[FeatureType] {
        &self.feature_types
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[inline]
    pub fn target_dim(&self) -> usize {
        self.target_dim
    }
}

fn numeric(field: &Field) -> f64 {
    match field {
        Field::Number(v) => *v,
        Field::Text(_) => unreachable!("only numeric columns are selected"),
    }
}
