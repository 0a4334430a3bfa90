//! Training, prediction, and cost evaluation drivers.

use tracing::{debug, info};

use crate::data::{DataPair, DataSet};
use crate::{Error, Matrix, Network, Result};

/// Summary of a finished training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainReport {
    pub epochs: usize,
    /// Average cost over the test view after the final epoch, when the
    /// dataset has one.
    pub final_test_cost: Option<f64>,
}

impl Network {
    /// Run stochastic gradient descent over the dataset's training view for
    /// `epochs` epochs.
    ///
    /// The dataset is dimension-checked against the topology before any
    /// weight is touched. After each epoch, if the dataset has a test view,
    /// its average cost is computed (forward passes only) and logged.
    pub fn train(&mut self, data: &DataSet, epochs: usize) -> Result<TrainReport> {
        if !self.connected {
            return Err(Error::NetworkNotConnected);
        }
        let input_nodes = self.topology[0];
        let output_nodes = *self.topology.last().expect("connected network has layers");
        if data.input_dim() != input_nodes {
            return Err(Error::WrongInputSize {
                expected: input_nodes,
                got: data.input_dim(),
            });
        }
        if data.target_dim() != output_nodes {
            return Err(Error::WrongOutputSize {
                expected: output_nodes,
                got: data.target_dim(),
            });
        }

        let mut final_test_cost = None;
        for epoch in 0..epochs {
            for pair in data.training_pairs() {
                let input = Matrix::column(&pair.input)?;
                let expected = Matrix::column(&pair.target)?;
                self.feed_forward(&input)?;
                self.backprop(&expected)?;
            }

            if data.test_len() > 0 {
                let test_cost = self.evaluate(data.test_pairs())?;
                final_test_cost = Some(test_cost);
                info!(epoch, test_cost, "epoch complete");
            } else {
                debug!(epoch, "epoch complete");
            }
        }
        Ok(TrainReport {
            epochs,
            final_test_cost,
        })
    }

    /// One forward pass; returns an owned copy of the output activations.
    ///
    /// Does not update any weights, so repeated calls with the same input
    /// return bit-identical results.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if !self.connected {
            return Err(Error::NetworkNotConnected);
        }
        if input.len() != self.topology[0] {
            return Err(Error::WrongInputSize {
                expected: self.topology[0],
                got: input.len(),
            });
        }
        let input = Matrix::column(input)?;
        self.feed_forward(&input)?;
        self.output()
            .expect("feed_forward just filled the output layer")
            .to_column_vec()
    }

    /// Average cost over a set of pairs, using forward passes only.
    ///
    /// Returns `0.0` for an empty iterator.
    pub fn evaluate<'a, I>(&mut self, pairs: I) -> Result<f64>
    where
        I: IntoIterator<Item = &'a DataPair>,
    {
        let cost = self.cost;
        let mut total = 0.0;
        let mut count = 0usize;
        for pair in pairs {
            let input = Matrix::column(&pair.input)?;
            let expected = Matrix::column(&pair.target)?;
            self.feed_forward(&input)?;
            let output = self.output().expect("feed_forward just ran");
            total += cost.value(output, &expected)?;
            count += 1;
        }
        if count == 0 {
            Ok(0.0)
        } else {
            Ok(total / count as f64)
        }
    }
}
