//! Import → draw → encode, wired together.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use mimic_core::{Matrix, Result, SdrScalar};
use mimic_data::{Batch, DatasetFormat, FormatImporter, Importer, Sample};
use mimic_encoders::{Encoder, MatrixSdrEncoder};

use crate::config::PipelineConfig;

/// Drawn samples together with their SDRs.
#[derive(Debug, Clone)]
pub struct EncodedBatch<D, L, S> {
    /// One SDR per column, in draw order.
    pub sdrs: Matrix<S>,
    pub samples: Vec<Sample<D, L>>,
}

impl<D, L, S> EncodedBatch<D, L, S> {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &L> + '_ {
        self.samples.iter().map(|s| s.label())
    }
}

/// An importer, an encoder for its sample data and a seeded random source.
///
/// Random draws are reproducible: the same seed and the same sequence of
/// calls give the same batches.
pub struct Pipeline<I, E> {
    importer: I,
    encoder: E,
    seed: u64,
    rng: StdRng,
}

impl<I, E> Pipeline<I, E> {
    pub fn new(importer: I, encoder: E, seed: u64) -> Self {
        Self {
            importer,
            encoder,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn importer(&self) -> &I {
        &self.importer
    }

    pub fn importer_mut(&mut self) -> &mut I {
        &mut self.importer
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn encoder_mut(&mut self) -> &mut E {
        &mut self.encoder
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the random source from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl<F: DatasetFormat, E> Pipeline<FormatImporter<F>, E> {
    /// Build the importer described by `config` around `format`.
    pub fn from_config(config: &PipelineConfig, format: F, encoder: E) -> Result<Self> {
        config.validate()?;
        let importer = config.importer.build(format)?;
        Ok(Self::new(importer, encoder, config.seed))
    }
}

impl<I, E, S> Pipeline<I, E>
where
    I: Importer,
    E: Encoder<Input = I::Data, Output = Matrix<S>> + MatrixSdrEncoder<S>,
    S: SdrScalar,
{
    pub fn batch(&self) -> &Batch<I::Data, I::Label> {
        self.importer.batch()
    }

    /// Run the importer and return the number of imported samples.
    pub fn import(&mut self) -> Result<usize> {
        self.importer.import()?;
        let count = self.importer.batch().total_len();
        info!(
            samples = count,
            encoder = self.encoder.name(),
            sdr_length = self.encoder.sdr_length(),
            "pipeline ready"
        );
        Ok(count)
    }

    /// Next sequential batch of the default partition, encoded.
    pub fn next_encoded_batch(&mut self) -> Result<EncodedBatch<I::Data, I::Label, S>> {
        let samples = self.importer.batch_mut().next_training_batch()?;
        self.encode(samples)
    }

    /// Next sequential batch of the named partition, encoded.
    pub fn next_encoded_batch_in(
        &mut self,
        partition: &str,
    ) -> Result<EncodedBatch<I::Data, I::Label, S>> {
        let samples = self
            .importer
            .batch_mut()
            .partition_mut(partition)?
            .next_training_batch()?;
        self.encode(samples)
    }

    /// Random batch (with replacement) of the default partition, encoded.
    pub fn random_encoded_batch(&mut self) -> Result<EncodedBatch<I::Data, I::Label, S>> {
        let samples = self.importer.batch().random_batch(&mut self.rng)?;
        self.encode(samples)
    }

    /// Random batch (with replacement) of the named partition, encoded.
    pub fn random_encoded_batch_in(
        &mut self,
        partition: &str,
    ) -> Result<EncodedBatch<I::Data, I::Label, S>> {
        let samples = self
            .importer
            .batch()
            .partition(partition)?
            .random_batch(&mut self.rng)?;
        self.encode(samples)
    }

    /// Encode already drawn samples, one SDR column each.
    pub fn encode_samples(&self, samples: &[Sample<I::Data, I::Label>]) -> Result<Matrix<S>> {
        let data: Vec<&I::Data> = samples.iter().map(Sample::data).collect();
        self.encoder.encode_batch(&data)
    }

    fn encode(
        &self,
        samples: Vec<Sample<I::Data, I::Label>>,
    ) -> Result<EncodedBatch<I::Data, I::Label, S>> {
        let sdrs = self.encode_samples(&samples)?;
        debug!(samples = samples.len(), "encoded draw");
        Ok(EncodedBatch { sdrs, samples })
    }
}
