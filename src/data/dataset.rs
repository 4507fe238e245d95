use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One scaled image ready for batching.
/// `pixels` is row-major, IMAGE_PIXELS long, every value in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MnistSample {
    pub pixels: Vec<f32>,
    pub label:  usize,
}

pub struct MnistDataset {
    samples: Vec<MnistSample>,
}

impl MnistDataset {
    pub fn new(samples: Vec<MnistSample>) -> Self { Self { samples } }

    pub fn samples(&self) -> &[MnistSample] { &self.samples }
}

impl Dataset<MnistSample> for MnistDataset {
    fn get(&self, index: usize) -> Option<MnistSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: usize) -> MnistSample {
        MnistSample { pixels: vec![0.0; 4], label }
    }

    #[test]
    fn test_get_returns_samples_in_order() {
        let ds = MnistDataset::new((0..5).map(sample).collect());
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.get(2).unwrap().label, 2);
        assert_eq!(ds.samples()[4].label, 4);
    }

    #[test]
    fn test_get_out_of_range() {
        let ds = MnistDataset::new(vec![sample(1)]);
        assert!(ds.get(1).is_none());
    }
}
