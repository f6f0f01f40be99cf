pub mod dataset;
pub mod error;
#[cfg(feature = "torch")]
pub mod tensor;
pub mod window;

pub use dataset::{Pairs, PassStats, WindowedPacker};
pub use error::PackError;
#[cfg(feature = "torch")]
pub use tensor::collate;
pub use window::{pack_tokens, TrainingPair};

use serde::{Deserialize, Serialize};

use error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Tokens per training input. Each window holds one more for the shifted target.
    pub block_size: i64,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self { block_size: 1024 }
    }
}

impl PackerConfig {
    pub fn validated_block_size(&self) -> Result<usize> {
        if self.block_size <= 0 {
            return Err(PackError::Configuration(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }
        usize::try_from(self.block_size)
            .map_err(|_| PackError::Configuration(format!("block_size {} is too large", self.block_size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_block_sizes() {
        for block_size in [0, -1, i64::MIN] {
            let err = PackerConfig { block_size }.validated_block_size().unwrap_err();
            assert!(matches!(err, PackError::Configuration(_)));
        }
        assert_eq!(PackerConfig { block_size: 8 }.validated_block_size().unwrap(), 8);
    }

    #[test]
    fn reads_from_yaml() {
        let config: PackerConfig = serde_yaml::from_str("block_size: 256").unwrap();
        assert_eq!(config.block_size, 256);
    }
}
