use tch::{Device, Tensor};

use crate::error::{PackError, Result};
use crate::window::TrainingPair;

impl TrainingPair {
    /// `[block_size]` Int64 tensors for input and target.
    pub fn to_tensors(&self, device: Device) -> (Tensor, Tensor) {
        (
            Tensor::from_slice(&self.x).to(device),
            Tensor::from_slice(&self.y).to(device),
        )
    }
}

/// Stack pairs into `[batch, block_size]` input and target tensors.
pub fn collate(pairs: &[TrainingPair], device: Device) -> Result<(Tensor, Tensor)> {
    let Some(first) = pairs.first() else {
        return Err(PackError::Configuration("cannot collate an empty batch".to_string()));
    };
    let block_size = first.len();
    if let Some(odd) = pairs.iter().find(|p| p.len() != block_size) {
        return Err(PackError::Configuration(format!(
            "mixed block sizes in one batch: {} and {}",
            block_size,
            odd.len()
        )));
    }

    let mut inputs = Vec::with_capacity(pairs.len() * block_size);
    let mut targets = Vec::with_capacity(pairs.len() * block_size);
    for pair in pairs {
        inputs.extend_from_slice(&pair.x);
        targets.extend_from_slice(&pair.y);
    }

    let shape = [pairs.len() as i64, block_size as i64];
    let input_tensor = Tensor::from_slice(&inputs).view(shape).to(device);
    let target_tensor = Tensor::from_slice(&targets).view(shape).to(device);
    Ok((input_tensor, target_tensor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::pack_tokens;
    use tch::Kind;

    #[test]
    fn pair_tensors_are_int64_vectors() {
        let pair = TrainingPair::from_window(&[1, 2, 3]);
        let (x, y) = pair.to_tensors(Device::Cpu);
        assert_eq!(x.kind(), Kind::Int64);
        assert_eq!(x.size(), vec![2]);
        assert_eq!(Vec::<i64>::try_from(&y).unwrap(), vec![2, 3]);
    }

    #[test]
    fn collate_stacks_rows_in_order() {
        let buffer: Vec<u32> = (0..8).collect();
        let pairs: Vec<_> = pack_tokens(&buffer, 3).collect();
        let (x, y) = collate(&pairs, Device::Cpu).unwrap();
        assert_eq!(x.size(), vec![2, 3]);
        assert_eq!(x.int64_value(&[1, 0]), 4);
        assert_eq!(y.int64_value(&[1, 2]), 7);
    }

    #[test]
    fn collate_rejects_empty_and_ragged_batches() {
        assert!(collate(&[], Device::Cpu).is_err());
        let ragged = [
            TrainingPair::from_window(&[1, 2, 3]),
            TrainingPair::from_window(&[1, 2]),
        ];
        assert!(collate(&ragged, Device::Cpu).is_err());
    }
}
