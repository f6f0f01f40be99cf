/// One next-token-prediction example: `y` is `x` shifted left by one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPair {
    pub x: Vec<i64>,
    pub y: Vec<i64>,
}

impl TrainingPair {
    /// Split a window of `block_size + 1` tokens into input and target.
    pub fn from_window(window: &[u32]) -> Self {
        debug_assert!(window.len() >= 2);
        let widen = |ids: &[u32]| -> Vec<i64> { ids.iter().map(|&t| i64::from(t)).collect() };
        Self {
            x: widen(&window[..window.len() - 1]),
            y: widen(&window[1..]),
        }
    }

    /// The block size: length of both `x` and `y`.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Cut `buffer` into consecutive windows of `block_size + 1` tokens and turn
/// each into a pair. A trailing partial window is dropped.
pub fn pack_tokens(buffer: &[u32], block_size: usize) -> impl Iterator<Item = TrainingPair> + '_ {
    buffer
        .chunks_exact(block_size + 1)
        .map(TrainingPair::from_window)
}

/// Number of whole windows in a buffer of `len` tokens.
pub fn window_count(len: usize, block_size: usize) -> usize {
    len / (block_size + 1)
}
