use crate::readers::BATCH_SIZE;

#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub delimiter: u8,
    pub has_header: bool,
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            batch_size: BATCH_SIZE,
        }
    }
}
