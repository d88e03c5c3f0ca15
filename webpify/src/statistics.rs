#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub converted_files: u64,
    pub skipped_files: u64,
    pub failed_files: u64,
    pub total_bytes_saved: i64,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_conversion(&mut self, bytes_saved: i64) {
        self.converted_files += 1;
        self.total_bytes_saved += bytes_saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_conversion_accumulates_signed_savings() {
        let mut summary = Summary::new();

        summary.record_conversion(1000);
        summary.record_conversion(-300);

        assert_eq!(summary.converted_files, 2);
        assert_eq!(summary.total_bytes_saved, 700);
        assert_eq!(summary.failed_files, 0);
        assert_eq!(summary.skipped_files, 0);
    }
}
