pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Formats a byte count the way the queue shows it: base 1024, at most
    /// two decimals, trailing zeros dropped (`1.5 KB`, `2 MB`, `0 Bytes`).
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
        if size == 0 {
            return "0 Bytes".to_string();
        }

        let mut value = size as f64;
        let mut unit_index = 0;
        while value >= 1024.0 && unit_index < UNITS.len() - 1 {
            value /= 1024.0;
            unit_index += 1;
        }

        let rounded = format!("{:.2}", value);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}", trimmed, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::FileSizeUtils;

    #[test]
    fn formats_sizes() {
        assert_eq!(FileSizeUtils::format_size(0), "0 Bytes");
        assert_eq!(FileSizeUtils::format_size(512), "512 Bytes");
        assert_eq!(FileSizeUtils::format_size(1024), "1 KB");
        assert_eq!(FileSizeUtils::format_size(1536), "1.5 KB");
        assert_eq!(FileSizeUtils::format_size(5 * 1024 * 1024 + 10_486), "5.01 MB");
        assert_eq!(FileSizeUtils::format_size(3 * 1024 * 1024 * 1024 * 1024), "3072 GB");
    }
}
