use crate::convert::Conversion;
use crate::statistics::Summary;

use std::path::Path;

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
const SEPARATOR_WIDTH: usize = 50;

/// Human readable byte count with binary (1024) units, capped at GB.
/// Negative values never reach the first division and are printed in bytes.
pub fn format_size(size_bytes: i64) -> String {
    if size_bytes == 0 {
        return String::from("0B");
    }

    let mut size = size_bytes as f64;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.1}{}", size, SIZE_UNITS[unit_index])
}

pub fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

pub fn format_banner(image_count: usize) -> String {
    format!("🏮 WebP Image Optimization Started...\n{}\nFound {} images to optimize...\n", separator(), image_count)
}

pub fn format_conversion(conversion: &Conversion) -> String {
    let file_name = conversion
        .source_path
        .file_name()
        .map(|file_name| file_name.to_string_lossy().into_owned())
        .unwrap_or_else(|| conversion.source_path.display().to_string());

    format!(
        "✅ Converted: {}\n   📊 Size: {} → {}\n   💾 Saved: {} ({:.1}% smaller)\n",
        file_name,
        format_size(conversion.original_size as i64),
        format_size(conversion.new_size as i64),
        format_size(conversion.bytes_saved()),
        conversion.percent_saved()
    )
}

pub fn format_failure(path: &Path, error: &anyhow::Error) -> String {
    format!("❌ Error converting {}: {:#}\n", path.display(), error)
}

pub fn format_skip(path: &Path) -> String {
    format!("⏭️  Skipping (already WebP): {}", path.display())
}

pub fn format_summary(summary: &Summary) -> String {
    format!(
        "{}\n🎉 Optimization Complete!\n📈 Converted: {} images\n💾 Total Space Saved: {}\n\n\
        📝 Next Steps:\n\
        1. Test your website to ensure images display correctly\n\
        2. Update HTML to reference .webp files if needed\n\
        3. Consider removing original PNG/JPG files after testing",
        separator(),
        summary.converted_files,
        format_size(summary.total_bytes_saved)
    )
}
