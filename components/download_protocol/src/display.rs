// components/download_protocol/src/display.rs

/// Render a view count with `,` thousands separators; zero means unknown.
pub fn format_view_count(count: u64) -> String {
    if count == 0 {
        return "Unknown".to_string();
    }

    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
