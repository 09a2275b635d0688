/// `R$ 1,234.56`, with a leading minus for negative amounts.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("R$ {amount}");
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {whole}.{:02}", cents % 100)
}

/// Ratio rendered as a percentage with one decimal (`0.95` → `95.0%`).
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

pub fn format_multiple(multiple: f64) -> String {
    format!("{multiple:.2} salários")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
