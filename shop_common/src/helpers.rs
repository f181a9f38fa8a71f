/// Splits a comma-separated list, dropping empty entries and any entry that does not parse.
pub fn parse_list<T: std::str::FromStr>(value: &str) -> Vec<T> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).filter_map(|s| s.parse::<T>().ok()).collect()
}
