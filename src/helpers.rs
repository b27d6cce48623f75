const MASKED_ENDPOINT_LENGTH: usize = 50;

/// Shortens an endpoint for display so listings do not leak full push URLs.
pub fn mask_endpoint(endpoint: &str) -> String {
    let mut masked: String =
        endpoint.chars().take(MASKED_ENDPOINT_LENGTH).collect();
    masked.push_str("...");
    masked
}

pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}
