use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::create_regex;

lazy_static! {
    static ref PARTITION_SEGMENT: Regex = create_regex(Regex::new(r"([^=/]+)=[^=/]+"));
}

/// Extracts partition column names from `name=value` segments, in path order.
pub fn partition_fields(path: &str) -> Vec<String> {
    PARTITION_SEGMENT
        .captures_iter(path)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}
