use lazy_static::lazy_static;
use object_store::ObjectMeta;
use regex::RegexSet;

use crate::utils::create_regex;

lazy_static! {
    /// Keys that never hold table data: directory markers, `_`-prefixed temporary
    /// or bookkeeping entries, and `$folder$` placeholders.
    static ref IGNORE_PATTERNS: RegexSet = create_regex(RegexSet::new([
        r"^.*/$",
        r"^.*/_",
        r"^.*/[^/]*\$folder\$/?",
    ]));
}

/// A Parquet file holds at least its leading magic and the 8-byte trailer.
pub const MIN_DATA_FILE_SIZE: u64 = 12;

pub fn ignore_key(key: &str) -> bool {
    IGNORE_PATTERNS.is_match(key)
}

/// Listed objects never carry a trailing `/`, so directory markers such as
/// `ds/v1/x=2/` surface as `ds/v1/x=2` and are recognized by their size.
pub fn ignore_object(object: &ObjectMeta) -> bool {
    object.size < MIN_DATA_FILE_SIZE || ignore_key(object.location.as_ref())
}
