pub(crate) fn create_regex<T>(regex: Result<T, regex::Error>) -> T {
    #[allow(clippy::unwrap_used)]
    regex.unwrap()
}
