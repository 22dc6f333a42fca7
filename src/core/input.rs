//! Input list handling
//!
//! Arguments and environment inputs may carry several values separated by
//! commas or newlines, as CI systems tend to pass them.

/// Split every value on commas and newlines, trimming and dropping empties
pub fn split_values<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .flat_map(|value| {
            value
                .as_ref()
                .split(['\n', ','])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
