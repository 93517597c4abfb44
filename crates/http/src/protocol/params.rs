use std::collections::BTreeMap;

/// Splits a `key=value&key=value` string into a map.
///
/// Nothing is percent-decoded. A segment is split at its first `=`; segments
/// without one, or with an empty key, are silently dropped. A later duplicate key
/// replaces the earlier value.
pub fn split_params(str: &str) -> BTreeMap<String, String> {
    str.split('&')
        .filter_map(|kv| kv.split_once('='))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_separator() {
        let params = split_params("a=1&b=2&");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a").map(String::as_str), Some("1"));
        assert_eq!(params.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_malformed_segment_dropped() {
        assert!(split_params("bad").is_empty());
        assert!(split_params("").is_empty());

        let params = split_params("oauth_token=abc&junk&oauth_token_secret=x=y");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("oauth_token").map(String::as_str), Some("abc"));
        assert_eq!(params.get("oauth_token_secret").map(String::as_str), Some("x=y"));
    }

    #[test]
    fn test_no_percent_decoding() {
        let params = split_params("screen_name=a%20b&=orphan");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("screen_name").map(String::as_str), Some("a%20b"));
    }
}
