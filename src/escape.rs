use regex::Regex;

/// Escape text for embedding inside an ffmpeg drawtext filter.
///
/// Two sequential passes: the first handles the filter-option level
/// (`\`, `'`, `:`), the second the filtergraph level (`\`, `'`, `[`,
/// `]`, `=`, `;`, `,`). Pass two runs on the output of pass one, so a
/// backslash introduced by pass one is doubled again.
// TODO BUG a backslash in the original caption won't end up in the video
pub fn escape_for_filtergraph(input: &str) -> String {
    let option_level = Regex::new(r"([\\':])").unwrap();
    let graph_level = Regex::new(r"([\\'\[\]=;,])").unwrap();
    let first = option_level.replace_all(input, r"\$1");
    graph_level.replace_all(&first, r"\$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_for_filtergraph("Dog barking 1"), "Dog barking 1");
    }

    #[test]
    fn colon_escape_is_doubled_by_the_second_pass() {
        assert_eq!(escape_for_filtergraph("time: noon"), r"time\\: noon");
    }

    #[test]
    fn graph_level_characters_get_a_single_backslash() {
        assert_eq!(escape_for_filtergraph("[x]"), r"\[x\]");
        assert_eq!(escape_for_filtergraph("a=b;c,d"), r"a\=b\;c\,d");
    }

    #[test]
    fn quote_is_matched_by_both_passes() {
        assert_eq!(escape_for_filtergraph("it's"), r"it\\\'s");
    }

    #[test]
    fn backslash_does_not_round_trip() {
        // Pass one doubles the backslash, pass two doubles both copies.
        assert_eq!(escape_for_filtergraph(r"\"), r"\\\\");
    }
}
