//! Text navigation helpers over a block's characters.

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Find word boundary backward from cursor.
pub fn find_word_boundary_backward(chars: &[char], cursor: usize) -> usize {
    let mut pos = cursor.min(chars.len());

    // Skip any whitespace/punctuation immediately before cursor.
    while pos > 0 && !is_word_char(chars[pos - 1]) {
        pos -= 1;
    }

    // Skip the word characters.
    while pos > 0 && is_word_char(chars[pos - 1]) {
        pos -= 1;
    }

    pos
}

/// Find word boundary forward from cursor.
pub fn find_word_boundary_forward(chars: &[char], cursor: usize) -> usize {
    let len = chars.len();
    let mut pos = cursor.min(len);

    // Skip word characters first.
    while pos < len && is_word_char(chars[pos]) {
        pos += 1;
    }

    // Then skip whitespace/punctuation.
    while pos < len && !is_word_char(chars[pos]) {
        pos += 1;
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_find_word_boundary_backward() {
        let text = chars("hello world test");

        assert_eq!(find_word_boundary_backward(&text, 16), 12); // from end
        assert_eq!(find_word_boundary_backward(&text, 12), 6); // from "test"
        assert_eq!(find_word_boundary_backward(&text, 11), 6); // from space before "test"
        assert_eq!(find_word_boundary_backward(&text, 5), 0); // from end of "hello"
        assert_eq!(find_word_boundary_backward(&text, 0), 0);
    }

    #[test]
    fn test_find_word_boundary_forward() {
        let text = chars("hello world test");

        assert_eq!(find_word_boundary_forward(&text, 0), 6); // from start
        assert_eq!(find_word_boundary_forward(&text, 6), 12); // from "world"
        assert_eq!(find_word_boundary_forward(&text, 12), 16); // from "test"
        assert_eq!(find_word_boundary_forward(&text, 99), 16);
    }
}
