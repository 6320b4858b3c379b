//! @ai:module:intent Strip markdown code fences from chat completions
//! @ai:module:layer application
//! @ai:module:public_api strip_code_fences
//! @ai:module:stateless true

use regex::Regex;
use std::sync::OnceLock;

fn code_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ```lang\n ... ``` with an optional language tag (rust, c++, objective-c, ...)
    RE.get_or_init(|| Regex::new(r"```[\w+#.-]*[ \t]*\r?\n([\s\S]*?)```").unwrap())
}

/// Whole reply wrapped in one fence; the body may itself contain fences.
fn wrapped_reply_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A```[\w+#.-]*[ \t]*\r?\n([\s\S]*)```\z").unwrap())
}

/// @ai:intent Return the code inside a fenced block, or the trimmed text when there is none
///
/// A reply that starts with a fence and ends with one yields everything
/// between the outer pair, nested fences included. A reply with prose around
/// one or more blocks yields the first block's body.
/// @ai:effects pure
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();

    let captures = wrapped_reply_regex()
        .captures(trimmed)
        .or_else(|| code_block_regex().captures(trimmed));

    match captures {
        Some(cap) => cap
            .get(1)
            .map(|m| m.as_str().trim_end().to_string())
            .unwrap_or_default(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_language_fence() {
        let reply = "```python\ndef add(a, b):\n    return a + b\n```";
        assert_eq!(strip_code_fences(reply), "def add(a, b):\n    return a + b");
    }

    #[test]
    fn test_strips_bare_fence() {
        let reply = "\n```\nfn main() {}\n```\n";
        assert_eq!(strip_code_fences(reply), "fn main() {}");
    }

    #[test]
    fn test_first_block_wins_over_prose() {
        let reply = r#"Here you go:

```rust
fn first() {}
```

And a test:

```rust
fn second() {}
```
"#;
        assert_eq!(strip_code_fences(reply), "fn first() {}");
    }

    #[test]
    fn test_nested_fence_keeps_inner_block() {
        let reply = "```markdown\nuse ```rust\nfn a(){}\n```\n```";
        assert_eq!(strip_code_fences(reply), "use ```rust\nfn a(){}\n```");
    }

    #[test]
    fn test_wrapped_markdown_reply_keeps_inner_fences() {
        let reply = "```md\n# Usage\n\n```sh\ncargo run\n```\n```\n";
        assert_eq!(strip_code_fences(reply), "# Usage\n\n```sh\ncargo run\n```");
    }

    #[test]
    fn test_plain_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("  42\n"), "42");
    }

    #[test]
    fn test_unterminated_fence_left_alone() {
        let reply = "```python\nprint(1)";
        assert_eq!(strip_code_fences(reply), reply);
    }
}
