//! HTML-aware diffing for side-by-side review and notification rendering.
//!
//! [`html_diff`] annotates two HTML documents with `<del>`/`<ins>` spans for
//! side-by-side human review; [`diff_merge`] renders a single merged view of
//! the tag-stripped texts for outbound notification content. Both are pure
//! functions built on a word-level LCS diff; malformed markup degrades to
//! plain-text tokens instead of failing.

// ---------------------------------------------------------------------------
// Tag stripping
// ---------------------------------------------------------------------------

/// Remove markup tags and collapse whitespace runs to single spaces.
///
/// An unterminated `<` is kept as literal text rather than swallowing the
/// rest of the input.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut pos = 0;
    while pos < html.len() {
        let rest = &html[pos..];
        if let Some(stripped) = rest.strip_prefix('<') {
            match stripped.find('>') {
                Some(end) => {
                    text.push(' ');
                    pos += end + 2;
                }
                None => {
                    text.push('<');
                    pos += 1;
                }
            }
        } else {
            let c = rest.chars().next().unwrap();
            text.push(c);
            pos += c.len_utf8();
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut prev_space = true;
    for c in text.chars() {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out.trim_end().to_string()
}

// ---------------------------------------------------------------------------
// Tokenization
// ---------------------------------------------------------------------------

/// Split markup into atomic diff tokens: tags, whitespace runs, and words.
///
/// Concatenating the tokens reproduces the input exactly, which keeps the
/// annotated outputs faithful to the original text.
fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let c = rest.chars().next().unwrap();

        let len = if c == '<' {
            match rest.find('>') {
                Some(end) => end + 1,
                // Unterminated tag: degrade to a plain word token.
                None => rest
                    .char_indices()
                    .skip(1)
                    .find(|(_, c)| c.is_whitespace())
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len()),
            }
        } else if c.is_whitespace() {
            rest.char_indices()
                .find(|(_, c)| !c.is_whitespace())
                .map(|(i, _)| i)
                .unwrap_or(rest.len())
        } else {
            rest.char_indices()
                .find(|(_, c)| c.is_whitespace() || *c == '<')
                .map(|(i, _)| i)
                .unwrap_or(rest.len())
        };

        tokens.push(&input[pos..pos + len]);
        pos += len;
    }

    tokens
}

// ---------------------------------------------------------------------------
// Token-level diff
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffOpKind {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug)]
struct DiffOp<'a> {
    kind: DiffOpKind,
    token: &'a str,
}

/// Upper bound on the LCS table size. Inputs whose trimmed middles exceed
/// this fall back to a whole-block replacement diff.
const MAX_LCS_CELLS: usize = 4_000_000;

/// Compute a token-level diff between two token sequences using LCS.
///
/// Common prefixes and suffixes are peeled off first so typical edits only
/// pay for the changed region.
fn diff_tokens<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<DiffOp<'a>> {
    let mut prefix = 0;
    while prefix < old.len() && prefix < new.len() && old[prefix] == new[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < old.len() - prefix
        && suffix < new.len() - prefix
        && old[old.len() - 1 - suffix] == new[new.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut ops: Vec<DiffOp<'a>> = old[..prefix]
        .iter()
        .map(|t| DiffOp { kind: DiffOpKind::Unchanged, token: t })
        .collect();

    if old_mid.len().saturating_mul(new_mid.len()) > MAX_LCS_CELLS {
        ops.extend(old_mid.iter().map(|t| DiffOp { kind: DiffOpKind::Removed, token: t }));
        ops.extend(new_mid.iter().map(|t| DiffOp { kind: DiffOpKind::Added, token: t }));
    } else {
        ops.extend(lcs_diff(old_mid, new_mid));
    }

    ops.extend(
        old[old.len() - suffix..]
            .iter()
            .map(|t| DiffOp { kind: DiffOpKind::Unchanged, token: t }),
    );
    ops
}

/// Classic LCS table + backtrack over the trimmed middle sections.
fn lcs_diff<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<DiffOp<'a>> {
    let m = old.len();
    let n = new.len();

    let mut lcs = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            if old[i - 1] == new[j - 1] {
                lcs[i][j] = lcs[i - 1][j - 1] + 1;
            } else {
                lcs[i][j] = lcs[i - 1][j].max(lcs[i][j - 1]);
            }
        }
    }

    let mut result = Vec::new();
    let mut i = m;
    let mut j = n;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            result.push(DiffOp { kind: DiffOpKind::Unchanged, token: old[i - 1] });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            result.push(DiffOp { kind: DiffOpKind::Added, token: new[j - 1] });
            j -= 1;
        } else {
            result.push(DiffOp { kind: DiffOpKind::Removed, token: old[i - 1] });
            i -= 1;
        }
    }

    result.reverse();
    result
}

// ---------------------------------------------------------------------------
// Annotated rendering
// ---------------------------------------------------------------------------

fn is_blank(token: &str) -> bool {
    token.chars().all(char::is_whitespace)
}

/// Append a changed run to `out` wrapped in the given tag.
///
/// Whitespace tokens at the run's edges (and whitespace-only runs) are
/// emitted unwrapped; annotating bare whitespace only adds noise to the
/// review view.
fn push_wrapped(run: &[&str], wrap: &str, out: &mut String) {
    let start = run.iter().take_while(|t| is_blank(t)).count();
    let end = run.len() - run[start..].iter().rev().take_while(|t| is_blank(t)).count();

    for t in &run[..start] {
        out.push_str(t);
    }
    if start < end {
        out.push('<');
        out.push_str(wrap);
        out.push('>');
        for t in &run[start..end] {
            out.push_str(t);
        }
        out.push_str("</");
        out.push_str(wrap);
        out.push('>');
    }
    for t in &run[end..] {
        out.push_str(t);
    }
}

/// Render one side of the diff, wrapping changed runs in the given tag.
fn render_side(ops: &[DiffOp<'_>], keep: DiffOpKind, wrap: &str) -> String {
    let mut out = String::new();
    let mut run: Vec<&str> = Vec::new();

    let flush = |run: &mut Vec<&str>, out: &mut String| {
        if run.is_empty() {
            return;
        }
        push_wrapped(run, wrap, out);
        run.clear();
    };

    for op in ops {
        match op.kind {
            DiffOpKind::Unchanged => {
                flush(&mut run, &mut out);
                out.push_str(op.token);
            }
            kind if kind == keep => run.push(op.token),
            _ => {}
        }
    }
    flush(&mut run, &mut out);
    out
}

/// Diff two HTML documents for side-by-side review.
///
/// Returns `(left_annotated, right_annotated)`: the left input with removed
/// runs wrapped in `<del>`, the right input with inserted runs wrapped in
/// `<ins>`. Identical inputs come back without any annotation.
pub fn html_diff(left: &str, right: &str) -> (String, String) {
    let left_tokens = tokenize(left);
    let right_tokens = tokenize(right);
    let ops = diff_tokens(&left_tokens, &right_tokens);

    let annotated_left = render_side(&ops, DiffOpKind::Removed, "del");
    let annotated_right = render_side(&ops, DiffOpKind::Added, "ins");
    (annotated_left, annotated_right)
}

/// Render a single merged view of two texts with changes highlighted.
///
/// Both inputs are tag-stripped first; removed regions appear in `<del>`,
/// inserted regions in `<ins>`. Used as the body of moderator notifications.
pub fn diff_merge(a: &str, b: &str) -> String {
    let a = strip_tags(a);
    let b = strip_tags(b);
    let a_tokens = tokenize(&a);
    let b_tokens = tokenize(&b);
    let ops = diff_tokens(&a_tokens, &b_tokens);

    let mut out = String::new();
    let mut removed: Vec<&str> = Vec::new();
    let mut added: Vec<&str> = Vec::new();

    let flush = |removed: &mut Vec<&str>, added: &mut Vec<&str>, out: &mut String| {
        if !removed.is_empty() {
            push_wrapped(removed, "del", out);
            removed.clear();
        }
        if !added.is_empty() {
            push_wrapped(added, "ins", out);
            added.clear();
        }
    };

    for op in &ops {
        match op.kind {
            DiffOpKind::Unchanged => {
                flush(&mut removed, &mut added, &mut out);
                out.push_str(op.token);
            }
            DiffOpKind::Removed => removed.push(op.token),
            DiffOpKind::Added => added.push(op.token),
        }
    }
    flush(&mut removed, &mut added, &mut out);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- strip_tags ----------------------------------------------------------

    #[test]
    fn strip_tags_removes_markup() {
        assert_eq!(strip_tags("<p>hello <b>world</b></p>"), "hello world");
    }

    #[test]
    fn strip_tags_collapses_whitespace() {
        assert_eq!(strip_tags("a\n\n  b\t c"), "a b c");
    }

    #[test]
    fn strip_tags_keeps_unterminated_angle_bracket() {
        assert_eq!(strip_tags("a < b"), "a < b");
    }

    #[test]
    fn strip_tags_plain_text_passthrough() {
        assert_eq!(strip_tags("no markup here"), "no markup here");
    }

    // -- tokenize ------------------------------------------------------------

    #[test]
    fn tokens_reconstruct_input_exactly() {
        let input = "<p>hello   <b>big</b> world</p>\n";
        let rebuilt: String = tokenize(input).concat();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn malformed_tag_degrades_to_word_token() {
        let input = "a <unclosed and more";
        let rebuilt: String = tokenize(input).concat();
        assert_eq!(rebuilt, input);
    }

    // -- html_diff -----------------------------------------------------------

    #[test]
    fn identical_inputs_have_no_annotations() {
        let html = "<p>same content on both sides</p>";
        let (left, right) = html_diff(html, html);
        assert_eq!(left, html);
        assert_eq!(right, html);
    }

    #[test]
    fn insertion_marked_on_right_only() {
        let (left, right) = html_diff("<p>hello</p>", "<p>hello world</p>");
        assert!(!left.contains("<ins>"));
        assert!(right.contains("<ins>world</ins>"), "right was: {right}");
    }

    #[test]
    fn removal_marked_on_left_only() {
        let (left, right) = html_diff("<p>hello old world</p>", "<p>hello world</p>");
        assert!(left.contains("<del>old</del>"), "left was: {left}");
        assert!(!right.contains("<del>"));
    }

    #[test]
    fn replacement_marked_on_both_sides() {
        let (left, right) = html_diff("one red apple", "one green apple");
        assert!(left.contains("<del>red</del>"));
        assert!(right.contains("<ins>green</ins>"));
    }

    #[test]
    fn malformed_html_still_diffs() {
        let (left, right) = html_diff("a <broken", "a <broken plus");
        assert_eq!(left, "a <broken");
        assert!(right.contains("<ins>plus</ins>"));
    }

    // -- diff_merge ----------------------------------------------------------

    #[test]
    fn merge_of_identical_texts_is_clean() {
        let merged = diff_merge("<p>same</p>", "<p>same</p>");
        assert_eq!(merged, "same");
    }

    #[test]
    fn merge_highlights_insertion() {
        let merged = diff_merge("Hello", "Hello world");
        assert!(merged.contains("<ins>world</ins>"), "merged was: {merged}");
    }

    #[test]
    fn merge_highlights_replacement() {
        let merged = diff_merge("the old text", "the new text");
        assert!(merged.contains("<del>old</del>"));
        assert!(merged.contains("<ins>new</ins>"));
    }

    #[test]
    fn merge_strips_markup_before_diffing() {
        let merged = diff_merge("<p>alpha</p>", "<div>alpha</div>");
        assert_eq!(merged, "alpha");
    }
}
