//! Token-sequence similarity between two normalized text blobs.

/// Similarity of two normalized blobs in `[0, 1]`.
///
/// Both inputs are split on whitespace and compared as word sequences. The
/// score is the longest common subsequence divided by the size of the token
/// union it implies: `lcs / (|a| + |b| - lcs)`. Identical sequences score
/// 1.0, sequences with no tokens in common score 0.0, and every edit to
/// either side can only lower the score. The measure is symmetric and
/// sensitive to order, so pages shuffled relative to each other score lower
/// than the same pages in place.
///
/// Two empty inputs have no evidence of disagreement and score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    paged_similarity([(a, b)])
}

/// Same measure as [`similarity`], aligned page by page: each page pair
/// contributes its own LCS and token counts, and the sums form one score.
///
/// Alignment cost is quadratic in the tokens of a single page rather than
/// of the whole document. Text that moved across a page boundary counts as
/// a mismatch.
pub fn paged_similarity<'a, I>(pages: I) -> f64
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut common = 0usize;
    let mut total = 0usize;

    for (a, b) in pages {
        let left: Vec<&str> = a.split_whitespace().collect();
        let right: Vec<&str> = b.split_whitespace().collect();
        common += lcs_len(&left, &right);
        total += left.len() + right.len();
    }

    if total == 0 {
        return 1.0;
    }

    common as f64 / (total - common) as f64
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn lcs_len(a: &[&str], b: &[&str]) -> usize {
    // Keep the shorter sequence on the inner axis.
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut prev = vec![0usize; inner.len() + 1];
    let mut curr = vec![0usize; inner.len() + 1];

    for token in outer {
        for (j, other) in inner.iter().enumerate() {
            curr[j + 1] = if token == other {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[inner.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_scores_one() {
        assert_eq!(similarity("invoice 221 total 500", "invoice 221 total 500"), 1.0);
    }

    #[test]
    fn test_disjoint_text_scores_zero() {
        assert_eq!(similarity("alpha beta gamma", "one two three"), 0.0);
    }

    #[test]
    fn test_both_empty_scores_one() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("   ", ""), 1.0);
    }

    #[test]
    fn test_one_side_empty_scores_zero() {
        assert_eq!(similarity("", "some text"), 0.0);
        assert_eq!(similarity("some text", ""), 0.0);
    }

    #[test]
    fn test_altered_amount_scores_below_half() {
        // "Total: $500.00" vs "Total: $5,000.00" after normalization.
        let score = similarity("total 50000", "total 500000");
        assert!((score - 1.0 / 3.0).abs() < 1e-9, "score = {}", score);
        assert!(score < 0.5);
    }

    #[test]
    fn test_partial_overlap_is_proportional() {
        let score = similarity("a b c d", "a b x y");
        // lcs 2, union 6
        assert!((score - 2.0 / 6.0).abs() < 1e-9);

        let closer = similarity("a b c d", "a b c y");
        assert!(closer > score);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("the quick brown fox", "the quick red fox jumps"),
            ("a b c", "c b a"),
            ("one", "one two three four"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn test_reordering_lowers_score() {
        let in_order = similarity("page one text page two text", "page one text page two text");
        let swapped = similarity("page one text page two text", "page two text page one text");
        assert!(swapped < in_order);
    }

    #[test]
    fn test_monotone_under_growing_divergence() {
        let embedded: Vec<String> = (0..20).map(|i| format!("word{}", i)).collect();
        let embedded_blob = embedded.join(" ");

        let mut ocr = embedded.clone();
        let mut last = similarity(&embedded_blob, &ocr.join(" "));
        assert_eq!(last, 1.0);

        for i in 0..ocr.len() {
            ocr[i] = format!("noise{}", i);
            let score = similarity(&embedded_blob, &ocr.join(" "));
            assert!(score <= last, "step {}: {} > {}", i, score, last);
            last = score;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_deterministic() {
        let a = "lorem ipsum dolor sit amet consectetur";
        let b = "lorem ipsom dolor sit amet consectetur adipiscing";
        assert_eq!(similarity(a, b), similarity(a, b));
    }

    #[test]
    fn test_paged_sums_per_page_alignment() {
        // lcs 2 + 1, tokens 4 + 3
        let score = paged_similarity([("total 500", "total 500"), ("due today", "due")]);
        assert!((score - 3.0 / 4.0).abs() < 1e-9, "score = {}", score);

        assert_eq!(paged_similarity([("", ""), ("", "")]), 1.0);
        assert_eq!(paged_similarity([("text", ""), ("", "")]), 0.0);
    }

    #[test]
    fn test_paged_matches_single_blob_for_one_page() {
        let a = "the quick brown fox";
        let b = "the quick red fox jumps";
        assert_eq!(paged_similarity([(a, b)]), similarity(a, b));
    }

    #[test]
    fn test_paged_large_document_stays_per_page() {
        let page: String = (0..300).map(|i| format!("w{} ", i)).collect();
        let pages: Vec<(&str, &str)> = (0..200).map(|_| (page.as_str(), page.as_str())).collect();

        assert_eq!(paged_similarity(pages), 1.0);
    }

    #[test]
    fn test_lcs_len() {
        assert_eq!(lcs_len(&["a", "b", "c"], &["a", "c"]), 2);
        assert_eq!(lcs_len(&["a"], &[]), 0);
        assert_eq!(lcs_len(&["x", "a", "y", "b"], &["a", "b", "z"]), 2);
    }
}
