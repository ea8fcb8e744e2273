use std::collections::BTreeSet;

pub const FUZZY_CUTOFF: u8 = 65;

pub fn matches_title(query: &str, title: &str) -> bool {
    let tokens: Vec<Vec<char>> = query
        .split_whitespace()
        .map(|token| lower_chars(token))
        .collect();
    if tokens.is_empty() {
        return false;
    }

    let title_chars: Vec<char> = title.chars().collect();
    let title_lower: Vec<char> = title_chars.iter().map(|c| lower_char(*c)).collect();

    tokens
        .iter()
        .all(|token| matches_at_break(token, &title_chars, &title_lower))
}

fn matches_at_break(token: &[char], title: &[char], title_lower: &[char]) -> bool {
    if token.is_empty() || token.len() > title.len() {
        return false;
    }

    let end = title.len() - token.len();
    (0..=end).any(|i| is_break(title, i) && title_lower[i..i + token.len()] == *token)
}

fn is_break(chars: &[char], index: usize) -> bool {
    if index == 0 {
        return true;
    }
    let current = chars[index];
    let previous = chars[index - 1];
    let next = chars.get(index + 1).copied();

    if !current.is_alphanumeric() {
        return false;
    }
    if !previous.is_alphanumeric() {
        return true;
    }
    if current.is_uppercase() && previous.is_lowercase() {
        return true;
    }
    if current.is_uppercase()
        && previous.is_uppercase()
        && next.is_some_and(|c| c.is_lowercase())
    {
        return true;
    }
    current.is_numeric() != previous.is_numeric()
}

fn lower_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn lower_chars(input: &str) -> Vec<char> {
    input.chars().map(lower_char).collect()
}

pub fn weighted_ratio(left: &str, right: &str) -> u8 {
    let p1 = full_process(left);
    let p2 = full_process(right);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let base = ratio(&p1, &p2) as f64;
    let len1 = p1.chars().count() as f64;
    let len2 = p2.chars().count() as f64;
    let len_ratio = len1.max(len2) / len1.min(len2);

    let unbase_scale = 0.95;
    let best = if len_ratio >= 1.5 {
        let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
        let partial = partial_ratio(&p1, &p2) as f64 * partial_scale;
        let partial_sort = token_sort(&p1, &p2, true) as f64 * unbase_scale * partial_scale;
        let partial_set = token_set(&p1, &p2, true) as f64 * unbase_scale * partial_scale;
        base.max(partial).max(partial_sort).max(partial_set)
    } else {
        let sort = token_sort(&p1, &p2, false) as f64 * unbase_scale;
        let set = token_set(&p1, &p2, false) as f64 * unbase_scale;
        base.max(sort).max(set)
    };

    best.round().clamp(0.0, 100.0) as u8
}

fn full_process(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if c.is_alphanumeric() { lower_char(c) } else { ' ' })
        .collect();
    replaced.trim().to_string()
}

/// Indel similarity: `2 * lcs / (len_left + len_right)`, scaled to `0..=100`.
fn ratio(left: &str, right: &str) -> u8 {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    let lcs = lcs_len(&left, &right);
    let total = (left.len() + right.len()) as f64;
    (200.0 * lcs as f64 / total).round() as u8
}

fn lcs_len(left: &[char], right: &[char]) -> usize {
    let mut row = vec![0usize; right.len() + 1];
    for &l in left {
        let mut diagonal = 0;
        for (j, &r) in right.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if l == r {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[right.len()]
}

fn partial_ratio(left: &str, right: &str) -> u8 {
    let (shorter, longer) = if left.chars().count() <= right.chars().count() {
        (left, right)
    } else {
        (right, left)
    };
    let short_len = shorter.chars().count();
    if short_len == 0 {
        return 0;
    }

    let longer: Vec<char> = longer.chars().collect();
    let mut best = 0;
    for window in longer.windows(short_len) {
        let candidate: String = window.iter().collect();
        let score = ratio(shorter, &candidate);
        if score == 100 {
            return 100;
        }
        best = best.max(score);
    }
    best
}

fn score(left: &str, right: &str, partial: bool) -> u8 {
    if partial {
        partial_ratio(left, right)
    } else {
        ratio(left, right)
    }
}

fn sorted_tokens(input: &str) -> String {
    let mut tokens: Vec<&str> = input.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort(left: &str, right: &str, partial: bool) -> u8 {
    score(&sorted_tokens(left), &sorted_tokens(right), partial)
}

fn token_set(left: &str, right: &str, partial: bool) -> u8 {
    let t1: BTreeSet<&str> = left.split_whitespace().collect();
    let t2: BTreeSet<&str> = right.split_whitespace().collect();

    let intersection: Vec<&str> = t1.intersection(&t2).copied().collect();
    if partial && !intersection.is_empty() {
        return 100;
    }
    let diff_1_2: Vec<&str> = t1.difference(&t2).copied().collect();
    let diff_2_1: Vec<&str> = t2.difference(&t1).copied().collect();

    let sect = intersection.join(" ");
    let combined_1_2 = format!("{sect} {}", diff_1_2.join(" ")).trim().to_string();
    let combined_2_1 = format!("{sect} {}", diff_2_1.join(" ")).trim().to_string();

    [
        score(&sect, &combined_1_2, partial),
        score(&sect, &combined_2_1, partial),
        score(&combined_1_2, &combined_2_1, partial),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}
