//! 文字列類似度（Ratcliff/Obershelp）
//!
//! 最長共通ブロックを取り、その左右を再帰的に照合して一致文字数 M を数える。
//! 類似度は `2M / (|a| + |b|)`。

use std::collections::HashMap;

/// 類似度を計算（0.0〜1.0）
///
/// どちらかが空なら 0.0（空の名前はどの閾値も超えない）
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let matches = matching_characters(&a_chars, &b_chars);

    2.0 * matches as f64 / (a_chars.len() + b_chars.len()) as f64
}

/// 一致ブロックの合計文字数
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b_positions.entry(c).or_default().push(j);
    }

    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &b_positions, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        total += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    total
}

/// 範囲内の最長共通ブロック `(aの開始, bの開始, 長さ)`
///
/// 同じ長さなら a で先に現れるもの、次に b で先に現れるものを返す
fn longest_match(
    a: &[char],
    b_positions: &HashMap<char, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);
    // 直前の i で b[j] に終わる一致長
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let mut next_lengths = HashMap::new();
        if let Some(positions) = b_positions.get(c) {
            for &j in positions {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let previous = match j.checked_sub(1) {
                    Some(prev_j) => run_lengths.get(&prev_j).copied().unwrap_or(0),
                    None => 0,
                };
                let size = previous + 1;
                next_lengths.insert(j, size);
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }
        run_lengths = next_lengths;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_identical() {
        assert!(approx(ratio("alho", "alho"), 1.0));
    }

    #[test]
    fn test_ratio_empty() {
        assert!(approx(ratio("", ""), 0.0));
        assert!(approx(ratio("alho", ""), 0.0));
        assert!(approx(ratio("", "alho"), 0.0));
    }

    #[test]
    fn test_ratio_known_values() {
        // "bcd" が一致: 2*3/8
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        // "itt" + "n": 2*4/13
        assert!(approx(ratio("kitten", "sitting"), 8.0 / 13.0));
        // "tomat": 2*5/12
        assert!(approx(ratio("tomate", "tomato"), 10.0 / 12.0));
        assert!(approx(ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_ratio_recurses_both_sides() {
        // 最長ブロック "cd" の左に "a"、右に "f" が一致
        assert!(approx(ratio("abcdxf", "aycdzf"), 2.0 * 4.0 / 12.0));
    }

    #[test]
    fn test_ratio_unicode() {
        assert!(approx(ratio("maçã", "maçã"), 1.0));
        assert!(approx(ratio("maçã", "maca"), 2.0 * 2.0 / 8.0));
    }

    #[test]
    fn test_ratio_symmetric_on_names() {
        let pairs = [
            ("cebola", "cebolada"),
            ("espargo", "espargos verdes"),
            ("alperce", "pessego"),
        ];
        for (a, b) in pairs {
            assert!(approx(ratio(a, b), ratio(b, a)), "{} / {}", a, b);
        }
    }

    #[test]
    fn test_ratio_range() {
        let value = ratio("beringela", "berinjela");
        assert!(value > 0.0 && value < 1.0);
    }
}
