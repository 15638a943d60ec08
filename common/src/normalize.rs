//! 名前の正規化
//!
//! 両カタログに同一の変換を適用し、言語をまたいだ比較を可能にする。
//!
//! ## 処理順
//! 1. 小文字化
//! 2. アクセント記号の除去（固定テーブル）
//! 3. 括弧とその中身の削除
//! 4. 句読点 `, / : ; . -` を空白に置換
//! 5. 連続空白の圧縮・前後空白の除去

use regex::Regex;

lazy_static::lazy_static! {
    static ref PARENTHESIZED_RE: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref PUNCTUATION_RE: Regex = Regex::new(r"[,/:;.\-]").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// アクセント付き文字を基本文字に置換する（小文字のみ対象）
fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ã' | 'â' | 'ä' => 'a',
        'é' | 'ê' | 'è' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ô' | 'õ' | 'ò' | 'ö' => 'o',
        'ú' | 'ü' | 'ù' | 'û' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

/// 名前を正規化する
///
/// 空文字列は空文字列を返す。冪等: `normalize(&normalize(s)) == normalize(s)`
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lowered: String = text.to_lowercase().chars().map(strip_diacritic).collect();
    let without_parens = PARENTHESIZED_RE.replace_all(&lowered, "");
    let spaced = PUNCTUATION_RE.replace_all(&without_parens, " ");
    let collapsed = WHITESPACE_RE.replace_all(&spaced, " ");

    collapsed.trim().to_string()
}

/// 最初のカンマより前の主名を正規化する
pub fn normalize_primary(name: &str) -> String {
    normalize(name.split(',').next().unwrap_or(""))
}

/// 正規化済みの名前を単語に分割する
pub fn keywords(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}
