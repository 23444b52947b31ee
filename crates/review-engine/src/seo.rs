//! SEO scorer: structural on-page heuristics for a (title, body, keyword)
//! triple.
//!
//! Sub-scores are fixed step functions of measured values; the measured
//! values themselves are exposed in [`SeoDetails`] so callers can assert
//! on them directly. Weighting: title 30%, keyword density 30%, first
//! paragraph 20%, subheadings 20%.

use shared_types::{ComponentDetails, ReviewError, ScoreComponent, SeoDetails};

use crate::html::{count_subheadings, html_to_text};
use crate::textutil::{avg_sentence_chars, validate_input};

/// Ideal title length band, in characters.
const TITLE_IDEAL_MIN: usize = 20;
const TITLE_IDEAL_MAX: usize = 40;

/// Keyword density band, percent of body characters covered by keyword
/// occurrences. Below is thin, above is stuffing.
const DENSITY_IDEAL_MIN: f64 = 0.5;
const DENSITY_IDEAL_MAX: f64 = 3.0;

/// The keyword should appear within this many characters of the body start.
const FIRST_PARAGRAPH_CHARS: usize = 150;

/// Sub-scores below this threshold produce a suggestion.
const SUGGESTION_THRESHOLD: u8 = 70;

/// Score a title/body/keyword triple. The body may be HTML; it is stripped
/// before text measurements.
pub fn score(title: &str, body_html: &str, keyword: &str) -> Result<ScoreComponent, ReviewError> {
    validate_input(body_html)?;
    if keyword.trim().is_empty() {
        return Err(ReviewError::invalid_input("target keyword is empty"));
    }

    let body_text = html_to_text(body_html);
    let body_chars = body_text.chars().count();
    let title_length = title.chars().count();
    let keyword_count = body_text.match_indices(keyword).count();
    let keyword_chars = keyword.chars().count();
    let density_pct = if body_chars == 0 {
        0.0
    } else {
        keyword_count as f64 * keyword_chars as f64 * 100.0 / body_chars as f64
    };
    let subheading_count = count_subheadings(body_html);

    let title_score = title_score(title_length, title.contains(keyword));
    let keyword_density_score = density_score(keyword_count, density_pct);
    let first_paragraph_score = first_paragraph_score(&body_text, keyword);
    let subheading_score = subheading_score(subheading_count);

    let total = (f64::from(title_score) * 0.3
        + f64::from(keyword_density_score) * 0.3
        + f64::from(first_paragraph_score) * 0.2
        + f64::from(subheading_score) * 0.2)
        .round() as u8;

    let details = SeoDetails {
        title_length,
        keyword_count,
        density_pct: (density_pct * 100.0).round() / 100.0,
        subheading_count,
        avg_sentence_length: (avg_sentence_chars(&body_text) * 10.0).round() / 10.0,
        title_score,
        keyword_density_score,
        first_paragraph_score,
        subheading_score,
    };

    let issues = build_suggestions(&details, keyword);

    Ok(ScoreComponent {
        name: "seo".to_string(),
        value: total,
        details: ComponentDetails::Seo(details),
        issues,
    })
}

/// 60 points for length in the ideal band (partial credit nearby), 40 for
/// keyword presence.
fn title_score(length: usize, has_keyword: bool) -> u8 {
    let length_points = if (TITLE_IDEAL_MIN..=TITLE_IDEAL_MAX).contains(&length) {
        60
    } else if (10..TITLE_IDEAL_MIN).contains(&length) || (TITLE_IDEAL_MAX + 1..=60).contains(&length)
    {
        40
    } else {
        20
    };
    let keyword_points = if has_keyword { 40 } else { 0 };
    length_points + keyword_points
}

fn density_score(keyword_count: usize, density_pct: f64) -> u8 {
    if keyword_count == 0 {
        20
    } else if (DENSITY_IDEAL_MIN..=DENSITY_IDEAL_MAX).contains(&density_pct) {
        100
    } else if density_pct < DENSITY_IDEAL_MIN {
        60
    } else if density_pct <= 5.0 {
        60
    } else {
        30
    }
}

fn first_paragraph_score(body_text: &str, keyword: &str) -> u8 {
    let opening: String = body_text.chars().take(FIRST_PARAGRAPH_CHARS).collect();
    if opening.contains(keyword) {
        100
    } else {
        40
    }
}

fn subheading_score(count: usize) -> u8 {
    match count {
        0 => 30,
        1 => 60,
        2..=6 => 100,
        _ => 70,
    }
}

fn build_suggestions(details: &SeoDetails, keyword: &str) -> Vec<String> {
    let mut suggestions = Vec::new();

    if details.title_score < SUGGESTION_THRESHOLD {
        suggestions.push(format!(
            "제목을 {TITLE_IDEAL_MIN}~{TITLE_IDEAL_MAX}자로 조정하고 키워드 '{keyword}'를 포함하세요 (현재 {}자)",
            details.title_length
        ));
    }
    if details.keyword_density_score < SUGGESTION_THRESHOLD {
        if details.keyword_count == 0 {
            suggestions.push(format!("본문에 키워드 '{keyword}'가 없습니다. 자연스럽게 포함하세요"));
        } else if details.density_pct > DENSITY_IDEAL_MAX {
            suggestions.push(format!(
                "키워드 '{keyword}' 밀도가 {:.1}%로 과도합니다. 일부를 유의어로 바꾸세요",
                details.density_pct
            ));
        } else {
            suggestions.push(format!("키워드 '{keyword}' 사용 빈도를 조금 높이세요"));
        }
    }
    if details.first_paragraph_score < SUGGESTION_THRESHOLD {
        suggestions.push(format!(
            "첫 문단 {FIRST_PARAGRAPH_CHARS}자 안에 키워드 '{keyword}'를 배치하세요"
        ));
    }
    if details.subheading_score < SUGGESTION_THRESHOLD {
        suggestions.push("소제목(h2/h3)을 2개 이상 추가해 본문을 구조화하세요".to_string());
    }

    suggestions
}
